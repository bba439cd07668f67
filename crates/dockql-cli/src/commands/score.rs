use crate::cli::ScoreArgs;
use crate::config::PartialScoreConfig;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use crate::report::{self, ScoreRow};
use dockql::core::io::pdb::PdbFile;
use dockql::core::io::traits::StructureFile;
use dockql::core::models::table::AtomTable;
use dockql::engine::progress::ProgressReporter;
use dockql::workflows::score;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

pub fn run(args: ScoreArgs) -> Result<()> {
    let partial = match &args.config {
        Some(path) => PartialScoreConfig::from_file(path)?,
        None => PartialScoreConfig::default(),
    };
    let config = partial.merge_with_cli(&args);
    info!(config = ?config, "Resolved scoring configuration.");

    info!("Loading reference structure from {:?}", &args.reference);
    let reference = load_structure(&args.reference)?;

    let mut labels = Vec::with_capacity(args.decoys.len());
    let mut decoys = Vec::with_capacity(args.decoys.len());
    for path in &args.decoys {
        info!("Loading decoy structure from {:?}", path);
        labels.push(structure_label(path));
        decoys.push(load_structure(path)?);
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let rows = if decoys.len() == 1 {
        let result = score::run(&decoys[0], &reference, &config, &reporter)?;
        print!("{}", report::render_single(&labels[0], &result));
        vec![ScoreRow::success(labels[0].clone(), &result)]
    } else {
        let outcomes = score::run_batch(&decoys, &reference, &config, &reporter)?;
        let rows: Vec<ScoreRow> = labels
            .iter()
            .zip(outcomes.iter())
            .map(|(label, outcome)| match outcome {
                Ok(result) => ScoreRow::success(label.clone(), result),
                Err(error) => ScoreRow::failure(label.clone(), error),
            })
            .collect();
        print!("{}", report::render_table(&rows));
        rows
    };

    if let Some(path) = &args.output {
        write_output(&rows, path)?;
        println!("Results written to: {}", path.display());
    }

    Ok(())
}

fn load_structure(path: &Path) -> Result<AtomTable> {
    PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e,
    })
}

fn structure_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_output(rows: &[ScoreRow], path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    let as_json = match extension.as_deref() {
        Some("json") => true,
        Some("csv") => false,
        _ => {
            return Err(CliError::Argument(format!(
                "Unsupported output format for '{}': expected a .json or .csv extension",
                path.display()
            )));
        }
    };

    let mut writer = BufWriter::new(File::create(path)?);
    if as_json {
        report::write_json(rows, &mut writer)
    } else {
        report::write_csv(rows, &mut writer)
    }
}
