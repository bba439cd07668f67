use crate::cli::InfoArgs;
use crate::error::{CliError, Result};
use dockql::core::io::pdb::PdbFile;
use dockql::core::io::traits::StructureFile;
use dockql::core::models::table::AtomTable;
use std::collections::BTreeSet;
use tracing::info;

pub fn run(args: InfoArgs) -> Result<()> {
    info!("Loading structure from {:?}", &args.structure);
    let table = PdbFile::read_from_path(&args.structure).map_err(|e| CliError::FileParsing {
        path: args.structure.clone(),
        source: e,
    })?;

    print!("{}", render_summary(&args.structure.display().to_string(), &table));
    Ok(())
}

fn render_summary(source: &str, table: &AtomTable) -> String {
    let models: BTreeSet<u32> = table.records().iter().map(|r| r.model).collect();
    let residues = table.residues();

    let mut out = String::new();
    out.push_str(&format!("Structure: {}\n", source));
    out.push_str(&format!(
        "  {} atoms, {} residues, {} model(s)\n",
        table.len(),
        residues.len(),
        models.len()
    ));
    for chain in table.chains() {
        let atoms = table
            .records()
            .iter()
            .filter(|r| r.chain_id == chain)
            .count();
        let chain_residues = residues
            .iter()
            .filter(|(key, _)| key.chain_id == chain)
            .count();
        out.push_str(&format!(
            "  chain {}: {} residues, {} atoms\n",
            chain, chain_residues, atoms
        ));
    }
    out
}
