use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "DockQL CLI - Score biomolecular docking models against a reference complex with fnat, iRMSD, LRMSD and DockQ.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one or more decoy structures against a reference complex.
    Score(ScoreArgs),
    /// Summarize the chains, residues, and models of a structure file.
    Info(InfoArgs),
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Path to the reference (native) structure in PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// Path to a decoy (model) structure. Repeat for batch scoring.
    #[arg(
        short,
        long = "decoy",
        required = true,
        value_name = "PATH",
        action = clap::ArgAction::Append
    )]
    pub decoys: Vec<PathBuf>,

    /// Chains forming the receptor group (e.g. A or A,B).
    /// Defaults to the larger chain of a two-chain reference.
    #[arg(
        long,
        value_name = "CHAINS",
        value_delimiter = ',',
        value_parser = parse_chain
    )]
    pub receptor_chains: Vec<char>,

    /// Chains forming the ligand group (e.g. C or C,D).
    #[arg(
        long,
        value_name = "CHAINS",
        value_delimiter = ',',
        value_parser = parse_chain
    )]
    pub ligand_chains: Vec<char>,

    /// Override the heavy-atom contact cutoff for fnat, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub fnat_cutoff: Option<f64>,

    /// Override the backbone interface cutoff for iRMSD, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub irmsd_cutoff: Option<f64>,

    /// Recompute reference contact zones on every metric instead of
    /// serving them from the engine cache. Results are identical.
    #[arg(long)]
    pub exact: bool,

    /// Write results to a file; the format follows the extension
    /// (.json or .csv). Without it, results print as a table.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a scoring configuration file in TOML format.
    /// Command-line flags override values from the file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the structure file to summarize.
    #[arg(value_name = "PATH")]
    pub structure: PathBuf,
}

fn parse_chain(value: &str) -> Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!(
            "chain identifiers are single characters, got '{value}'"
        )),
    }
}
