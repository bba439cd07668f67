use anyhow::Context;
use crate::error::Result;
use dockql::engine::similarity::{SimilarityResult, SimilarityWarning};
use serde::Serialize;
use std::io::Write;

/// One decoy's outcome, flattened for tabular and serialized output.
///
/// A failed decoy keeps its row with the metric columns empty and the
/// error message filled in, so batch output always has one row per input.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreRow {
    pub decoy: String,
    pub fnat: Option<f64>,
    pub irmsd: Option<f64>,
    pub lrmsd: Option<f64>,
    pub dockq: Option<f64>,
    pub native_pairs: Option<usize>,
    pub reproduced_pairs: Option<usize>,
    pub error: Option<String>,
}

impl ScoreRow {
    pub fn success(decoy: impl Into<String>, result: &SimilarityResult) -> Self {
        Self {
            decoy: decoy.into(),
            fnat: Some(result.fnat),
            irmsd: Some(result.irmsd),
            lrmsd: Some(result.lrmsd),
            dockq: Some(result.dockq),
            native_pairs: Some(result.native_pairs),
            reproduced_pairs: Some(result.reproduced_pairs),
            error: None,
        }
    }

    pub fn failure(decoy: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            decoy: decoy.into(),
            fnat: None,
            irmsd: None,
            lrmsd: None,
            dockq: None,
            native_pairs: None,
            reproduced_pairs: None,
            error: Some(error.to_string()),
        }
    }
}

pub fn write_json(rows: &[ScoreRow], writer: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, rows).context("Failed to serialize JSON results")?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_csv(rows: &[ScoreRow], writer: &mut impl Write) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .context("Failed to serialize CSV results")?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Formats the rows as a fixed-width table for terminal output.
pub fn render_table(rows: &[ScoreRow]) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.decoy.len())
        .chain(std::iter::once("decoy".len()))
        .max()
        .unwrap_or(5);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:>7}  {:>8}  {:>8}  {:>7}  {:>9}\n",
        "decoy", "fnat", "irmsd", "lrmsd", "dockq", "contacts"
    ));
    for row in rows {
        match (&row.error, row.fnat) {
            (Some(error), _) => {
                out.push_str(&format!(
                    "{:<name_width$}  error: {}\n",
                    row.decoy, error
                ));
            }
            (None, Some(_)) => {
                out.push_str(&format!(
                    "{:<name_width$}  {:>7.3}  {:>8.3}  {:>8.3}  {:>7.3}  {:>4}/{:<4}\n",
                    row.decoy,
                    row.fnat.unwrap_or(f64::NAN),
                    row.irmsd.unwrap_or(f64::NAN),
                    row.lrmsd.unwrap_or(f64::NAN),
                    row.dockq.unwrap_or(f64::NAN),
                    row.reproduced_pairs.unwrap_or(0),
                    row.native_pairs.unwrap_or(0),
                ));
            }
            (None, None) => {
                out.push_str(&format!("{:<name_width$}  (no result)\n", row.decoy));
            }
        }
    }
    out
}

/// Formats a single decoy's result as a multi-line report.
pub fn render_single(label: &str, result: &SimilarityResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Decoy: {}\n", label));
    out.push_str(&format!(
        "  fnat   {:>7.3}  ({}/{} native contacts)\n",
        result.fnat, result.reproduced_pairs, result.native_pairs
    ));
    out.push_str(&format!("  iRMSD  {:>7.3} A\n", result.irmsd));
    out.push_str(&format!("  LRMSD  {:>7.3} A\n", result.lrmsd));
    out.push_str(&format!("  DockQ  {:>7.3}\n", result.dockq));
    for warning in &result.warnings {
        match warning {
            SimilarityWarning::NoNativeContacts { cutoff } => {
                out.push_str(&format!(
                    "  warning: the reference has no interchain contacts at {:.1} A\n",
                    cutoff
                ));
            }
        }
    }
    out
}
