use crate::core::models::table::AtomTable;
use crate::engine::contacts;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::similarity::{
    FNAT_CUTOFF, IRMSD_CUTOFF, RmsdMode, SimilarityResult, StructureSimilarity,
};
use crate::engine::zone::ZoneCache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Errors raised by the scoring workflows.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(
        "Cannot partition chains automatically: expected exactly 2 chains in the reference, found {found:?}"
    )]
    AmbiguousChains { found: Vec<char> },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Parameters of a scoring run.
///
/// Empty chain groups ask the workflow to partition a two-chain reference
/// by size; anything else must name the groups explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Chains forming the receptor group.
    pub receptor_chains: Vec<char>,
    /// Chains forming the ligand group.
    pub ligand_chains: Vec<char>,
    /// Heavy-atom cutoff for native contacts, in Angstroms.
    pub fnat_cutoff: f64,
    /// Backbone cutoff defining the interface, in Angstroms.
    pub irmsd_cutoff: f64,
    /// Whether reference zones are cached or recomputed per call.
    pub mode: RmsdMode,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            receptor_chains: Vec::new(),
            ligand_chains: Vec::new(),
            fnat_cutoff: FNAT_CUTOFF,
            irmsd_cutoff: IRMSD_CUTOFF,
            mode: RmsdMode::Cached,
        }
    }
}

/// Scores a single decoy against a reference complex.
#[instrument(skip_all, name = "score_workflow")]
pub fn run(
    decoy: &AtomTable,
    reference: &AtomTable,
    config: &ScoreConfig,
    reporter: &ProgressReporter,
) -> Result<SimilarityResult, ScoreError> {
    reporter.report(Progress::ScoringStart);

    let (receptor_chains, ligand_chains) = resolve_chain_groups(reference, config)?;
    info!(
        receptor = ?receptor_chains,
        ligand = ?ligand_chains,
        "Scoring decoy against reference."
    );

    let mut engine =
        StructureSimilarity::new(decoy, reference, receptor_chains, ligand_chains)?
            .with_cutoffs(config.fnat_cutoff, config.irmsd_cutoff)?;
    let result = engine.compute_all(config.mode)?;

    info!(
        fnat = result.fnat,
        irmsd = result.irmsd,
        lrmsd = result.lrmsd,
        dockq = result.dockq,
        "Scoring complete."
    );
    reporter.report(Progress::ScoringFinish);
    Ok(result)
}

/// Scores a batch of decoys against one reference, sharing the reference's
/// contact zones across the whole batch.
///
/// A decoy that fails to score is reported in its slot and logged; it does
/// not abort the rest of the batch. Only a failure to resolve the chain
/// groups, which no decoy could survive, is returned as an outer error.
#[instrument(skip_all, name = "score_batch_workflow")]
pub fn run_batch(
    decoys: &[AtomTable],
    reference: &AtomTable,
    config: &ScoreConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Result<SimilarityResult, ScoreError>>, ScoreError> {
    contacts::validate_cutoff(config.fnat_cutoff)?;
    contacts::validate_cutoff(config.irmsd_cutoff)?;
    let (receptor_chains, ligand_chains) = resolve_chain_groups(reference, config)?;
    info!(
        decoys = decoys.len(),
        receptor = ?receptor_chains,
        ligand = ?ligand_chains,
        "Scoring decoy batch."
    );
    reporter.report(Progress::BatchStart {
        decoys: decoys.len() as u64,
    });

    let mut cache = ZoneCache::new();
    let mut outcomes = Vec::with_capacity(decoys.len());
    for (index, decoy) in decoys.iter().enumerate() {
        let (outcome, returned) = score_one(
            decoy,
            reference,
            &receptor_chains,
            &ligand_chains,
            config,
            std::mem::take(&mut cache),
        );
        cache = returned;

        if let Err(error) = &outcome {
            warn!(index, error = %error, "Failed to score decoy.");
            reporter.report(Progress::Note(format!("decoy {} failed: {}", index, error)));
        }
        outcomes.push(outcome);
        reporter.report(Progress::DecoyScored);
    }

    reporter.report(Progress::BatchFinish);
    info!(
        scored = outcomes.iter().filter(|o| o.is_ok()).count(),
        failed = outcomes.iter().filter(|o| o.is_err()).count(),
        "Batch complete."
    );
    Ok(outcomes)
}

/// Scores one decoy of a batch and hands the zone cache back for the next.
///
/// Engine construction consumes the cache, so a decoy that fails validation
/// hands back an empty one and the next decoy recomputes the zones.
fn score_one(
    decoy: &AtomTable,
    reference: &AtomTable,
    receptor_chains: &[char],
    ligand_chains: &[char],
    config: &ScoreConfig,
    cache: ZoneCache,
) -> (Result<SimilarityResult, ScoreError>, ZoneCache) {
    let engine = StructureSimilarity::with_zone_cache(
        decoy,
        reference,
        receptor_chains.to_vec(),
        ligand_chains.to_vec(),
        cache,
    )
    .and_then(|engine| engine.with_cutoffs(config.fnat_cutoff, config.irmsd_cutoff));

    match engine {
        Ok(mut engine) => {
            let result = engine.compute_all(config.mode).map_err(ScoreError::from);
            (result, engine.into_zone_cache())
        }
        Err(error) => (Err(error.into()), ZoneCache::new()),
    }
}

/// Resolves the receptor/ligand split, partitioning a two-chain reference
/// by atom count when the configuration names no chains.
fn resolve_chain_groups(
    reference: &AtomTable,
    config: &ScoreConfig,
) -> Result<(Vec<char>, Vec<char>), ScoreError> {
    if !config.receptor_chains.is_empty() || !config.ligand_chains.is_empty() {
        return Ok((
            config.receptor_chains.clone(),
            config.ligand_chains.clone(),
        ));
    }

    let chains = reference.chains();
    if chains.len() != 2 {
        return Err(ScoreError::AmbiguousChains { found: chains });
    }

    let atoms_in = |chain: char| {
        reference
            .records()
            .iter()
            .filter(|record| record.chain_id == chain)
            .count()
    };
    // chains() is sorted, so a tie keeps the lexicographically first chain
    // as the receptor.
    let (receptor, ligand) = if atoms_in(chains[1]) > atoms_in(chains[0]) {
        (chains[1], chains[0])
    } else {
        (chains[0], chains[1])
    };

    info!(%receptor, %ligand, "Partitioned the reference into chain groups by size.");
    Ok((vec![receptor], vec![ligand]))
}
