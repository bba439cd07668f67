use super::contacts::{self, ContactZone};
use super::error::EngineError;
use super::zone::{ZoneCache, ZoneFilter, ZoneKey};
use crate::core::geometry::{rmsd, superpose};
use crate::core::models::atom::ResidueKey;
use crate::core::models::ids::StructureId;
use crate::core::models::points::PointSet;
use crate::core::models::selection::Selection;
use crate::core::models::table::AtomTable;
use crate::core::utils::identifiers::{is_backbone_atom, is_heavy_atom};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Heavy-atom distance below which two residues across the interface count
/// as a native contact, in Angstroms.
pub const FNAT_CUTOFF: f64 = 5.0;

/// Backbone distance that defines the interface measured by interface RMSD,
/// in Angstroms.
pub const IRMSD_CUTOFF: f64 = 10.0;

// DockQ scaling constants d1 (ligand RMSD) and d2 (interface RMSD) from
// Basu & Wallner 2016, "DockQ: A Quality Measure for Protein-Protein
// Docking Models", PLoS ONE 11(8).
const DOCKQ_LRMSD_SCALE: f64 = 8.5;
const DOCKQ_IRMSD_SCALE: f64 = 1.5;

/// The read access a similarity engine needs from a structure.
///
/// [`AtomTable`] is the in-tree implementation; the trait keeps the engine
/// decoupled from how atom records are stored.
pub trait StructureQuery {
    /// A stable identity for this structure, used in cache keys.
    fn id(&self) -> StructureId;

    /// The coordinate revision; any mutation of positions must change it.
    fn revision(&self) -> u64;

    /// The distinct chain identifiers present, sorted.
    fn chains(&self) -> Vec<char>;

    /// The keyed coordinates of every atom matching `selection`.
    fn point_set(&self, selection: &Selection) -> PointSet;
}

impl StructureQuery for AtomTable {
    fn id(&self) -> StructureId {
        AtomTable::id(self)
    }

    fn revision(&self) -> u64 {
        AtomTable::revision(self)
    }

    fn chains(&self) -> Vec<char> {
        AtomTable::chains(self)
    }

    fn point_set(&self, selection: &Selection) -> PointSet {
        AtomTable::point_set(self, selection)
    }
}

/// How metric computations obtain the reference contact zones they depend
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RmsdMode {
    /// Recompute the reference zone on every call.
    Direct,
    /// Serve reference zones from the engine's cache, computing them on
    /// first use. Results are identical to [`RmsdMode::Direct`].
    #[default]
    Cached,
}

/// A non-fatal condition raised while scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum SimilarityWarning {
    /// The reference has no interchain contacts at the fnat cutoff, so the
    /// fraction of native contacts was reported as zero.
    NoNativeContacts { cutoff: f64 },
}

/// The fraction of native contacts reproduced by a decoy, with the counts
/// it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fnat {
    /// Reproduced native residue pairs over all native pairs, in [0, 1].
    pub value: f64,
    /// Residue pairs in contact across the reference interface.
    pub native_pairs: usize,
    /// Native pairs also in contact in the decoy.
    pub reproduced_pairs: usize,
    /// Set when the reference had no native contacts at all.
    pub warning: Option<SimilarityWarning>,
}

/// Every similarity metric for one decoy scored against one reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    /// Fraction of native contacts reproduced by the decoy.
    pub fnat: f64,
    /// Backbone RMSD over the reference interface after superposition.
    pub irmsd: f64,
    /// Ligand RMSD after superposing on receptor atoms alone.
    pub lrmsd: f64,
    /// The DockQ composite of the three metrics.
    pub dockq: f64,
    /// Residue pairs in contact in the reference.
    pub native_pairs: usize,
    /// Native pairs also in contact in the decoy.
    pub reproduced_pairs: usize,
    /// Non-fatal conditions encountered while scoring.
    pub warnings: Vec<SimilarityWarning>,
}

/// Combines the three metrics into the DockQ composite score.
///
/// DockQ averages fnat with scaled inverse-square terms of the two RMSDs
/// and lies in (0, 1]; a perfect model scores 1. The scaling constants are
/// the published d1/d2 values (Basu & Wallner 2016).
pub fn dockq_score(fnat: f64, lrmsd: f64, irmsd: f64) -> f64 {
    let lrmsd_term = 1.0 / (1.0 + (lrmsd / DOCKQ_LRMSD_SCALE).powi(2));
    let irmsd_term = 1.0 / (1.0 + (irmsd / DOCKQ_IRMSD_SCALE).powi(2));
    (fnat + lrmsd_term + irmsd_term) / 3.0
}

/// Scores a decoy structure against a reference complex.
///
/// The engine borrows both structures for its lifetime and partitions the
/// complex into a receptor and a ligand chain group, validated up front.
/// Zones of the reference are the only thing worth memoizing across calls;
/// they live in an explicit [`ZoneCache`] owned by the engine, which a
/// batch driver can seed via [`with_zone_cache`] and recover via
/// [`into_zone_cache`] to share one reference's zones across many decoys.
///
/// [`with_zone_cache`]: StructureSimilarity::with_zone_cache
/// [`into_zone_cache`]: StructureSimilarity::into_zone_cache
pub struct StructureSimilarity<'a, S: StructureQuery> {
    decoy: &'a S,
    reference: &'a S,
    receptor_chains: Vec<char>,
    ligand_chains: Vec<char>,
    fnat_cutoff: f64,
    irmsd_cutoff: f64,
    cache: ZoneCache,
}

impl<'a, S: StructureQuery> StructureSimilarity<'a, S> {
    /// Creates an engine scoring `decoy` against `reference` with the
    /// default cutoffs and an empty zone cache.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyChainGroup`] when either group has no
    /// chains, [`EngineError::OverlappingChainGroups`] when a chain appears
    /// in both, and [`EngineError::ChainNotFound`] when a named chain is
    /// absent from either structure.
    pub fn new(
        decoy: &'a S,
        reference: &'a S,
        receptor_chains: Vec<char>,
        ligand_chains: Vec<char>,
    ) -> Result<Self, EngineError> {
        Self::with_zone_cache(
            decoy,
            reference,
            receptor_chains,
            ligand_chains,
            ZoneCache::new(),
        )
    }

    /// Like [`new`](StructureSimilarity::new), but seeds the engine with an
    /// existing cache so consecutive engines over the same reference reuse
    /// its zones.
    pub fn with_zone_cache(
        decoy: &'a S,
        reference: &'a S,
        receptor_chains: Vec<char>,
        ligand_chains: Vec<char>,
        cache: ZoneCache,
    ) -> Result<Self, EngineError> {
        validate_chain_groups(decoy, reference, &receptor_chains, &ligand_chains)?;
        Ok(Self {
            decoy,
            reference,
            receptor_chains,
            ligand_chains,
            fnat_cutoff: FNAT_CUTOFF,
            irmsd_cutoff: IRMSD_CUTOFF,
            cache,
        })
    }

    /// Replaces the default contact cutoffs.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCutoff`] when either cutoff is not a
    /// positive finite number.
    pub fn with_cutoffs(mut self, fnat_cutoff: f64, irmsd_cutoff: f64) -> Result<Self, EngineError> {
        contacts::validate_cutoff(fnat_cutoff)?;
        contacts::validate_cutoff(irmsd_cutoff)?;
        self.fnat_cutoff = fnat_cutoff;
        self.irmsd_cutoff = irmsd_cutoff;
        Ok(self)
    }

    /// The heavy-atom cutoff used for native contacts, in Angstroms.
    pub fn fnat_cutoff(&self) -> f64 {
        self.fnat_cutoff
    }

    /// The backbone cutoff that defines the interface, in Angstroms.
    pub fn irmsd_cutoff(&self) -> f64 {
        self.irmsd_cutoff
    }

    /// Read access to the zone cache and its counters.
    pub fn zone_cache(&self) -> &ZoneCache {
        &self.cache
    }

    /// Drops every cached zone, forcing recomputation on the next cached
    /// call.
    pub fn reset_zone_cache(&mut self) {
        self.cache.reset();
    }

    /// Consumes the engine and hands back its cache for reuse.
    pub fn into_zone_cache(self) -> ZoneCache {
        self.cache
    }

    /// Computes the fraction of native contacts the decoy reproduces.
    ///
    /// A native contact is a receptor/ligand residue pair of the reference
    /// with any two heavy atoms within the fnat cutoff; the fraction is how
    /// many of those pairs are also in contact in the decoy. The decoy's
    /// contacts are always computed directly; `mode` only governs the
    /// reference zone. A reference without a single native contact is not
    /// an error: the fraction is reported as zero with a warning attached.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCutoff`] when the configured cutoff
    /// cannot be used.
    pub fn compute_fnat(&mut self, mode: RmsdMode) -> Result<Fnat, EngineError> {
        let cutoff = self.fnat_cutoff;
        let native: BTreeSet<(ResidueKey, ResidueKey)> = match mode {
            RmsdMode::Direct => self
                .reference_zone_direct(ZoneFilter::HeavyAtoms, cutoff)?
                .residue_pairs()
                .clone(),
            RmsdMode::Cached => self
                .reference_zone_cached(ZoneFilter::HeavyAtoms, cutoff)?
                .residue_pairs()
                .clone(),
        };

        if native.is_empty() {
            warn!(
                cutoff,
                "reference has no native contacts, reporting fnat as 0"
            );
            return Ok(Fnat {
                value: 0.0,
                native_pairs: 0,
                reproduced_pairs: 0,
                warning: Some(SimilarityWarning::NoNativeContacts { cutoff }),
            });
        }

        let receptor = group_points(
            self.decoy,
            &self.receptor_chains,
            Some(ZoneFilter::HeavyAtoms),
        );
        let ligand = group_points(
            self.decoy,
            &self.ligand_chains,
            Some(ZoneFilter::HeavyAtoms),
        );
        let decoy_zone = contacts::find_contacts(&receptor, &ligand, cutoff)?;

        let reproduced = decoy_zone
            .residue_pairs()
            .iter()
            .filter(|pair| native.contains(*pair))
            .count();

        Ok(Fnat {
            value: reproduced as f64 / native.len() as f64,
            native_pairs: native.len(),
            reproduced_pairs: reproduced,
            warning: None,
        })
    }

    /// Computes the interface RMSD of the decoy.
    ///
    /// The interface is every residue of the reference with a backbone atom
    /// within the irmsd cutoff of the opposite chain group; it is always
    /// derived from the reference, never from the decoy. The backbone atoms
    /// of those residues are matched by identity across the two structures,
    /// the decoy's set is superposed onto the reference's, and the residual
    /// deviation is the metric.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoNativeContacts`] when the reference has no
    /// interface at the cutoff and [`EngineError::InsufficientOverlap`]
    /// when fewer than 3 interface backbone atoms match between the
    /// structures.
    pub fn compute_irmsd(&mut self, mode: RmsdMode) -> Result<f64, EngineError> {
        let cutoff = self.irmsd_cutoff;
        let interface: BTreeSet<ResidueKey> = match mode {
            RmsdMode::Direct => self
                .reference_zone_direct(ZoneFilter::Backbone, cutoff)?
                .interface_residues(),
            RmsdMode::Cached => self
                .reference_zone_cached(ZoneFilter::Backbone, cutoff)?
                .interface_residues(),
        };
        if interface.is_empty() {
            return Err(EngineError::NoNativeContacts { cutoff });
        }

        let reference_backbone = self.interface_backbone(self.reference, &interface);
        let decoy_backbone = self.interface_backbone(self.decoy, &interface);
        let (reference_matched, decoy_matched) = reference_backbone.matched(&decoy_backbone);
        if reference_matched.len() < 3 {
            return Err(EngineError::InsufficientOverlap {
                matched: reference_matched.len(),
            });
        }

        let fit = superpose(decoy_matched.coords(), reference_matched.coords())?;
        Ok(fit.rmsd)
    }

    /// Computes the ligand RMSD of the decoy.
    ///
    /// The decoy is superposed onto the reference using the matched
    /// receptor atoms alone, and the deviation is then measured over the
    /// matched ligand atoms. The asymmetry is the point of the metric: a
    /// model with a perfect receptor and a displaced ligand scores exactly
    /// the displacement.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientOverlap`] when fewer than 3
    /// receptor atoms, or no ligand atoms, match between the structures.
    pub fn compute_lrmsd(&self) -> Result<f64, EngineError> {
        let reference_receptor = group_points(self.reference, &self.receptor_chains, None);
        let decoy_receptor = group_points(self.decoy, &self.receptor_chains, None);
        let (reference_matched, decoy_matched) = reference_receptor.matched(&decoy_receptor);
        if reference_matched.len() < 3 {
            return Err(EngineError::InsufficientOverlap {
                matched: reference_matched.len(),
            });
        }
        let fit = superpose(decoy_matched.coords(), reference_matched.coords())?;

        let reference_ligand = group_points(self.reference, &self.ligand_chains, None);
        let decoy_ligand = group_points(self.decoy, &self.ligand_chains, None);
        let (reference_ligand, decoy_ligand) = reference_ligand.matched(&decoy_ligand);
        if decoy_ligand.is_empty() {
            return Err(EngineError::InsufficientOverlap { matched: 0 });
        }

        let moved = decoy_ligand.transformed(&fit.transform);
        Ok(rmsd(moved.coords(), reference_ligand.coords())?)
    }

    /// Computes fnat, interface RMSD, ligand RMSD, and their DockQ
    /// composite in one call.
    ///
    /// # Errors
    ///
    /// Propagates the first error of the underlying metrics unchanged.
    pub fn compute_all(&mut self, mode: RmsdMode) -> Result<SimilarityResult, EngineError> {
        let fnat = self.compute_fnat(mode)?;
        let irmsd = self.compute_irmsd(mode)?;
        let lrmsd = self.compute_lrmsd()?;
        let dockq = dockq_score(fnat.value, lrmsd, irmsd);

        Ok(SimilarityResult {
            fnat: fnat.value,
            irmsd,
            lrmsd,
            dockq,
            native_pairs: fnat.native_pairs,
            reproduced_pairs: fnat.reproduced_pairs,
            warnings: fnat.warning.into_iter().collect(),
        })
    }

    fn reference_zone_direct(
        &self,
        filter: ZoneFilter,
        cutoff: f64,
    ) -> Result<ContactZone, EngineError> {
        let receptor = group_points(self.reference, &self.receptor_chains, Some(filter));
        let ligand = group_points(self.reference, &self.ligand_chains, Some(filter));
        contacts::find_contacts(&receptor, &ligand, cutoff)
    }

    fn reference_zone_cached(
        &mut self,
        filter: ZoneFilter,
        cutoff: f64,
    ) -> Result<&ContactZone, EngineError> {
        let reference = self.reference;
        let receptor_chains = &self.receptor_chains;
        let ligand_chains = &self.ligand_chains;
        let key = ZoneKey::new(reference.id(), reference.revision(), cutoff, filter);
        self.cache.get_or_compute(key, || {
            let receptor = group_points(reference, receptor_chains, Some(filter));
            let ligand = group_points(reference, ligand_chains, Some(filter));
            contacts::find_contacts(&receptor, &ligand, cutoff)
        })
    }

    fn interface_backbone(&self, structure: &S, interface: &BTreeSet<ResidueKey>) -> PointSet {
        let chains: Vec<char> = self
            .receptor_chains
            .iter()
            .chain(self.ligand_chains.iter())
            .copied()
            .collect();
        let selection = Selection::new().chains(chains);
        structure
            .point_set(&selection)
            .filtered(|key| is_backbone_atom(&key.name) && interface.contains(&key.residue))
    }
}

fn group_points<S: StructureQuery>(
    structure: &S,
    chains: &[char],
    filter: Option<ZoneFilter>,
) -> PointSet {
    let selection = Selection::new().chains(chains.iter().copied());
    let points = structure.point_set(&selection);
    match filter {
        None => points,
        Some(ZoneFilter::HeavyAtoms) => points.filtered(|key| is_heavy_atom(&key.name)),
        Some(ZoneFilter::Backbone) => points.filtered(|key| is_backbone_atom(&key.name)),
    }
}

fn validate_chain_groups<S: StructureQuery>(
    decoy: &S,
    reference: &S,
    receptor_chains: &[char],
    ligand_chains: &[char],
) -> Result<(), EngineError> {
    if receptor_chains.is_empty() {
        return Err(EngineError::EmptyChainGroup { group: "receptor" });
    }
    if ligand_chains.is_empty() {
        return Err(EngineError::EmptyChainGroup { group: "ligand" });
    }
    if let Some(&chain) = receptor_chains
        .iter()
        .find(|chain| ligand_chains.contains(chain))
    {
        return Err(EngineError::OverlappingChainGroups { chain });
    }

    for (structure, label) in [(decoy, "decoy"), (reference, "reference")] {
        let present = structure.chains();
        for &chain in receptor_chains.iter().chain(ligand_chains.iter()) {
            if !present.contains(&chain) {
                return Err(EngineError::ChainNotFound {
                    chain,
                    structure: label,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use nalgebra::{Point3, Rotation3, Unit, Vector3};

    fn add_residue(
        table: &mut AtomTable,
        serial: &mut i32,
        chain: char,
        res_seq: isize,
        res_name: &str,
        origin: [f64; 3],
    ) {
        let [x, y, z] = origin;
        let atoms = [
            ("N", [x, y, z]),
            ("CA", [x + 1.0, y + 0.8, z]),
            ("C", [x + 2.0, y, z]),
            ("O", [x + 2.0, y + 1.2, z]),
            ("CB", [x + 1.0, y - 1.3, z + 0.7]),
        ];
        for (name, [px, py, pz]) in atoms {
            *serial += 1;
            table.push(AtomRecord::new(
                *serial,
                name,
                res_name,
                chain,
                res_seq,
                Point3::new(px, py, pz),
            ));
        }
    }

    /// A two-chain complex: three receptor residues along x at y = 0 facing
    /// two ligand residues at y = 4.2, with sidechains reaching across.
    fn reference_complex() -> AtomTable {
        let mut table = AtomTable::new();
        let mut serial = 0;
        add_residue(&mut table, &mut serial, 'A', 1, "ALA", [0.0, 0.0, 0.0]);
        add_residue(&mut table, &mut serial, 'A', 2, "GLY", [4.0, 0.0, 0.0]);
        add_residue(&mut table, &mut serial, 'A', 3, "SER", [8.0, 0.0, 0.0]);
        add_residue(&mut table, &mut serial, 'B', 1, "LEU", [2.0, 4.2, 0.0]);
        add_residue(&mut table, &mut serial, 'B', 2, "VAL", [6.0, 4.2, 0.0]);
        table
    }

    fn shift_chain(table: &mut AtomTable, chain: char, shift: Vector3<f64>) {
        let selection = Selection::new().chains([chain]);
        let moved: Vec<_> = table.xyz(&selection).iter().map(|p| p + shift).collect();
        table.update_xyz(&selection, &moved).unwrap();
    }

    #[test]
    fn identical_structures_score_perfectly() {
        let reference = reference_complex();
        let decoy = reference.clone();
        let mut engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();

        let result = engine.compute_all(RmsdMode::Cached).unwrap();

        assert_eq!(result.fnat, 1.0);
        assert!(result.irmsd < 1e-9);
        assert!(result.lrmsd < 1e-9);
        assert!((result.dockq - 1.0).abs() < 1e-9);
        assert!(result.native_pairs > 0);
        assert_eq!(result.native_pairs, result.reproduced_pairs);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn rigid_motion_of_the_whole_decoy_is_a_perfect_model() {
        let reference = reference_complex();
        let mut decoy = reference.clone();
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(0.3, 1.0, -0.2)),
            0.7,
        );
        let everything = Selection::new();
        let moved: Vec<_> = decoy
            .xyz(&everything)
            .iter()
            .map(|p| rotation * p + Vector3::new(3.0, -2.0, 5.0))
            .collect();
        decoy.update_xyz(&everything, &moved).unwrap();

        let mut engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();
        let result = engine.compute_all(RmsdMode::Cached).unwrap();

        assert_eq!(result.fnat, 1.0);
        assert!(result.irmsd < 1e-9);
        assert!(result.lrmsd < 1e-9);
    }

    #[test]
    fn translated_ligand_scores_reflect_the_displacement() {
        let reference = reference_complex();
        let mut decoy = reference.clone();
        shift_chain(&mut decoy, 'B', Vector3::new(0.0, 10.0, 0.0));

        let mut engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();

        let fnat = engine.compute_fnat(RmsdMode::Cached).unwrap();
        assert_eq!(fnat.value, 0.0);
        assert!(fnat.native_pairs > 0);
        assert!(fnat.warning.is_none());

        let lrmsd = engine.compute_lrmsd().unwrap();
        assert!((lrmsd - 10.0).abs() < 1e-6);

        let irmsd = engine.compute_irmsd(RmsdMode::Cached).unwrap();
        assert!(irmsd > 0.5);
    }

    #[test]
    fn fnat_is_a_bounded_fraction() {
        let reference = reference_complex();
        let mut decoy = reference.clone();
        shift_chain(&mut decoy, 'B', Vector3::new(0.0, 1.5, 0.0));

        let mut engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();
        let fnat = engine.compute_fnat(RmsdMode::Direct).unwrap();

        assert!(fnat.value >= 0.0);
        assert!(fnat.value <= 1.0);
        assert!(fnat.reproduced_pairs <= fnat.native_pairs);
    }

    #[test]
    fn direct_and_cached_modes_agree() {
        let reference = reference_complex();
        let mut decoy = reference.clone();
        shift_chain(&mut decoy, 'B', Vector3::new(0.4, 0.9, -0.3));

        let mut engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();

        let direct_fnat = engine.compute_fnat(RmsdMode::Direct).unwrap();
        let cached_fnat = engine.compute_fnat(RmsdMode::Cached).unwrap();
        assert!(
            (direct_fnat.value - cached_fnat.value).abs()
                <= 1e-6 * direct_fnat.value.abs().max(1.0)
        );

        let direct_irmsd = engine.compute_irmsd(RmsdMode::Direct).unwrap();
        let cached_irmsd = engine.compute_irmsd(RmsdMode::Cached).unwrap();
        assert!((direct_irmsd - cached_irmsd).abs() <= 1e-6 * direct_irmsd.abs().max(1.0));
    }

    #[test]
    fn cached_mode_computes_each_reference_zone_once() {
        let reference = reference_complex();
        let decoy = reference.clone();
        let mut engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();

        engine.compute_fnat(RmsdMode::Cached).unwrap();
        engine.compute_fnat(RmsdMode::Cached).unwrap();
        engine.compute_irmsd(RmsdMode::Cached).unwrap();
        engine.compute_irmsd(RmsdMode::Cached).unwrap();

        assert_eq!(engine.zone_cache().computations(), 2);
        assert_eq!(engine.zone_cache().hits(), 2);

        // Direct mode bypasses the cache entirely.
        engine.compute_fnat(RmsdMode::Direct).unwrap();
        assert_eq!(engine.zone_cache().computations(), 2);
        assert_eq!(engine.zone_cache().hits(), 2);

        engine.reset_zone_cache();
        assert!(engine.zone_cache().is_empty());
        engine.compute_fnat(RmsdMode::Cached).unwrap();
        assert_eq!(engine.zone_cache().computations(), 1);
    }

    #[test]
    fn batches_share_zones_through_with_zone_cache() {
        let reference = reference_complex();
        let decoy_one = reference.clone();
        let mut decoy_two = reference.clone();
        shift_chain(&mut decoy_two, 'B', Vector3::new(0.0, 1.0, 0.0));

        let mut engine =
            StructureSimilarity::new(&decoy_one, &reference, vec!['A'], vec!['B']).unwrap();
        engine.compute_fnat(RmsdMode::Cached).unwrap();
        let cache = engine.into_zone_cache();

        let mut engine = StructureSimilarity::with_zone_cache(
            &decoy_two,
            &reference,
            vec!['A'],
            vec!['B'],
            cache,
        )
        .unwrap();
        engine.compute_fnat(RmsdMode::Cached).unwrap();

        assert_eq!(engine.zone_cache().computations(), 1);
        assert_eq!(engine.zone_cache().hits(), 1);
    }

    #[test]
    fn construction_rejects_bad_chain_groups() {
        let reference = reference_complex();
        let decoy = reference.clone();

        assert!(matches!(
            StructureSimilarity::new(&decoy, &reference, vec![], vec!['B']),
            Err(EngineError::EmptyChainGroup { group: "receptor" })
        ));
        assert!(matches!(
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec![]),
            Err(EngineError::EmptyChainGroup { group: "ligand" })
        ));
        assert!(matches!(
            StructureSimilarity::new(&decoy, &reference, vec!['A', 'B'], vec!['B']),
            Err(EngineError::OverlappingChainGroups { chain: 'B' })
        ));
        assert!(matches!(
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['Z']),
            Err(EngineError::ChainNotFound {
                chain: 'Z',
                structure: "decoy"
            })
        ));
    }

    #[test]
    fn construction_names_the_structure_missing_a_chain() {
        let reference = reference_complex();
        let mut decoy = reference.clone();
        let mut serial = 1000;
        add_residue(&mut decoy, &mut serial, 'C', 1, "GLY", [20.0, 0.0, 0.0]);

        // Chain C exists in the decoy but not in the reference.
        assert!(matches!(
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['C']),
            Err(EngineError::ChainNotFound {
                chain: 'C',
                structure: "reference"
            })
        ));
    }

    #[test]
    fn with_cutoffs_rejects_non_positive_values() {
        let reference = reference_complex();
        let decoy = reference.clone();

        let engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();
        assert!(matches!(
            engine.with_cutoffs(-5.0, 10.0),
            Err(EngineError::InvalidCutoff(_))
        ));

        let engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();
        assert!(matches!(
            engine.with_cutoffs(5.0, f64::INFINITY),
            Err(EngineError::InvalidCutoff(_))
        ));
    }

    #[test]
    fn distant_chains_warn_for_fnat_and_fail_irmsd() {
        let mut reference = reference_complex();
        shift_chain(&mut reference, 'B', Vector3::new(0.0, 50.0, 0.0));
        let decoy = reference.clone();

        let mut engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();

        let fnat = engine.compute_fnat(RmsdMode::Cached).unwrap();
        assert_eq!(fnat.value, 0.0);
        assert_eq!(fnat.native_pairs, 0);
        assert!(matches!(
            fnat.warning,
            Some(SimilarityWarning::NoNativeContacts { .. })
        ));

        assert!(matches!(
            engine.compute_irmsd(RmsdMode::Cached),
            Err(EngineError::NoNativeContacts { .. })
        ));
    }

    #[test]
    fn lrmsd_requires_matched_receptor_atoms() {
        let reference = reference_complex();
        let mut decoy = AtomTable::new();
        let mut serial = 0;
        // Same chains, disjoint residue numbering: nothing matches by key.
        add_residue(&mut decoy, &mut serial, 'A', 100, "ALA", [0.0, 0.0, 0.0]);
        add_residue(&mut decoy, &mut serial, 'B', 100, "LEU", [2.0, 4.2, 0.0]);

        let engine =
            StructureSimilarity::new(&decoy, &reference, vec!['A'], vec!['B']).unwrap();
        assert!(matches!(
            engine.compute_lrmsd(),
            Err(EngineError::InsufficientOverlap { matched: 0 })
        ));
    }

    #[test]
    fn dockq_of_a_perfect_model_is_one() {
        assert!((dockq_score(1.0, 0.0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn dockq_at_the_scaling_constants_is_one_half() {
        // At lrmsd = 8.5 and irmsd = 1.5 both RMSD terms are exactly 1/2.
        assert!((dockq_score(0.5, 8.5, 1.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn dockq_of_a_hopeless_model_tends_to_zero() {
        let score = dockq_score(0.0, 80.0, 30.0);
        assert!(score < 0.01);
    }
}
