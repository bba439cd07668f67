use super::error::EngineError;
use crate::core::models::atom::{AtomKey, ResidueKey};
use crate::core::models::points::PointSet;
use kiddo::SquaredEuclidean;
use kiddo::float::kdtree::KdTree;
use std::collections::BTreeSet;

// Below this many candidate pairs a double loop beats building a tree.
const SMALL_PRODUCT_LIMIT: usize = 4096;

// Inflation applied to the tree query radius; the exact squared-distance
// filter afterwards restores the strict inclusive boundary.
const RADIUS_SLACK: f64 = 1.0 + 1e-9;

/// The set of atom and residue pairs from two sides that lie within a
/// cutoff of each other.
///
/// A zone is immutable once built. Pairs are kept in ordered sets so
/// iteration, comparison, and hashing of derived data are deterministic
/// regardless of how the zone was computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactZone {
    cutoff: f64,
    atom_pairs: BTreeSet<(AtomKey, AtomKey)>,
    residue_pairs: BTreeSet<(ResidueKey, ResidueKey)>,
    residues_a: BTreeSet<ResidueKey>,
    residues_b: BTreeSet<ResidueKey>,
}

impl ContactZone {
    fn empty(cutoff: f64) -> Self {
        Self {
            cutoff,
            atom_pairs: BTreeSet::new(),
            residue_pairs: BTreeSet::new(),
            residues_a: BTreeSet::new(),
            residues_b: BTreeSet::new(),
        }
    }

    fn from_index_pairs(a: &PointSet, b: &PointSet, pairs: &[(usize, usize)], cutoff: f64) -> Self {
        let mut zone = Self::empty(cutoff);
        for &(i, j) in pairs {
            let key_a = a.keys()[i].clone();
            let key_b = b.keys()[j].clone();
            zone.residues_a.insert(key_a.residue);
            zone.residues_b.insert(key_b.residue);
            zone.residue_pairs.insert((key_a.residue, key_b.residue));
            zone.atom_pairs.insert((key_a, key_b));
        }
        zone
    }

    /// The cutoff distance this zone was computed with, in Angstroms.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Atom pairs in contact, ordered, first element from side A.
    pub fn atom_pairs(&self) -> &BTreeSet<(AtomKey, AtomKey)> {
        &self.atom_pairs
    }

    /// Residue pairs in contact, derived from the atom pairs.
    pub fn residue_pairs(&self) -> &BTreeSet<(ResidueKey, ResidueKey)> {
        &self.residue_pairs
    }

    /// Residues on side A with at least one contact.
    pub fn residues_a(&self) -> &BTreeSet<ResidueKey> {
        &self.residues_a
    }

    /// Residues on side B with at least one contact.
    pub fn residues_b(&self) -> &BTreeSet<ResidueKey> {
        &self.residues_b
    }

    /// The union of contact residues from both sides.
    pub fn interface_residues(&self) -> BTreeSet<ResidueKey> {
        self.residues_a.union(&self.residues_b).copied().collect()
    }

    /// Number of atom pairs in contact.
    pub fn len(&self) -> usize {
        self.atom_pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_pairs.is_empty()
    }
}

/// Finds all atom pairs between `a` and `b` separated by at most `cutoff`.
///
/// The boundary is inclusive: a pair at exactly the cutoff distance is a
/// contact. Large inputs are resolved through a k-d tree over the bigger
/// side; every candidate is then re-checked against the exact squared
/// cutoff, so both the indexed and the exhaustive path report identical
/// zones. An empty side yields an empty zone, which the caller interprets.
///
/// # Errors
///
/// Returns [`EngineError::InvalidCutoff`] when `cutoff` is not a positive
/// finite number.
pub fn find_contacts(a: &PointSet, b: &PointSet, cutoff: f64) -> Result<ContactZone, EngineError> {
    validate_cutoff(cutoff)?;
    if a.is_empty() || b.is_empty() {
        return Ok(ContactZone::empty(cutoff));
    }

    let cutoff_sq = cutoff * cutoff;
    let pairs = if a.len() * b.len() <= SMALL_PRODUCT_LIMIT {
        collect_pairs_exhaustive(a, b, cutoff_sq)
    } else {
        collect_pairs_indexed(a, b, cutoff_sq)
    };

    Ok(ContactZone::from_index_pairs(a, b, &pairs, cutoff))
}

/// Rejects cutoffs that cannot describe a distance.
pub(crate) fn validate_cutoff(cutoff: f64) -> Result<(), EngineError> {
    if !cutoff.is_finite() || cutoff <= 0.0 {
        return Err(EngineError::InvalidCutoff(cutoff));
    }
    Ok(())
}

fn collect_pairs_exhaustive(a: &PointSet, b: &PointSet, cutoff_sq: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, pa) in a.coords().iter().enumerate() {
        for (j, pb) in b.coords().iter().enumerate() {
            if (pa - pb).norm_squared() <= cutoff_sq {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn collect_pairs_indexed(a: &PointSet, b: &PointSet, cutoff_sq: f64) -> Vec<(usize, usize)> {
    // Index the larger side, sweep the smaller one.
    let (indexed, swept, swapped) = if a.len() >= b.len() {
        (a, b, false)
    } else {
        (b, a, true)
    };

    let positions: Vec<[f64; 3]> = indexed
        .coords()
        .iter()
        .map(|p| [p.x, p.y, p.z])
        .collect();
    // Bucket size must exceed the number of points sharing a coordinate on
    // any one axis, or kiddo panics while splitting; the default of 32 is
    // too small for collinear inputs.
    let kdtree: KdTree<f64, u64, 3, 256, u32> = (&positions).into();
    let query_radius_sq = cutoff_sq * RADIUS_SLACK;

    let mut pairs = Vec::new();
    for (sweep_idx, point) in swept.coords().iter().enumerate() {
        let query = [point.x, point.y, point.z];
        for neighbour in kdtree.within_unsorted::<SquaredEuclidean>(&query, query_radius_sq) {
            let tree_idx = neighbour.item as usize;
            let exact_sq = (indexed.coords()[tree_idx] - point).norm_squared();
            if exact_sq <= cutoff_sq {
                if swapped {
                    pairs.push((sweep_idx, tree_idx));
                } else {
                    pairs.push((tree_idx, sweep_idx));
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::ResidueKey;
    use nalgebra::Point3;

    fn key(chain: char, res_seq: isize, name: &str) -> AtomKey {
        AtomKey {
            residue: ResidueKey {
                chain_id: chain,
                res_seq,
                i_code: None,
            },
            name: name.to_string(),
        }
    }

    fn line_of_atoms(chain: char, count: usize, spacing: f64, offset: f64) -> PointSet {
        let mut points = PointSet::new();
        for i in 0..count {
            points.push(
                key(chain, i as isize + 1, "CA"),
                Point3::new(i as f64 * spacing, offset, 0.0),
            );
        }
        points
    }

    #[test]
    fn rejects_non_positive_or_non_finite_cutoffs() {
        let a = line_of_atoms('A', 2, 1.0, 0.0);
        let b = line_of_atoms('B', 2, 1.0, 1.0);
        assert!(matches!(
            find_contacts(&a, &b, 0.0),
            Err(EngineError::InvalidCutoff(_))
        ));
        assert!(matches!(
            find_contacts(&a, &b, -2.0),
            Err(EngineError::InvalidCutoff(_))
        ));
        assert!(matches!(
            find_contacts(&a, &b, f64::NAN),
            Err(EngineError::InvalidCutoff(_))
        ));
    }

    #[test]
    fn empty_side_yields_empty_zone() {
        let a = line_of_atoms('A', 3, 1.0, 0.0);
        let zone = find_contacts(&a, &PointSet::new(), 5.0).unwrap();
        assert!(zone.is_empty());
        assert_eq!(zone.cutoff(), 5.0);
    }

    #[test]
    fn boundary_distance_counts_as_contact() {
        let mut a = PointSet::new();
        a.push(key('A', 1, "CA"), Point3::origin());
        let mut b = PointSet::new();
        b.push(key('B', 1, "CA"), Point3::new(5.0, 0.0, 0.0));
        b.push(key('B', 2, "CA"), Point3::new(5.001, 0.0, 0.0));

        let zone = find_contacts(&a, &b, 5.0).unwrap();

        assert_eq!(zone.len(), 1);
        let (_, contact_b) = zone.atom_pairs().iter().next().unwrap();
        assert_eq!(contact_b.residue.res_seq, 1);
    }

    #[test]
    fn residue_pairs_collapse_atom_pairs() {
        let mut a = PointSet::new();
        a.push(key('A', 1, "N"), Point3::new(0.0, 0.0, 0.0));
        a.push(key('A', 1, "CA"), Point3::new(1.0, 0.0, 0.0));
        let mut b = PointSet::new();
        b.push(key('B', 5, "CB"), Point3::new(0.5, 1.0, 0.0));

        let zone = find_contacts(&a, &b, 3.0).unwrap();

        assert_eq!(zone.len(), 2);
        assert_eq!(zone.residue_pairs().len(), 1);
        assert_eq!(zone.residues_a().len(), 1);
        assert_eq!(zone.residues_b().len(), 1);
        assert_eq!(zone.interface_residues().len(), 2);
    }

    #[test]
    fn exhaustive_and_indexed_paths_agree() {
        // Two long parallel strands, one Angstrom apart, with some atoms
        // exactly at the cutoff distance along the diagonal.
        let a = line_of_atoms('A', 80, 1.7, 0.0);
        let b = line_of_atoms('B', 80, 1.7, 1.0);
        let cutoff = 2.5;
        let cutoff_sq = cutoff * cutoff;

        let mut exhaustive = collect_pairs_exhaustive(&a, &b, cutoff_sq);
        let mut indexed = collect_pairs_indexed(&a, &b, cutoff_sq);
        exhaustive.sort_unstable();
        indexed.sort_unstable();

        assert!(!exhaustive.is_empty());
        assert_eq!(exhaustive, indexed);

        let zone_a = ContactZone::from_index_pairs(&a, &b, &exhaustive, cutoff);
        let zone_b = ContactZone::from_index_pairs(&a, &b, &indexed, cutoff);
        assert_eq!(zone_a, zone_b);
    }

    #[test]
    fn large_inputs_go_through_the_indexed_path() {
        // 80 x 80 atoms exceeds the exhaustive threshold, so this exercises
        // the tree in the public entry point.
        let a = line_of_atoms('A', 80, 1.0, 0.0);
        let b = line_of_atoms('B', 80, 1.0, 0.5);

        let zone = find_contacts(&a, &b, 1.2).unwrap();

        let cutoff_sq = 1.2 * 1.2;
        let expected = collect_pairs_exhaustive(&a, &b, cutoff_sq);
        assert_eq!(zone.len(), expected.len());
    }

    #[test]
    fn zone_iteration_is_deterministic() {
        let a = line_of_atoms('A', 10, 1.0, 0.0);
        let b = line_of_atoms('B', 10, 1.0, 0.8);

        let zone_one = find_contacts(&a, &b, 2.0).unwrap();
        let zone_two = find_contacts(&a, &b, 2.0).unwrap();

        let pairs_one: Vec<_> = zone_one.atom_pairs().iter().cloned().collect();
        let pairs_two: Vec<_> = zone_two.atom_pairs().iter().cloned().collect();
        assert_eq!(pairs_one, pairs_two);
    }
}
