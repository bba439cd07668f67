use super::atom::AtomKey;
use crate::core::geometry::{GeometryError, RigidTransform};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// An ordered set of atom coordinates paired with their identities.
///
/// Point sets are what the geometry and contact layers consume: the keys
/// make a set comparable across two structures, and the coordinate slice
/// feeds the numeric routines directly. Order is always preserved, so a
/// selection from an [`AtomTable`](super::table::AtomTable) and the
/// numbers derived from it stay aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    keys: Vec<AtomKey>,
    coords: Vec<Point3<f64>>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a point set from parallel key and coordinate vectors.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the vectors differ
    /// in length.
    pub fn from_parts(
        keys: Vec<AtomKey>,
        coords: Vec<Point3<f64>>,
    ) -> Result<Self, GeometryError> {
        if keys.len() != coords.len() {
            return Err(GeometryError::DimensionMismatch {
                left: keys.len(),
                right: coords.len(),
            });
        }
        Ok(Self { keys, coords })
    }

    pub fn push(&mut self, key: AtomKey, coord: Point3<f64>) {
        self.keys.push(key);
        self.coords.push(coord);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[AtomKey] {
        &self.keys
    }

    pub fn coords(&self) -> &[Point3<f64>] {
        &self.coords
    }

    /// Pairs this set with another on shared atom keys.
    ///
    /// Both returned sets contain only atoms present in both inputs, listed
    /// in `self`'s order; when a key appears more than once in `other`, the
    /// first occurrence wins. The two results are index-aligned, which is
    /// the precondition for superposition and paired RMSD.
    pub fn matched(&self, other: &PointSet) -> (PointSet, PointSet) {
        let mut other_index: HashMap<&AtomKey, usize> = HashMap::new();
        for (index, key) in other.keys.iter().enumerate() {
            other_index.entry(key).or_insert(index);
        }

        let mut left = PointSet::new();
        let mut right = PointSet::new();
        for (index, key) in self.keys.iter().enumerate() {
            if let Some(&other_at) = other_index.get(key) {
                left.push(key.clone(), self.coords[index]);
                right.push(other.keys[other_at].clone(), other.coords[other_at]);
            }
        }
        (left, right)
    }

    /// Returns the subset of points whose key satisfies `keep`, preserving
    /// order.
    pub fn filtered(&self, keep: impl Fn(&AtomKey) -> bool) -> PointSet {
        let mut subset = PointSet::new();
        for (key, coord) in self.keys.iter().zip(self.coords.iter()) {
            if keep(key) {
                subset.push(key.clone(), *coord);
            }
        }
        subset
    }

    /// Returns a copy with every coordinate shifted by `shift`.
    pub fn translated(&self, shift: &Vector3<f64>) -> PointSet {
        PointSet {
            keys: self.keys.clone(),
            coords: self.coords.iter().map(|p| p + shift).collect(),
        }
    }

    /// Returns a copy with the rigid motion applied to every coordinate.
    pub fn transformed(&self, motion: &RigidTransform) -> PointSet {
        PointSet {
            keys: self.keys.clone(),
            coords: self.coords.iter().map(|p| motion * p).collect(),
        }
    }
}
