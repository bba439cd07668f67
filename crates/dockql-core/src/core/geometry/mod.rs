pub mod superpose;
pub mod transform;

pub use superpose::{Superposition, superpose};
pub use transform::{centroid, rmsd, rotate_about_axis, translate};

use thiserror::Error;

/// A rigid-body motion: a proper rotation followed by a translation.
pub type RigidTransform = nalgebra::IsometryMatrix3<f64>;

/// Errors produced by the pure geometry operations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Point sets differ in length: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Rotation axis norm {norm:e} is too small to define a direction")]
    InvalidAxis { norm: f64 },

    #[error("Superposition requires at least 3 point pairs, but found {points}")]
    InsufficientOverlap { points: usize },

    #[error("Operation requires at least one point")]
    EmptyPointSet,
}
