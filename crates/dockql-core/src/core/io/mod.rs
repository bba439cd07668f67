//! Provides input/output functionality for atom-record file formats.
//!
//! This module contains the fixed-column PDB reader and writer together
//! with the trait-based interface shared by structure file formats. Parsing
//! extracts exactly the columns the engine queries; anything else in the
//! file passes through untouched.

pub mod pdb;
pub mod traits;
