//! Utility functions for the core module.
//!
//! This module provides small helpers shared across the crate, currently
//! the atom-name classification used to pick heavy and backbone atoms out
//! of a structure.

pub mod identifiers;
