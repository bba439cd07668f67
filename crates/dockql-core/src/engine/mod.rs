//! # Engine Module
//!
//! This module implements the similarity engine for scoring biomolecular
//! docking models in DockQL, providing the stateful machinery that turns
//! queryable atom tables into interface metrics.
//!
//! ## Overview
//!
//! The engine module evaluates how faithfully a decoy reproduces a reference
//! complex. It detects interchain contacts, memoizes the reference's contact
//! zones, superposes matched coordinate sets, and combines the resulting
//! metrics into a single composite score.
//!
//! ## Architecture
//!
//! The module is organized into submodules that handle different aspects of
//! the scoring process:
//!
//! - **Contact Detection** ([`contacts`]) - Interchain contact zones with an
//!   inclusive distance cutoff, resolved exhaustively or through a k-d tree
//! - **Zone Caching** ([`zone`]) - An explicit, resettable cache of reference
//!   zones keyed by structure identity, revision, cutoff, and atom filter
//! - **Similarity Metrics** ([`similarity`]) - fnat, interface RMSD, ligand
//!   RMSD, and the DockQ composite over a validated receptor/ligand split
//! - **Progress Monitoring** ([`progress`]) - Progress reporting and user
//!   feedback mechanisms for long-running workflows
//! - **Error Handling** ([`error`]) - Engine-specific error types and
//!   error propagation
//!
//! ## Key Capabilities
//!
//! - **Exact contact semantics** where the indexed and exhaustive paths
//!   report identical zones, boundary distances included
//! - **Observable caching** with computation and hit counters, so reuse is
//!   testable rather than assumed
//! - **Fail-fast validation** of chain groups and cutoffs before any metric
//!   is computed
//! - **Cached and direct evaluation modes** that agree to within floating
//!   point round-off

pub mod contacts;
pub mod error;
pub mod progress;
pub mod similarity;
pub mod zone;
