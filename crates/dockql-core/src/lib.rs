//! # DockQL Core Library
//!
//! A queryable atom-record engine for scoring biomolecular docking models,
//! measuring how faithfully a predicted complex reproduces a reference with
//! fnat, interface RMSD, ligand RMSD, and the DockQ composite.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   ([`AtomTable`](core::models::table::AtomTable), selections, keyed point
//!   sets), pure rigid-body geometry (superposition, RMSD), and I/O for
//!   fixed-column structure files.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer turns structures
//!   into metrics. It detects interchain contact zones, memoizes them in an
//!   explicit [`ZoneCache`](engine::zone::ZoneCache), and exposes the
//!   [`StructureSimilarity`](engine::similarity::StructureSimilarity) engine
//!   that computes every metric over a validated receptor/ligand split.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level,
//!   user-facing layer. It ties the `engine` and `core` together to execute
//!   complete scoring procedures, including automatic chain partitioning and
//!   batch evaluation with shared zones.

pub mod core;
pub mod engine;
pub mod workflows;
