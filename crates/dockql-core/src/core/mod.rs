//! # Core Module
//!
//! This module provides the fundamental building blocks for representing
//! and measuring biomolecular structures in dockql, serving as the
//! stateless computational foundation of the library.
//!
//! ## Overview
//!
//! The core module implements the data structures, pure geometry, and I/O
//! required to turn fixed-column atom records into numbers: a queryable
//! relational table of records, rigid-body transforms and least-squares
//! superposition, and strict-format PDB reading and writing.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle
//! different aspects of structure handling:
//!
//! - **Structure Representation** ([`models`]) - Atom records, identity
//!   keys, selections, the relational table, and keyed point sets
//! - **Rigid-Body Geometry** ([`geometry`]) - Translation, axis rotation,
//!   RMSD, and Kabsch superposition with reflection correction
//! - **File I/O** ([`io`]) - Fixed-column PDB parsing and formatting
//! - **Atom Classification** ([`utils`]) - Heavy-atom and backbone-atom
//!   name tests
//!
//! Everything in this layer is stateless: structures own their data, the
//! geometry functions are pure, and nothing here knows about caching or
//! scoring. The stateful similarity machinery lives in
//! [`engine`](crate::engine).

pub mod geometry;
pub mod io;
pub mod models;
pub mod utils;
