//! # Workflows Module
//!
//! This module provides high-level workflow implementations that orchestrate
//! complete scoring runs over parsed structures in DockQL.
//!
//! ## Overview
//!
//! Workflows are the top-level entry points for users of DockQL. They wrap
//! the similarity engine with the decisions a caller would otherwise make by
//! hand: how to split the complex into receptor and ligand groups, which
//! cutoffs to apply, and how to share cached reference zones across a batch
//! of decoys. Each workflow validates its configuration up front and reports
//! progress as it goes.
//!
//! ## Architecture
//!
//! The module is organized around specific scoring workflows:
//!
//! - **Score Workflow** ([`score`]) - Scores one decoy or a batch of decoys
//!   against a reference complex, producing fnat, interface RMSD, ligand
//!   RMSD, and the DockQ composite.
//!
//! ## Key Capabilities
//!
//! - **Automatic chain partitioning** for two-chain references, by atom
//!   count with a deterministic tie-break
//! - **Batch scoring** that shares one reference's contact zones across
//!   every decoy and isolates per-decoy failures
//! - **Progress monitoring** with per-decoy batch reporting
//! - **Configurable cutoffs and evaluation mode** through a serializable
//!   configuration type

pub mod score;
