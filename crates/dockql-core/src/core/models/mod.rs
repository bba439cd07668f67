//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent
//! structures as queryable atom-record tables, providing the foundation for
//! every geometry and similarity operation in the crate.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom records and the identity keys that make
//!   atoms comparable across structures
//! - [`selection`] - Typed include/exclude filters over record attributes
//! - [`table`] - The relational atom table with projection and coordinate
//!   updates
//! - [`points`] - Ordered, keyed coordinate sets consumed by the geometry
//!   and contact layers
//! - [`ids`] - Unique structure identities used for cache keying
//!
//! ## Usage
//!
//! Most operations start by parsing a structure into an
//! [`AtomTable`](table::AtomTable) and carving point sets out of it with a
//! [`Selection`](selection::Selection).
//!
//! ```ignore
//! use dockql::core::models::selection::Selection;
//!
//! let receptor = table.point_set(&Selection::new().chains(['A']));
//! let ligand = table.point_set(&Selection::new().chains(['B']));
//! ```

pub mod atom;
pub mod ids;
pub mod points;
pub mod selection;
pub mod table;
