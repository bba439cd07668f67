use thiserror::Error;

use crate::core::geometry::GeometryError;
use crate::core::models::table::TableError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cutoff must be a positive finite distance, got {0}")]
    InvalidCutoff(f64),

    #[error("The {group} chain group is empty")]
    EmptyChainGroup { group: &'static str },

    #[error("Chain '{chain}' appears in both the receptor and ligand groups")]
    OverlappingChainGroups { chain: char },

    #[error("Chain '{chain}' not found in the {structure} structure")]
    ChainNotFound {
        chain: char,
        structure: &'static str,
    },

    #[error("No native contacts in the reference within {cutoff} A")]
    NoNativeContacts { cutoff: f64 },

    #[error("Only {matched} atoms matched between the structures; at least 3 are required")]
    InsufficientOverlap { matched: usize },

    #[error("Geometry operation failed: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },

    #[error("Structure query failed: {source}")]
    Table {
        #[from]
        source: TableError,
    },
}
