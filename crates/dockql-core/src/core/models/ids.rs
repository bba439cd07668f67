use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STRUCTURE_ID: AtomicU64 = AtomicU64::new(0);

/// Uniquely identifies one [`AtomTable`](super::table::AtomTable) instance
/// for the lifetime of the process.
///
/// Ids are never reused: every table construction and every clone draws a
/// fresh one, so a cache keyed by id can never confuse two structures even
/// if one replaced the other at the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId(u64);

impl StructureId {
    pub(crate) fn next() -> Self {
        StructureId(NEXT_STRUCTURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "structure#{}", self.0)
    }
}
