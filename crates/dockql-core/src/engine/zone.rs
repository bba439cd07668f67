use super::contacts::ContactZone;
use crate::core::models::ids::StructureId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Which atoms of the reference participate in a cached zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneFilter {
    /// All non-hydrogen atoms; the native-contact flavor.
    HeavyAtoms,
    /// Backbone atoms only; the interface-RMSD flavor.
    Backbone,
}

/// Identity of one cached contact zone.
///
/// The key pins down everything the zone depends on: which structure it
/// was computed from, the revision of that structure's coordinates, the
/// exact cutoff (as its bit pattern, so keys stay `Eq`-able), and the atom
/// filter. A coordinate update changes the revision and therefore can
/// never be served a stale zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneKey {
    pub structure: StructureId,
    pub revision: u64,
    cutoff_bits: u64,
    pub filter: ZoneFilter,
}

impl ZoneKey {
    pub fn new(structure: StructureId, revision: u64, cutoff: f64, filter: ZoneFilter) -> Self {
        Self {
            structure,
            revision,
            cutoff_bits: cutoff.to_bits(),
            filter,
        }
    }

    pub fn cutoff(&self) -> f64 {
        f64::from_bits(self.cutoff_bits)
    }
}

/// An explicit cache of contact zones scoped to one similarity engine.
///
/// The cache memoizes reference zones so repeated metric evaluations over
/// the same reference reuse one computation. It counts computations and
/// hits, which makes the caching observable from tests, and [`reset`]
/// drops everything when the caller wants recomputation.
///
/// [`reset`]: ZoneCache::reset
#[derive(Debug, Default, Clone)]
pub struct ZoneCache {
    entries: HashMap<ZoneKey, ContactZone>,
    computations: u64,
    hits: u64,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached zone for `key`, computing and storing it on a
    /// miss.
    ///
    /// # Errors
    ///
    /// A failed computation leaves the cache untouched and propagates the
    /// error unchanged.
    pub fn get_or_compute<E>(
        &mut self,
        key: ZoneKey,
        compute: impl FnOnce() -> Result<ContactZone, E>,
    ) -> Result<&ContactZone, E> {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(slot) => {
                let zone = compute()?;
                self.computations += 1;
                Ok(slot.insert(zone))
            }
        }
    }

    /// Drops every cached zone and zeroes the counters.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.computations = 0;
        self.hits = 0;
    }

    /// Number of zones currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many zones have been computed since construction or the last
    /// reset.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// How many lookups were served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }
}
