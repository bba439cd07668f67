use super::atom::AtomRecord;
use std::collections::{HashMap, HashSet};

/// Identifies a queryable column of an atom record.
///
/// Attributes name the columns a [`Selection`] can filter on and a
/// [`select`](super::table::AtomTable::select) call can project. Coordinate
/// and crystallographic columns (`X`, `Y`, `Z`, `Occupancy`, `TempFactor`)
/// can be projected but never filtered: filter keys are discrete values,
/// and those columns carry floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Serial,
    Name,
    AltLoc,
    ResName,
    ChainId,
    ResSeq,
    ICode,
    X,
    Y,
    Z,
    Occupancy,
    TempFactor,
    Element,
    Model,
}

/// A discrete value a selection can match against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(isize),
    Text(String),
    Char(char),
}

impl From<isize> for Key {
    fn from(value: isize) -> Self {
        Key::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<char> for Key {
    fn from(value: char) -> Self {
        Key::Char(value)
    }
}

impl Attribute {
    /// Extracts the discrete key of this attribute from a record, or `None`
    /// for float-valued attributes and absent optional fields.
    fn key_of(&self, record: &AtomRecord) -> Option<Key> {
        match self {
            Attribute::Serial => Some(Key::Int(record.serial as isize)),
            Attribute::Name => Some(Key::Text(record.name.clone())),
            Attribute::AltLoc => record.alt_loc.map(Key::Char),
            Attribute::ResName => Some(Key::Text(record.res_name.clone())),
            Attribute::ChainId => Some(Key::Char(record.chain_id)),
            Attribute::ResSeq => Some(Key::Int(record.res_seq)),
            Attribute::ICode => record.i_code.map(Key::Char),
            Attribute::Element => Some(Key::Text(record.element.clone())),
            Attribute::Model => Some(Key::Int(record.model as isize)),
            Attribute::X
            | Attribute::Y
            | Attribute::Z
            | Attribute::Occupancy
            | Attribute::TempFactor => None,
        }
    }
}

/// A composable include/exclude filter over atom records.
///
/// An empty selection matches every record. Each `include` entry restricts
/// the result to records whose attribute value is in the given key set;
/// each `exclude` entry removes records whose value is in the set. Multiple
/// attributes combine conjunctively, mirroring how the original query layer
/// ANDed its keyword filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    include: HashMap<Attribute, HashSet<Key>>,
    exclude: HashMap<Attribute, HashSet<Key>>,
}

impl Selection {
    /// Creates an empty selection that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the selection to records whose `attribute` value is one of
    /// `keys`. Filtering a float-valued attribute matches no record.
    pub fn filter<K>(mut self, attribute: Attribute, keys: impl IntoIterator<Item = K>) -> Self
    where
        K: Into<Key>,
    {
        self.include
            .entry(attribute)
            .or_default()
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Removes records whose `attribute` value is one of `keys`.
    pub fn reject<K>(mut self, attribute: Attribute, keys: impl IntoIterator<Item = K>) -> Self
    where
        K: Into<Key>,
    {
        self.exclude
            .entry(attribute)
            .or_default()
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Keeps only records on the given chains.
    pub fn chains(self, chains: impl IntoIterator<Item = char>) -> Self {
        self.filter(Attribute::ChainId, chains)
    }

    /// Drops records on the given chains.
    pub fn not_chains(self, chains: impl IntoIterator<Item = char>) -> Self {
        self.reject(Attribute::ChainId, chains)
    }

    /// Keeps only records with the given atom names.
    pub fn names<S: Into<Key>>(self, names: impl IntoIterator<Item = S>) -> Self {
        self.filter(Attribute::Name, names)
    }

    /// Drops records with the given atom names.
    pub fn not_names<S: Into<Key>>(self, names: impl IntoIterator<Item = S>) -> Self {
        self.reject(Attribute::Name, names)
    }

    /// Keeps only records with the given residue names.
    pub fn res_names<S: Into<Key>>(self, names: impl IntoIterator<Item = S>) -> Self {
        self.filter(Attribute::ResName, names)
    }

    /// Drops records with the given residue names.
    pub fn not_res_names<S: Into<Key>>(self, names: impl IntoIterator<Item = S>) -> Self {
        self.reject(Attribute::ResName, names)
    }

    /// Keeps only records with the given residue sequence numbers.
    pub fn res_seqs(self, seqs: impl IntoIterator<Item = isize>) -> Self {
        self.filter(Attribute::ResSeq, seqs)
    }

    /// Drops records with the given residue sequence numbers.
    pub fn not_res_seqs(self, seqs: impl IntoIterator<Item = isize>) -> Self {
        self.reject(Attribute::ResSeq, seqs)
    }

    /// Keeps only records with the given element symbols.
    pub fn elements<S: Into<Key>>(self, elements: impl IntoIterator<Item = S>) -> Self {
        self.filter(Attribute::Element, elements)
    }

    /// Keeps only records belonging to the given models.
    pub fn models(self, models: impl IntoIterator<Item = u32>) -> Self {
        self.filter(
            Attribute::Model,
            models.into_iter().map(|m| Key::Int(m as isize)),
        )
    }

    /// Returns `true` when no filter has been applied.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Tests whether a record satisfies every include and exclude clause.
    pub fn matches(&self, record: &AtomRecord) -> bool {
        for (attribute, keys) in &self.include {
            match attribute.key_of(record) {
                Some(key) if keys.contains(&key) => {}
                _ => return false,
            }
        }
        for (attribute, keys) in &self.exclude {
            if let Some(key) = attribute.key_of(record) {
                if keys.contains(&key) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn record(name: &str, chain: char, res_seq: isize) -> AtomRecord {
        AtomRecord::new(1, name, "ALA", chain, res_seq, Point3::origin())
    }

    #[test]
    fn empty_selection_matches_everything() {
        let selection = Selection::new();
        assert!(selection.is_empty());
        assert!(selection.matches(&record("CA", 'A', 1)));
        assert!(selection.matches(&record("HB1", 'Z', -4)));
    }

    #[test]
    fn include_clauses_combine_conjunctively() {
        let selection = Selection::new().chains(['A']).names(["CA", "N"]);

        assert!(selection.matches(&record("CA", 'A', 1)));
        assert!(selection.matches(&record("N", 'A', 9)));
        assert!(!selection.matches(&record("CB", 'A', 1)));
        assert!(!selection.matches(&record("CA", 'B', 1)));
    }

    #[test]
    fn exclude_clause_removes_matching_records() {
        let selection = Selection::new().not_chains(['B']);

        assert!(selection.matches(&record("CA", 'A', 1)));
        assert!(!selection.matches(&record("CA", 'B', 1)));
    }

    #[test]
    fn include_and_exclude_compose() {
        let selection = Selection::new()
            .chains(['A', 'B'])
            .not_names(["H", "HA"])
            .res_seqs([1, 2, 3]);

        assert!(selection.matches(&record("CA", 'A', 2)));
        assert!(!selection.matches(&record("HA", 'A', 2)));
        assert!(!selection.matches(&record("CA", 'C', 2)));
        assert!(!selection.matches(&record("CA", 'A', 7)));
    }

    #[test]
    fn optional_attribute_filter_skips_records_without_it() {
        let selection = Selection::new().filter(Attribute::AltLoc, ['A']);
        let mut with_alt = record("CA", 'A', 1);
        with_alt.alt_loc = Some('A');

        assert!(selection.matches(&with_alt));
        assert!(!selection.matches(&record("CA", 'A', 1)));
    }

    #[test]
    fn float_attributes_never_match_an_include_filter() {
        let selection = Selection::new().filter(Attribute::X, [Key::Int(0)]);
        assert!(!selection.matches(&record("CA", 'A', 1)));
    }

    #[test]
    fn float_attributes_never_trigger_an_exclude_filter() {
        let selection = Selection::new().reject(Attribute::Occupancy, [Key::Int(1)]);
        assert!(selection.matches(&record("CA", 'A', 1)));
    }
}
