use super::atom::{AtomRecord, ResidueKey};
use super::ids::StructureId;
use super::points::PointSet;
use super::selection::{Attribute, Selection};
use nalgebra::Point3;
use std::collections::BTreeSet;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur when mutating an [`AtomTable`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Selection matched {expected} atoms but {provided} coordinates were provided")]
    LengthMismatch { expected: usize, provided: usize },
}

/// A projected cell value returned by [`AtomTable::select`].
///
/// Extends the filterable [`Key`](super::selection::Key) values with floats
/// (coordinates, occupancy, temperature factor) and `Null` for optional
/// columns the record left blank.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(isize),
    Text(String),
    Char(char),
    Float(f64),
    Null,
}

/// A queryable, updatable table of atom records.
///
/// This is the relational core of the crate: every engine operation reads
/// structures through projections (`select`, `xyz`, `point_set`) filtered by
/// a [`Selection`], the way the original system queried its atom table.
/// The table tracks its own identity and a revision counter; both feed the
/// zone cache key so cached results can never outlive the coordinates they
/// were computed from.
#[derive(Debug)]
pub struct AtomTable {
    id: StructureId,
    revision: u64,
    records: Vec<AtomRecord>,
}

impl Default for AtomTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AtomTable {
    /// Clones the rows but assigns a fresh identity: a copy is a new
    /// structure as far as any cache is concerned.
    fn clone(&self) -> Self {
        Self {
            id: StructureId::next(),
            revision: 0,
            records: self.records.clone(),
        }
    }
}

impl AtomTable {
    /// Creates an empty table with a fresh identity.
    pub fn new() -> Self {
        Self {
            id: StructureId::next(),
            revision: 0,
            records: Vec::new(),
        }
    }

    /// Creates a table from already-parsed records.
    pub fn from_records(records: Vec<AtomRecord>) -> Self {
        Self {
            id: StructureId::next(),
            revision: 0,
            records,
        }
    }

    /// Returns the unique identity of this table instance.
    pub fn id(&self) -> StructureId {
        self.id
    }

    /// Returns the revision counter, bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Appends a record to the table.
    pub fn push(&mut self, record: AtomRecord) {
        self.records.push(record);
        self.revision += 1;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the backing records in insertion order.
    pub fn records(&self) -> &[AtomRecord] {
        &self.records
    }

    /// Projects the given attributes of every record matching the selection.
    ///
    /// Rows come back in insertion order, one `Vec<Value>` per matching
    /// record with one cell per requested attribute. Optional columns the
    /// record left blank project as [`Value::Null`].
    ///
    /// # Arguments
    ///
    /// * `attributes` - The columns to project, in output order.
    /// * `selection` - The filter deciding which records contribute rows.
    pub fn select(&self, attributes: &[Attribute], selection: &Selection) -> Vec<Vec<Value>> {
        self.records
            .iter()
            .filter(|record| selection.matches(record))
            .map(|record| {
                attributes
                    .iter()
                    .map(|attribute| project(record, *attribute))
                    .collect()
            })
            .collect()
    }

    /// Returns the coordinates of every record matching the selection, in
    /// insertion order.
    pub fn xyz(&self, selection: &Selection) -> Vec<Point3<f64>> {
        self.records
            .iter()
            .filter(|record| selection.matches(record))
            .map(|record| record.position)
            .collect()
    }

    /// Returns the matching records as a keyed point set, in insertion
    /// order.
    pub fn point_set(&self, selection: &Selection) -> PointSet {
        let mut points = PointSet::new();
        for record in self.records.iter().filter(|r| selection.matches(r)) {
            points.push(record.atom_key(), record.position);
        }
        points
    }

    /// Overwrites the coordinates of every record matching the selection.
    ///
    /// Coordinates pair with matching records in insertion order, so a
    /// round trip through [`xyz`](Self::xyz) and a coordinate transform
    /// lands each point back on the atom it came from.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::LengthMismatch`] when the number of provided
    /// coordinates differs from the number of matching records; the table
    /// is left untouched in that case.
    pub fn update_xyz(
        &mut self,
        selection: &Selection,
        coordinates: &[Point3<f64>],
    ) -> Result<(), TableError> {
        let matched: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| selection.matches(record))
            .map(|(index, _)| index)
            .collect();

        if matched.len() != coordinates.len() {
            return Err(TableError::LengthMismatch {
                expected: matched.len(),
                provided: coordinates.len(),
            });
        }

        for (index, position) in matched.into_iter().zip(coordinates.iter()) {
            self.records[index].position = *position;
        }
        self.revision += 1;
        Ok(())
    }

    /// Returns the distinct chain identifiers, sorted.
    pub fn chains(&self) -> Vec<char> {
        let set: BTreeSet<char> = self.records.iter().map(|record| record.chain_id).collect();
        set.into_iter().collect()
    }

    /// Returns the distinct residues with their residue names, in
    /// first-appearance order.
    pub fn residues(&self) -> Vec<(ResidueKey, String)> {
        let mut seen = HashSet::new();
        let mut residues = Vec::new();
        for record in &self.records {
            let key = record.residue_key();
            if seen.insert(key) {
                residues.push((key, record.res_name.clone()));
            }
        }
        residues
    }
}

fn project(record: &AtomRecord, attribute: Attribute) -> Value {
    match attribute {
        Attribute::Serial => Value::Int(record.serial as isize),
        Attribute::Name => Value::Text(record.name.clone()),
        Attribute::AltLoc => record.alt_loc.map_or(Value::Null, Value::Char),
        Attribute::ResName => Value::Text(record.res_name.clone()),
        Attribute::ChainId => Value::Char(record.chain_id),
        Attribute::ResSeq => Value::Int(record.res_seq),
        Attribute::ICode => record.i_code.map_or(Value::Null, Value::Char),
        Attribute::X => Value::Float(record.position.x),
        Attribute::Y => Value::Float(record.position.y),
        Attribute::Z => Value::Float(record.position.z),
        Attribute::Occupancy => Value::Float(record.occupancy),
        Attribute::TempFactor => Value::Float(record.temp_factor),
        Attribute::Element => Value::Text(record.element.clone()),
        Attribute::Model => Value::Int(record.model as isize),
    }
}
