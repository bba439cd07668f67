use nalgebra::Point3;
use serde::Serialize;

/// Represents a single atom record extracted from fixed-column structure text.
///
/// This struct carries every attribute of an ATOM line that the engine can
/// query or update: identity (serial, name, residue, chain), coordinates,
/// and the auxiliary crystallographic fields. Records are plain data; all
/// querying goes through [`AtomTable`](super::table::AtomTable).
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The atom serial number.
    pub serial: i32,
    /// The atom name (e.g., "CA", "N", "OD1").
    pub name: String,
    /// The alternate location indicator, if present.
    pub alt_loc: Option<char>,
    /// The residue name (e.g., "ALA", "HIS").
    pub res_name: String,
    /// The one-character chain identifier.
    pub chain_id: char,
    /// The residue sequence number.
    pub res_seq: isize,
    /// The residue insertion code, if present.
    pub i_code: Option<char>,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The crystallographic occupancy.
    pub occupancy: f64,
    /// The temperature (B) factor.
    pub temp_factor: f64,
    /// The element symbol, trimmed; empty when the record omitted it.
    pub element: String,
    /// The model this record belongs to (0 for single-model structures).
    pub model: u32,
}

impl AtomRecord {
    /// Creates a new `AtomRecord` with default auxiliary fields.
    ///
    /// This constructor initializes a record from the attributes every atom
    /// line must carry. Occupancy defaults to 1.0, the temperature factor to
    /// 0.0, and the optional fields to empty; they can be set afterward.
    ///
    /// # Arguments
    ///
    /// * `serial` - The atom serial number.
    /// * `name` - The atom name.
    /// * `res_name` - The residue name.
    /// * `chain_id` - The chain identifier.
    /// * `res_seq` - The residue sequence number.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(
        serial: i32,
        name: &str,
        res_name: &str,
        chain_id: char,
        res_seq: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            alt_loc: None,
            res_name: res_name.to_string(),
            chain_id,
            res_seq,
            i_code: None,
            position,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: String::new(),
            model: 0,
        }
    }

    /// Returns the residue identity this atom belongs to.
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey {
            chain_id: self.chain_id,
            res_seq: self.res_seq,
            i_code: self.i_code,
        }
    }

    /// Returns the full cross-structure identity of this atom.
    pub fn atom_key(&self) -> AtomKey {
        AtomKey {
            residue: self.residue_key(),
            name: self.name.clone(),
        }
    }
}

/// Identifies a residue within a structure by chain, sequence number, and
/// insertion code.
///
/// Two structures describing the same complex share residue keys, which is
/// what makes contact zones comparable across a decoy/reference pair. The
/// ordering is lexicographic (chain, then sequence, then insertion code) so
/// sets of keys iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResidueKey {
    /// The one-character chain identifier.
    pub chain_id: char,
    /// The residue sequence number.
    pub res_seq: isize,
    /// The residue insertion code, if present.
    pub i_code: Option<char>,
}

impl std::fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chain_id, self.res_seq)?;
        if let Some(code) = self.i_code {
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

/// Identifies an atom across structures by its residue key and atom name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AtomKey {
    /// The residue this atom belongs to.
    pub residue: ResidueKey,
    /// The atom name within the residue.
    pub name: String,
}

impl std::fmt::Display for AtomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.residue, self.name)
    }
}
