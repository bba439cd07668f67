use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::selection::Selection;
use crate::core::models::table::AtomTable;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Coordinate {value} does not fit the fixed 8-column field after rounding")]
    CoordinateOutOfRange { value: f64 },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// Reader and writer for fixed-column PDB atom records.
///
/// Only `ATOM` records populate the table; `HETATM` and every other record
/// type except `MODEL`, `ENDMDL`, and `END` are ignored. The writer emits
/// bare `ATOM` lines in table order and reproduces the strict column
/// conventions of the format, including the atom-name alignment rules and
/// the reduced coordinate precision needed to fit large values into their
/// eight columns.
pub struct PdbFile;

impl PdbFile {
    /// Writes the records matching `selection` as PDB `ATOM` lines.
    ///
    /// # Errors
    ///
    /// Returns [`PdbError::CoordinateOutOfRange`] when a coordinate cannot
    /// be rendered into its fixed-width field, or an I/O error from the
    /// underlying writer.
    pub fn write_selection(
        table: &AtomTable,
        selection: &Selection,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        for record in table.records().iter().filter(|r| selection.matches(r)) {
            let line = format_atom_line(record)?;
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<AtomTable, Self::Error> {
        let mut table = AtomTable::new();
        let mut current_model: u32 = 0;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" => {
                    let record = parse_atom_line(&line, line_num, current_model)?;
                    table.push(record);
                }
                "MODEL" => {
                    let serial_str = slice_and_trim(&line, 6, 14);
                    current_model = serial_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "7-14".into(),
                            value: serial_str.into(),
                        },
                    })?;
                }
                "ENDMDL" => current_model = 0,
                "END" => break,
                _ => {}
            }
        }

        if table.is_empty() {
            return Err(PdbError::MissingRecord("ATOM records".into()));
        }
        Ok(table)
    }

    fn write_to(table: &AtomTable, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_selection(table, &Selection::new(), writer)
    }
}

fn parse_atom_line(line: &str, line_num: usize, model: u32) -> Result<AtomRecord, PdbError> {
    let serial_str = slice_and_trim(line, 6, 11);
    let name_str = slice_and_trim(line, 12, 16);
    let alt_loc_str = slice_and_trim(line, 16, 17);
    let res_name_str = slice_and_trim(line, 17, 20);
    let chain_id_str = slice_and_trim(line, 21, 22);
    let res_seq_str = slice_and_trim(line, 22, 26);
    let i_code_str = slice_and_trim(line, 26, 27);
    let x_str = slice_and_trim(line, 30, 38);
    let y_str = slice_and_trim(line, 38, 46);
    let z_str = slice_and_trim(line, 46, 54);
    let occ_str = slice_and_trim(line, 54, 60);
    let temp_str = slice_and_trim(line, 60, 66);
    let element_str = slice_and_trim(line, 76, 78);

    if name_str.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: "13-16".into(),
            },
        });
    }

    let serial: i32 = serial_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "7-11".into(),
            value: serial_str.into(),
        },
    })?;
    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "23-26".into(),
            value: res_seq_str.into(),
        },
    })?;
    let x = parse_coordinate(x_str, "31-38", line_num)?;
    let y = parse_coordinate(y_str, "39-46", line_num)?;
    let z = parse_coordinate(z_str, "47-54", line_num)?;

    let occupancy: f64 = if occ_str.is_empty() {
        1.0
    } else {
        occ_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns: "55-60".into(),
                value: occ_str.into(),
            },
        })?
    };
    let temp_factor: f64 = if temp_str.is_empty() {
        0.0
    } else {
        temp_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns: "61-66".into(),
                value: temp_str.into(),
            },
        })?
    };

    Ok(AtomRecord {
        serial,
        name: name_str.to_string(),
        alt_loc: alt_loc_str.chars().next(),
        res_name: res_name_str.to_string(),
        chain_id: chain_id_str.chars().next().unwrap_or('A'),
        res_seq,
        i_code: i_code_str.chars().next(),
        position: Point3::new(x, y, z),
        occupancy,
        temp_factor,
        element: element_str.to_string(),
        model,
    })
}

fn parse_coordinate(value: &str, columns: &str, line_num: usize) -> Result<f64, PdbError> {
    if value.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: columns.into(),
            },
        });
    }
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

fn format_atom_line(record: &AtomRecord) -> Result<String, PdbError> {
    let mut line = String::with_capacity(80);
    line.push_str("ATOM  ");
    line.push_str(&format!("{:>5}", record.serial));
    line.push(' ');
    line.push_str(&format_atom_name(&record.name, &record.element));
    line.push(record.alt_loc.unwrap_or(' '));
    line.push_str(&format!("{:>3}", record.res_name));
    line.push(' ');
    line.push(record.chain_id);
    line.push_str(&format!("{:>4}", record.res_seq));
    line.push(record.i_code.unwrap_or(' '));
    line.push_str("   ");
    line.push_str(&format_coordinate(record.position.x)?);
    line.push_str(&format_coordinate(record.position.y)?);
    line.push_str(&format_coordinate(record.position.z)?);
    line.push_str(&format!("{:>6.2}", record.occupancy));
    line.push_str(&format!("{:>6.2}", record.temp_factor));
    line.push_str("          ");
    line.push_str(&format!("{:>2}", record.element));
    Ok(line)
}

// One-letter names align at column 14 while two-letter element names such
// as FE start at column 13; names starting with a digit stay left.
fn format_atom_name(name: &str, element: &str) -> String {
    match name.len() {
        1 | 4 => format!("{:^4}", name),
        2 => {
            if name == element {
                format!("{:<4}", name)
            } else {
                format!("{:^4}", name)
            }
        }
        _ => {
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                format!("{:<4}", name)
            } else {
                format!("{:>4}", name)
            }
        }
    }
}

// PDB reserves exactly eight columns per coordinate, so large magnitudes
// drop decimals instead of widening the field.
fn format_coordinate(value: f64) -> Result<String, PdbError> {
    if value >= 1e8 - 0.5 || value <= -1e7 + 0.5 {
        Err(PdbError::CoordinateOutOfRange { value })
    } else if value >= 1e6 - 0.5 || value <= -1e5 + 0.5 {
        Ok(format!("{:>8.0}", value))
    } else if value >= 1e5 - 0.5 || value <= -1e4 + 0.5 {
        Ok(format!("{:>8.1}", value))
    } else if value >= 1e4 - 0.5 || value <= -1e3 + 0.5 {
        Ok(format!("{:>8.2}", value))
    } else {
        Ok(format!("{:>8.3}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;
    use tempfile::NamedTempFile;

    const SAMPLE_PDB: &str = "\
HEADER    COMPLEX SAMPLE
MODEL        1
ATOM      1  N   MET A   1      38.344  16.402  -1.854  1.00 25.37           N
ATOM      2  CA  MET A   1      38.885  15.101  -2.259  1.00 24.12           C
ATOM      3  C   MET A   1      40.351  14.964  -1.851  1.00 23.85           C
ATOM      4  O   MET A   1      40.830  15.740  -1.011  1.00 24.96           O
HETATM    5  O   HOH A 101      45.000  12.000   3.000  1.00 30.00           O
ATOM      6  N   GLY B   7      35.155  18.419  -0.297  1.00 22.40           N
ATOM      7  CA  GLY B   7      33.900  19.071   0.063  0.50 21.10           C
ENDMDL
END
";

    #[test]
    fn read_parses_atom_records_with_fixed_columns() {
        let mut reader = BufReader::new(SAMPLE_PDB.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();

        assert_eq!(table.len(), 6, "HETATM must be skipped");
        let first = &table.records()[0];
        assert_eq!(first.serial, 1);
        assert_eq!(first.name, "N");
        assert_eq!(first.res_name, "MET");
        assert_eq!(first.chain_id, 'A');
        assert_eq!(first.res_seq, 1);
        assert_eq!(first.position, Point3::new(38.344, 16.402, -1.854));
        assert_eq!(first.occupancy, 1.0);
        assert_eq!(first.temp_factor, 25.37);
        assert_eq!(first.element, "N");
        assert_eq!(first.model, 1);
    }

    #[test]
    fn read_tracks_chain_and_occupancy_fields() {
        let mut reader = BufReader::new(SAMPLE_PDB.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();

        let last = &table.records()[5];
        assert_eq!(last.chain_id, 'B');
        assert_eq!(last.res_seq, 7);
        assert_eq!(last.occupancy, 0.5);
        assert_eq!(table.chains(), vec!['A', 'B']);
    }

    #[test]
    fn read_defaults_blank_chain_to_a() {
        let line =
            "ATOM      1  CA  GLY     1       1.000   2.000   3.000  1.00  0.00           C";
        let mut reader = BufReader::new(line.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();
        assert_eq!(table.records()[0].chain_id, 'A');
    }

    #[test]
    fn read_defaults_blank_occupancy_and_temp_factor() {
        let line = "ATOM      1  CA  GLY A   1       1.000   2.000   3.000";
        let mut reader = BufReader::new(line.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();
        assert_eq!(table.records()[0].occupancy, 1.0);
        assert_eq!(table.records()[0].temp_factor, 0.0);
        assert_eq!(table.records()[0].element, "");
    }

    #[test]
    fn read_stops_at_end_record() {
        let text = "\
ATOM      1  CA  GLY A   1       1.000   2.000   3.000  1.00  0.00           C
END
ATOM      2  CA  GLY A   2       4.000   5.000   6.000  1.00  0.00           C
";
        let mut reader = BufReader::new(text.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn read_rejects_unparseable_coordinates() {
        let line = "ATOM      1  CA  GLY A   1       1.000   xxxxx   3.000  1.00  0.00";
        let mut reader = BufReader::new(line.as_bytes());
        let result = PdbFile::read_from(&mut reader);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::InvalidFloat { .. }
            })
        ));
    }

    #[test]
    fn read_rejects_missing_atom_name() {
        let line = "ATOM      1      GLY A   1       1.000   2.000   3.000  1.00  0.00";
        let mut reader = BufReader::new(line.as_bytes());
        let result = PdbFile::read_from(&mut reader);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::MissingRequiredField { .. }
            })
        ));
    }

    #[test]
    fn read_rejects_input_without_atom_records() {
        let mut reader = BufReader::new("HEADER    NOTHING HERE\nEND\n".as_bytes());
        let result = PdbFile::read_from(&mut reader);
        assert!(matches!(result, Err(PdbError::MissingRecord(_))));
    }

    #[test]
    fn atom_name_alignment_follows_format_rules() {
        assert_eq!(format_atom_name("N", "N"), " N  ");
        assert_eq!(format_atom_name("CA", "C"), " CA ");
        assert_eq!(format_atom_name("FE", "FE"), "FE  ");
        assert_eq!(format_atom_name("OD1", "O"), " OD1");
        assert_eq!(format_atom_name("1HB", "H"), "1HB ");
        assert_eq!(format_atom_name("HG21", "H"), "HG21");
    }

    #[test]
    fn coordinate_formatting_trades_precision_for_range() {
        assert_eq!(format_coordinate(1.5).unwrap(), "   1.500");
        assert_eq!(format_coordinate(-999.999).unwrap(), "-999.999");
        assert_eq!(format_coordinate(9999.5).unwrap(), " 9999.50");
        assert_eq!(format_coordinate(99999.5).unwrap(), " 99999.5");
        assert_eq!(format_coordinate(999999.5).unwrap(), " 1000000");
        assert!(matches!(
            format_coordinate(1e8),
            Err(PdbError::CoordinateOutOfRange { .. })
        ));
    }

    #[test]
    fn written_lines_reparse_to_the_same_records() {
        let mut reader = BufReader::new(SAMPLE_PDB.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();

        let mut buffer = Vec::new();
        PdbFile::write_to(&table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut round = BufReader::new(text.as_bytes());
        let reparsed = PdbFile::read_from(&mut round).unwrap();

        assert_eq!(reparsed.len(), table.len());
        for (left, right) in table.records().iter().zip(reparsed.records()) {
            assert_eq!(left.serial, right.serial);
            assert_eq!(left.name, right.name);
            assert_eq!(left.res_name, right.res_name);
            assert_eq!(left.chain_id, right.chain_id);
            assert_eq!(left.res_seq, right.res_seq);
            assert_eq!(left.position, right.position);
            assert_eq!(left.occupancy, right.occupancy);
            assert_eq!(left.element, right.element);
        }
    }

    #[test]
    fn write_selection_filters_records() {
        let mut reader = BufReader::new(SAMPLE_PDB.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();

        let mut buffer = Vec::new();
        PdbFile::write_selection(&table, &Selection::new().chains(['B']), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.chars().nth(21) == Some('B')));
    }

    #[test]
    fn path_round_trip_preserves_the_table() {
        let mut reader = BufReader::new(SAMPLE_PDB.as_bytes());
        let table = PdbFile::read_from(&mut reader).unwrap();

        let file = NamedTempFile::new().unwrap();
        PdbFile::write_to_path(&table, file.path()).unwrap();
        let reread = PdbFile::read_from_path(file.path()).unwrap();

        assert_eq!(reread.len(), table.len());
        assert_eq!(reread.chains(), table.chains());
    }
}
