//! Historical placement records loaded from CSV.
//!
//! The file must carry a header row naming the six columns
//! (`CGPA,Internships,Projects,Communication,ResumeScore,Placed`). Columns are
//! matched by name, so their order does not matter and extra columns are
//! ignored. Blank lines are skipped and fields may be wrapped in double quotes.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlacementError, Result};

/// A dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Cgpa,
    Internships,
    Projects,
    Communication,
    ResumeScore,
    Placed,
}

impl Column {
    /// All columns, in the order used by analytics outputs.
    pub fn all() -> [Column; 6] {
        [
            Column::Cgpa,
            Column::Internships,
            Column::Projects,
            Column::Communication,
            Column::ResumeScore,
            Column::Placed,
        ]
    }

    /// Header name in the CSV file.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Cgpa => "CGPA",
            Column::Internships => "Internships",
            Column::Projects => "Projects",
            Column::Communication => "Communication",
            Column::ResumeScore => "ResumeScore",
            Column::Placed => "Placed",
        }
    }
}

/// One past student.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub cgpa: f64,
    pub internships: f64,
    pub projects: f64,
    pub communication: f64,
    pub resume_score: f64,
    pub placed: bool,
}

impl PlacementRecord {
    pub fn get(&self, column: Column) -> f64 {
        match column {
            Column::Cgpa => self.cgpa,
            Column::Internships => self.internships,
            Column::Projects => self.projects,
            Column::Communication => self.communication,
            Column::ResumeScore => self.resume_score,
            Column::Placed => {
                if self.placed {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// In-memory copy of the historical dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementDataset {
    records: Vec<PlacementRecord>,
}

impl PlacementDataset {
    pub fn new(records: Vec<PlacementRecord>) -> Self {
        Self { records }
    }

    /// Load a dataset from a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        debug!("Loaded {} records from {:?}", dataset.len(), path);
        Ok(dataset)
    }

    /// Parse CSV text from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut positions: Option<[usize; 6]> = None;
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let line = line.trim_start_matches('\u{feff}');
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(line);

            let Some(pos) = positions else {
                positions = Some(locate_columns(&fields, line_no)?);
                continue;
            };

            let value = |column: Column, i: usize| -> Result<f64> {
                let raw = fields.get(pos[i]).ok_or_else(|| {
                    PlacementError::dataset(
                        line_no,
                        format!("missing value for column {}", column.header()),
                    )
                })?;
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        PlacementError::dataset(
                            line_no,
                            format!("invalid {} value {:?}", column.header(), raw),
                        )
                    })
            };

            records.push(PlacementRecord {
                cgpa: value(Column::Cgpa, 0)?,
                internships: value(Column::Internships, 1)?,
                projects: value(Column::Projects, 2)?,
                communication: value(Column::Communication, 3)?,
                resume_score: value(Column::ResumeScore, 4)?,
                placed: value(Column::Placed, 5)? != 0.0,
            });
        }

        if positions.is_none() {
            return Err(PlacementError::dataset(0, "file has no header row"));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[PlacementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.records.iter().map(|r| r.get(column)).collect()
    }
}

/// Split one CSV line. Commas inside double quotes do not separate fields and
/// `""` inside a quoted field is a literal quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

fn locate_columns(header: &[String], line_no: usize) -> Result<[usize; 6]> {
    let mut out = [0usize; 6];
    for (slot, column) in out.iter_mut().zip(Column::all()) {
        *slot = header
            .iter()
            .position(|h| h == column.header())
            .ok_or_else(|| {
                PlacementError::dataset(line_no, format!("missing column {}", column.header()))
            })?;
    }
    Ok(out)
}
