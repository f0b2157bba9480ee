//! CSV ingestion for the extended Palmer penguins export.
//!
//! # Columns
//!
//! `species, island, bill_length_mm, bill_depth_mm, flipper_length_mm,
//! body_mass_g, sex, diet, life_stage, health_metrics, year`
//!
//! Columns may appear in any order and extra columns are ignored. Cells are
//! trimmed; empty cells and numeric cells that do not parse become `None`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::model::RawRecord;
use crate::error::PenguinviewError;

/// A single CSV row with every cell kept as text.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    species: Option<String>,
    #[serde(default)]
    island: Option<String>,
    #[serde(default)]
    bill_length_mm: Option<String>,
    #[serde(default)]
    bill_depth_mm: Option<String>,
    #[serde(default)]
    flipper_length_mm: Option<String>,
    #[serde(default)]
    body_mass_g: Option<String>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    diet: Option<String>,
    #[serde(default)]
    life_stage: Option<String>,
    #[serde(default)]
    health_metrics: Option<String>,
    #[serde(default)]
    year: Option<String>,
}

/// Reads raw rows from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid CSV.
pub fn read_dataset_csv(path: &Path) -> Result<Vec<RawRecord>, PenguinviewError> {
    let file = File::open(path).map_err(PenguinviewError::Io)?;
    read_rows(BufReader::new(file), path)
}

/// Reads raw rows from a CSV string.
///
/// Useful for testing without file I/O.
pub fn from_csv_str(csv_str: &str) -> Result<Vec<RawRecord>, PenguinviewError> {
    read_rows(csv_str.as_bytes(), Path::new("<string>"))
}

fn read_rows<R: std::io::Read>(reader: R, path: &Path) -> Result<Vec<RawRecord>, PenguinviewError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|source| PenguinviewError::DatasetCsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row.into_raw());
    }

    Ok(rows)
}

impl CsvRow {
    fn into_raw(self) -> RawRecord {
        RawRecord {
            species: text(self.species),
            island: text(self.island),
            bill_length_mm: number(self.bill_length_mm),
            bill_depth_mm: number(self.bill_depth_mm),
            flipper_length_mm: number(self.flipper_length_mm),
            body_mass_g: number(self.body_mass_g),
            sex: text(self.sex),
            diet: text(self.diet),
            life_stage: text(self.life_stage),
            health_metrics: text(self.health_metrics),
            year: number(self.year).map(f64::trunc),
        }
    }
}

fn text(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn number(cell: Option<String>) -> Option<f64> {
    text(cell).and_then(|s| s.parse::<f64>().ok())
}
