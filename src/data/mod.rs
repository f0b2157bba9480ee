//! The penguin dataset: vocabularies, records, ingestion and normalization.
//!
//! Raw rows come in through [`io_json`] or [`io_csv`] as [`RawRecord`]s and
//! are turned into canonical [`Record`]s by [`transform_records`].
//!
//! # Example
//!
//! ```
//! use penguinview::data::{io_json, transform_records, Species};
//!
//! let raw = io_json::from_json_str(
//!     r#"[{"species":"adelie","island":"Torgensen","bill_length_mm":0,"year":2021}]"#,
//! )
//! .unwrap();
//! let records = transform_records(&raw);
//!
//! assert_eq!(records[0].species, Species::Adelie);
//! assert_eq!(records[0].bill_length_mm, None);
//! ```

pub mod io_csv;
pub mod io_json;
mod model;
pub mod normalize;
mod transform;
mod vocab;

pub use model::{RawRecord, Record};
pub use transform::{
    transform_record, transform_records, transform_records_with_counts, TransformCounts,
};
pub use vocab::{
    field_label, Diet, HealthMetric, Island, LifeStage, NumericField, Sex, Species, Vocabulary,
    MAX_YEAR, MIN_YEAR, YEARS,
};

use std::path::Path;

use crate::error::PenguinviewError;

/// On-disk dataset formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    /// Parses a format name as given on the command line.
    pub fn from_name(name: &str) -> Result<Self, PenguinviewError> {
        match name {
            "json" => Ok(DatasetFormat::Json),
            "csv" => Ok(DatasetFormat::Csv),
            other => Err(PenguinviewError::UnsupportedFormat(format!(
                "'{}' (supported: json, csv)",
                other
            ))),
        }
    }

    /// Guesses the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => DatasetFormat::Csv,
            _ => DatasetFormat::Json,
        }
    }
}

/// Reads and transforms a dataset file.
pub fn load_dataset(path: &Path, format: DatasetFormat) -> Result<Vec<Record>, PenguinviewError> {
    let raw = match format {
        DatasetFormat::Json => io_json::read_dataset_json(path)?,
        DatasetFormat::Csv => io_csv::read_dataset_csv(path)?,
    };
    Ok(transform_records(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path_and_name() {
        assert_eq!(DatasetFormat::from_path(Path::new("a/penguins.CSV")), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_path(Path::new("penguins.json")), DatasetFormat::Json);
        assert_eq!(DatasetFormat::from_path(Path::new("penguins")), DatasetFormat::Json);
        assert_eq!(DatasetFormat::from_name("csv").unwrap(), DatasetFormat::Csv);
        assert!(DatasetFormat::from_name("parquet").is_err());
    }
}
