//! JSON ingestion for the dataset asset.
//!
//! The asset is a single JSON array of row objects, one per penguin, with
//! `null` for missing values. Rows are read as [`RawRecord`]s; callers run
//! them through [`transform_records`](super::transform_records).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::{RawRecord, Record};
use crate::error::PenguinviewError;

/// Reads raw rows from a dataset JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not an array of rows.
pub fn read_dataset_json(path: &Path) -> Result<Vec<RawRecord>, PenguinviewError> {
    let file = File::open(path).map_err(PenguinviewError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| PenguinviewError::DatasetJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes canonical records as a JSON array.
pub fn write_records_json(path: &Path, records: &[Record]) -> Result<(), PenguinviewError> {
    let file = File::create(path).map_err(PenguinviewError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, records).map_err(|source| {
        PenguinviewError::DatasetJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Reads raw rows from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads raw rows from JSON bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<Vec<RawRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
