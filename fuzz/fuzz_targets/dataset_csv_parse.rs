//! Fuzz target for dataset CSV parsing.
//!
//! This fuzzer feeds arbitrary text to the CSV reader and runs whatever
//! parses through the record transform, checking for panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use penguinview::data::io_csv::from_csv_str;
use penguinview::data::transform_records;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(raw) = from_csv_str(text) {
            let _ = transform_records(&raw);
        }
    }
});
