//! Fuzz target for dataset JSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the JSON reader,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use penguinview::data::io_json::from_json_slice;
use penguinview::data::transform_records;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(raw) = from_json_slice(data) {
        let _ = transform_records(&raw);
    }
});
