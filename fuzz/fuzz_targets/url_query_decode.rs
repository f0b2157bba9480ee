//! Fuzz target for query-string decoding.
//!
//! Decoding must accept any input, and the canonical query of whatever it
//! produces must decode back to the same state.

#![no_main]

use libfuzzer_sys::fuzz_target;
use penguinview::url_state::{decode_query, encode_query};

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let input = String::from_utf8_lossy(data);
    let state = decode_query(&input);
    let canonical = encode_query(&state);
    assert_eq!(decode_query(&canonical), state);
});
