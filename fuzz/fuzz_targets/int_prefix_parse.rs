//! Fuzz target for the leading-integer parser behind `bins` and `years`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use penguinview::url_state::fuzz_parse_int_prefix;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = fuzz_parse_int_prefix(input);
    }
});
