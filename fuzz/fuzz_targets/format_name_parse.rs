#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str::FromStr;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(id) = multirep::format::FormatId::from_str(text) {
            assert_eq!(id.name(), text);
        }
    }
});
