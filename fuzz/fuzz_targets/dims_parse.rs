#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str::FromStr;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(dims) = multirep::dims::Dims3::from_str(text) {
            // A parsed value must survive a display round trip
            let shown = dims.to_string();
            assert_eq!(multirep::dims::Dims3::from_str(&shown).unwrap(), dims);
        }
    }
});
