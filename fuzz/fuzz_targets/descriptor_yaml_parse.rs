#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to keep iterations fast
    if data.len() > 10_000_000 {
        return;
    }
    if let Ok(text) = std::str::from_utf8(data) {
        // Parsing must never panic, only return Err for malformed descriptors
        let _ = multirep::io::raw::from_descriptor_str(text);
    }
});
