#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let bits = u16::from_le_bytes([data[0], data[1]]);
    multirep::format::codec::fuzz_half_roundtrip(bits);
});
