#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = vatin::vies::parse_check_vat_response(s, "DE", "123456789");
    }
});
