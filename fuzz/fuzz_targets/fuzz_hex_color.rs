#![no_main]

use libfuzzer_sys::fuzz_target;
use smartcube::color::{apply_hue, hex_to_hsl, is_valid_hex, normalize_hex};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Validation and parsing must agree
    assert_eq!(is_valid_hex(s), hex_to_hsl(s).is_ok());

    if let Ok(hex) = normalize_hex(s) {
        assert_eq!(hex.len(), 7);
        assert!(is_valid_hex(&hex));
        let hsl = hex_to_hsl(&hex).unwrap();
        assert!((0.0..360.0).contains(&hsl.h));
        let _ = apply_hue(Some(&hex), hsl.h);
    }
});
