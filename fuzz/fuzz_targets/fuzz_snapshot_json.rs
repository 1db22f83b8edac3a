#![no_main]

use libfuzzer_sys::fuzz_target;
use smartcube::config::PersistedSnapshot;

fuzz_target!(|data: &[u8]| {
    // Whatever recovery returns must encode and recover cleanly
    if let Ok(s) = std::str::from_utf8(data) {
        let recovery = PersistedSnapshot::recover(s);
        let json = recovery.snapshot.to_json().unwrap();
        let again = PersistedSnapshot::recover(&json);
        assert!(again.is_clean());
        assert_eq!(again.snapshot.current_mode, recovery.snapshot.current_mode);
        assert_eq!(again.snapshot.case_color, recovery.snapshot.case_color);
    }
});
