//! Fuzz target for the delimited-text loader.
//!
//! The loader must never panic on malformed input: ragged rows, stray
//! quotes and invalid UTF-8 all surface as errors.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabula::Loader;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(table) = Loader::new().parse_bytes(data) {
        assert_eq!(table.column_names().len(), table.column_count());
        let _ = table.auto_normalize();
    }
});
