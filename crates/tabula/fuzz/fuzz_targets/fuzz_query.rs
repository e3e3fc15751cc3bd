//! Fuzz target for the pseudo natural query translator.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabula::{QueryTranslator, Table};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = Table::from_columns([
        ("name", vec!["Ann".to_string(), "Bob".to_string()]),
        ("course", vec!["CS".to_string(), "Math (intro)".to_string()]),
    ]) else {
        return;
    };

    let translator = QueryTranslator::new().with_alias("took", "course");
    if let Ok(filtered) = table.pseudo_natural_query(text, &translator) {
        assert!(filtered.row_count() <= table.row_count());
    }
});
