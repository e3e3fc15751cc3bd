//! Fuzz target for formula parsing and evaluation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabula::{Formula, Table};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(formula) = Formula::parse(source) else {
        return;
    };

    let Ok(mut table) = Table::from_columns([
        ("A", vec!["10".to_string(), "0".to_string()]),
        ("B", vec!["3".to_string(), "-2.5".to_string()]),
    ]) else {
        return;
    };
    // unknown columns and division by zero are errors, never panics
    let _ = table.add_formula_column("out", formula.source(), Some(3));
});
