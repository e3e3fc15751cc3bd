//! Example: Load a delimited file, clean it and summarize its numeric columns.
//!
//! Usage:
//!   cargo run --example profile -- <file_path>

use std::env;
use std::path::Path;

use tabula::{CellType, Loader, stats};

fn main() -> tabula::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example profile -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let (table, source) = Loader::new().load_file(path)?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Profile: {}", source.file);
    println!("{}", separator);
    println!("  Format: {}", source.format);
    println!("  Rows: {}", source.row_count);
    println!("  Columns: {}", source.column_count);
    println!("  Hash: {}", source.hash);
    println!();

    println!("## Normalization");
    for analysis in table.analyze_normalization() {
        if !analysis.is_text {
            continue;
        }
        println!(
            "  {:20} upper={:.2} inconsistency={:.2} name={} sentence={} -> {:?}",
            analysis.column,
            analysis.uppercase_pct,
            analysis.case_inconsistency,
            analysis.is_personal_name,
            analysis.has_sentence_structure,
            analysis.recommended,
        );
    }
    println!();

    let cleaned = table.auto_normalize();

    println!("## Numeric columns");
    for name in cleaned.column_names() {
        let column = cleaned.column(name)?;
        let numeric: Vec<f64> = column
            .iter()
            .filter(|v| CellType::of(v).is_numeric())
            .filter_map(|v| v.trim().parse().ok())
            .collect();
        if numeric.is_empty() || numeric.len() * 2 < column.len() {
            continue;
        }
        println!(
            "  {:20} n={:<6} mean={:<10.3} median={:<10.3} sd={:<10.3} mad={:.3}",
            name,
            numeric.len(),
            stats::mean(&numeric)?,
            stats::median(&numeric)?,
            stats::standard_deviation(&numeric)?,
            stats::median_absolute_deviation(&numeric)?,
        );
    }

    Ok(())
}
