//! Tabula: an in-memory tabular data engine.
//!
//! A [`Table`] holds named columns of text cells. Operators filter, join,
//! group, reshape and clean tables without modifying their input, so every
//! step of a pipeline yields a new value that can be inspected on its own.
//!
//! # Core Principles
//!
//! - **Text cells**: values stay as loaded and are read as numbers on demand
//! - **Persistent values**: transforms take `&self` and return a new table
//! - **Typed failures**: structurally invalid calls fail, they never guess
//!
//! # Example
//!
//! ```no_run
//! use tabula::{AggregationMethod, Loader, Predicate};
//!
//! let (table, source) = Loader::new().load_file("sales.csv").unwrap();
//! println!("Loaded {} rows from {}", table.row_count(), source.file);
//!
//! let totals = table
//!     .filter(&[Predicate::equals("Region", "North")])
//!     .unwrap()
//!     .aggregate(&["Product"], AggregationMethod::Sum)
//!     .unwrap();
//! println!("{} products", totals.row_count());
//! ```

pub mod cleansing;
pub mod error;
pub mod expression;
pub mod input;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod stats;
pub mod table;
pub mod transform;

pub use cleansing::{
    AutoNormalizeConfig, MaskingStrategy, MissingValueStrategy, NormalizationAnalysis,
    NormalizationAnalyzer, NormalizationStrategy,
};
pub use error::{Result, TabulaError};
pub use expression::Formula;
pub use input::{LoadOptions, Loader, SourceMetadata};
pub use predicate::{CombinationRule, Predicate};
pub use query::QueryTranslator;
pub use schema::{CellType, Schema};
pub use table::{Row, Table};
pub use transform::{AggregationMethod, SlidingWindows, SortDirection};
