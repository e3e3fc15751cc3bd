//! Column naming and typed interpretation of text cells.

mod table;
mod types;

pub use table::Schema;
pub use types::{CellType, format_number, parse_number};
