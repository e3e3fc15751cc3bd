//! Relational operators over [`Table`](crate::table::Table) values.
//!
//! Every operator reads the receiver and returns a new table (or a set of
//! tables); the receiver is never modified.

mod group;
mod join;
mod operations;
mod reshape;
mod sort;
mod window;

pub use operations::{AggregationMethod, SortDirection};
pub use reshape::DEFAULT_EXPLODE_DELIMITER;
pub use window::SlidingWindows;
