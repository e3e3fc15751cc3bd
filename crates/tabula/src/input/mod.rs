//! Loading delimited text files into tables.

mod loader;
mod source;

pub use loader::{LoadOptions, Loader};
pub use source::SourceMetadata;
