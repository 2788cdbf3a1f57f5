//! Delimited-text ingestion. Validation happens here so nothing invalid
//! ever reaches a fleet.

pub mod error;
pub mod loader;
pub mod parser;

pub use error::IngestError;
pub use loader::{load_from_path, load_from_reader, IngestReport};
pub use parser::{parse_line, ParsedRecord};
