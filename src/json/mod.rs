//! JSON document helpers shared by the importer and the job runner

pub mod diagnostics;

pub use diagnostics::{parse_value, JsonSyntaxError};
