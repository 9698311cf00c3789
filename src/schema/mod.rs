//! Schema validation for job and model artifacts

pub mod registry;
pub mod validator;

pub use registry::{SchemaKind, SchemaRegistry};
pub use validator::{SchemaViolation, ValidationError, Validator};
