//! Diagram importers
//!
//! An importer turns the text of one diagram document into a
//! [`ModelDefinition`]. Only the Gliffy UML dialect is understood today.

pub mod compartments;
pub mod gliffy;

use miette::Diagnostic;
use thiserror::Error;

use crate::entities::ModelDefinition;
use crate::json::JsonSyntaxError;

pub use compartments::{Compartments, Region};
pub use gliffy::GliffyImporter;

/// Converts a diagram document into a neutral model
pub trait Importer {
    /// Import `document`, naming the resulting model `name`
    ///
    /// Fails only when the document is not valid JSON; missing structure
    /// yields empty collections.
    fn import(&self, document: &str, name: &str) -> Result<ModelDefinition, ImportError>;
}

#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] JsonSyntaxError),

    #[error("unknown importer '{0}'")]
    #[diagnostic(
        code(umlt::import::unknown_importer),
        help("available importers: gliffy")
    )]
    UnknownImporter(String),
}

/// Resolve an importer selector as written in job files
///
/// Accepts the legacy `gliffy.Importer` spelling as well.
pub fn for_name(selector: &str) -> Result<Box<dyn Importer>, ImportError> {
    match selector.trim().to_lowercase().as_str() {
        "gliffy" | "gliffy.importer" => Ok(Box::new(GliffyImporter::new())),
        _ => Err(ImportError::UnknownImporter(selector.to_string())),
    }
}
