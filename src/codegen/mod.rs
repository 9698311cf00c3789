//! Code generation from component definitions
//!
//! An [`Exporter`] renders the definition of an [`ExportStep`] through the
//! step's template text. Two engines are available: the line-oriented
//! placeholder engine and Tera.

pub mod context;
pub mod modifier;
pub mod placeholder;
pub mod tera;

use miette::Diagnostic;
use thiserror::Error;

use crate::entities::ExportStep;

pub use context::{assign_package, output_path, RenderContext, DATE_FORMAT};
pub use modifier::TemplateModifier;
pub use placeholder::PlaceholderExporter;
pub use self::tera::TeraExporter;

/// Renders an export step to source text
pub trait Exporter {
    fn export(&self, step: &ExportStep) -> Result<String, ExportError>;
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("export step '{step}' is missing its {field}")]
    #[diagnostic(
        code(umlt::export::missing_field),
        help("set `{field}` on the step (or `templateName` + `fileExtension` for the template)")
    )]
    MissingField { step: String, field: &'static str },

    #[error("failed to render '{name}': {message}")]
    #[diagnostic(code(umlt::export::render))]
    Render { name: String, message: String },

    #[error("unknown exporter '{0}'")]
    #[diagnostic(
        code(umlt::export::unknown_exporter),
        help("available exporters: placeholder, tera")
    )]
    UnknownExporter(String),
}

impl ExportError {
    pub fn missing(step: &ExportStep, field: &'static str) -> Self {
        ExportError::MissingField {
            step: step.name.clone(),
            field,
        }
    }
}

/// Resolve an exporter selector as written in job files
pub fn for_name(selector: &str) -> Result<Box<dyn Exporter>, ExportError> {
    match selector.trim().to_lowercase().as_str() {
        "" | "placeholder" => Ok(Box::new(PlaceholderExporter::new())),
        "tera" => Ok(Box::new(TeraExporter::new())),
        _ => Err(ExportError::UnknownExporter(selector.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_name() {
        assert!(for_name("placeholder").is_ok());
        assert!(for_name("Tera").is_ok());
        assert!(matches!(
            for_name("handlebars"),
            Err(ExportError::UnknownExporter(_))
        ));
    }

    #[test]
    fn test_missing_field_message() {
        let step = ExportStep {
            name: "java".to_string(),
            ..Default::default()
        };
        let err = ExportError::missing(&step, "definition");
        assert_eq!(err.to_string(), "export step 'java' is missing its definition");
    }
}
