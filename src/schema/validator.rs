//! Schema validation with detailed error reporting

use jsonschema::error::ValidationErrorKind;
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

use crate::json::diagnostics::parse_value;
use crate::schema::registry::{SchemaKind, SchemaRegistry};

/// Validation error with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("Schema validation failed: {summary}")]
#[diagnostic(code(umlt::schema::validation_error))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let summary = if violations.len() == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", violations.len())
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

/// Compiled job and model schemas
pub struct Validator {
    compiled: HashMap<SchemaKind, JsonValidator>,
}

impl Validator {
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for kind in SchemaKind::all() {
            let Some(text) = registry.get(*kind) else {
                continue;
            };
            match serde_json::from_str::<JsonValue>(&text).map(|schema| validator_for(&schema)) {
                Ok(Ok(validator)) => {
                    compiled.insert(*kind, validator);
                }
                Ok(Err(e)) => log::error!(schema:% = kind, error:% = e; "Embedded schema does not compile"),
                Err(e) => log::error!(schema:% = kind, error:% = e; "Embedded schema is not JSON"),
            }
        }

        Self { compiled }
    }

    /// Validate `content`, collecting every violation
    ///
    /// When `kind` is `None` it is detected from the document's keys;
    /// documents of unknown kind pass.
    pub fn validate(
        &self,
        content: &str,
        filename: &str,
        kind: Option<SchemaKind>,
    ) -> Result<Option<SchemaKind>, ValidationError> {
        let document = match parse_value(content, filename) {
            Ok(document) => document,
            Err(e) => {
                let (line, column) = e.location();
                let violation = SchemaViolation::new(
                    format!("JSON parse error: {}", e.message()),
                    "invalid JSON".to_string(),
                    find_error_span(content, line, column),
                    Some("Check JSON syntax - quotes, commas and closing brackets".to_string()),
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        let Some(kind) = kind.or_else(|| SchemaKind::detect(&document)) else {
            return Ok(None);
        };
        let Some(schema) = self.compiled.get(&kind) else {
            return Ok(None);
        };

        let violations: Vec<SchemaViolation> = schema
            .iter_errors(&document)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(Some(kind))
        } else {
            Err(ValidationError::new(filename, content, violations))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&SchemaRegistry)
    }
}

fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    SchemaViolation::new(
        format_schema_error(error),
        format_error_hint(error),
        find_path_span(content, &path),
        generate_help_message(error),
    )
}

fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", name, path)
        }
        ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        ValidationErrorKind::Enum { options } => {
            format!("Invalid value at {}: must be one of: {}", path, format_enum_options(options))
        }
        ValidationErrorKind::Constant { expected_value } => {
            format!("Invalid value at {}: must be {}", path, expected_value)
        }
        ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        ValidationErrorKind::AnyOf { .. } => {
            format!("Value at {} matches none of the allowed shapes", path)
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}

fn format_enum_options(options: &JsonValue) -> String {
    match options.as_array() {
        Some(items) => items
            .iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        None => options.to_string(),
    }
}

fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        ValidationErrorKind::Required { .. } => "required field missing",
        ValidationErrorKind::Type { .. } => "wrong type",
        ValidationErrorKind::Enum { .. } | ValidationErrorKind::Constant { .. } => "invalid value",
        ValidationErrorKind::MinLength { .. } => "too short",
        ValidationErrorKind::AdditionalProperties { .. } => "unknown field",
        _ => "validation error",
    }
    .to_string()
}

fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field", name))
        }
        ValidationErrorKind::Enum { options } => {
            Some(format!("Valid values: {}", format_enum_options(options)))
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        ValidationErrorKind::AnyOf { .. } => {
            Some("Import steps need `source` or `document`; export steps need `template` or `templateName`".to_string())
        }
        _ => None,
    }
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}

/// Span from a 1-based line and column
fn find_error_span(content: &str, line: usize, column: usize) -> SourceSpan {
    let mut offset = 0;
    for (i, text) in content.lines().enumerate() {
        if i + 1 == line {
            offset += column.saturating_sub(1).min(text.len());
            break;
        }
        offset += text.len() + 1;
    }
    let offset = offset.min(content.len());
    let rest = &content[offset..];
    let len = rest.find('\n').unwrap_or(rest.len()).max(1);
    (offset, len).into()
}

/// Span of the key named by the last segment of a JSON pointer
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();

    let Some(last) = parts.last() else {
        return first_line_span(content);
    };

    // Array indices have no key of their own; point at the array
    let key = if last.parse::<usize>().is_ok() && parts.len() >= 2 {
        parts[parts.len() - 2]
    } else {
        last
    };

    find_key_span(content, key).unwrap_or_else(|| first_line_span(content))
}

fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let needle = format!("\"{}\"", key);
    let start = content.find(&needle)?;
    Some((start, needle.len()).into())
}
