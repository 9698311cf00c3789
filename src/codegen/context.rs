//! Render context and output locations shared by every exporter

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::entities::{ComponentDefinition, PackageDefinition};

/// Textual form of the `date` context value
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// The object graph placeholders resolve against
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    pub definition: &'a ComponentDefinition,
    pub date: String,
}

impl<'a> RenderContext<'a> {
    pub fn new(definition: &'a ComponentDefinition, at: DateTime<Utc>) -> Self {
        Self {
            definition,
            date: at.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Walk a dotted path from `root`
///
/// Numeric segments index into arrays. Any absent segment, and a `null`
/// leaf, count as a miss.
pub fn resolve<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Text substituted for a resolved value
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Give `definition` a package when it has none
///
/// The step's package wins over the model default; without either the
/// definition gets an unnamed package so paths gain no extra segments.
pub fn assign_package(
    definition: &mut ComponentDefinition,
    step_package: Option<&PackageDefinition>,
    default_package: Option<&PackageDefinition>,
) {
    if definition.package().is_some() {
        return;
    }
    let package = step_package
        .or(default_package)
        .cloned()
        .unwrap_or_else(|| PackageDefinition::new(""));
    definition.set_package(package);
}

/// `<root>/<path>/<package segments>/<name>.<extension>`
pub fn output_path(
    root: &Path,
    path: &str,
    package: Option<&PackageDefinition>,
    name: &str,
    extension: &str,
) -> PathBuf {
    let mut location = root.to_path_buf();
    for segment in path.split(['/', '\\']).filter(|s| !s.is_empty()) {
        location.push(segment);
    }
    if let Some(package) = package {
        for segment in package.segments() {
            location.push(segment);
        }
    }
    if extension.is_empty() {
        location.push(name);
    } else {
        location.push(format!("{}.{}", name, extension));
    }
    location
}
