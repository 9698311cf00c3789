//! Embedded JSON schemas for job and model artifacts

use rust_embed::Embed;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// The artifact kinds that have a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Job,
    Model,
}

impl SchemaKind {
    pub fn all() -> &'static [SchemaKind] {
        &[SchemaKind::Job, SchemaKind::Model]
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            SchemaKind::Job => "job.schema.json",
            SchemaKind::Model => "model.schema.json",
        }
    }

    /// Guess from the location: `*.job.json` or anything under `jobs/`
    /// is a job, anything under a `uml/` directory is a model
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        if name.ends_with(".job.json") {
            return Some(SchemaKind::Job);
        }
        let parent = path.parent()?.file_name()?.to_string_lossy();
        match parent.as_ref() {
            "jobs" => Some(SchemaKind::Job),
            "uml" => Some(SchemaKind::Model),
            _ => None,
        }
    }

    /// Guess from the document's top-level keys
    pub fn detect(document: &Value) -> Option<Self> {
        let object = document.as_object()?;
        if object.contains_key("importSteps") || object.contains_key("exportSteps") {
            Some(SchemaKind::Job)
        } else if ["classes", "interfaces", "packages"]
            .iter()
            .any(|k| object.contains_key(*k))
        {
            Some(SchemaKind::Model)
        } else {
            None
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Job => write!(f, "job"),
            SchemaKind::Model => write!(f, "model"),
        }
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "job" => Ok(SchemaKind::Job),
            "model" => Ok(SchemaKind::Model),
            _ => Err(format!("Unknown schema kind: {} (expected job or model)", s)),
        }
    }
}

/// Access to the schema texts shipped with the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn get(&self, kind: SchemaKind) -> Option<String> {
        let file = EmbeddedSchemas::get(kind.file_name())?;
        String::from_utf8(file.data.into_owned()).ok()
    }
}
