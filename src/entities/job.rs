//! Job and step types
//!
//! A [`UmlJob`] is the JSON document users write to chain imports and code
//! generation. Steps carry their results (`model`, `code`) after execution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::identity::EntityId;
use crate::entities::definition::{ComponentDefinition, PackageDefinition};
use crate::entities::model::ModelDefinition;
use crate::entities::stereotype::Stereotype;

/// Importer used when a step does not name one
pub const DEFAULT_IMPORTER: &str = "gliffy";

/// Exporter used when a step does not name one
pub const DEFAULT_EXPORTER: &str = "placeholder";

fn default_importer() -> String {
    DEFAULT_IMPORTER.to_string()
}

fn default_exporter() -> String {
    DEFAULT_EXPORTER.to_string()
}

fn default_import_name() -> String {
    "NewImportStep".to_string()
}

fn default_export_name() -> String {
    "NewExportStep".to_string()
}

fn default_job_name() -> String {
    "NewUmlJob".to_string()
}

/// Convert one diagram into a model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStep {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default = "default_import_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Importer selector (e.g. "gliffy")
    #[serde(default = "default_importer", alias = "importerClassname")]
    pub importer: String,

    /// Location of the diagram document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Inline diagram text, used instead of `source` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    /// Where to write the model artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Converted model, filled in after execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelDefinition>,
}

impl Default for ImportStep {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            name: default_import_name(),
            description: None,
            importer: default_importer(),
            source: None,
            document: None,
            destination: None,
            model: None,
        }
    }
}

/// Render component definitions through one template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStep {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default = "default_export_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Single definition to render; when absent the step renders every
    /// `target` component of its model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<ComponentDefinition>,

    /// Exporter selector ("placeholder" or "tera")
    #[serde(default = "default_exporter")]
    pub exporter: String,

    /// Template file name without extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,

    /// Resolved template text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Extension of both the template file and the generated file
    #[serde(default)]
    pub file_extension: String,

    /// Path segment below the output root (e.g. "src/main/java")
    #[serde(default)]
    pub path: String,

    /// Default package for definitions without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageDefinition>,

    /// Model artifact to read definitions from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Which components of the model to render
    #[serde(default)]
    pub target: Stereotype,

    /// Generated code, filled in after rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Default for ExportStep {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            name: default_export_name(),
            description: None,
            definition: None,
            exporter: default_exporter(),
            template_name: None,
            template: None,
            file_extension: String::new(),
            path: String::new(),
            package: None,
            model: None,
            target: Stereotype::Class,
            code: None,
        }
    }
}

impl ExportStep {
    /// Create a step rendering a single definition with inline template text
    pub fn for_definition(definition: ComponentDefinition, template: impl Into<String>) -> Self {
        Self {
            definition: Some(definition),
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// Template file name, e.g. `classTemplate.java`
    pub fn template_file(&self) -> Option<String> {
        self.template_name.as_ref().map(|name| {
            if self.file_extension.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", name, self.file_extension)
            }
        })
    }
}

/// Complete job: imports followed by exports, run in declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmlJob {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default = "default_job_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Job-local values for `${key}` references
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,

    #[serde(default)]
    pub import_steps: Vec<ImportStep>,

    #[serde(default)]
    pub export_steps: Vec<ExportStep>,
}

impl Default for UmlJob {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            name: default_job_name(),
            description: None,
            parameters: BTreeMap::new(),
            import_steps: Vec::new(),
            export_steps: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults_from_minimal_json() {
        let job: UmlJob = serde_json::from_str(r#"{"importSteps":[{}],"exportSteps":[{}]}"#).unwrap();
        assert_eq!(job.name, "NewUmlJob");
        assert_eq!(job.import_steps[0].importer, "gliffy");
        assert_eq!(job.export_steps[0].exporter, "placeholder");
        assert_eq!(job.export_steps[0].target, Stereotype::Class);
    }

    #[test]
    fn test_legacy_importer_field_accepted() {
        let step: ImportStep =
            serde_json::from_str(r#"{"importerClassname":"gliffy.Importer"}"#).unwrap();
        assert_eq!(step.importer, "gliffy.Importer");
    }

    #[test]
    fn test_template_file_name() {
        let step = ExportStep {
            template_name: Some("classTemplate".to_string()),
            file_extension: "java".to_string(),
            ..Default::default()
        };
        assert_eq!(step.template_file().as_deref(), Some("classTemplate.java"));
        assert!(ExportStep::default().template_file().is_none());
    }
}
