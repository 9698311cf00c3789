//! Line-oriented `${path}` template engine
//!
//! Each template line is processed on its own, so a placeholder that
//! resolves to nothing only ever removes its own text. Unresolved
//! placeholders stay in the output unless marked `@optional`.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use crate::codegen::context::{resolve, stringify, RenderContext};
use crate::codegen::modifier::TemplateModifier;
use crate::codegen::{ExportError, Exporter};
use crate::entities::{ComponentDefinition, ExportStep};

/// `${path}` or `${@modifier path}`; block markers may omit the path
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*(?:@([A-Za-z_]+)\s*)?([A-Za-z0-9_.]*)\s*\}").unwrap()
});

/// The placeholder engine
#[derive(Debug, Default, Clone)]
pub struct PlaceholderExporter {
    at: Option<DateTime<Utc>>,
}

impl PlaceholderExporter {
    /// Stamp output with the time of each render
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp output with a fixed time
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            at: Some(timestamp),
        }
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }

    /// Render `template` against `definition`
    pub fn render(
        &self,
        definition: &ComponentDefinition,
        template: &str,
    ) -> Result<String, ExportError> {
        let context = RenderContext::new(definition, self.timestamp())
            .to_value()
            .map_err(|e| ExportError::Render {
                name: definition.name().to_string(),
                message: e.to_string(),
            })?;

        let mut blocks = Vec::new();
        let mut output = String::with_capacity(template.len());
        for line in template.lines() {
            output.push_str(&render_line(line, &context, &mut blocks));
            output.push('\n');
        }

        if !blocks.is_empty() {
            warn!(
                definition = definition.name(),
                open:? = blocks;
                "Template ends inside unclosed blocks"
            );
        }

        Ok(output)
    }
}

impl Exporter for PlaceholderExporter {
    fn export(&self, step: &ExportStep) -> Result<String, ExportError> {
        let definition = step
            .definition
            .as_ref()
            .ok_or_else(|| ExportError::missing(step, "definition"))?;
        let template = step
            .template
            .as_deref()
            .ok_or_else(|| ExportError::missing(step, "template"))?;
        self.render(definition, template)
    }
}

fn render_line(line: &str, context: &Value, blocks: &mut Vec<TemplateModifier>) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(line, |caps: &Captures<'_>| {
            let placeholder = &caps[0];
            let path = caps.get(2).map_or("", |m| m.as_str());

            let modifier = match caps.get(1) {
                None => None,
                Some(token) => match token.as_str().parse::<TemplateModifier>() {
                    Ok(modifier) => Some(modifier),
                    Err(_) => {
                        warn!(placeholder = placeholder; "Unknown template modifier");
                        return placeholder.to_string();
                    }
                },
            };

            match modifier {
                Some(open) if open.opens_block() => {
                    // Loop expansion is not performed; the body renders once
                    let items = resolve(context, path)
                        .and_then(Value::as_array)
                        .map(Vec::len);
                    debug!(modifier:% = open, path = path, items:? = items; "Opening block");
                    blocks.push(open);
                    String::new()
                }
                Some(close) if close.closes_block() => {
                    match blocks.pop() {
                        Some(open) if close.closes(open) => {}
                        Some(open) => {
                            warn!(open:% = open, close:% = close; "Mismatched block marker");
                        }
                        None => warn!(close:% = close; "Block marker closes nothing"),
                    }
                    String::new()
                }
                _ => match resolve(context, path) {
                    Some(value) => stringify(value),
                    None if modifier == Some(TemplateModifier::Optional) => String::new(),
                    None => {
                        debug!(placeholder = placeholder; "Unresolved placeholder");
                        placeholder.to_string()
                    }
                },
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AttributeDefinition, ClassDefinition, ComponentHeader, PackageDefinition,
    };
    use chrono::TimeZone;

    fn account() -> ComponentDefinition {
        let mut class = ClassDefinition {
            header: ComponentHeader {
                name: "Account".to_string(),
                ..ComponentHeader::with_id("4")
            },
            ..Default::default()
        };
        class.attributes.push(AttributeDefinition::new("age", "int"));
        class.into()
    }

    fn fixed() -> PlaceholderExporter {
        PlaceholderExporter::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_hello_account() {
        let out = fixed().render(&account(), "Hello ${definition.name}!").unwrap();
        assert_eq!(out, "Hello Account!\n");
    }

    #[test]
    fn test_unresolved_placeholder_is_kept() {
        let out = fixed().render(&account(), "${definition.missing}").unwrap();
        assert_eq!(out, "${definition.missing}\n");
    }

    #[test]
    fn test_optional_placeholder_is_elided() {
        let out = fixed()
            .render(&account(), "a${@optional definition.missing}b")
            .unwrap();
        assert_eq!(out, "ab\n");

        let out = fixed().render(&account(), "${@optional definition.id}").unwrap();
        assert_eq!(out, "4\n");
    }

    #[test]
    fn test_lines_are_independent() {
        let template = "class ${definition.name} {\n${@optional definition.package.name}\n}";
        let out = fixed().render(&account(), template).unwrap();
        assert_eq!(out, "class Account {\n\n}\n");
    }

    #[test]
    fn test_date_and_nested_values() {
        let mut definition = account();
        definition.set_package(PackageDefinition::new("com.acme"));
        let template = "// ${date}\npackage ${definition.package.name};\n${definition.attributes.0.type}";
        let out = fixed().render(&definition, template).unwrap();
        assert_eq!(out, "// 2024-01-02T03:04:05.000Z\npackage com.acme;\nint\n");
    }

    #[test]
    fn test_render_is_idempotent_with_fixed_time() {
        let exporter = fixed();
        let template = "${date} ${definition.name} ${definition.stereotype}";
        let first = exporter.render(&account(), template).unwrap();
        let second = exporter.render(&account(), template).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_block_markers_are_removed() {
        let template = "${@iterate definition.attributes}\n  field\n${@endBlock}";
        let out = fixed().render(&account(), template).unwrap();
        assert_eq!(out, "\n  field\n\n");
    }

    #[test]
    fn test_unknown_modifier_left_untouched() {
        let out = fixed().render(&account(), "${@repeat definition.name}").unwrap();
        assert_eq!(out, "${@repeat definition.name}\n");
    }

    #[test]
    fn test_crlf_template() {
        let out = fixed().render(&account(), "a ${definition.name}\r\nb").unwrap();
        assert_eq!(out, "a Account\nb\n");
    }

    #[test]
    fn test_export_requires_definition_and_template() {
        let step = ExportStep::default();
        assert!(matches!(
            fixed().export(&step),
            Err(ExportError::MissingField { field: "definition", .. })
        ));

        let step = ExportStep {
            definition: Some(account()),
            ..Default::default()
        };
        assert!(matches!(
            fixed().export(&step),
            Err(ExportError::MissingField { field: "template", .. })
        ));

        let step = ExportStep::for_definition(account(), "${definition.name}");
        assert_eq!(fixed().export(&step).unwrap(), "Account\n");
    }
}
