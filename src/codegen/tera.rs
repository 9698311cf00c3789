//! Tera exporter: loops and conditionals over the same render context

use chrono::{DateTime, Utc};
use std::error::Error as _;

use crate::codegen::context::RenderContext;
use crate::codegen::{ExportError, Exporter};
use crate::entities::{ComponentDefinition, ExportStep};

#[derive(Debug, Default, Clone)]
pub struct TeraExporter {
    at: Option<DateTime<Utc>>,
}

impl TeraExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            at: Some(timestamp),
        }
    }

    pub fn render(
        &self,
        definition: &ComponentDefinition,
        template: &str,
    ) -> Result<String, ExportError> {
        let render_error = |e: ::tera::Error| ExportError::Render {
            name: definition.name().to_string(),
            message: describe(&e),
        };

        let ctx = RenderContext::new(definition, self.at.unwrap_or_else(Utc::now));
        let context = ::tera::Context::from_serialize(&ctx).map_err(render_error)?;
        ::tera::Tera::one_off(template, &context, false).map_err(render_error)
    }
}

impl Exporter for TeraExporter {
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

/// Tera keeps the useful part of a failure in the source chain
fn describe(err: &::tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TemplateStore;
    use crate::entities::{
        AttributeDefinition, ClassDefinition, ComponentHeader, MethodDefinition, PackageDefinition,
    };

    fn account() -> ComponentDefinition {
        let mut compute = MethodDefinition::new("compute", "double");
        compute.add_parameter("x", "int");
        compute.add_parameter("y", "int");
        ClassDefinition {
            header: ComponentHeader {
                name: "Account".to_string(),
                package: Some(PackageDefinition::new("com.acme")),
                ..ComponentHeader::with_id("4")
            },
            attributes: vec![
                AttributeDefinition::new("age", "int"),
                AttributeDefinition::new("name", "String"),
            ],
            methods: vec![compute],
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_loops_over_attributes() {
        let template = "{% for a in definition.attributes %}{{ a.name }}:{{ a.type }};{% endfor %}";
        let out = TeraExporter::new().render(&account(), template).unwrap();
        assert_eq!(out, "age:int;name:String;");
    }

    #[test]
    fn test_builtin_class_template() {
        let template = TemplateStore::builtin("class.tera.java").unwrap();
        let out = TeraExporter::new().render(&account(), &template).unwrap();
        assert!(out.contains("package com.acme;"));
        assert!(out.contains("class Account"));
        assert!(out.contains("compute(int x, int y)"));
    }

    #[test]
    fn test_syntax_error_is_render_error() {
        let err = TeraExporter::new()
            .render(&account(), "{% for %}")
            .unwrap_err();
        assert!(matches!(err, ExportError::Render { .. }));
    }
}
