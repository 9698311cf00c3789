//! `umlt show` command - Display a JSON model

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{absolute, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{AttributeDefinition, MethodDefinition, ModelDefinition};

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Model file produced by `umlt import`
    pub model: PathBuf,

    /// Only list components, without their members
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let path = absolute(&args.model)?;
    let text = std::fs::read_to_string(&path)
        .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
    let model = ModelDefinition::from_json(&text)
        .map_err(|e| miette::miette!("{} is not a valid model: {}", path.display(), e))?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", model.to_json_pretty().into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&model).into_diagnostic()?);
        }
        OutputFormat::Auto | OutputFormat::Md => {
            print!("{}", render_markdown(&model, args.summary));
        }
    }

    Ok(())
}

/// Markdown overview of a model: one component table, then members
fn render_markdown(model: &ModelDefinition, summary: bool) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Model {}\n\n", model.name));

    if let Some(package) = &model.default_package {
        output.push_str(&format!("Default package: `{}`\n\n", package.name));
    }

    let mut components = Builder::default();
    components.push_record(["Stereotype", "Name", "Package", "Attributes", "Methods"]);
    for class in &model.classes {
        components.push_record([
            "class".to_string(),
            class.header.name.clone(),
            package_name(class.header.package.as_ref()),
            class.attributes.len().to_string(),
            class.methods.len().to_string(),
        ]);
    }
    for interface in &model.interfaces {
        components.push_record([
            "interface".to_string(),
            interface.header.name.clone(),
            package_name(interface.header.package.as_ref()),
            "-".to_string(),
            interface.methods.len().to_string(),
        ]);
    }
    for package in &model.packages {
        components.push_record([
            "package".to_string(),
            package.name.clone(),
            String::new(),
            "-".to_string(),
            "-".to_string(),
        ]);
    }
    output.push_str(&components.build().with(Style::markdown()).to_string());
    output.push('\n');

    if summary {
        return output;
    }

    for class in &model.classes {
        output.push_str(&format!("\n## class {}\n\n", class.header.name));
        output.push_str(&members_table(&class.attributes, &class.methods));
    }
    for interface in &model.interfaces {
        output.push_str(&format!("\n## interface {}\n\n", interface.header.name));
        output.push_str(&members_table(&[], &interface.methods));
    }

    output
}

fn members_table(attributes: &[AttributeDefinition], methods: &[MethodDefinition]) -> String {
    if attributes.is_empty() && methods.is_empty() {
        return "_no members_\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Kind", "Member", "Type"]);
    for attribute in attributes {
        builder.push_record([
            "attribute".to_string(),
            attribute.name.clone(),
            attribute.type_name.clone(),
        ]);
    }
    for method in methods {
        builder.push_record([
            "method".to_string(),
            truncate_str(&signature(method), 60),
            method.type_name.clone(),
        ]);
    }
    let mut table = builder.build().with(Style::markdown()).to_string();
    table.push('\n');
    table
}

fn signature(method: &MethodDefinition) -> String {
    let parameters: Vec<String> = method
        .parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, p.type_name))
        .collect();
    format!("{}({})", method.name, parameters.join(", "))
}

fn package_name(package: Option<&crate::entities::PackageDefinition>) -> String {
    package.map(|p| p.name.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClassDefinition, PackageDefinition};

    fn bank() -> ModelDefinition {
        let mut model = ModelDefinition::new("bank");
        let mut class = ClassDefinition::default();
        class.header.name = "Account".to_string();
        class.attributes.push(AttributeDefinition::new("balance", "double"));
        let mut deposit = MethodDefinition::new("deposit", "void");
        deposit.add_parameter("amount", "double");
        class.methods.push(deposit);
        model.add_class(class);
        model.add_package(PackageDefinition::new("com.acme"));
        model.promote_default_package();
        model
    }

    #[test]
    fn test_signature() {
        let mut method = MethodDefinition::new("compute", "int");
        method.add_parameter("x", "int");
        method.add_parameter("y", "int");
        assert_eq!(signature(&method), "compute(x: int, y: int)");
    }

    #[test]
    fn test_markdown_lists_components_and_members() {
        let text = render_markdown(&bank(), false);
        assert!(text.contains("# Model bank"));
        assert!(text.contains("Default package: `com.acme`"));
        assert!(text.contains("| class"));
        assert!(text.contains("## class Account"));
        assert!(text.contains("deposit(amount: double)"));
    }

    #[test]
    fn test_summary_skips_members() {
        let text = render_markdown(&bank(), true);
        assert!(text.contains("Account"));
        assert!(!text.contains("## class Account"));
    }
}
