//! `umlt templates` command - List or print templates

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::project_and_config;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::TemplateStore;

#[derive(clap::Args, Debug)]
pub struct TemplatesArgs {
    /// Template file to print (e.g. classTemplate.java)
    pub name: Option<String>,
}

pub fn run(args: TemplatesArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config) = project_and_config(global)?;
    let store = TemplateStore::new(config.template_dir());

    if let Some(name) = &args.name {
        let text = store
            .load(&project.storage(), name)
            .map_err(|e| miette::miette!(help = "run `umlt templates` to list them", "{}", e))?;
        print!("{}", text);
        return Ok(());
    }

    let listed = store.list(project.root());

    match global.format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = listed
                .iter()
                .map(|(name, origin)| {
                    serde_json::json!({ "name": name, "origin": origin.to_string() })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
        _ if global.quiet => {
            for (name, _) in &listed {
                println!("{}", name);
            }
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Template", "Origin"]);
            for (name, origin) in &listed {
                builder.push_record([name.clone(), origin.to_string()]);
            }
            println!("{}", builder.build().with(Style::markdown()));
            println!();
            println!(
                "{}",
                style(format!(
                    "Project templates in {} shadow built-ins of the same name.",
                    store.dir().display()
                ))
                .dim()
            );
        }
    }

    Ok(())
}
