//! `umlt import` command - Convert a diagram into a JSON model

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{absolute, display_path, project_and_config};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::storage::Storage;
use crate::entities::job::DEFAULT_IMPORTER;
use crate::importer;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Diagram document to import
    pub diagram: PathBuf,

    /// Model name (default: diagram file stem)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Where to write the model (default: <model_dir>/<name>.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Importer for the diagram dialect
    #[arg(long, default_value = DEFAULT_IMPORTER)]
    pub importer: String,

    /// Print the model instead of writing it
    #[arg(long)]
    pub stdout: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config) = project_and_config(global)?;

    let diagram = absolute(&args.diagram)?;
    let document = std::fs::read_to_string(&diagram)
        .map_err(|e| miette::miette!("Cannot read {}: {}", diagram.display(), e))?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => diagram
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| miette::miette!("Cannot derive a model name from {}", diagram.display()))?,
    };

    let importer = importer::for_name(&args.importer)?;
    let model = importer.import(&document, &name)?;
    let json = model.to_json_pretty().into_diagnostic()?;

    if args.stdout {
        println!("{}", json);
        return Ok(());
    }

    let destination = match &args.output {
        Some(output) => absolute(output)?,
        None => project
            .root()
            .join(config.model_dir())
            .join(format!("{}.json", name)),
    };
    project
        .storage()
        .write(&destination, &json)
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "model": name,
                "destination": destination,
                "classes": model.classes.len(),
                "interfaces": model.interfaces.len(),
                "packages": model.packages.len(),
                "defaultPackage": model.default_package.as_ref().map(|p| &p.name),
            });
            println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?);
        }
        _ if global.quiet => println!("{}", destination.display()),
        _ => {
            println!(
                "{} Imported {} → {}",
                style("✓").green(),
                style(&name).cyan(),
                style(display_path(&destination, project.root())).yellow()
            );
            println!(
                "   {} class(es), {} interface(s), {} package(s)",
                model.classes.len(),
                model.interfaces.len(),
                model.packages.len()
            );
            if let Some(package) = &model.default_package {
                println!("   default package: {}", style(&package.name).cyan());
            }
        }
    }

    Ok(())
}
