//! `umlt generate` command - Render source files from a JSON model

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{absolute, display_path, project_and_config};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::TemplateStore;
use crate::entities::{ExportStep, Stereotype};
use crate::job::{JobRunner, RunOptions};

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Model file produced by `umlt import`
    pub model: PathBuf,

    /// Template name without extension (default depends on target and exporter)
    #[arg(long, short = 't')]
    pub template: Option<String>,

    /// Extension of the template and of the generated files
    #[arg(long, short = 'e', default_value = "java")]
    pub extension: String,

    /// Directory below the output root
    #[arg(long, short = 'p', default_value = "src/main/java")]
    pub path: String,

    /// Exporter (placeholder, tera; default from config)
    #[arg(long, short = 'x')]
    pub exporter: Option<String>,

    /// Which components to render
    #[arg(long, default_value = "class", value_parser = parse_target)]
    pub target: Stereotype,

    /// Output root (default: output_dir from config)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

fn parse_target(s: &str) -> std::result::Result<Stereotype, String> {
    match s.parse::<Stereotype>()? {
        target @ (Stereotype::Class | Stereotype::Interface | Stereotype::Package) => Ok(target),
        other => Err(format!("'{}' is not a renderable target (class, interface, package)", other)),
    }
}

/// Template used when none is named
fn default_template(target: Stereotype, exporter: &str) -> String {
    let kind = match target {
        Stereotype::Interface => "interface",
        _ => "class",
    };
    if exporter.eq_ignore_ascii_case("tera") {
        format!("{}.tera", kind)
    } else {
        format!("{}Template", kind)
    }
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config) = project_and_config(global)?;
    let storage = project.storage();
    let templates = TemplateStore::new(config.template_dir());

    let mut options = RunOptions::from_config(&config);
    if let Some(output_dir) = &args.output_dir {
        options.output_dir = absolute(output_dir)?;
    }

    let exporter = args.exporter.clone().unwrap_or_else(|| config.default_exporter());
    let model = absolute(&args.model)?;

    let mut step = ExportStep {
        name: "generate".to_string(),
        exporter: exporter.clone(),
        template_name: Some(
            args.template
                .clone()
                .unwrap_or_else(|| default_template(args.target, &exporter)),
        ),
        file_extension: args.extension.clone(),
        path: args.path.clone(),
        model: Some(model.to_string_lossy().into_owned()),
        target: args.target,
        ..Default::default()
    };

    let runner = JobRunner::new(&storage, &templates, options);
    let written = runner.run_export(&mut step, &[]).into_diagnostic()?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&written).into_diagnostic()?);
        }
        _ => {
            for location in &written {
                let location = storage.resolve(location);
                if global.quiet {
                    println!("{}", location.display());
                } else {
                    println!(
                        "{} {}",
                        style("✓").green(),
                        style(display_path(&location, project.root())).yellow()
                    );
                }
            }
            if !global.quiet {
                println!(
                    "{} {} file(s) generated with {}",
                    style("→").blue(),
                    written.len(),
                    style(step.template_file().unwrap_or_default()).cyan()
                );
            }
        }
    }

    Ok(())
}
