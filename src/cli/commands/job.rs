//! `umlt job` command - Run a job file

use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::cli::helpers::{absolute, display_path, parse_key_value, project_and_config};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Layered, TemplateStore};
use crate::job::{JobReport, JobRunner, RunOptions, StepStatus};

#[derive(clap::Args, Debug)]
pub struct JobArgs {
    /// Job file (JSON with importSteps and exportSteps)
    pub file: PathBuf,

    /// Parameter for ${key} references, overriding config (repeatable)
    #[arg(long = "param", short = 'P', value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Resolve parameters and print the job without running it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: JobArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config) = project_and_config(global)?;
    let storage = project.storage();
    let templates = TemplateStore::new(config.template_dir());

    let path = absolute(&args.file)?;
    let text = std::fs::read_to_string(&path)
        .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
    let filename = display_path(&path, project.root());

    let overrides: BTreeMap<String, String> = args.params.into_iter().collect();
    let params = Layered(&overrides, &config);

    let runner = JobRunner::new(&storage, &templates, RunOptions::from_config(&config));
    let job = runner.parse(&text, &filename, &params)?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&job).into_diagnostic()?);
        return Ok(());
    }

    let report = runner.execute(job);

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report.outcomes).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report.outcomes).into_diagnostic()?);
        }
        _ => print_report(&report, project.root(), global.quiet),
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(miette::miette!(
            "{} of {} step(s) failed",
            report.failed(),
            report.outcomes.len()
        ))
    }
}

fn print_report(report: &JobReport, root: &std::path::Path, quiet: bool) {
    if !quiet {
        println!(
            "{} Job {}",
            style("→").blue(),
            style(&report.job.name).cyan()
        );
    }

    for outcome in &report.outcomes {
        let marker = match outcome.status {
            StepStatus::Succeeded => style("✓").green(),
            StepStatus::Failed => style("✗").red(),
        };
        println!(
            "{} {:<6} {} - {}",
            marker,
            outcome.phase.to_string(),
            style(&outcome.step).cyan(),
            outcome.message
        );
        if !quiet {
            for location in &outcome.written {
                println!("         {}", style(display_path(location, root)).dim());
            }
        }
    }

    if !quiet {
        println!();
        println!(
            "{} succeeded, {} failed",
            style(report.succeeded()).green(),
            if report.failed() > 0 {
                style(report.failed()).red()
            } else {
                style(report.failed()).dim()
            }
        );
    }
}
