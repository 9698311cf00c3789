//! `umlt validate` command - Validate job and model files against schemas

use console::style;
use miette::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::helpers::{display_path, project_and_config};
use crate::cli::GlobalOpts;
use crate::schema::registry::{SchemaKind, SchemaRegistry};
use crate::schema::validator::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to validate (default: jobs/ and the model directory)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Validate every file as this kind instead of detecting it (job, model)
    #[arg(long, short = 'k')]
    pub kind: Option<SchemaKind>,

    /// Continue validation after first error
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    files_skipped: usize,
    total_errors: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config) = project_and_config(global)?;
    let validator = Validator::new(&SchemaRegistry);

    let files = if args.paths.is_empty() {
        let roots = [project.root().join("jobs"), project.root().join(config.model_dir())];
        collect_json_files(&roots)
    } else {
        collect_json_files(&args.paths)
    };

    if !global.quiet {
        println!(
            "{} Validating {} file(s)...\n",
            style("→").blue(),
            files.len()
        );
    }

    let mut stats = ValidationStats::default();

    for path in &files {
        let shown = display_path(path, project.root());
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if !args.summary {
                    println!("{} {} - {}", style("✗").red(), shown, e);
                }
                stats.files_checked += 1;
                stats.files_failed += 1;
                stats.total_errors += 1;
                if !args.keep_going {
                    break;
                }
                continue;
            }
        };

        let kind = args.kind.or_else(|| SchemaKind::from_path(path));
        stats.files_checked += 1;

        match validator.validate(&content, &shown, kind) {
            Ok(Some(kind)) => {
                stats.files_passed += 1;
                if !args.summary {
                    println!("{} {} ({})", style("✓").green(), shown, style(kind).dim());
                }
            }
            Ok(None) => {
                stats.files_skipped += 1;
                if !args.summary {
                    println!(
                        "{} {} - unknown document kind (skipped)",
                        style("?").yellow(),
                        shown
                    );
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                stats.total_errors += e.violation_count();
                if !args.summary {
                    println!(
                        "{} {} - {} error(s)",
                        style("✗").red(),
                        shown,
                        e.violation_count()
                    );
                    let report = miette::Report::new(e);
                    println!("{:?}", report);
                }
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    if !global.quiet {
        println!();
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", style("Validation Summary").bold());
        println!("{}", style("─".repeat(60)).dim());
        println!("  Files checked:  {}", style(stats.files_checked).cyan());
        println!("  Files passed:   {}", style(stats.files_passed).green());
        println!("  Files failed:   {}", style(stats.files_failed).red());
        if stats.files_skipped > 0 {
            println!("  Files skipped:  {}", style(stats.files_skipped).yellow());
        }
        println!("  Total errors:   {}", style(stats.total_errors).red());
        println!();
    }

    if stats.files_failed > 0 {
        if stats.files_failed == 1 {
            Err(miette::miette!("Validation failed: 1 file has errors"))
        } else {
            Err(miette::miette!(
                "Validation failed: {} files have errors",
                stats.files_failed
            ))
        }
    } else {
        if !global.quiet {
            println!("{} All files passed validation!", style("✓").green().bold());
        }
        Ok(())
    }
}

/// Expand directories into the `.json` files below them, in sorted order
fn collect_json_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if is_json(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_collect_json_files() {
        let tmp = tempdir().unwrap();
        let jobs = tmp.path().join("jobs");
        std::fs::create_dir_all(jobs.join("nested")).unwrap();
        std::fs::write(jobs.join("b.json"), "{}").unwrap();
        std::fs::write(jobs.join("nested/a.json"), "{}").unwrap();
        std::fs::write(jobs.join("notes.txt"), "").unwrap();

        let files = collect_json_files(&[jobs.clone(), tmp.path().join("missing")]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_json(f)));
    }

    #[test]
    fn test_explicit_file_kept() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("model.txt");
        std::fs::write(&file, "{}").unwrap();
        assert_eq!(collect_json_files(&[file.clone()]), vec![file]);
    }
}
