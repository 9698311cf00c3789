//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, generate::GenerateArgs,
    import::ImportArgs, init::InitArgs, job::JobArgs, show::ShowArgs, templates::TemplatesArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "umlt")]
#[command(author, version, about = "UML Tools")]
#[command(
    long_about = "Import UML class diagrams into a neutral JSON model and generate source code from templates."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", env = "UMLT_LOG")]
    pub log_level: String,

    /// Project root (default: auto-detect by finding .umlt/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new UMLT project
    Init(InitArgs),

    /// Import a diagram into a JSON model
    Import(ImportArgs),

    /// Generate source code from a JSON model
    Generate(GenerateArgs),

    /// Run a job file (imports followed by exports)
    Job(JobArgs),

    /// Show the contents of a JSON model
    Show(ShowArgs),

    /// Validate job and model files against their schemas
    Validate(ValidateArgs),

    /// List available templates, or print one
    Templates(TemplatesArgs),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (tables for `show`)
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
    /// Markdown tables
    Md,
}
