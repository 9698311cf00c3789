//! `umlt config` command - Configuration management
//!
//! Settings live at the top level of `config.yaml`; values that job files
//! reference as `${key}` live under `parameters`.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::resolve_project;
use crate::cli::GlobalOpts;
use crate::core::{Config, ParameterSource};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value (settings or dotted parameter keys)
    pub key: Option<String>,

    /// Show only project-level config
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., output_dir, parameters.project.package)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only project config path
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("author", "Author shown in `umlt config show`"),
    ("output_dir", "Root directory for generated code"),
    ("model_dir", "Directory for imported JSON models"),
    ("template_dir", "Directory searched before the built-in templates"),
    ("default_exporter", "Exporter for `umlt generate` (placeholder, tera)"),
    ("parameters.<key>", "Value for ${key} references in job files"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Unset(args) => run_unset(args, global),
        ConfigCommands::Path(args) => run_path(args, global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = resolve_project(global)?;
    let config = Config::load_for(&project);

    if let Some(key) = &args.key {
        let key = key.strip_prefix("parameters.").unwrap_or(key);
        return match config.lookup(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    if args.project_only {
        print_file("Project config:", &project.config_path())?;
    } else if args.global_only {
        print_file("Global config:", &global_config_path()?)?;
    } else {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();

        print_config_value("author", config.author.as_deref());
        print_config_value("output_dir", config.output_dir.as_deref());
        print_config_value("model_dir", config.model_dir.as_deref());
        print_config_value("template_dir", config.template_dir.as_deref());
        print_config_value("default_exporter", config.default_exporter.as_deref());

        if !config.parameters.is_empty() {
            println!();
            println!("{}", style("parameters:").cyan());
            let yaml = serde_yml::to_string(&config.parameters).into_diagnostic()?;
            for line in yaml.lines() {
                println!("  {}", style(line).yellow());
            }
        }

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (UMLT_AUTHOR, UMLT_OUTPUT_DIR)");
        println!("  2. Project config (.umlt/config.yaml)");
        println!("  3. Global config (~/.config/umlt/config.yaml)");
    }

    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    check_key(&args.key)?;
    let config_path = config_path_for(args.global, global)?;

    let mut config_map = read_mapping(&config_path)?;
    set_nested_value(&mut config_map, &args.key, &args.value)?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );

    Ok(())
}

fn run_unset(args: UnsetArgs, global: &GlobalOpts) -> Result<()> {
    let config_path = config_path_for(args.global, global)?;

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    if !unset_nested_value(&mut config_map, &args.key) {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );

    Ok(())
}

fn run_path(args: PathArgs, global: &GlobalOpts) -> Result<()> {
    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    let project_path = resolve_project(global)?.config_path();

    if args.project_only {
        println!("{}", project_path.display());
    } else if args.global_only {
        println!("{}", global_config_path()?.display());
    } else {
        println!("{}", style("Configuration file paths:").bold());
        println!();
        print_path("Global: ", &global_config_path()?);
        println!();
        print_path("Project:", &project_path);
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'umlt config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn config_path_for(use_global: bool, global: &GlobalOpts) -> Result<PathBuf> {
    if use_global {
        global_config_path()
    } else {
        Ok(resolve_project(global)?.config_path())
    }
}

fn check_key(key: &str) -> Result<()> {
    let known = VALID_KEYS.iter().any(|(k, _)| *k == key)
        || key
            .strip_prefix("parameters.")
            .is_some_and(|rest| !rest.is_empty());
    if known {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "run `umlt config keys` to list valid keys",
            "Unknown configuration key '{}'",
            key
        ))
    }
}

/// Existing config as a mapping; missing or empty files start empty
fn read_mapping(path: &std::path::Path) -> Result<serde_yml::Value> {
    if !path.exists() {
        return Ok(serde_yml::Value::Mapping(Default::default()));
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    let parsed: serde_yml::Value =
        serde_yml::from_str(&content).unwrap_or(serde_yml::Value::Mapping(Default::default()));
    if parsed.is_mapping() {
        Ok(parsed)
    } else {
        Ok(serde_yml::Value::Mapping(Default::default()))
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_path(label: &str, path: &std::path::Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("          {}", style("(exists)").green());
    } else {
        println!("          {}", style("(not created)").dim());
    }
}

fn print_file(title: &str, path: &std::path::Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }

    Ok(())
}

fn set_nested_value(root: &mut serde_yml::Value, key: &str, value: &str) -> Result<()> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let last = parts
        .pop()
        .ok_or_else(|| miette::miette!("Empty configuration key"))?;

    let mut current = root;
    for part in parts {
        let serde_yml::Value::Mapping(map) = current else {
            return Err(miette::miette!("'{}' is not a mapping in config", part));
        };
        current = map
            .entry(serde_yml::Value::String(part.to_string()))
            .or_insert_with(|| serde_yml::Value::Mapping(Default::default()));
    }

    match current {
        serde_yml::Value::Mapping(map) => {
            map.insert(
                serde_yml::Value::String(last.to_string()),
                serde_yml::Value::String(value.to_string()),
            );
            Ok(())
        }
        _ => Err(miette::miette!("Cannot set '{}': parent is not a mapping", key)),
    }
}

fn unset_nested_value(root: &mut serde_yml::Value, key: &str) -> bool {
    let mut parts: Vec<&str> = key.split('.').collect();
    let Some(last) = parts.pop() else {
        return false;
    };

    let mut current = root;
    for part in parts {
        match current
            .as_mapping_mut()
            .and_then(|map| map.get_mut(serde_yml::Value::String(part.to_string())))
        {
            Some(next) => current = next,
            None => return false,
        }
    }

    current
        .as_mapping_mut()
        .is_some_and(|map| map.remove(serde_yml::Value::String(last.to_string())).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> serde_yml::Value {
        serde_yml::Value::Mapping(Default::default())
    }

    #[test]
    fn test_set_nested_creates_mappings() {
        let mut root = empty();
        set_nested_value(&mut root, "parameters.project.package", "com.acme").unwrap();
        set_nested_value(&mut root, "output_dir", "build").unwrap();

        let config: Config = serde_yml::from_value(root).unwrap();
        assert_eq!(config.lookup("project.package").as_deref(), Some("com.acme"));
        assert_eq!(config.output_dir(), PathBuf::from("build"));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut root = empty();
        set_nested_value(&mut root, "parameters", "flat").unwrap();
        assert!(set_nested_value(&mut root, "parameters.key", "v").is_err());
    }

    #[test]
    fn test_unset_nested() {
        let mut root = empty();
        set_nested_value(&mut root, "parameters.a.b", "1").unwrap();
        assert!(unset_nested_value(&mut root, "parameters.a.b"));
        assert!(!unset_nested_value(&mut root, "parameters.a.b"));
        assert!(!unset_nested_value(&mut root, "parameters.missing.b"));
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("output_dir").is_ok());
        assert!(check_key("parameters.project.package").is_ok());
        assert!(check_key("parameters.").is_err());
        assert!(check_key("editor").is_err());
    }
}
