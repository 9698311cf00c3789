//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::Config;

/// The project named by `--project`, the discovered one, or the current
/// directory as an ad-hoc root
pub fn resolve_project(global: &GlobalOpts) -> Result<Project> {
    match &global.project {
        Some(root) => Project::discover_from(root).map_err(|e| miette::miette!("{}", e)),
        None => {
            let current = std::env::current_dir().into_diagnostic()?;
            Ok(Project::discover_or(&current))
        }
    }
}

/// Project plus its layered configuration
pub fn project_and_config(global: &GlobalOpts) -> Result<(Project, Config)> {
    let project = resolve_project(global)?;
    let config = Config::load_for(&project);
    log::debug!(root:? = project.root(); "Using project");
    Ok((project, config))
}

/// Make a command-line path absolute against the current directory
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir().into_diagnostic()?.join(path))
    }
}

/// Show `path` relative to `root` when it lies inside it
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Split a `key=value` argument
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
