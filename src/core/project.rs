//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::storage::FsStorage;

/// Name of the marker directory at the project root
pub const PROJECT_DIR: &str = ".umlt";

/// Represents a UMLT project
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (parent of .umlt/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use the discovered project, or treat `fallback` as an ad-hoc root
    pub fn discover_or(fallback: &Path) -> Self {
        Self::discover_from(fallback).unwrap_or_else(|_| Self {
            root: fallback.to_path_buf(),
        })
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .umlt/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    fn create_structure(root: &Path) -> Result<(), ProjectError> {
        let umlt_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(umlt_dir.join("templates"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::write(umlt_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        for dir in ["diagrams", "jobs", "generated/uml"] {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# UMLT Project Configuration

# Author name, shown by `umlt config show`
# author: ""

# Where generated code and imported models are written
# output_dir: generated
# model_dir: generated/uml

# Project templates shadow the built-in ones
# template_dir: .umlt/templates

# Exporter for `umlt generate` (placeholder, tera)
# default_exporter: placeholder

# Values for ${key} references in job files
parameters: {}
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .umlt configuration directory
    pub fn umlt_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Get the project config file path
    pub fn config_path(&self) -> PathBuf {
        self.umlt_dir().join("config.yaml")
    }

    /// Storage rooted at the project directory
    pub fn storage(&self) -> FsStorage {
        FsStorage::new(&self.root)
    }
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a UMLT project (searched from {searched_from}); run `umlt init` first")]
    NotFound { searched_from: PathBuf },

    #[error("UMLT project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
