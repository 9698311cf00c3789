//! Template lookup - project templates first, built-in templates second

use rust_embed::Embed;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::storage::{Storage, StorageError};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Error)]
pub enum TemplateStoreError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template {0} is not valid UTF-8")]
    Encoding(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Where a template was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOrigin {
    Project,
    BuiltIn,
}

impl std::fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateOrigin::Project => write!(f, "project"),
            TemplateOrigin::BuiltIn => write!(f, "built-in"),
        }
    }
}

/// Resolves template files by `<name>.<extension>`
#[derive(Debug, Clone)]
pub struct TemplateStore {
    /// Project template directory, relative to the storage root
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a template file, preferring the project's copy
    pub fn load<S: Storage + ?Sized>(
        &self,
        storage: &S,
        file: &str,
    ) -> Result<String, TemplateStoreError> {
        let location = self.dir.join(file);
        if storage.exists(&location) {
            log::debug!(template = file, location:? = location; "Using project template");
            return Ok(storage.read(&location)?);
        }
        Self::builtin(file)
    }

    /// Load a template embedded in the binary
    pub fn builtin(file: &str) -> Result<String, TemplateStoreError> {
        let content =
            EmbeddedTemplates::get(file).ok_or_else(|| TemplateStoreError::NotFound(file.to_string()))?;
        log::debug!(template = file; "Using built-in template");
        String::from_utf8(content.data.into_owned())
            .map_err(|_| TemplateStoreError::Encoding(file.to_string()))
    }

    /// All available template files; project templates shadow built-ins
    pub fn list(&self, root: &Path) -> Vec<(String, TemplateOrigin)> {
        let mut found: BTreeMap<String, TemplateOrigin> = EmbeddedTemplates::iter()
            .map(|name| (name.to_string(), TemplateOrigin::BuiltIn))
            .collect();

        let dir = root.join(&self.dir);
        for entry in walkdir::WalkDir::new(&dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if let Ok(relative) = entry.path().strip_prefix(&dir) {
                found.insert(
                    relative.to_string_lossy().replace('\\', "/"),
                    TemplateOrigin::Project,
                );
            }
        }

        found.into_iter().collect()
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(".umlt/templates")
    }
}
