//! Configuration management with layered hierarchy
//!
//! The same configuration doubles as the key/value store that job
//! documents draw their `${key}` parameters from.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::core::Project;

/// Look up a configuration value by (possibly dotted) key
pub trait ParameterSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl ParameterSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl ParameterSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: ParameterSource + ?Sized> ParameterSource for &T {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

/// Two sources consulted in order
pub struct Layered<A, B>(pub A, pub B);

impl<A: ParameterSource, B: ParameterSource> ParameterSource for Layered<A, B> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.0.lookup(key).or_else(|| self.1.lookup(key))
    }
}

/// UMLT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Author name, shown by `umlt config show`
    pub author: Option<String>,

    /// Root directory for generated code
    pub output_dir: Option<String>,

    /// Directory for imported model artifacts
    pub model_dir: Option<String>,

    /// Directory searched for templates before the built-in ones
    pub template_dir: Option<String>,

    /// Exporter used by `umlt generate` when none is given
    pub default_exporter: Option<String>,

    /// Free-form values available to job documents
    pub parameters: serde_yml::Mapping,
}

impl Config {
    /// Load configuration for a project, merging in priority order:
    /// defaults, global user config, project config, environment
    pub fn load_for(project: &Project) -> Self {
        let mut config = Config::default();
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }
        if let Some(project_config) = Self::read_file(&project.config_path()) {
            config.merge(project_config);
        }
        config.apply_env();
        config
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        // An empty file deserializes as null
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(contents)
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match Self::from_yaml(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!(path:? = path, error:% = e; "Ignoring unreadable config file");
                None
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(author) = std::env::var("UMLT_AUTHOR") {
            self.author = Some(author);
        }
        if let Ok(output_dir) = std::env::var("UMLT_OUTPUT_DIR") {
            self.output_dir = Some(output_dir);
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "umlt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.model_dir.is_some() {
            self.model_dir = other.model_dir;
        }
        if other.template_dir.is_some() {
            self.template_dir = other.template_dir;
        }
        if other.default_exporter.is_some() {
            self.default_exporter = other.default_exporter;
        }
        for (key, value) in other.parameters {
            self.parameters.insert(key, value);
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or("generated"))
    }

    pub fn model_dir(&self) -> PathBuf {
        PathBuf::from(self.model_dir.as_deref().unwrap_or("generated/uml"))
    }

    pub fn template_dir(&self) -> PathBuf {
        PathBuf::from(self.template_dir.as_deref().unwrap_or(".umlt/templates"))
    }

    pub fn default_exporter(&self) -> String {
        self.default_exporter
            .clone()
            .unwrap_or_else(|| crate::entities::job::DEFAULT_EXPORTER.to_string())
    }

    /// Get the author name, falling back to the username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Look up a top-level setting by key
    pub fn setting(&self, key: &str) -> Option<String> {
        match key {
            "author" => self.author.clone(),
            "output_dir" => self.output_dir.clone(),
            "model_dir" => self.model_dir.clone(),
            "template_dir" => self.template_dir.clone(),
            "default_exporter" => self.default_exporter.clone(),
            _ => None,
        }
    }
}

impl Config {
    /// Walk the `parameters` mapping along a dotted key
    pub fn parameter(&self, key: &str) -> Option<String> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.parameters.get(&yaml_key(first))?;
        for part in parts {
            current = current.as_mapping()?.get(&yaml_key(part))?;
        }
        yaml_scalar(current)
    }
}

impl ParameterSource for Config {
    /// Dotted keys walk the `parameters` mapping; plain settings are a fallback
    fn lookup(&self, key: &str) -> Option<String> {
        self.parameter(key).or_else(|| self.setting(key))
    }
}

fn yaml_key(part: &str) -> serde_yml::Value {
    serde_yml::Value::String(part.to_string())
}

fn yaml_scalar(value: &serde_yml::Value) -> Option<String> {
    match value {
        serde_yml::Value::String(s) => Some(s.clone()),
        serde_yml::Value::Bool(b) => Some(b.to_string()),
        serde_yml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_parameter_lookup() {
        let config = Config::from_yaml(
            "parameters:\n  project:\n    package: com.acme\n    version: 3\n  root: /tmp/out\n",
        )
        .unwrap();
        assert_eq!(config.lookup("project.package").as_deref(), Some("com.acme"));
        assert_eq!(config.lookup("project.version").as_deref(), Some("3"));
        assert_eq!(config.lookup("root").as_deref(), Some("/tmp/out"));
        assert!(config.lookup("project.missing").is_none());
        assert!(config.lookup("project").is_none());
    }

    #[test]
    fn test_settings_fallback() {
        let config = Config::from_yaml("author: Ada\n").unwrap();
        assert!(config.parameter("author").is_none());
        assert_eq!(config.lookup("author").as_deref(), Some("Ada"));
    }

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base = Config::from_yaml("output_dir: out\nparameters:\n  a: 1\n").unwrap();
        let over = Config::from_yaml("output_dir: build\nparameters:\n  b: 2\n").unwrap();
        base.merge(over);
        assert_eq!(base.output_dir(), PathBuf::from("build"));
        assert_eq!(base.lookup("a").as_deref(), Some("1"));
        assert_eq!(base.lookup("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("generated"));
        assert_eq!(config.model_dir(), PathBuf::from("generated/uml"));
        assert_eq!(config.default_exporter(), "placeholder");
    }

    #[test]
    fn test_layered_sources() {
        let mut first = HashMap::new();
        first.insert("a".to_string(), "one".to_string());
        let mut second = BTreeMap::new();
        second.insert("a".to_string(), "two".to_string());
        second.insert("b".to_string(), "three".to_string());
        let layered = Layered(&first, &second);
        assert_eq!(layered.lookup("a").as_deref(), Some("one"));
        assert_eq!(layered.lookup("b").as_deref(), Some("three"));
        assert!(layered.lookup("c").is_none());
    }
}
