//! Core module - identity, configuration, project layout and storage

pub mod config;
pub mod identity;
pub mod project;
pub mod storage;
pub mod templates;

pub use config::{Config, Layered, ParameterSource};
pub use identity::{EntityId, IdParseError};
pub use project::{Project, ProjectError};
pub use storage::{FsStorage, MemoryStorage, Storage, StorageError};
pub use templates::{TemplateOrigin, TemplateStore, TemplateStoreError};
