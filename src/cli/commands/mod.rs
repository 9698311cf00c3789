//! Command implementations

pub mod completions;
pub mod config;
pub mod generate;
pub mod import;
pub mod init;
pub mod job;
pub mod show;
pub mod templates;
pub mod validate;
