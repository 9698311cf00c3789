//! UMLT: UML Tools
//!
//! Imports UML class diagrams (Gliffy documents) into a neutral JSON model
//! and generates source code from that model through templates, either
//! directly or driven by job files.

pub mod cli;
pub mod codegen;
pub mod core;
pub mod entities;
pub mod importer;
pub mod job;
pub mod json;
pub mod schema;
