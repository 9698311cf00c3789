//! Job orchestration
//!
//! A job document lists import steps and export steps. [`JobRunner`] resolves
//! its `${key}` parameters, runs the steps in order, and reports one
//! [`StepOutcome`] per step.

pub mod params;
pub mod report;
pub mod runner;

pub use params::NOT_FOUND;
pub use report::{JobReport, StepOutcome, StepPhase, StepStatus};
pub use runner::{JobError, JobRunner, RunOptions, StepError};
