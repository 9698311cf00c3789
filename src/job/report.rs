//! Per-step results of a job run

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::entities::UmlJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPhase {
    Import,
    Export,
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPhase::Import => write!(f, "import"),
            StepPhase::Export => write!(f, "export"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Succeeded,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Succeeded => write!(f, "succeeded"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}

/// What happened to one step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: String,
    pub phase: StepPhase,
    pub status: StepStatus,
    pub message: String,
    /// Storage locations written by the step
    pub written: Vec<PathBuf>,
}

impl StepOutcome {
    pub fn succeeded(
        step: impl Into<String>,
        phase: StepPhase,
        message: impl Into<String>,
        written: Vec<PathBuf>,
    ) -> Self {
        Self {
            step: step.into(),
            phase,
            status: StepStatus::Succeeded,
            message: message.into(),
            written,
        }
    }

    pub fn failed(step: impl Into<String>, phase: StepPhase, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            phase,
            status: StepStatus::Failed,
            message: message.into(),
            written: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Succeeded
    }
}

/// The executed job (steps carry their models and code) plus one outcome
/// per step, imports first
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: UmlJob,
    pub outcomes: Vec<StepOutcome>,
}

impl JobReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Every location written during the run, in order
    pub fn written(&self) -> Vec<&PathBuf> {
        self.outcomes.iter().flat_map(|o| o.written.iter()).collect()
    }
}
