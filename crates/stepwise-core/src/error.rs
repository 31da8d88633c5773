//! Error taxonomy for the Stepwise core.
//!
//! Each failure mode of the core has its own type so callers can match on
//! exactly what went wrong. `CoreError` wraps all of them for callers that
//! just want to propagate with `?`.

use serde::Serialize;

/// A non-optional step requires an artifact that no earlier step created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error(
    "Step {position} ({agent}) requires '{artifact}' which is not available yet{}",
    later_hint(.produced_later_at)
)]
pub struct DependencyError {
    /// 1-based position of the offending step
    pub position: usize,
    pub agent: String,
    pub artifact: String,
    pub optional: bool,
    /// Position of a later step that creates the artifact, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produced_later_at: Option<usize>,
}

/// A complexity dimension is outside the inclusive range [1, 4].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Invalid complexity score: {dimension} = {value} (expected 1..=4)")]
pub struct InvalidScoreError {
    pub dimension: &'static str,
    pub value: i64,
}

/// A requested step transition was refused by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StepOrderError {
    #[error("Cannot skip ahead: step {target} requested but highest step reached is {current}")]
    SkipAhead { target: usize, current: usize },

    #[error(
        "Prerequisite step incomplete: step {target} needs step(s) {} completed first",
        join_numbers(.missing)
    )]
    PrerequisiteIncomplete { target: usize, missing: Vec<usize> },

    #[error("Step {target} is outside the plan (1..={total})")]
    OutOfRange { target: usize, total: usize },
}

impl StepOrderError {
    /// Short machine-friendly reason string.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::SkipAhead { .. } => "skip_ahead",
            Self::PrerequisiteIncomplete { .. } => "prerequisite_incomplete",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }
}

/// Every step of the active plan is completed; only status queries remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Thinking plan complete: all {total} steps are done")]
pub struct PlanCompleteError {
    pub total: usize,
}

/// Expected terminal artifacts missing from the final artifact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Missing expected artifact(s): {}", .missing.join(", "))]
pub struct MissingArtifactError {
    pub missing: Vec<String>,
}

/// Two steps of one workflow definition declare the same `creates` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("Artifact '{artifact}' is created by both step {first_position} and step {second_position}")]
pub struct DuplicateArtifactError {
    pub artifact: String,
    pub first_position: usize,
    pub second_position: usize,
}

/// Errors surfaced by the step gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    StepOrder(#[from] StepOrderError),

    #[error(transparent)]
    PlanComplete(#[from] PlanCompleteError),
}

/// Umbrella error for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    InvalidScore(#[from] InvalidScoreError),

    #[error(transparent)]
    StepOrder(#[from] StepOrderError),

    #[error(transparent)]
    PlanComplete(#[from] PlanCompleteError),

    #[error(transparent)]
    MissingArtifact(#[from] MissingArtifactError),

    #[error(transparent)]
    DuplicateArtifact(#[from] DuplicateArtifactError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl CoreError {
    /// Gate refusals and the terminal-plan signal block one transition only.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CoreError::PlanComplete(_) | CoreError::StepOrder(_))
    }
}

impl From<GateError> for CoreError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::StepOrder(e) => CoreError::StepOrder(e),
            GateError::PlanComplete(e) => CoreError::PlanComplete(e),
        }
    }
}

fn later_hint(produced_later_at: &Option<usize>) -> String {
    match produced_later_at {
        Some(p) => format!(" (created later by step {})", p),
        None => String::new(),
    }
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
