//! Stepwise Core — decision logic for multi-agent document workflows.
//!
//! This crate contains the pieces of the workflow tooling that actually make
//! decisions. It has **no CLI or terminal dependency**, so it can back a
//! command-line tool, a CI check or a service equally well.
//!
//! - [`workflow`] — workflow definitions, the artifact dependency graph and
//!   the end-to-end simulator
//! - [`complexity`] — five-dimension complexity scoring and tiering
//! - [`plan`] — per-tier thinking plans
//! - [`gate`] — sequential step-execution guard
//!
//! All operations are synchronous and keep no state between calls other than
//! what the caller owns (an [`ArtifactSet`] during validation, a [`StepGate`]
//! across steps).

pub mod complexity;
pub mod error;
pub mod gate;
pub mod plan;
pub mod workflow;

// Convenience re-exports
pub use complexity::{classify, Classification, ComplexityScore, ComplexityTier};
pub use error::{
    CoreError, DependencyError, DuplicateArtifactError, GateError, InvalidScoreError,
    MissingArtifactError, PlanCompleteError, StepOrderError,
};
pub use gate::{GateDecision, GateStatus, StepGate};
pub use plan::{PlanStep, ThinkingPlan};
pub use workflow::{
    ArtifactGraph, ArtifactSet, SimulationReport, WorkflowDefinition, WorkflowSimulator,
    WorkflowStep,
};
