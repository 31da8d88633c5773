//! Workflow engine — YAML-defined multi-agent document workflows.
//!
//! A workflow is an ordered list of steps. Each step is run by an agent role,
//! may create one artifact and may require artifacts created earlier.
//!
//! # Architecture
//!
//! ```text
//! workflow.yaml ──► WorkflowDefinition ──► ArtifactGraph ──► ValidationReport
//!                                              │
//!                                       WorkflowSimulator ──► SimulationReport
//!                                                                   │
//!                                                        expected terminal artifacts
//! ```

pub mod artifacts;
pub mod graph;
pub mod schema;
pub mod simulator;

pub use artifacts::{ArtifactSet, ALL_DOCUMENTS, ALL_VALIDATIONS};
pub use graph::{validate_steps, ArtifactGraph, StepCheck, StepWalk, ValidationReport};
pub use schema::{Requirement, WorkflowDefinition, WorkflowStep};
pub use simulator::{SimulationReport, TraceEntry, WorkflowSimulator};
