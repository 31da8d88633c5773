//! Workflow Simulator — replays a workflow definition end to end.
//!
//! The simulator walks the same left-to-right accumulation as
//! [`ArtifactGraph::validate`], but records a trace entry for every step it
//! visits so the run can be audited afterwards. Terminal expectations are
//! checked after the fact and every absent artifact is reported at once.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CoreError, DependencyError, MissingArtifactError};
use crate::workflow::artifacts::ArtifactSet;
use crate::workflow::graph::ArtifactGraph;
use crate::workflow::schema::WorkflowDefinition;

/// One visited step of a simulated run.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub position: usize,
    pub agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creates: Option<String>,
    pub optional: bool,
    /// Whether every concrete requirement was available
    pub satisfied: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// Result of replaying a whole workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub workflow_name: String,
    pub trace: Vec<TraceEntry>,
    pub artifacts: ArtifactSet,
    pub warnings: Vec<DependencyError>,
    /// First fatal dependency failure; the trace ends at that step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<DependencyError>,
    /// Terminal artifacts declared by the definition
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_artifacts: Vec<String>,
}

impl SimulationReport {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    /// Verify that every `expected` artifact is in the final set.
    ///
    /// All absent artifacts are reported together, sorted and de-duplicated.
    pub fn check_terminal<S: AsRef<str>>(&self, expected: &[S]) -> Result<(), MissingArtifactError> {
        let mut missing: Vec<String> = expected
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|name| !self.artifacts.contains(name))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing.dedup();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingArtifactError { missing })
        }
    }

    /// Check the definition's own `expected_artifacts`.
    pub fn check_declared_terminal(&self) -> Result<(), MissingArtifactError> {
        self.check_terminal(self.expected_artifacts.as_slice())
    }
}

/// Replays a workflow definition and reports the final artifact set.
pub struct WorkflowSimulator<'a> {
    workflow: &'a WorkflowDefinition,
}

impl<'a> WorkflowSimulator<'a> {
    pub fn new(workflow: &'a WorkflowDefinition) -> Self {
        Self { workflow }
    }

    /// Replay every step from an empty artifact set.
    ///
    /// Only definition defects (duplicate `creates`) are returned as errors;
    /// dependency failures are part of the report.
    pub fn run(&self) -> Result<SimulationReport, CoreError> {
        let graph = ArtifactGraph::new(&self.workflow.steps)?;
        let mut artifacts = ArtifactSet::new();
        let mut trace = Vec::with_capacity(self.workflow.steps.len());

        let walk = graph.walk(&mut artifacts, |step, check| {
            trace.push(TraceEntry {
                position: check.position,
                agent: step.agent.clone(),
                task: step.task.clone(),
                creates: step.creates.clone(),
                optional: step.optional,
                satisfied: check.satisfied(),
                missing: check.missing.clone(),
            });
        });

        if let Some(ref err) = walk.failure {
            warn!(position = err.position, artifact = %err.artifact, "Simulation stopped at unmet dependency");
        }

        info!(
            workflow = %self.workflow.name,
            visited = trace.len(),
            artifacts = artifacts.len(),
            success = walk.failure.is_none(),
            "Workflow simulation finished"
        );

        Ok(SimulationReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            workflow_name: self.workflow.name.clone(),
            trace,
            artifacts,
            warnings: walk.warnings,
            failure: walk.failure,
            expected_artifacts: self.workflow.expected_artifacts.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::schema::WorkflowStep;

    fn greenfield() -> WorkflowDefinition {
        WorkflowDefinition::new(
            "Greenfield",
            vec![
                WorkflowStep::new("analyst")
                    .task("create-doc")
                    .creates("project-brief.md"),
                WorkflowStep::new("pm").creates("prd.md").requires("project-brief.md"),
                WorkflowStep::new("ux-expert")
                    .creates("front-end-spec.md")
                    .requires("prd.md")
                    .requires("user-research.md")
                    .optional(),
                WorkflowStep::new("architect")
                    .creates("architecture.md")
                    .requires("prd.md"),
                WorkflowStep::new("po").requires("all_documents"),
            ],
        )
    }

    #[test]
    fn test_trace_covers_every_step() {
        let wf = greenfield();
        let report = WorkflowSimulator::new(&wf).run().unwrap();

        assert!(report.success());
        assert_eq!(report.trace.len(), 5);
        assert_eq!(report.trace[0].task.as_deref(), Some("create-doc"));
        assert!(report.trace[1].satisfied);

        let ux = &report.trace[2];
        assert!(!ux.satisfied);
        assert!(ux.optional);
        assert_eq!(ux.missing, vec!["user-research.md"]);

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.artifacts.len(), 4);
    }

    #[test]
    fn test_trace_ends_at_first_fatal_step() {
        let wf = WorkflowDefinition::new(
            "Broken",
            vec![
                WorkflowStep::new("analyst").creates("project-brief.md"),
                WorkflowStep::new("architect")
                    .creates("architecture.md")
                    .requires("prd.md"),
                WorkflowStep::new("pm").creates("prd.md"),
            ],
        );
        let report = WorkflowSimulator::new(&wf).run().unwrap();

        assert!(!report.success());
        assert_eq!(report.trace.len(), 2);
        assert!(!report.trace[1].satisfied);
        let failure = report.failure.as_ref().unwrap();
        assert_eq!(failure.position, 2);
        assert_eq!(failure.produced_later_at, Some(3));
        assert!(!report.artifacts.contains("architecture.md"));
    }

    #[test]
    fn test_missing_terminal_artifacts_are_aggregated() {
        let wf = greenfield();
        let report = WorkflowSimulator::new(&wf).run().unwrap();

        let err = report
            .check_terminal(&["prd.md", "story.md", "architecture.md", "epic.md", "story.md"])
            .unwrap_err();
        assert_eq!(err.missing, vec!["epic.md", "story.md"]);

        assert!(report.check_terminal(&["prd.md", "architecture.md"]).is_ok());
    }

    #[test]
    fn test_declared_expectations_used() {
        let mut wf = greenfield();
        wf.expected_artifacts = vec!["architecture.md".to_string(), "qa-report.md".to_string()];
        let report = WorkflowSimulator::new(&wf).run().unwrap();

        let err = report.check_declared_terminal().unwrap_err();
        assert_eq!(err.missing, vec!["qa-report.md"]);
    }

    #[test]
    fn test_duplicate_creates_is_definition_error() {
        let wf = WorkflowDefinition::new(
            "dup",
            vec![
                WorkflowStep::new("pm").creates("prd.md"),
                WorkflowStep::new("po").creates("prd.md"),
            ],
        );
        let err = WorkflowSimulator::new(&wf).run().unwrap_err();
        assert!(matches!(err, CoreError::DuplicateArtifact(_)));
    }

    #[test]
    fn test_report_serializes_for_renderers() {
        let wf = greenfield();
        let report = WorkflowSimulator::new(&wf).run().unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["workflowName"], "Greenfield");
        assert_eq!(json["trace"].as_array().unwrap().len(), 5);
        assert!(json.get("failure").is_none());
        assert_eq!(json["warnings"][0]["artifact"], "user-research.md");
    }
}
