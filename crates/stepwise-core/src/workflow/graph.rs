//! Artifact dependency graph over a workflow's steps.
//!
//! Validation walks the steps strictly left to right. A step may only rely on
//! artifacts created by steps before it; an artifact that some later step
//! creates is still missing at the point of the check.
//!
//! ```text
//!  step 1 ── creates ──► brief.md ─┐
//!  step 2 ── requires ◄────────────┘ ── creates ──► prd.md ─┐
//!  step 3 ── requires ◄─────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DependencyError, DuplicateArtifactError};
use crate::workflow::artifacts::ArtifactSet;
use crate::workflow::schema::{check_unique_artifacts, WorkflowStep};

/// Outcome of checking one step against the artifacts accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCheck {
    /// 1-based step position
    pub position: usize,
    /// Concrete requirements not yet produced, in declaration order
    pub missing: Vec<String>,
}

impl StepCheck {
    pub fn satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Successful validation verdict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Final artifact set after the last step
    pub artifacts: ArtifactSet,
    /// Unmet requirements on optional steps (non-fatal)
    pub warnings: Vec<DependencyError>,
    pub steps_checked: usize,
}

/// Outcome of one left-to-right walk over the steps.
#[derive(Debug, Clone, Default)]
pub struct StepWalk {
    /// Unmet requirements on optional steps
    pub warnings: Vec<DependencyError>,
    /// First unmet requirement of a non-optional step
    pub failure: Option<DependencyError>,
    /// Number of steps reached, including a failing one
    pub visited: usize,
}

/// Dependency graph built from an ordered list of workflow steps.
#[derive(Debug)]
pub struct ArtifactGraph<'a> {
    steps: &'a [WorkflowStep],
    /// artifact name -> 1-based position of the step that creates it
    producers: HashMap<&'a str, usize>,
}

impl<'a> ArtifactGraph<'a> {
    /// Index the steps. Fails if two steps create the same artifact.
    pub fn new(steps: &'a [WorkflowStep]) -> Result<Self, DuplicateArtifactError> {
        check_unique_artifacts(steps)?;

        let producers = steps
            .iter()
            .enumerate()
            .filter_map(|(i, step)| step.creates.as_deref().map(|a| (a, i + 1)))
            .collect();

        Ok(Self { steps, producers })
    }

    pub fn steps(&self) -> &'a [WorkflowStep] {
        self.steps
    }

    /// Position of the step that creates `artifact`, if any.
    pub fn producer_of(&self, artifact: &str) -> Option<usize> {
        self.producers.get(artifact).copied()
    }

    fn step_at(&self, position: usize) -> Option<&'a WorkflowStep> {
        self.steps.get(position.checked_sub(1)?)
    }

    /// Check a single step against `artifacts`.
    ///
    /// Sentinel requirements are always satisfied and never looked up.
    /// Returns `None` when `position` is outside `1..=len`.
    pub fn check_step(&self, position: usize, artifacts: &ArtifactSet) -> Option<StepCheck> {
        let step = self.step_at(position)?;
        Some(Self::check(position, step, artifacts))
    }

    /// Build the diagnostic for an unmet requirement of the step at `position`.
    pub fn dependency_error(&self, position: usize, artifact: &str) -> Option<DependencyError> {
        let step = self.step_at(position)?;
        Some(self.error_for(position, step, artifact))
    }

    fn check(position: usize, step: &WorkflowStep, artifacts: &ArtifactSet) -> StepCheck {
        let missing = step
            .requires
            .iter()
            .filter_map(|r| r.artifact())
            .filter(|name| !artifacts.contains(name))
            .map(str::to_string)
            .collect();

        StepCheck { position, missing }
    }

    fn error_for(&self, position: usize, step: &WorkflowStep, artifact: &str) -> DependencyError {
        DependencyError {
            position,
            agent: step.agent.clone(),
            artifact: artifact.to_string(),
            optional: step.optional,
            produced_later_at: self.producer_of(artifact).filter(|&p| p > position),
        }
    }

    /// Walk the steps in order, accumulating into `artifacts`.
    ///
    /// `visit` sees every step reached, including the one that fails. The walk
    /// stops at the first unmet requirement of a non-optional step; misses on
    /// optional steps become warnings and the step still creates its artifact.
    pub fn walk<F>(&self, artifacts: &mut ArtifactSet, mut visit: F) -> StepWalk
    where
        F: FnMut(&WorkflowStep, &StepCheck),
    {
        let mut walk = StepWalk::default();

        for (i, step) in self.steps.iter().enumerate() {
            let position = i + 1;
            let check = Self::check(position, step, artifacts);
            visit(step, &check);
            walk.visited = position;

            if let Some(first) = check.missing.first() {
                if !step.optional {
                    walk.failure = Some(self.error_for(position, step, first));
                    return walk;
                }
                for artifact in &check.missing {
                    warn!(position, artifact = %artifact, "Optional step requirement not met");
                    walk.warnings.push(self.error_for(position, step, artifact));
                }
            }

            if let Some(ref created) = step.creates {
                artifacts.insert(created.clone());
            }
        }

        walk
    }

    /// Validate every step in order, accumulating into `artifacts`.
    ///
    /// Stops at the first unmet requirement of a non-optional step. Misses on
    /// optional steps are collected as warnings and validation continues.
    pub fn validate(&self, artifacts: &mut ArtifactSet) -> Result<ValidationReport, DependencyError> {
        let walk = self.walk(artifacts, |step, check| {
            debug!(
                position = check.position,
                agent = %step.agent,
                missing = check.missing.len(),
                "Checked workflow step"
            );
        });

        if let Some(failure) = walk.failure {
            return Err(failure);
        }

        info!(
            steps = self.steps.len(),
            artifacts = artifacts.len(),
            warnings = walk.warnings.len(),
            "Workflow dependencies validated"
        );

        Ok(ValidationReport {
            artifacts: artifacts.clone(),
            warnings: walk.warnings,
            steps_checked: walk.visited,
        })
    }
}

/// Validate `steps` from an empty artifact set.
pub fn validate_steps(steps: &[WorkflowStep]) -> Result<ValidationReport, crate::error::CoreError> {
    let graph = ArtifactGraph::new(steps)?;
    let mut artifacts = ArtifactSet::new();
    Ok(graph.validate(&mut artifacts)?)
}
