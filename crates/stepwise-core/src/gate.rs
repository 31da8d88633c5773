//! Step Gate — enforces in-order progression through a thinking plan.
//!
//! The gate tracks the highest step reached (`current_step`) and the set of
//! completed steps. A step may run only when:
//!
//! 1. it is at most one position past `current_step` (no skipping ahead), and
//! 2. every earlier step is marked completed.
//!
//! The two rules are checked independently so a refusal always says which one
//! failed. Once every step is completed the gate only answers status queries.
//!
//! The gate does no locking; one owner drives a plan at a time.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::error::{GateError, PlanCompleteError, StepOrderError};
use crate::plan::{PlanStep, ThinkingPlan};

/// Decision for a requested step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Rejected(StepOrderError),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }

    pub fn reason(&self) -> Option<&StepOrderError> {
        match self {
            GateDecision::Allowed => None,
            GateDecision::Rejected(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), StepOrderError> {
        match self {
            GateDecision::Allowed => Ok(()),
            GateDecision::Rejected(reason) => Err(reason),
        }
    }
}

/// Snapshot of the gate state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateStatus {
    pub total: usize,
    pub current_step: usize,
    pub completed: Vec<usize>,
    /// Lowest step not yet completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<usize>,
    pub complete: bool,
}

/// Sequential execution guard over one thinking plan.
#[derive(Debug, Clone)]
pub struct StepGate {
    plan: ThinkingPlan,
    current_step: usize,
    completed: BTreeSet<usize>,
}

impl StepGate {
    /// Fresh gate: `current_step = 1`, nothing completed.
    pub fn new(plan: ThinkingPlan) -> Self {
        Self {
            plan,
            current_step: 1,
            completed: BTreeSet::new(),
        }
    }

    /// Gate with an explicit state, e.g. restored by a caller.
    ///
    /// `current_step` may be ahead of the completed steps; the gate still
    /// refuses to run anything whose predecessors are incomplete. It is
    /// clamped into `1..=N`, and completed numbers outside the plan are
    /// dropped.
    pub fn with_state(
        plan: ThinkingPlan,
        current_step: usize,
        completed: impl IntoIterator<Item = usize>,
    ) -> Self {
        let total = plan.len();
        Self {
            plan,
            current_step: current_step.clamp(1, total.max(1)),
            completed: completed
                .into_iter()
                .filter(|n| (1..=total).contains(n))
                .collect(),
        }
    }

    pub fn plan(&self) -> &ThinkingPlan {
        &self.plan
    }

    pub fn total(&self) -> usize {
        self.plan.len()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn is_completed(&self, step: usize) -> bool {
        self.completed.contains(&step)
    }

    /// All steps 1..=N completed.
    pub fn is_complete(&self) -> bool {
        (1..=self.total()).all(|n| self.completed.contains(&n))
    }

    /// The target must name a step of the plan.
    pub fn check_range(&self, target: usize) -> Result<(), StepOrderError> {
        if target == 0 || target > self.total() {
            return Err(StepOrderError::OutOfRange {
                target,
                total: self.total(),
            });
        }
        Ok(())
    }

    /// Rule 1: no step more than one past the highest step reached.
    pub fn check_skip_ahead(&self, target: usize) -> Result<(), StepOrderError> {
        if target > self.current_step.saturating_add(1) {
            return Err(StepOrderError::SkipAhead {
                target,
                current: self.current_step,
            });
        }
        Ok(())
    }

    /// Rule 2: every step in `1..target` must be completed.
    pub fn check_prerequisites(&self, target: usize) -> Result<(), StepOrderError> {
        let missing: Vec<usize> = (1..target)
            .filter(|n| !self.completed.contains(n))
            .collect();
        if !missing.is_empty() {
            return Err(StepOrderError::PrerequisiteIncomplete { target, missing });
        }
        Ok(())
    }

    /// Whether `target` may run now.
    pub fn can_execute(&self, target: usize) -> GateDecision {
        let checks = self
            .check_range(target)
            .and_then(|_| self.check_skip_ahead(target))
            .and_then(|_| self.check_prerequisites(target));

        match checks {
            Ok(()) => GateDecision::Allowed,
            Err(reason) => {
                debug!(target, reason = reason.reason(), "Step gate rejected transition");
                GateDecision::Rejected(reason)
            }
        }
    }

    /// Request to run `target`. Returns the plan step on success.
    pub fn execute(&self, target: usize) -> Result<&PlanStep, GateError> {
        if self.is_complete() {
            return Err(PlanCompleteError { total: self.total() }.into());
        }
        self.can_execute(target).into_result()?;

        self.plan
            .step(target)
            .ok_or_else(|| {
                StepOrderError::OutOfRange {
                    target,
                    total: self.total(),
                }
                .into()
            })
    }

    /// Mark `target` completed after it ran successfully.
    ///
    /// Re-completing a finished step is allowed and never moves
    /// `current_step` backwards.
    pub fn complete(&mut self, target: usize) -> Result<GateStatus, GateError> {
        self.execute(target)?;

        self.completed.insert(target);
        self.current_step = self.current_step.max(target);
        debug!(target, current_step = self.current_step, "Step completed");

        Ok(self.status())
    }

    pub fn status(&self) -> GateStatus {
        GateStatus {
            total: self.total(),
            current_step: self.current_step,
            completed: self.completed.iter().copied().collect(),
            next_step: (1..=self.total()).find(|n| !self.completed.contains(n)),
            complete: self.is_complete(),
        }
    }

    /// Start over with a new plan.
    pub fn reset(&mut self, plan: ThinkingPlan) {
        *self = Self::new(plan);
    }
}
