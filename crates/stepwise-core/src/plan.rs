//! Thinking plans — the ordered steps a problem of a given tier works through.

use serde::Serialize;

use crate::complexity::{Classification, ComplexityTier};

const SIMPLE_STEPS: &[&str] = &[
    "problem-definition",
    "solution-synthesis",
    "decision-analysis",
];

const MEDIUM_STEPS: &[&str] = &[
    "problem-definition",
    "first-principles-analysis",
    "problem-decomposition",
    "solution-synthesis",
    "decision-analysis",
];

const COMPLEX_STEPS: &[&str] = &[
    "problem-definition",
    "stakeholder-mapping",
    "first-principles-analysis",
    "root-cause-investigation",
    "problem-decomposition",
    "solution-synthesis",
    "decision-analysis",
];

const WICKED_STEPS: &[&str] = &[
    "problem-definition",
    "stakeholder-mapping",
    "first-principles-analysis",
    "root-cause-investigation",
    "systems-mapping",
    "problem-decomposition",
    "constraint-analysis",
    "solution-synthesis",
    "decision-analysis",
    "implementation-roadmap",
];

/// A single step of a thinking plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    /// 1-based step number
    pub number: usize,
    pub id: &'static str,
}

/// Ordered, immutable sequence of plan steps for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThinkingPlan {
    tier: ComplexityTier,
    steps: Vec<PlanStep>,
}

impl ThinkingPlan {
    pub fn for_tier(tier: ComplexityTier) -> Self {
        let ids = match tier {
            ComplexityTier::Simple => SIMPLE_STEPS,
            ComplexityTier::Medium => MEDIUM_STEPS,
            ComplexityTier::Complex => COMPLEX_STEPS,
            ComplexityTier::Wicked => WICKED_STEPS,
        };

        let steps = ids
            .iter()
            .enumerate()
            .map(|(i, id)| PlanStep { number: i + 1, id: *id })
            .collect();

        Self { tier, steps }
    }

    pub fn from_classification(classification: &Classification) -> Self {
        Self::for_tier(classification.tier)
    }

    pub fn tier(&self) -> ComplexityTier {
        self.tier
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step by 1-based number.
    pub fn step(&self, number: usize) -> Option<&PlanStep> {
        number.checked_sub(1).and_then(|i| self.steps.get(i))
    }
}
