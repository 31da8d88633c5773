//! Complexity assessment — size a problem from five scored dimensions.
//!
//! Each dimension is scored 1..=4. The total (5..=20) picks a tier, and the
//! tier fixes how many steps the thinking plan gets.
//!
//! | total  | tier    | steps |
//! |--------|---------|-------|
//! | ≤ 8    | Simple  | 3     |
//! | 9–12   | Medium  | 5     |
//! | 13–16  | Complex | 7     |
//! | ≥ 17   | Wicked  | 10    |

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, InvalidScoreError};

pub const MIN_DIMENSION: i64 = 1;
pub const MAX_DIMENSION: i64 = 4;

/// Scores for the five complexity dimensions.
///
/// Values are kept as supplied; [`ComplexityScore::validate`] rejects anything
/// outside 1..=4 instead of clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityScore {
    pub domain_breadth: i64,
    pub stakeholder_alignment: i64,
    pub solution_uncertainty: i64,
    pub impact_scope: i64,
    pub time_pressure: i64,
}

impl ComplexityScore {
    pub fn new(
        domain_breadth: i64,
        stakeholder_alignment: i64,
        solution_uncertainty: i64,
        impact_scope: i64,
        time_pressure: i64,
    ) -> Self {
        Self {
            domain_breadth,
            stakeholder_alignment,
            solution_uncertainty,
            impact_scope,
            time_pressure,
        }
    }

    /// Dimensions in declaration order, paired with their names.
    pub fn dimensions(&self) -> [(&'static str, i64); 5] {
        [
            ("domain_breadth", self.domain_breadth),
            ("stakeholder_alignment", self.stakeholder_alignment),
            ("solution_uncertainty", self.solution_uncertainty),
            ("impact_scope", self.impact_scope),
            ("time_pressure", self.time_pressure),
        ]
    }

    /// Reject the first dimension outside 1..=4.
    pub fn validate(&self) -> Result<(), InvalidScoreError> {
        for (dimension, value) in self.dimensions() {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(InvalidScoreError { dimension, value });
            }
        }
        Ok(())
    }

    /// Sum of the five dimensions.
    pub fn total(&self) -> i64 {
        self.dimensions().iter().map(|(_, v)| v).sum()
    }

    /// Parse a score document (YAML or JSON; JSON is valid YAML).
    pub fn from_yaml(yaml: &str) -> Result<Self, CoreError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| CoreError::Parse(format!("Failed to parse complexity score: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Io(format!(
                "Failed to read score file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }
}

/// Complexity tier of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexityTier {
    Simple,
    Medium,
    Complex,
    Wicked,
}

impl ComplexityTier {
    pub const ALL: [ComplexityTier; 4] = [
        ComplexityTier::Simple,
        ComplexityTier::Medium,
        ComplexityTier::Complex,
        ComplexityTier::Wicked,
    ];

    /// Tier for a score total. Boundaries: 8 | 9..=12 | 13..=16 | 17.
    pub fn from_total(total: i64) -> Self {
        match total {
            i64::MIN..=8 => ComplexityTier::Simple,
            9..=12 => ComplexityTier::Medium,
            13..=16 => ComplexityTier::Complex,
            _ => ComplexityTier::Wicked,
        }
    }

    /// Canonical number of thinking-plan steps for this tier.
    pub fn step_count(&self) -> usize {
        match self {
            ComplexityTier::Simple => 3,
            ComplexityTier::Medium => 5,
            ComplexityTier::Complex => 7,
            ComplexityTier::Wicked => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplexityTier::Simple => "Simple",
            ComplexityTier::Medium => "Medium",
            ComplexityTier::Complex => "Complex",
            ComplexityTier::Wicked => "Wicked",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub total: i64,
    pub tier: ComplexityTier,
    pub step_count: usize,
}

/// Classify a score into `(total, tier, step_count)`.
pub fn classify(score: &ComplexityScore) -> Result<Classification, InvalidScoreError> {
    score.validate()?;

    let total = score.total();
    let tier = ComplexityTier::from_total(total);
    debug!(total, tier = %tier, "Classified complexity score");

    Ok(Classification {
        total,
        tier,
        step_count: tier.step_count(),
    })
}
