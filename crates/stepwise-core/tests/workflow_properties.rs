//! Property tests: any generated workflow is checked strictly left to right.
//!
//! Workflows are generated with unique `creates` values, requirements drawn
//! from a pool that includes artifacts created later and artifacts never
//! created, optional steps and sentinel requirements. The validator and the
//! simulator are compared against a straightforward in-order model.

use std::collections::BTreeSet;

use proptest::prelude::*;
use stepwise_core::{ArtifactGraph, ArtifactSet, WorkflowDefinition, WorkflowSimulator, WorkflowStep};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const MAX_STEPS: usize = 10;

#[derive(Debug, Clone)]
struct StepShape {
    creates: bool,
    requires: Vec<usize>,
    optional: bool,
    sentinel: bool,
}

fn artifact_name(index: usize) -> String {
    format!("a{}.md", index)
}

/// Requirements point anywhere in `0..MAX_STEPS + 2`, so some name later
/// steps and some name artifacts no step creates.
fn arb_step() -> impl Strategy<Value = StepShape> {
    (
        any::<bool>(),
        prop::collection::vec(0..MAX_STEPS + 2, 0..3),
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(creates, requires, optional, sentinel)| StepShape {
            creates,
            requires,
            optional,
            sentinel,
        })
}

fn arb_workflow() -> impl Strategy<Value = WorkflowDefinition> {
    prop::collection::vec(arb_step(), 1..=MAX_STEPS).prop_map(|shapes| {
        let steps = shapes
            .into_iter()
            .enumerate()
            .map(|(i, shape)| {
                let mut step = WorkflowStep::new(format!("agent-{}", i));
                if shape.creates {
                    step = step.creates(artifact_name(i));
                }
                for r in shape.requires {
                    step = step.requires(artifact_name(r));
                }
                if shape.sentinel {
                    step = step.requires("all_documents");
                }
                if shape.optional {
                    step = step.optional();
                }
                step
            })
            .collect();
        WorkflowDefinition::new("generated", steps)
    })
}

/// In-order reference: (first fatal (position, artifact), warning count,
/// artifacts accumulated before stopping).
fn model(steps: &[WorkflowStep]) -> (Option<(usize, String)>, usize, BTreeSet<String>) {
    let mut available = BTreeSet::new();
    let mut warnings = 0;

    for (i, step) in steps.iter().enumerate() {
        let missing: Vec<&str> = step
            .requires
            .iter()
            .filter_map(|r| r.artifact())
            .filter(|name| !available.contains(*name))
            .collect();

        if let Some(first) = missing.first() {
            if !step.optional {
                return (Some((i + 1, first.to_string())), warnings, available);
            }
            warnings += missing.len();
        }
        if let Some(ref created) = step.creates {
            available.insert(created.clone());
        }
    }

    (None, warnings, available)
}

fn as_names(set: &ArtifactSet) -> BTreeSet<String> {
    set.iter().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Validation agrees with the in-order model on outcome, position and accumulation.
    #[test]
    fn validation_matches_in_order_model(workflow in arb_workflow()) {
        let graph = ArtifactGraph::new(&workflow.steps).unwrap();
        let mut artifacts = ArtifactSet::new();
        let (failure, warnings, available) = model(&workflow.steps);

        match graph.validate(&mut artifacts) {
            Ok(report) => {
                prop_assert!(failure.is_none());
                prop_assert_eq!(report.warnings.len(), warnings);
                prop_assert_eq!(report.steps_checked, workflow.steps.len());
            }
            Err(err) => {
                let (position, artifact) = failure.unwrap();
                prop_assert_eq!(err.position, position);
                prop_assert_eq!(err.artifact, artifact);
                prop_assert!(!err.optional);
            }
        }
        prop_assert_eq!(as_names(&artifacts), available);
    }

    /// A successful run ends with exactly the union of every step's `creates`.
    #[test]
    fn successful_run_collects_every_creates(workflow in arb_workflow()) {
        let graph = ArtifactGraph::new(&workflow.steps).unwrap();
        let mut artifacts = ArtifactSet::new();

        if graph.validate(&mut artifacts).is_ok() {
            let union: BTreeSet<String> = workflow
                .steps
                .iter()
                .filter_map(|s| s.creates.clone())
                .collect();
            prop_assert_eq!(as_names(&artifacts), union);
        }
    }

    /// Every requirement a non-optional step passed on was created strictly earlier.
    #[test]
    fn satisfied_requirements_come_from_earlier_steps(workflow in arb_workflow()) {
        let graph = ArtifactGraph::new(&workflow.steps).unwrap();
        let mut seen = Vec::new();

        graph.walk(&mut ArtifactSet::new(), |step, check| {
            if check.satisfied() {
                for name in step.requires.iter().filter_map(|r| r.artifact()) {
                    seen.push((check.position, graph.producer_of(name)));
                }
            }
        });

        for (position, producer) in seen {
            prop_assert!(producer.is_some_and(|p| p < position));
        }
    }

    /// The simulator's trace and verdict agree with validation.
    #[test]
    fn simulation_agrees_with_validation(workflow in arb_workflow()) {
        let report = WorkflowSimulator::new(&workflow).run().unwrap();
        let (failure, warnings, available) = model(&workflow.steps);

        let expected_len = failure
            .as_ref()
            .map(|(position, _)| *position)
            .unwrap_or(workflow.steps.len());
        prop_assert_eq!(report.trace.len(), expected_len);
        prop_assert_eq!(report.warnings.len(), warnings);
        prop_assert_eq!(
            report.failure.map(|e| (e.position, e.artifact)),
            failure
        );
        prop_assert_eq!(as_names(&report.artifacts), available);
    }
}
