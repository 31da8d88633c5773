//! `stepwise gate` — ask the step gate whether a plan step may run.
//!
//! The gate state is passed on the command line each time; nothing is
//! persisted between invocations.

use console::style;
use stepwise_core::complexity::ComplexityTier;
use stepwise_core::error::GateError;
use stepwise_core::gate::{GateStatus, StepGate};
use stepwise_core::plan::ThinkingPlan;

use super::{json_envelope, OutputFormat};

/// Gate state and request as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct GateArgs {
    /// Canonical plan length (3, 5, 7 or 10)
    pub steps: Option<usize>,
    /// Tier label, alternative to `steps`
    pub tier: Option<String>,
    pub current: usize,
    pub completed: Vec<usize>,
    pub target: usize,
    /// Mark the target completed instead of only checking it
    pub complete: bool,
}

/// Resolve the plan from `--tier` or `--steps`.
pub fn plan_from_args(args: &GateArgs) -> Result<ThinkingPlan, String> {
    let tier = match (&args.tier, args.steps) {
        (Some(label), _) => ComplexityTier::from_label(label)
            .ok_or_else(|| format!("Unknown tier '{}' (Simple, Medium, Complex, Wicked)", label))?,
        (None, Some(n)) => ComplexityTier::ALL
            .into_iter()
            .find(|t| t.step_count() == n)
            .ok_or_else(|| format!("No plan has {} steps (expected 3, 5, 7 or 10)", n))?,
        (None, None) => return Err("Pass --steps or --tier".to_string()),
    };
    Ok(ThinkingPlan::for_tier(tier))
}

/// Evaluate (and optionally apply) one gate transition.
pub fn run(args: &GateArgs, format: OutputFormat) -> Result<(), String> {
    let plan = plan_from_args(args)?;
    let mut gate = StepGate::with_state(plan, args.current, args.completed.iter().copied());

    let outcome = if args.complete {
        gate.complete(args.target).map(|_| ())
    } else {
        gate.execute(args.target).map(|_| ())
    };

    println!("{}", render(&gate, args.target, &outcome, format));

    match outcome {
        Ok(()) => Ok(()),
        // Terminal state is informational
        Err(GateError::PlanComplete(_)) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

pub fn render(
    gate: &StepGate,
    target: usize,
    outcome: &Result<(), GateError>,
    format: OutputFormat,
) -> String {
    let status = gate.status();
    match format {
        OutputFormat::Json => {
            let (decision, reason) = match outcome {
                Ok(()) => ("allowed", None),
                Err(GateError::PlanComplete(e)) => ("plan_complete", Some(e.to_string())),
                Err(GateError::StepOrder(e)) => ("rejected", Some(e.to_string())),
            };
            let rejection = match outcome {
                Err(GateError::StepOrder(e)) => serde_json::to_value(e).ok(),
                _ => None,
            };
            json_envelope(
                "gate",
                &serde_json::json!({
                    "target": target,
                    "stepId": gate.plan().step(target).map(|s| s.id),
                    "decision": decision,
                    "reason": reason,
                    "rejection": rejection,
                    "status": status,
                }),
            )
        }
        OutputFormat::Text => {
            let mut out = String::new();
            match outcome {
                Ok(()) => {
                    let id = gate.plan().step(target).map(|s| s.id).unwrap_or("-");
                    out.push_str(&format!(
                        "{} Step {} ({}) allowed\n",
                        style("✅").green(),
                        target,
                        id
                    ));
                }
                Err(GateError::PlanComplete(e)) => {
                    out.push_str(&format!("{} {}\n", style("🏁").bold(), e));
                }
                Err(GateError::StepOrder(e)) => {
                    out.push_str(&format!("{} {}\n", style("⛔").red(), e));
                }
            }
            out.push_str(&render_status(&status));
            out.trim_end().to_string()
        }
    }
}

fn render_status(status: &GateStatus) -> String {
    let completed = if status.completed.is_empty() {
        "none".to_string()
    } else {
        status
            .completed
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let next = status
        .next_step
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "   Current step: {}/{}\n   Completed: {}\n   Next: {}\n",
        status.current_step, status.total, completed, next
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(current: usize, completed: Vec<usize>, target: usize) -> GateArgs {
        GateArgs {
            steps: Some(5),
            current,
            completed,
            target,
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_from_steps_and_tier() {
        assert_eq!(plan_from_args(&args(1, vec![], 1)).unwrap().len(), 5);

        let by_tier = GateArgs {
            tier: Some("complex".to_string()),
            ..Default::default()
        };
        assert_eq!(plan_from_args(&by_tier).unwrap().len(), 7);

        let bad = GateArgs {
            steps: Some(4),
            ..Default::default()
        };
        assert!(plan_from_args(&bad).unwrap_err().contains("No plan has 4 steps"));
    }

    #[test]
    fn test_run_allowed_and_rejected() {
        assert!(run(&args(1, vec![], 1), OutputFormat::Text).is_ok());

        let err = run(&args(1, vec![1], 3), OutputFormat::Text).unwrap_err();
        assert!(err.contains("Cannot skip ahead"));

        let err = run(&args(3, vec![1], 3), OutputFormat::Text).unwrap_err();
        assert!(err.contains("step(s) 2"));
    }

    #[test]
    fn test_complete_flag_applies_transition() {
        let mut a = args(1, vec![], 1);
        a.complete = true;
        assert!(run(&a, OutputFormat::Json).is_ok());
    }

    #[test]
    fn test_terminal_state_is_not_an_error() {
        assert!(run(&args(5, vec![1, 2, 3, 4, 5], 2), OutputFormat::Text).is_ok());
    }

    #[test]
    fn test_render_json_rejection() {
        let plan = ThinkingPlan::for_tier(ComplexityTier::Medium);
        let gate = StepGate::with_state(plan, 1, [1]);
        let outcome = gate.execute(3).map(|_| ());
        let json: serde_json::Value =
            serde_json::from_str(&render(&gate, 3, &outcome, OutputFormat::Json)).unwrap();

        assert_eq!(json["result"]["decision"], "rejected");
        assert_eq!(json["result"]["rejection"]["reason"], "skip_ahead");
        assert_eq!(json["result"]["status"]["currentStep"], 1);
    }

    #[test]
    fn test_current_beyond_plan_is_clamped() {
        assert!(run(&args(usize::MAX, vec![1], 2), OutputFormat::Text).is_ok());

        let plan = plan_from_args(&args(99, vec![], 1)).unwrap();
        let gate = StepGate::with_state(plan, 99, Vec::new());
        let text = render(&gate, 1, &Ok(()), OutputFormat::Text);
        assert!(text.contains("Current step: 5/5"));
    }
}
