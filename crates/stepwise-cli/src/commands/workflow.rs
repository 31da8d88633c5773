//! `stepwise workflow` — validate and simulate YAML workflow definitions.

use std::path::Path;

use console::style;
use stepwise_core::error::CoreError;
use stepwise_core::workflow::graph::{validate_steps, ValidationReport};
use stepwise_core::workflow::schema::WorkflowDefinition;
use stepwise_core::workflow::simulator::{SimulationReport, WorkflowSimulator};
use stepwise_core::MissingArtifactError;

use super::{json_envelope, truncate, OutputFormat};

/// Validate a workflow file's artifact dependencies.
pub fn validate(path: &Path, format: OutputFormat) -> Result<(), String> {
    let workflow = WorkflowDefinition::from_file(path).map_err(|e| e.to_string())?;
    tracing::info!("[Workflow] Loaded '{}' ({} steps)", workflow.name, workflow.steps.len());

    let outcome = validate_steps(&workflow.steps);
    println!("{}", render_validation(&workflow, &outcome, format));

    // Details are already in the rendered output
    outcome
        .map(|_| ())
        .map_err(|_| format!("Workflow '{}' failed validation", workflow.name))
}

/// Replay a workflow file and check its terminal artifacts.
///
/// `expect` overrides the definition's `expected_artifacts` when non-empty.
pub fn simulate(path: &Path, expect: &[String], format: OutputFormat) -> Result<(), String> {
    let workflow = WorkflowDefinition::from_file(path).map_err(|e| e.to_string())?;
    let report = WorkflowSimulator::new(&workflow)
        .run()
        .map_err(|e| e.to_string())?;

    let terminal = if expect.is_empty() {
        report.check_declared_terminal()
    } else {
        report.check_terminal(expect)
    };

    println!("{}", render_simulation(&report, &terminal, format));

    if let Some(ref failure) = report.failure {
        return Err(format!(
            "Simulation of '{}' stopped at step {}",
            workflow.name, failure.position
        ));
    }
    terminal.map_err(|e| {
        format!(
            "Simulation of '{}' is missing {} expected artifact(s)",
            workflow.name,
            e.missing.len()
        )
    })
}

/// Render a validation outcome.
pub fn render_validation(
    workflow: &WorkflowDefinition,
    outcome: &Result<ValidationReport, CoreError>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => {
            let result = match outcome {
                Ok(report) => serde_json::json!({
                    "workflow": workflow.name,
                    "valid": true,
                    "report": report,
                }),
                Err(CoreError::Dependency(e)) => serde_json::json!({
                    "workflow": workflow.name,
                    "valid": false,
                    "error": e,
                }),
                Err(e) => serde_json::json!({
                    "workflow": workflow.name,
                    "valid": false,
                    "error": e.to_string(),
                }),
            };
            json_envelope("workflow.validate", &result)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            match outcome {
                Ok(report) => {
                    out.push_str(&format!(
                        "{} Workflow '{}' dependencies are satisfied\n",
                        style("✅").green(),
                        workflow.name
                    ));
                    out.push_str(&format!("   Version: {}\n", workflow.version));
                    out.push_str(&format!("   Steps: {}\n", report.steps_checked));
                    out.push_str(&format!(
                        "   Artifacts: {}\n",
                        report.artifacts.iter().collect::<Vec<_>>().join(", ")
                    ));
                    for warning in &report.warnings {
                        out.push_str(&format!(
                            "   {} Optional step {} ({}) is missing '{}'\n",
                            style("⚠").yellow(),
                            warning.position,
                            warning.agent,
                            warning.artifact
                        ));
                    }
                }
                Err(e) => {
                    out.push_str(&format!(
                        "{} Workflow '{}' failed validation\n",
                        style("❌").red(),
                        workflow.name
                    ));
                    out.push_str(&format!("   {}\n", e));
                }
            }
            out.trim_end().to_string()
        }
    }
}

/// Render a simulation trace plus the terminal-artifact check.
pub fn render_simulation(
    report: &SimulationReport,
    terminal: &Result<(), MissingArtifactError>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => {
            let result = serde_json::json!({
                "simulation": report,
                "missingArtifacts": terminal.as_ref().err().map(|e| &e.missing),
            });
            json_envelope("workflow.simulate", &result)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("Workflow: {}\n", report.workflow_name));
            out.push_str("┌─────┬──────────────────┬──────────────────┬──────────────────────┬──────┐\n");
            out.push_str("│ #   │ Agent            │ Task             │ Creates              │ Deps │\n");
            out.push_str("├─────┼──────────────────┼──────────────────┼──────────────────────┼──────┤\n");
            for entry in &report.trace {
                let deps = if entry.satisfied {
                    "ok"
                } else if entry.optional {
                    "warn"
                } else {
                    "FAIL"
                };
                out.push_str(&format!(
                    "│ {:<3} │ {:<16} │ {:<16} │ {:<20} │ {:<4} │\n",
                    entry.position,
                    truncate(&entry.agent, 16),
                    truncate(entry.task.as_deref().unwrap_or("-"), 16),
                    truncate(entry.creates.as_deref().unwrap_or("-"), 20),
                    deps
                ));
            }
            out.push_str("└─────┴──────────────────┴──────────────────┴──────────────────────┴──────┘\n");

            for warning in &report.warnings {
                out.push_str(&format!("{} {}\n", style("⚠").yellow(), warning));
            }
            if let Some(ref failure) = report.failure {
                out.push_str(&format!("{} {}\n", style("❌").red(), failure));
            }

            out.push_str(&format!(
                "Final artifacts ({}): {}\n",
                report.artifacts.len(),
                report.artifacts.iter().collect::<Vec<_>>().join(", ")
            ));
            match terminal {
                Ok(()) => out.push_str(&format!(
                    "{} All expected artifacts present\n",
                    style("✅").green()
                )),
                Err(e) => out.push_str(&format!("{} {}\n", style("❌").red(), e)),
            }
            out.trim_end().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::workflow::schema::WorkflowStep;

    fn sample() -> WorkflowDefinition {
        WorkflowDefinition::new(
            "Sample",
            vec![
                WorkflowStep::new("analyst").creates("project-brief.md"),
                WorkflowStep::new("pm").creates("prd.md").requires("project-brief.md"),
            ],
        )
    }

    #[test]
    fn test_render_validation_text_success() {
        let wf = sample();
        let outcome = validate_steps(&wf.steps);
        let text = render_validation(&wf, &outcome, OutputFormat::Text);
        assert!(text.contains("dependencies are satisfied"));
        assert!(text.contains("prd.md, project-brief.md"));
    }

    #[test]
    fn test_render_validation_json_failure_carries_position() {
        let wf = WorkflowDefinition::new("Broken", vec![WorkflowStep::new("pm").requires("brief.md")]);
        let outcome = validate_steps(&wf.steps);
        let json: serde_json::Value =
            serde_json::from_str(&render_validation(&wf, &outcome, OutputFormat::Json)).unwrap();

        assert_eq!(json["result"]["valid"], false);
        assert_eq!(json["result"]["error"]["position"], 1);
        assert_eq!(json["result"]["error"]["artifact"], "brief.md");
    }

    #[test]
    fn test_render_simulation_lists_missing() {
        let wf = sample();
        let report = WorkflowSimulator::new(&wf).run().unwrap();
        let terminal = report.check_terminal(&["architecture.md"]);
        let text = render_simulation(&report, &terminal, OutputFormat::Text);

        assert!(text.contains("analyst"));
        assert!(text.contains("Missing expected artifact(s): architecture.md"));
    }
}
