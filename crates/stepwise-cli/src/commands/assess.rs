//! `stepwise assess` — classify a problem and print its thinking plan.

use std::path::Path;

use console::style;
use stepwise_core::complexity::{classify, Classification, ComplexityScore};
use stepwise_core::plan::ThinkingPlan;

use super::{json_envelope, OutputFormat};

/// Dimension flags as given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionArgs {
    pub domain_breadth: Option<i64>,
    pub stakeholder_alignment: Option<i64>,
    pub solution_uncertainty: Option<i64>,
    pub impact_scope: Option<i64>,
    pub time_pressure: Option<i64>,
}

/// Build the score from a score file or from all five dimension flags.
pub fn score_from_args(file: Option<&Path>, dims: DimensionArgs) -> Result<ComplexityScore, String> {
    if let Some(path) = file {
        return ComplexityScore::from_file(path).map_err(|e| e.to_string());
    }

    let named = [
        ("--domain-breadth", dims.domain_breadth),
        ("--stakeholder-alignment", dims.stakeholder_alignment),
        ("--solution-uncertainty", dims.solution_uncertainty),
        ("--impact-scope", dims.impact_scope),
        ("--time-pressure", dims.time_pressure),
    ];
    let missing: Vec<&str> = named
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(flag, _)| *flag)
        .collect();
    if !missing.is_empty() {
        return Err(format!(
            "Missing dimension(s): {} (or pass --file)",
            missing.join(", ")
        ));
    }

    Ok(ComplexityScore::new(
        dims.domain_breadth.unwrap_or_default(),
        dims.stakeholder_alignment.unwrap_or_default(),
        dims.solution_uncertainty.unwrap_or_default(),
        dims.impact_scope.unwrap_or_default(),
        dims.time_pressure.unwrap_or_default(),
    ))
}

/// Classify `score` and print the tier and plan.
pub fn run(score: &ComplexityScore, format: OutputFormat) -> Result<(), String> {
    let classification = classify(score).map_err(|e| e.to_string())?;
    let plan = ThinkingPlan::from_classification(&classification);
    println!("{}", render(score, &classification, &plan, format));
    Ok(())
}

pub fn render(
    score: &ComplexityScore,
    classification: &Classification,
    plan: &ThinkingPlan,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => json_envelope(
            "assess",
            &serde_json::json!({
                "score": score,
                "classification": classification,
                "plan": plan.steps(),
            }),
        ),
        OutputFormat::Text => {
            let mut out = String::new();
            for (name, value) in score.dimensions() {
                out.push_str(&format!("   {:<22} {}\n", name, value));
            }
            out.push_str(&format!(
                "{} Total {} → {} ({} steps)\n",
                style("📊").bold(),
                classification.total,
                style(classification.tier).bold(),
                classification.step_count
            ));
            for step in plan.steps() {
                out.push_str(&format!("   {}. {}\n", step.number, step.id));
            }
            out.trim_end().to_string()
        }
    }
}
