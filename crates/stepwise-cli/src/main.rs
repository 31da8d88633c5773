//! Stepwise CLI — validate document workflows, size problems and gate
//! thinking-plan steps.
//!
//! All decision logic lives in stepwise-core; this binary only loads inputs,
//! calls the core and renders the result.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stepwise_cli::commands::{self, assess::DimensionArgs, gate::GateArgs, OutputFormat};

/// Stepwise — workflow dependency and step-order guard
#[derive(Parser)]
#[command(name = "stepwise", version, about = "Stepwise — workflow dependency and step-order guard")]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, env = "STEPWISE_FORMAT", default_value = "text")]
    format: OutputFormat,

    /// Base directory for relative workflow and score paths
    #[arg(long, global = true, env = "STEPWISE_WORKFLOW_DIR", default_value = ".")]
    workflow_dir: PathBuf,

    /// Enable debug logging from the core
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate or simulate YAML workflow definitions
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },

    /// Classify a problem's complexity and print its thinking plan
    Assess {
        /// YAML/JSON file with the five dimension scores
        #[arg(long, conflicts_with_all = [
            "domain_breadth",
            "stakeholder_alignment",
            "solution_uncertainty",
            "impact_scope",
            "time_pressure",
        ])]
        file: Option<String>,
        /// Domain breadth (1-4)
        #[arg(long, allow_hyphen_values = true)]
        domain_breadth: Option<i64>,
        /// Stakeholder alignment (1-4)
        #[arg(long, allow_hyphen_values = true)]
        stakeholder_alignment: Option<i64>,
        /// Solution uncertainty (1-4)
        #[arg(long, allow_hyphen_values = true)]
        solution_uncertainty: Option<i64>,
        /// Impact scope (1-4)
        #[arg(long, allow_hyphen_values = true)]
        impact_scope: Option<i64>,
        /// Time pressure (1-4)
        #[arg(long, allow_hyphen_values = true)]
        time_pressure: Option<i64>,
    },

    /// Check whether a thinking-plan step may run
    Gate {
        /// Plan length: 3, 5, 7 or 10
        #[arg(long, conflicts_with = "tier")]
        steps: Option<usize>,
        /// Plan tier: Simple, Medium, Complex or Wicked
        #[arg(long)]
        tier: Option<String>,
        /// Highest step reached so far
        #[arg(long, default_value_t = 1)]
        current: usize,
        /// Completed steps (comma-separated)
        #[arg(long, value_delimiter = ',')]
        completed: Vec<usize>,
        /// Step to run
        #[arg(long)]
        target: usize,
        /// Also mark the target completed and print the new status
        #[arg(long)]
        complete: bool,
    },
}

#[derive(Subcommand)]
enum WorkflowAction {
    /// Validate artifact dependencies, stopping at the first unmet one
    Validate {
        /// Path to the workflow YAML file
        file: String,
    },
    /// Replay the workflow and check the final artifact set
    Simulate {
        /// Path to the workflow YAML file
        file: String,
        /// Expected terminal artifacts (comma-separated); defaults to the
        /// workflow's `expected_artifacts`
        #[arg(long, value_delimiter = ',')]
        expect: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "stepwise_core=debug,stepwise_cli=debug"
    } else {
        "stepwise_core=warn,stepwise_cli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = if let Some(command) = cli.command {
        match command {
            Commands::Workflow { action } => match action {
                WorkflowAction::Validate { file } => {
                    let path = commands::resolve_path(&cli.workflow_dir, &file);
                    commands::workflow::validate(&path, cli.format)
                }
                WorkflowAction::Simulate { file, expect } => {
                    let path = commands::resolve_path(&cli.workflow_dir, &file);
                    commands::workflow::simulate(&path, &expect, cli.format)
                }
            },

            Commands::Assess {
                file,
                domain_breadth,
                stakeholder_alignment,
                solution_uncertainty,
                impact_scope,
                time_pressure,
            } => {
                let path = file.map(|f| commands::resolve_path(&cli.workflow_dir, &f));
                let dims = DimensionArgs {
                    domain_breadth,
                    stakeholder_alignment,
                    solution_uncertainty,
                    impact_scope,
                    time_pressure,
                };
                commands::assess::score_from_args(path.as_deref(), dims)
                    .and_then(|score| commands::assess::run(&score, cli.format))
            }

            Commands::Gate {
                steps,
                tier,
                current,
                completed,
                target,
                complete,
            } => {
                let args = GateArgs {
                    steps,
                    tier,
                    current,
                    completed,
                    target,
                    complete,
                };
                commands::gate::run(&args, cli.format)
            }
        }
    } else {
        // No subcommand — show help
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
