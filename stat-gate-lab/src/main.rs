use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stat_gate_core::StudyData;
use stat_gate_engine::{AnalysisEngine, EngineConfig, RuleBasedPlanner};

mod config;

/// Run a quality-gated statistical analysis on a study data file.
#[derive(Debug, Parser)]
#[command(name = "stat-gate", version, about)]
struct Args {
    /// Path to the study data JSON file.
    input: PathBuf,

    /// Outcome variable to analyze.
    #[arg(short, long)]
    variable: String,

    /// Emit the full result as JSON instead of the textual report.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::Config::load().unwrap_or_default();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stat_gate={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        input = %args.input.display(),
        variable = %args.variable,
        "starting analysis"
    );

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading study data from {}", args.input.display()))?;
    let study: StudyData = serde_json::from_str(&raw)
        .with_context(|| format!("parsing study data from {}", args.input.display()))?;

    let engine = AnalysisEngine::new(
        Arc::new(RuleBasedPlanner::new()),
        EngineConfig {
            quality_threshold: config.quality_threshold,
            max_attempts: config.max_attempts,
        },
    );

    let result = engine.analyze(&study, &args.variable).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.report);
        println!(
            "\nQuality score: {:.2} (attempts: {}{})",
            result.quality_score,
            result.attempts,
            if result.quality_gate_exhausted {
                ", gate exhausted; human review recommended"
            } else {
                ""
            }
        );
    }

    Ok(())
}
