//! Table command - play the grand table and print the score matrix
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: Experiment::prepare(), Experiment::play()
//! - Level 4: output formatting, saving

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use grandtable_tournament::ScoreMatrix;

use crate::experiment::{Experiment, ExperimentArgs, ExperimentSummary};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TableArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Save the score matrix as JSON (input for `evolve --table` and `nash --table`)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run table command
pub fn run(args: TableArgs, seed: Option<u64>) -> Result<()> {
    let mut experiment = Experiment::prepare(&args.experiment, seed)?;
    let summary = experiment.summary();
    let scores = experiment.play(!args.experiment.no_progress)?;

    if let Some(path) = &args.output {
        save_score_matrix(&scores, path)?;
        tracing::info!("Score matrix saved to {}", path.display());
    }

    if args.json {
        print_json(&summary, &scores)?;
    } else {
        println!("Strategies: {}", summary.strategies.join(", "));
        println!("{}", scores);
    }

    Ok(())
}

// ============================================================================
// LEVEL 4 - OUTPUT
// ============================================================================

fn save_score_matrix(scores: &ScoreMatrix, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(scores)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_json(summary: &ExperimentSummary, scores: &ScoreMatrix) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        timestamp: chrono::DateTime<chrono::Utc>,
        experiment: &'a ExperimentSummary,
        table: &'a ScoreMatrix,
        row_means: Vec<f64>,
    }

    let output = JsonOutput {
        timestamp: chrono::Utc::now(),
        experiment: summary,
        table: scores,
        row_means: scores.row_means(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
