//! Nash command - mixed equilibria of a grand table via gambit
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: equilibria()
//! - Level 4: output formatting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use grandtable_nash::{nash_equilibria, render_equilibria, Equilibrium, GambitEnumMixed};
use grandtable_tournament::ScoreMatrix;

use crate::experiment::{self, ExperimentArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Clone, Debug)]
pub struct SolverArgs {
    /// Path to gambit-enummixed (default: ./gambit-enummixed, then PATH)
    #[arg(long, value_name = "PATH")]
    pub gambit: Option<PathBuf>,
}

impl SolverArgs {
    pub fn solver(&self) -> GambitEnumMixed {
        match &self.gambit {
            Some(path) => GambitEnumMixed::with_executable(path),
            None => GambitEnumMixed::new(),
        }
    }
}

#[derive(Args)]
pub struct NashArgs {
    /// Score matrix JSON written by `table --output` (plays a fresh table if omitted)
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    #[command(flatten)]
    pub experiment: ExperimentArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run nash command
pub fn run(args: NashArgs, seed: Option<u64>) -> Result<()> {
    let scores = experiment::obtain_scores(args.table.as_deref(), &args.experiment, seed)?;
    let equilibria = equilibria(&scores, &args.solver)?;

    if args.json {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            timestamp: chrono::DateTime<chrono::Utc>,
            strategies: &'a [String],
            equilibria: &'a [Equilibrium],
        }

        let output = JsonOutput {
            timestamp: chrono::Utc::now(),
            strategies: scores.names(),
            equilibria: &equilibria,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_equilibria(scores.names(), &equilibria));
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Every equilibrium the configured solver reports for `scores`
pub fn equilibria(scores: &ScoreMatrix, args: &SolverArgs) -> Result<Vec<Equilibrium>> {
    nash_equilibria(scores.scores(), &args.solver()).context("Equilibrium computation failed")
}
