//! Evolve command - replicator dynamic over a grand table
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: replicate()
//! - Level 3: Preset::proportions()
//! - Level 4: output formatting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use grandtable_evolve::{evolve, proportions, DynamicsConfig, DynamicsError, Trajectory};
use grandtable_tournament::ScoreMatrix;

use crate::experiment::{self, ExperimentArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Starting population
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Equal share for every strategy
    Uniform,
    /// Reference shares for the 8 and 9 strategy rosters
    NonUniform,
}

impl Preset {
    pub fn proportions(self, n: usize) -> Result<Vec<f64>, DynamicsError> {
        match self {
            Preset::Uniform => Ok(proportions::uniform(n)),
            Preset::NonUniform => proportions::non_uniform(n),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct DynamicsArgs {
    /// Starting population
    #[arg(long, value_enum, default_value = "uniform")]
    pub proportions: Preset,

    /// Stop once a step moves the population less than this
    #[arg(long, default_value = "0.001")]
    pub tolerance: f64,

    /// Give up after this many steps
    #[arg(long, default_value = "10000")]
    pub max_steps: usize,
}

#[derive(Args)]
pub struct EvolveArgs {
    /// Score matrix JSON written by `table --output` (plays a fresh table if omitted)
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    #[command(flatten)]
    pub experiment: ExperimentArgs,

    #[command(flatten)]
    pub dynamics: DynamicsArgs,

    /// Print every step as a numeric grid instead of the summary
    #[arg(long)]
    pub grid: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run evolve command
pub fn run(args: EvolveArgs, seed: Option<u64>) -> Result<()> {
    let scores = experiment::obtain_scores(args.table.as_deref(), &args.experiment, seed)?;
    let trajectory = replicate(&scores, &args.dynamics)?;

    if args.json {
        print_json(&scores, &args.dynamics, &trajectory)?;
    } else if args.grid {
        print!("{}", trajectory.to_grid());
    } else {
        print!("{}", trajectory.render(scores.names()));
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Replicator dynamic from the preset start over `scores`
pub fn replicate(scores: &ScoreMatrix, args: &DynamicsArgs) -> Result<Trajectory> {
    let start = args
        .proportions
        .proportions(scores.len())
        .with_context(|| format!("No {:?} start for {} strategies", args.proportions, scores.len()))?;

    let config = DynamicsConfig::default()
        .with_tolerance(args.tolerance)
        .with_max_steps(args.max_steps);

    evolve(scores.scores(), &start, config).context("Replicator dynamic failed")
}

// ============================================================================
// LEVEL 4 - OUTPUT
// ============================================================================

fn print_json(scores: &ScoreMatrix, dynamics: &DynamicsArgs, trajectory: &Trajectory) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        timestamp: chrono::DateTime<chrono::Utc>,
        strategies: &'a [String],
        start: Preset,
        tolerance: f64,
        trajectory: &'a Trajectory,
    }

    let output = JsonOutput {
        timestamp: chrono::Utc::now(),
        strategies: scores.names(),
        start: dynamics.proportions,
        tolerance: dynamics.tolerance,
        trajectory,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
