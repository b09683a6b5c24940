//! Run command - grand table, replicator dynamic and equilibria in one go
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: table, evolve and nash phases
//! - Level 3: classic_option() - the twelve reference experiments
//! - Level 4: output formatting

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use grandtable_evolve::Trajectory;
use grandtable_nash::{render_equilibria, Equilibrium};
use grandtable_tournament::ScoreMatrix;

use crate::evolve_cmd::{self, DynamicsArgs, Preset};
use crate::experiment::{Experiment, ExperimentArgs, ExperimentSummary, RosterKind, SuiteKind};
use crate::nash_cmd::{self, SolverArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Classic experiment 1-12, overriding suite, roster and start proportions
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub option: Option<u8>,

    #[command(flatten)]
    pub experiment: ExperimentArgs,

    #[command(flatten)]
    pub dynamics: DynamicsArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Stop after the replicator dynamic (no solver needed)
    #[arg(long)]
    pub skip_nash: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One of the twelve reference experiments
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassicOption {
    pub suite: SuiteKind,
    pub roster: RosterKind,
    pub start: Preset,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the full experiment
///
/// This function reads like a table of contents:
/// 1. Resolve the classic option, if any
/// 2. Play the grand table
/// 3. Evolve the population over it
/// 4. Compute its equilibria
pub fn run(mut args: RunArgs, seed: Option<u64>) -> Result<()> {
    if let Some(number) = args.option {
        apply_classic_option(&mut args, number);
    }

    let mut experiment = Experiment::prepare(&args.experiment, seed)?;
    let summary = experiment.summary();
    let scores = experiment.play(!args.experiment.no_progress)?;

    let trajectory = evolve_cmd::replicate(&scores, &args.dynamics)?;

    let equilibria = if args.skip_nash {
        None
    } else {
        Some(nash_cmd::equilibria(&scores, &args.solver)?)
    };

    if args.json {
        print_json(&summary, &scores, &args.dynamics, &trajectory, equilibria.as_deref())?;
    } else {
        print_report(&summary, &scores, &trajectory, equilibria.as_deref());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn apply_classic_option(args: &mut RunArgs, number: u8) {
    let Some(option) = classic_option(number) else {
        return;
    };
    tracing::info!(
        "(Matrix Suite, Number of Strategies, Uniform?) -> ({:?}, {}, {})",
        option.suite,
        match option.roster {
            RosterKind::Eight => 8,
            RosterKind::Nine => 9,
        },
        option.start == Preset::Uniform
    );

    args.experiment.suite = option.suite;
    args.experiment.suite_file = None;
    args.experiment.roster = option.roster;
    args.experiment.roster_file = None;
    args.dynamics.proportions = option.start;
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Suite, roster size and start for experiment `number` (1-12)
pub fn classic_option(number: u8) -> Option<ClassicOption> {
    if !(1..=12).contains(&number) {
        return None;
    }
    let index = usize::from(number - 1);

    let suite = [SuiteKind::Fixed, SuiteKind::RandInt, SuiteKind::RandFloat][index / 4];
    let roster = if (index / 2) % 2 == 0 {
        RosterKind::Eight
    } else {
        RosterKind::Nine
    };
    let start = if index % 2 == 0 {
        Preset::Uniform
    } else {
        Preset::NonUniform
    };

    Some(ClassicOption {
        suite,
        roster,
        start,
    })
}

// ============================================================================
// LEVEL 4 - OUTPUT
// ============================================================================

fn print_report(
    summary: &ExperimentSummary,
    scores: &ScoreMatrix,
    trajectory: &Trajectory,
    equilibria: Option<&[Equilibrium]>,
) {
    println!("Strategies: {}", summary.strategies.join(", "));
    println!("{}", scores);
    println!();
    print!("{}", trajectory.render(scores.names()));

    if let Some(equilibria) = equilibria {
        println!();
        println!("Nash equilibria:");
        print!("{}", render_equilibria(scores.names(), equilibria));
    }
}

fn print_json(
    summary: &ExperimentSummary,
    scores: &ScoreMatrix,
    dynamics: &DynamicsArgs,
    trajectory: &Trajectory,
    equilibria: Option<&[Equilibrium]>,
) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        timestamp: chrono::DateTime<chrono::Utc>,
        experiment: &'a ExperimentSummary,
        table: &'a ScoreMatrix,
        start: Preset,
        trajectory: &'a Trajectory,
        equilibria: Option<&'a [Equilibrium]>,
    }

    let output = JsonOutput {
        timestamp: chrono::Utc::now(),
        experiment: summary,
        table: scores,
        start: dynamics.proportions,
        trajectory,
        equilibria,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
