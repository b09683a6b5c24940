//! Shared experiment setup - suite, roster and grand table execution
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: obtain_scores() - orchestration
//! - Level 2: Experiment::prepare(), Experiment::play()
//! - Level 3: load_roster(), build_suite(), load_suite_file()
//! - Level 4: JSON loading, progress bar

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use grandtable_core::{FixedSuite, MatrixSuite, PayoffMatrix, RandomSuite, StrategySpec};
use grandtable_tournament::{GrandTable, ScoreMatrix, TournamentConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Payoff matrix source
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteKind {
    /// The ten classic matrices, in order
    Fixed,
    /// Random 2-5 action games with integer payoffs in [1, 3]
    RandInt,
    /// Random 2-5 action games with real payoffs in [0, 3)
    RandFloat,
}

impl SuiteKind {
    /// Restarts the classic experiments use with this suite
    pub fn default_restarts(self) -> usize {
        match self {
            SuiteKind::Fixed => 9,
            SuiteKind::RandInt | SuiteKind::RandFloat => 19,
        }
    }
}

/// Built-in strategy roster
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RosterKind {
    /// The eight classic learners
    Eight,
    /// The eight classic learners plus mutual benefit
    Nine,
}

#[derive(Args, Clone, Debug)]
pub struct ExperimentArgs {
    /// Matrix suite to play on
    #[arg(long, value_enum, default_value = "fixed")]
    pub suite: SuiteKind,

    /// Fixed suite read from a JSON file (list of matrices of [row, col] payoff pairs)
    #[arg(long, value_name = "FILE")]
    pub suite_file: Option<PathBuf>,

    /// Built-in roster
    #[arg(long, value_enum, default_value = "nine")]
    pub roster: RosterKind,

    /// Roster read from a JSON file (list of strategy specs)
    #[arg(long, value_name = "FILE")]
    pub roster_file: Option<PathBuf>,

    /// Matrix regenerations after the first matrix [default: 9 fixed, 19 random]
    #[arg(long)]
    pub restarts: Option<usize>,

    /// Rounds played on every matrix
    #[arg(long, default_value = "1000")]
    pub rounds: u32,

    /// Play the matches of a round one after another
    #[arg(long)]
    pub sequential: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// What was played, for reports
#[derive(Clone, Debug, Serialize)]
pub struct ExperimentSummary {
    pub suite: String,
    pub strategies: Vec<String>,
    pub config: TournamentConfig,
}

/// A roster, a suite and a tournament configuration ready to play
pub struct Experiment {
    specs: Vec<StrategySpec>,
    suite: Box<dyn MatrixSuite>,
    config: TournamentConfig,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Load a saved score matrix, or play a fresh grand table
pub fn obtain_scores(
    table_file: Option<&Path>,
    args: &ExperimentArgs,
    seed: Option<u64>,
) -> Result<ScoreMatrix> {
    match table_file {
        Some(path) => load_score_matrix(path),
        None => Experiment::prepare(args, seed)?.play(!args.no_progress),
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

impl Experiment {
    /// Resolve roster, suite and configuration from the command arguments
    pub fn prepare(args: &ExperimentArgs, seed: Option<u64>) -> Result<Self> {
        let specs = load_roster(args)?;
        // Suite and strategies draw from separate streams of the same seed
        let (suite, default_restarts) = build_suite(args, seed.map(|s| s.rotate_left(32)))?;

        let mut config = TournamentConfig::new(args.restarts.unwrap_or(default_restarts), args.rounds);
        config.seed = seed;
        if args.sequential {
            config = config.sequential();
        }

        Ok(Self {
            specs,
            suite,
            config,
        })
    }

    pub fn summary(&self) -> ExperimentSummary {
        ExperimentSummary {
            suite: self.suite.name().to_string(),
            strategies: self.specs.iter().map(|s| s.name().to_string()).collect(),
            config: self.config.clone(),
        }
    }

    /// Play every restart, with a progress bar on stderr when `progress` is set
    pub fn play(&mut self, progress: bool) -> Result<ScoreMatrix> {
        let summary = self.summary();
        tracing::info!(
            "Grand table: {} strategies, {} matrices x {} rounds on {}",
            summary.strategies.len(),
            self.config.matrices(),
            self.config.rounds,
            summary.suite
        );

        let mut table = GrandTable::new(&self.specs, self.config.clone(), self.suite.as_ref())
            .context("Failed to set up grand table")?;

        let bar = restart_bar(self.config.matrices(), progress)?;
        let scores = table.play_with_callback(self.suite.as_mut(), |done, _| {
            bar.set_position(done as u64);
        });
        bar.finish_and_clear();

        scores.context("Grand table failed")
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Specs from `--roster-file`, else the built-in roster
pub fn load_roster(args: &ExperimentArgs) -> Result<Vec<StrategySpec>> {
    if let Some(path) = &args.roster_file {
        return StrategySpec::load_roster(path)
            .with_context(|| format!("Failed to load roster {}", path.display()));
    }
    Ok(match args.roster {
        RosterKind::Eight => StrategySpec::eight(),
        RosterKind::Nine => StrategySpec::nine(),
    })
}

/// The selected suite and the restart count it defaults to
pub fn build_suite(
    args: &ExperimentArgs,
    seed: Option<u64>,
) -> Result<(Box<dyn MatrixSuite>, usize)> {
    if let Some(path) = &args.suite_file {
        let suite = load_suite_file(path)?;
        let restarts = suite.len() - 1;
        return Ok((Box::new(suite), restarts));
    }

    let suite: Box<dyn MatrixSuite> = match args.suite {
        SuiteKind::Fixed => Box::new(FixedSuite::new()),
        SuiteKind::RandInt => Box::new(RandomSuite::integer(seed)),
        SuiteKind::RandFloat => Box::new(RandomSuite::real(seed)),
    };
    Ok((suite, args.suite.default_restarts()))
}

/// Fixed suite authored as JSON: `[[[[r, c], [r, c]], [[r, c], [r, c]]], ...]`
pub fn load_suite_file(path: &Path) -> Result<FixedSuite> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read suite {}", path.display()))?;
    let raw: Vec<Vec<Vec<(f64, f64)>>> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse suite {}", path.display()))?;

    let matrices = raw
        .into_iter()
        .enumerate()
        .map(|(i, rows)| {
            PayoffMatrix::from_rows(rows)
                .with_context(|| format!("Matrix {} in {}", i + 1, path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    FixedSuite::from_matrices(matrices)
        .with_context(|| format!("Invalid suite {}", path.display()))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Score matrix saved by `table --output`
pub fn load_score_matrix(path: &Path) -> Result<ScoreMatrix> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read score matrix {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse score matrix {}", path.display()))
}

fn restart_bar(total: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} matrices ({eta})")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExperimentArgs {
        ExperimentArgs {
            suite: SuiteKind::Fixed,
            suite_file: None,
            roster: RosterKind::Nine,
            roster_file: None,
            restarts: None,
            rounds: 1000,
            sequential: false,
            no_progress: true,
        }
    }

    #[test]
    fn test_default_restarts_follow_suite() {
        let mut a = args();
        assert_eq!(Experiment::prepare(&a, Some(1)).unwrap().config.restarts, 9);

        a.suite = SuiteKind::RandFloat;
        let experiment = Experiment::prepare(&a, Some(1)).unwrap();
        assert_eq!(experiment.config.restarts, 19);
        assert_eq!(experiment.summary().suite, "Random Float Matrix Suite");

        a.restarts = Some(3);
        a.sequential = true;
        let experiment = Experiment::prepare(&a, Some(1)).unwrap();
        assert_eq!(experiment.config.restarts, 3);
        assert!(!experiment.config.parallel);
    }

    #[test]
    fn test_builtin_rosters() {
        let mut a = args();
        assert_eq!(load_roster(&a).unwrap().len(), 9);
        a.roster = RosterKind::Eight;
        assert_eq!(load_roster(&a).unwrap().len(), 8);
    }

    #[test]
    fn test_small_experiment_plays() {
        let mut a = args();
        a.roster = RosterKind::Eight;
        a.restarts = Some(1);
        a.rounds = 20;

        let mut experiment = Experiment::prepare(&a, Some(5)).unwrap();
        let scores = experiment.play(false).unwrap();
        assert_eq!(scores.len(), 8);
        assert_eq!(scores.names()[4], "Bully");
    }

    #[test]
    fn test_suite_file() {
        let dir = tempfile::TempDir::new().unwrap();

        let good = dir.path().join("suite.json");
        std::fs::write(&good, "[[[[1,2],[3,4]],[[5,6],[7,8]]], [[[0,0]]]]").unwrap();
        let suite = load_suite_file(&good).unwrap();
        assert_eq!(suite.len(), 2);
        assert_eq!(suite.matrix(1).unwrap().get(1, 0), (5.0, 6.0));

        let mut a = args();
        a.suite_file = Some(good);
        let (_, restarts) = build_suite(&a, None).unwrap();
        assert_eq!(restarts, 1);

        let ragged = dir.path().join("ragged.json");
        std::fs::write(&ragged, "[[[[1,2],[3,4]],[[5,6]]]]").unwrap();
        assert!(load_suite_file(&ragged).is_err());

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "[]").unwrap();
        assert!(load_suite_file(&empty).is_err());
    }

    #[test]
    fn test_score_matrix_file_must_be_square() {
        let dir = tempfile::TempDir::new().unwrap();

        let good = dir.path().join("table.json");
        std::fs::write(&good, r#"{"names":["A","B"],"scores":[[1,2],[3,4]]}"#).unwrap();
        assert_eq!(load_score_matrix(&good).unwrap().len(), 2);

        let ragged = dir.path().join("ragged.json");
        std::fs::write(&ragged, r#"{"names":["A","B"],"scores":[[1,2],[3]]}"#).unwrap();
        let err = load_score_matrix(&ragged).unwrap_err();
        assert!(format!("{:#}", err).contains("row 1 has 1 entries, expected 2"), "{:#}", err);
    }
}
