//! Grand table - every strategy against every strategy over matrix restarts
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::sync::Arc;

use grandtable_core::{MatrixSuite, PayoffMatrix, Role, Strategy, StrategySpec};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::TournamentConfig;
use crate::error::TournamentError;
use crate::match_play::MatchSimulator;

/// Restart-averaged mean payoff of each row strategy against each column strategy.
///
/// Always square, with one name per row. Deserialising checks the shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreMatrix")]
pub struct ScoreMatrix {
    names: Vec<String>,
    scores: Vec<Vec<f64>>,
}

/// Unchecked wire form of `ScoreMatrix`
#[derive(Deserialize)]
struct RawScoreMatrix {
    names: Vec<String>,
    scores: Vec<Vec<f64>>,
}

impl TryFrom<RawScoreMatrix> for ScoreMatrix {
    type Error = TournamentError;

    fn try_from(raw: RawScoreMatrix) -> Result<Self, Self::Error> {
        Self::new(raw.names, raw.scores)
    }
}

impl ScoreMatrix {
    /// Validate that `scores` is N x N for N `names`
    pub fn new(names: Vec<String>, scores: Vec<Vec<f64>>) -> Result<Self, TournamentError> {
        let n = names.len();
        if n == 0 {
            return Err(TournamentError::MalformedScores("no strategies".to_string()));
        }
        if scores.len() != n {
            return Err(TournamentError::MalformedScores(format!(
                "{} names but {} rows",
                n,
                scores.len()
            )));
        }
        if let Some((row, entries)) = scores.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(TournamentError::MalformedScores(format!(
                "row {} has {} entries, expected {}",
                row,
                entries.len(),
                n
            )));
        }
        Ok(Self { names, scores })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Row-major scores, `scores()[i][j]` is strategy i playing row against j
    pub fn scores(&self) -> &[Vec<f64>] {
        &self.scores
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.scores[row][col]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of a strategy by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Mean score of every row strategy over all opponents
    pub fn row_means(&self) -> Vec<f64> {
        self.scores
            .iter()
            .map(|row| row.iter().sum::<f64>() / row.len() as f64)
            .collect()
    }
}

/// N x N matches between independent row and column strategy instances
pub struct GrandTable {
    names: Vec<String>,
    /// Row-major: match `i * n + j` pits row strategy i against column strategy j
    matches: Vec<MatchSimulator>,
    config: TournamentConfig,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Build and play a grand table (Level 1 orchestration)
///
/// # Arguments
/// * `specs` - Participating strategies, each played as row and as column
/// * `config` - Restarts, rounds and execution mode
/// * `suite` - Matrix source, regenerated between restarts
///
/// # Returns
/// Score matrix averaged over `restarts + 1` matrices
pub fn run_grand_table(
    specs: &[StrategySpec],
    config: &TournamentConfig,
    suite: &mut dyn MatrixSuite,
) -> Result<ScoreMatrix, TournamentError> {
    let mut table = GrandTable::new(specs, config.clone(), &*suite)?;
    table.play(suite)
}

impl GrandTable {
    /// Instantiate two independent strategies per match from `specs`.
    ///
    /// Every instance gets its own seed, derived from `config.seed` (or a
    /// random base) and its construction order.
    pub fn new(
        specs: &[StrategySpec],
        config: TournamentConfig,
        suite: &dyn MatrixSuite,
    ) -> Result<Self, TournamentError> {
        for spec in specs {
            spec.validate()?;
        }

        let base = config.seed.unwrap_or_else(rand::random);
        let mut built: u64 = 0;
        let names = specs.iter().map(|s| s.name().to_string()).collect();

        Self::with_factory(
            names,
            |index, _role| {
                let seed = base.wrapping_add(built);
                built += 1;
                specs[index].build(seed)
            },
            config,
            suite,
        )
    }

    /// Build matches from an arbitrary factory, called once per side per match
    pub fn with_factory<F>(
        names: Vec<String>,
        mut factory: F,
        config: TournamentConfig,
        suite: &dyn MatrixSuite,
    ) -> Result<Self, TournamentError>
    where
        F: FnMut(usize, Role) -> Box<dyn Strategy>,
    {
        config.validate(names.len())?;

        let n = names.len();
        let matrix = suite.current();
        let mut matches = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let row = factory(i, Role::Row);
                let col = factory(j, Role::Col);
                matches.push(MatchSimulator::new(row, col, matrix));
            }
        }

        Ok(Self {
            names,
            matches,
            config,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Match between row strategy `row` and column strategy `col`
    pub fn match_at(&self, row: usize, col: usize) -> &MatchSimulator {
        &self.matches[row * self.names.len() + col]
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// Play all restarts and return the averaged score matrix
    pub fn play(&mut self, suite: &mut dyn MatrixSuite) -> Result<ScoreMatrix, TournamentError> {
        self.play_with_callback(suite, |_, _| {})
    }

    /// Like `play`, calling `on_restart(done, total)` after every matrix
    pub fn play_with_callback<F>(
        &mut self,
        suite: &mut dyn MatrixSuite,
        mut on_restart: F,
    ) -> Result<ScoreMatrix, TournamentError>
    where
        F: FnMut(usize, usize),
    {
        let n = self.names.len();
        let total = self.config.matrices();
        let mut sums = vec![0.0; n * n];

        for restart in 0..total {
            let current = suite.current();
            tracing::info!(
                "Restart {}/{}: {} matrix {} ({}x{})",
                restart + 1,
                total,
                suite.name(),
                suite.generation(),
                current.rows(),
                current.cols()
            );
            tracing::debug!("{}", &*suite);

            self.play_rounds();
            self.accumulate(&mut sums);

            if restart < self.config.restarts {
                suite.regenerate()?;
            }
            let next = Arc::clone(suite.current());
            self.reinitialize(&next);

            on_restart(restart + 1, total);
        }

        let scores = sums
            .chunks(n)
            .map(|row| row.iter().map(|s| s / total as f64).collect())
            .collect();

        ScoreMatrix::new(self.names.clone(), scores)
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// Play every round; each round completes for all matches before the next
    fn play_rounds(&mut self) {
        for _ in 0..self.config.rounds {
            if self.config.parallel {
                self.matches.par_iter_mut().for_each(|m| {
                    m.play_round();
                });
            } else {
                for m in &mut self.matches {
                    m.play_round();
                }
            }
        }
    }

    /// Add each match's mean row payoff for the finished matrix
    fn accumulate(&self, sums: &mut [f64]) {
        for (sum, m) in sums.iter_mut().zip(&self.matches) {
            *sum += m.mean_row_payoff().unwrap_or(0.0);
        }
    }

    fn reinitialize(&mut self, matrix: &Arc<PayoffMatrix>) {
        if self.config.parallel {
            self.matches.par_iter_mut().for_each(|m| m.initialize(matrix));
        } else {
            for m in &mut self.matches {
                m.initialize(matrix);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use grandtable_core::{Action, FixedSuite, GameError, Observation, RandomSuite};

    fn constant_suite(payoff: f64) -> FixedSuite {
        let m = PayoffMatrix::filled(2, 3, (payoff, payoff)).unwrap();
        FixedSuite::from_matrices(vec![m]).unwrap()
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("S{}", i)).collect()
    }

    #[test]
    fn test_score_matrix_rejects_bad_shapes() {
        assert!(ScoreMatrix::new(names(2), vec![vec![1.0, 2.0], vec![3.0, 4.0]]).is_ok());

        let ragged = ScoreMatrix::new(names(2), vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            ragged,
            Err(TournamentError::MalformedScores(
                "row 1 has 1 entries, expected 2".to_string()
            ))
        );
        assert!(ScoreMatrix::new(names(3), vec![vec![1.0; 3]; 2]).is_err());
        assert!(ScoreMatrix::new(Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn test_score_matrix_json_is_shape_checked() {
        let good = r#"{"names":["A","B"],"scores":[[1.0,2.0],[3.0,4.0]]}"#;
        let table: ScoreMatrix = serde_json::from_str(good).unwrap();
        assert_eq!(table.get(1, 0), 3.0);

        let ragged = r#"{"names":["A","B"],"scores":[[1.0,2.0],[3.0]]}"#;
        let err = serde_json::from_str::<ScoreMatrix>(ragged).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 entries"), "{}", err);

        let extra_name = r#"{"names":["A","B","C"],"scores":[[1.0,2.0],[3.0,4.0]]}"#;
        assert!(serde_json::from_str::<ScoreMatrix>(extra_name).is_err());
    }

    #[test]
    fn test_constant_matrix_scores() {
        let mut suite = constant_suite(5.0);
        let config = TournamentConfig::new(0, 1).sequential().with_seed(1);
        let scores = run_grand_table(&StrategySpec::nine(), &config, &mut suite).unwrap();

        assert_eq!(scores.len(), 9);
        for i in 0..9 {
            for j in 0..9 {
                assert_eq!(scores.get(i, j), 5.0);
            }
        }
        assert_eq!(scores.row_means(), vec![5.0; 9]);
    }

    #[test]
    fn test_bully_deterministic_across_runs() {
        let config = TournamentConfig::new(9, 20).with_seed(3);
        let specs = vec![StrategySpec::Bully];

        let first = run_grand_table(&specs, &config, &mut FixedSuite::new()).unwrap();
        let second = run_grand_table(&specs, &config.clone().sequential(), &mut FixedSuite::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let specs = StrategySpec::nine();
        let config = TournamentConfig::new(3, 40).with_seed(42);

        let parallel = run_grand_table(&specs, &config, &mut RandomSuite::integer(Some(5))).unwrap();
        let sequential = run_grand_table(
            &specs,
            &config.clone().sequential(),
            &mut RandomSuite::integer(Some(5)),
        )
        .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_same_seed_same_scores() {
        let specs = StrategySpec::eight();
        let config = TournamentConfig::new(2, 30).with_seed(9);
        let a = run_grand_table(&specs, &config, &mut RandomSuite::real(Some(1))).unwrap();
        let b = run_grand_table(&specs, &config, &mut RandomSuite::real(Some(1))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exhausted_suite_aborts() {
        let config = TournamentConfig::new(10, 2).with_seed(1);
        let result = run_grand_table(&[StrategySpec::Random], &config, &mut FixedSuite::new());
        assert_eq!(
            result,
            Err(TournamentError::Game(GameError::Exhausted {
                requested: 11,
                available: 10
            }))
        );

        let config = TournamentConfig::new(9, 2).with_seed(1);
        assert!(run_grand_table(&[StrategySpec::Random], &config, &mut FixedSuite::new()).is_ok());
    }

    #[test]
    fn test_rejects_empty_roster_and_zero_rounds() {
        let suite = FixedSuite::new();
        assert!(matches!(
            GrandTable::new(&[], TournamentConfig::default(), &suite),
            Err(TournamentError::EmptyRoster)
        ));
        assert!(matches!(
            GrandTable::new(&[StrategySpec::Bully], TournamentConfig::new(0, 0), &suite),
            Err(TournamentError::NoRounds)
        ));
        assert!(matches!(
            GrandTable::new(
                &[StrategySpec::EpsilonGreedy { epsilon: 2.0 }],
                TournamentConfig::default(),
                &suite
            ),
            Err(TournamentError::Game(GameError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_instances_are_independent() {
        let suite = FixedSuite::new();
        let mut built = Vec::new();
        let table = GrandTable::with_factory(
            vec!["A".to_string(), "B".to_string()],
            |i, role| {
                built.push((i, role));
                StrategySpec::Random.build(i as u64)
            },
            TournamentConfig::new(0, 1),
            &suite,
        )
        .unwrap();

        // Two fresh instances for each of the four matches
        assert_eq!(built.len(), 8);
        assert_eq!(built[0], (0, Role::Row));
        assert_eq!(built[1], (0, Role::Col));
        assert_eq!(built[7], (1, Role::Col));
        assert_eq!(table.match_at(1, 0).names(), ("Random", "Random"));
    }

    #[test]
    fn test_callback_sees_every_matrix() {
        let config = TournamentConfig::new(4, 3).with_seed(2);
        let mut suite = FixedSuite::new();
        let mut table = GrandTable::new(&[StrategySpec::Bully], config, &suite).unwrap();

        let mut calls = Vec::new();
        table
            .play_with_callback(&mut suite, |done, total| calls.push((done, total)))
            .unwrap();

        assert_eq!(calls, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
        assert_eq!(suite.generation(), 5);
    }

    // ------------------------------------------------------------------------
    // Call-order instrumentation
    // ------------------------------------------------------------------------

    type Log = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct Recorder {
        tag: String,
        log: Log,
    }

    impl Recorder {
        fn push(&self, event: String) {
            self.log.lock().unwrap().push(format!("{} {}", self.tag, event));
        }
    }

    impl Strategy for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }

        fn initialize(&mut self, _matrix: &Arc<PayoffMatrix>, _role: Role) {
            self.push("init".to_string());
        }

        fn act(&mut self, round: u32) -> Action {
            self.push(format!("act {}", round));
            0
        }

        fn observe(&mut self, obs: &Observation) {
            self.push(format!("observe {}", obs.round));
        }
    }

    #[test]
    fn test_round_ordering() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut suite = FixedSuite::new();
        let mut next_id = 0;
        let mut table = GrandTable::with_factory(
            vec!["P".to_string(), "Q".to_string()],
            |_, role| {
                let tag = format!("{}:{}", next_id, role);
                next_id += 1;
                Box::new(Recorder {
                    tag,
                    log: Arc::clone(&log),
                }) as Box<dyn Strategy>
            },
            TournamentConfig::new(1, 2).sequential(),
            &suite,
        )
        .unwrap();
        table.play(&mut suite).unwrap();

        let events = log.lock().unwrap().clone();

        // A single instance: init, then act/observe alternating, re-init per matrix
        let first: Vec<&str> = events
            .iter()
            .filter(|e| e.starts_with("0:row "))
            .map(|e| e.as_str())
            .collect();
        assert_eq!(
            first,
            vec![
                "0:row init",
                "0:row act 1",
                "0:row observe 1",
                "0:row act 2",
                "0:row observe 2",
                "0:row init",
                "0:row act 1",
                "0:row observe 1",
                "0:row act 2",
                "0:row observe 2",
                "0:row init",
            ]
        );

        // All four matches finish round k before any starts round k + 1
        let act_rounds: Vec<u32> = events
            .iter()
            .filter(|e| e.contains(" act "))
            .filter_map(|e| e.rsplit(' ').next())
            .filter_map(|r| r.parse().ok())
            .collect();
        let per_matrix = [vec![1; 8], vec![2; 8]].concat();
        assert_eq!(act_rounds, [per_matrix.clone(), per_matrix].concat());

        // Both sides act before either observes
        let round_one: Vec<&str> = events
            .iter()
            .filter(|e| e.starts_with("0:") || e.starts_with("1:"))
            .skip(2)
            .take(4)
            .map(|e| e.as_str())
            .collect();
        assert_eq!(
            round_one,
            vec!["0:row act 1", "1:col act 1", "0:row observe 1", "1:col observe 1"]
        );
    }
}
