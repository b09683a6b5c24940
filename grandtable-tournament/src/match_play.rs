//! Match play - repeated rounds between one row and one column strategy
//!
//! Level 3 - Step-level implementation

use std::sync::Arc;

use grandtable_core::util::mean;
use grandtable_core::{Action, Observation, Payoff, PayoffMatrix, Role, Strategy};
use serde::Serialize;

/// Outcome of a single round
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoundRecord {
    pub round: u32,
    pub row_action: Action,
    pub col_action: Action,
    pub row_payoff: Payoff,
    pub col_payoff: Payoff,
}

/// Drives one strategy pair through repeated play on a fixed matrix.
///
/// Both strategies are owned exclusively by this match.
pub struct MatchSimulator {
    row: Box<dyn Strategy>,
    col: Box<dyn Strategy>,
    matrix: Arc<PayoffMatrix>,
    round: u32,
    history: Vec<RoundRecord>,
}

impl MatchSimulator {
    /// Pair two strategies and initialize them on `matrix`
    pub fn new(row: Box<dyn Strategy>, col: Box<dyn Strategy>, matrix: &Arc<PayoffMatrix>) -> Self {
        let mut sim = Self {
            row,
            col,
            matrix: Arc::clone(matrix),
            round: 0,
            history: Vec::new(),
        };
        sim.initialize(matrix);
        sim
    }

    /// Start over on a new matrix
    pub fn initialize(&mut self, matrix: &Arc<PayoffMatrix>) {
        self.matrix = Arc::clone(matrix);
        self.round = 0;
        self.history.clear();
        self.row.initialize(matrix, Role::Row);
        self.col.initialize(matrix, Role::Col);
    }

    /// Play one round: both act, then both observe
    pub fn play_round(&mut self) -> RoundRecord {
        self.round += 1;
        let round = self.round;

        let row_action = self.row.act(round);
        let col_action = self.col.act(round);
        let (row_payoff, col_payoff) = self.matrix.get(row_action, col_action);

        let record = RoundRecord {
            round,
            row_action,
            col_action,
            row_payoff,
            col_payoff,
        };
        self.history.push(record);

        self.row.observe(&Observation {
            round,
            own_action: row_action,
            own_payoff: row_payoff,
            opp_action: col_action,
            opp_payoff: col_payoff,
        });
        self.col.observe(&Observation {
            round,
            own_action: col_action,
            own_payoff: col_payoff,
            opp_action: row_action,
            opp_payoff: row_payoff,
        });

        record
    }

    /// Play `rounds` rounds in a row
    pub fn play(&mut self, rounds: u32) {
        for _ in 0..rounds {
            self.play_round();
        }
    }

    /// Mean row payoff since the last initialize
    pub fn mean_row_payoff(&self) -> Option<f64> {
        mean(self.history.iter().map(|r| r.row_payoff))
    }

    /// Mean column payoff since the last initialize
    pub fn mean_col_payoff(&self) -> Option<f64> {
        mean(self.history.iter().map(|r| r.col_payoff))
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn names(&self) -> (&str, &str) {
        (self.row.name(), self.col.name())
    }
}
