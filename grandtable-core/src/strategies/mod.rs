//! Learning strategies
//!
//! - `bandit`: action-value learners (epsilon-greedy, UCB, softmax)
//! - `belief`: learners that reason over the payoff matrix (bully,
//!   fictitious play, regret matching)
//! - `adaptive`: random play, satisficing, mutual benefit
//!
//! Every strategy owns its RNG. Ties between equally good actions are
//! broken uniformly at random.

mod adaptive;
mod bandit;
mod belief;

pub use adaptive::{MutualBenefit, RandomPlay, Satisficing};
pub use bandit::{EpsilonGreedy, Softmax, Ucb};
pub use belief::{Bully, FictitiousPlay, RegretMatching};

use crate::matrix::{Action, Payoff};

/// Cumulative payoff and play count per action.
///
/// Counts start at 1 so means never divide by zero.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tally {
    totals: Vec<Payoff>,
    counts: Vec<f64>,
}

impl Tally {
    pub(crate) fn reset(&mut self, actions: usize, initial_total: Payoff) {
        self.totals = vec![initial_total; actions];
        self.counts = vec![1.0; actions];
    }

    pub(crate) fn record(&mut self, action: Action, amount: Payoff) {
        self.totals[action] += amount;
        self.counts[action] += 1.0;
    }

    pub(crate) fn count(&self, action: Action) -> f64 {
        self.counts[action]
    }

    pub(crate) fn means(&self) -> Vec<f64> {
        self.totals
            .iter()
            .zip(&self.counts)
            .map(|(total, count)| total / count)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.totals.len()
    }
}
