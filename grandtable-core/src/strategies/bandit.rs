//! Action-value learners: epsilon-greedy, UCB and softmax

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::Tally;
use crate::matrix::{Action, PayoffMatrix, Role};
use crate::strategy::{Observation, Strategy};
use crate::util::{argmax_uniform, seeded_rng, uniform_action};

// ============================================================================
// EPSILON-GREEDY
// ============================================================================

/// Greedy on empirical means, uniform exploration with probability epsilon
#[derive(Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: ChaCha8Rng,
    tally: Tally,
    observed: bool,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        Self {
            epsilon,
            rng: seeded_rng(Some(seed)),
            tally: Tally::default(),
            observed: false,
        }
    }
}

impl Strategy for EpsilonGreedy {
    fn name(&self) -> &str {
        "EGreedy"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        self.tally.reset(matrix.actions(role).len(), 0.0);
        self.observed = false;
    }

    fn act(&mut self, _round: u32) -> Action {
        if !self.observed || self.rng.gen::<f64>() < self.epsilon {
            return uniform_action(&mut self.rng, self.tally.len());
        }
        argmax_uniform(&mut self.rng, &self.tally.means())
    }

    fn observe(&mut self, obs: &Observation) {
        self.tally.record(obs.own_action, obs.own_payoff);
        self.observed = true;
    }
}

// ============================================================================
// UCB
// ============================================================================

/// Upper confidence bound: mean plus `c * sqrt(ln t / count)`
#[derive(Debug)]
pub struct Ucb {
    confidence: f64,
    rng: ChaCha8Rng,
    tally: Tally,
    /// Last observed round, 0 before any observation
    last_round: u32,
}

impl Ucb {
    pub fn new(confidence: f64, seed: u64) -> Self {
        Self {
            confidence,
            rng: seeded_rng(Some(seed)),
            tally: Tally::default(),
            last_round: 0,
        }
    }

    fn upper_bounds(&self) -> Vec<f64> {
        let ln_t = (self.last_round as f64).ln();
        self.tally
            .means()
            .into_iter()
            .enumerate()
            .map(|(a, mean)| mean + self.confidence * (ln_t / self.tally.count(a)).sqrt())
            .collect()
    }
}

impl Strategy for Ucb {
    fn name(&self) -> &str {
        "UCB"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        self.tally.reset(matrix.actions(role).len(), 0.0);
        self.last_round = 0;
    }

    fn act(&mut self, _round: u32) -> Action {
        // ln(0) is undefined, so the first round is played blind
        if self.last_round == 0 {
            return uniform_action(&mut self.rng, self.tally.len());
        }
        let bounds = self.upper_bounds();
        argmax_uniform(&mut self.rng, &bounds)
    }

    fn observe(&mut self, obs: &Observation) {
        self.tally.record(obs.own_action, obs.own_payoff);
        self.last_round = obs.round;
    }
}

// ============================================================================
// SOFTMAX
// ============================================================================

/// Boltzmann exploration over exponentially smoothed Q-values
#[derive(Debug)]
pub struct Softmax {
    initial_q: f64,
    learning_rate: f64,
    temperature: f64,
    rng: ChaCha8Rng,
    q_values: Vec<f64>,
    weights: Vec<f64>,
}

impl Softmax {
    pub fn new(initial_q: f64, learning_rate: f64, temperature: f64, seed: u64) -> Self {
        Self {
            initial_q,
            learning_rate,
            temperature,
            rng: seeded_rng(Some(seed)),
            q_values: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Current Boltzmann weights (sum to 1)
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn recompute_weights(&mut self) {
        self.weights = boltzmann(&self.q_values, self.temperature);
    }
}

impl Strategy for Softmax {
    fn name(&self) -> &str {
        "Softmax"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        self.q_values = vec![self.initial_q; matrix.actions(role).len()];
        self.recompute_weights();
    }

    fn act(&mut self, _round: u32) -> Action {
        argmax_uniform(&mut self.rng, &self.weights)
    }

    fn observe(&mut self, obs: &Observation) {
        let q = &mut self.q_values[obs.own_action];
        *q = (1.0 - self.learning_rate) * *q + self.learning_rate * obs.own_payoff;
        self.recompute_weights();
    }
}

/// `exp(q / T)` normalised, shifted by the maximum so large Q cannot overflow
fn boltzmann(q_values: &[f64], temperature: f64) -> Vec<f64> {
    let scaled: Vec<f64> = q_values.iter().map(|q| q / temperature).collect();
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scaled.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
