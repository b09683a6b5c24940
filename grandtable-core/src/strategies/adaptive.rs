//! Random play, satisficing and mutual benefit

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use super::Tally;
use crate::matrix::{Action, Payoff, PayoffMatrix, Role, RoleView};
use crate::strategy::{Observation, Strategy};
use crate::util::{argmax_uniform, seeded_rng, uniform_action};

// ============================================================================
// RANDOM
// ============================================================================

/// Uniform random play, ignores all feedback
#[derive(Debug)]
pub struct RandomPlay {
    rng: ChaCha8Rng,
    actions: usize,
}

impl RandomPlay {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(Some(seed)),
            actions: 0,
        }
    }
}

impl Strategy for RandomPlay {
    fn name(&self) -> &str {
        "Random"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        self.actions = matrix.actions(role).len();
    }

    fn act(&mut self, _round: u32) -> Action {
        uniform_action(&mut self.rng, self.actions)
    }

    fn observe(&mut self, _obs: &Observation) {}
}

// ============================================================================
// SATISFICING
// ============================================================================

/// Keeps the previous action while it meets a decaying aspiration level
#[derive(Debug)]
pub struct Satisficing {
    persistence: f64,
    initial_aspiration: f64,
    aspiration: f64,
    previous: Option<(Action, Payoff)>,
    rng: ChaCha8Rng,
    actions: usize,
}

impl Satisficing {
    pub fn new(persistence: f64, aspiration: f64, seed: u64) -> Self {
        Self {
            persistence,
            initial_aspiration: aspiration,
            aspiration,
            previous: None,
            rng: seeded_rng(Some(seed)),
            actions: 0,
        }
    }

    pub fn aspiration(&self) -> f64 {
        self.aspiration
    }
}

impl Strategy for Satisficing {
    fn name(&self) -> &str {
        "SatisficingPlay"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        self.actions = matrix.actions(role).len();
        self.aspiration = self.initial_aspiration;
        self.previous = None;
    }

    fn act(&mut self, _round: u32) -> Action {
        match self.previous {
            Some((action, payoff)) if payoff >= self.aspiration => action,
            _ => uniform_action(&mut self.rng, self.actions),
        }
    }

    fn observe(&mut self, obs: &Observation) {
        self.previous = Some((obs.own_action, obs.own_payoff));
        self.aspiration =
            self.persistence * self.aspiration + (1.0 - self.persistence) * obs.own_payoff;
    }
}

// ============================================================================
// MUTUAL BENEFIT
// ============================================================================

/// Greedy on the average joint payoff of both players
#[derive(Debug)]
pub struct MutualBenefit {
    rng: ChaCha8Rng,
    tally: Tally,
}

impl MutualBenefit {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(Some(seed)),
            tally: Tally::default(),
        }
    }
}

impl Strategy for MutualBenefit {
    fn name(&self) -> &str {
        "MutualBenefit"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        let view = RoleView::new(Arc::clone(matrix), role);
        let (lo, hi) = view.own_payoff_range();
        self.tally.reset(view.own_actions(), (lo + hi) / 2.0);
    }

    fn act(&mut self, _round: u32) -> Action {
        argmax_uniform(&mut self.rng, &self.tally.means())
    }

    fn observe(&mut self, obs: &Observation) {
        self.tally.record(obs.own_action, obs.own_payoff + obs.opp_payoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(round: u32, action: Action, payoff: Payoff) -> Observation {
        Observation {
            round,
            own_action: action,
            own_payoff: payoff,
            opp_action: 0,
            opp_payoff: 0.0,
        }
    }

    #[test]
    fn test_random_covers_all_actions() {
        let m = Arc::new(PayoffMatrix::filled(3, 5, (0.0, 0.0)).unwrap());
        let mut s = RandomPlay::new(42);
        s.initialize(&m, Role::Col);

        let mut seen = [false; 5];
        for round in 1..=500 {
            seen[s.act(round)] = true;
        }
        assert!(seen.iter().all(|&x| x));
    }

    #[test]
    fn test_satisficing_aspiration_update() {
        let m = Arc::new(PayoffMatrix::filled(2, 2, (1.0, 1.0)).unwrap());
        let mut s = Satisficing::new(0.1, 2.0, 1);
        s.initialize(&m, Role::Row);

        s.observe(&observation(1, 1, 3.0));
        // 0.1 * 2 + 0.9 * 3 = 2.9
        assert!((s.aspiration() - 2.9).abs() < 1e-12);
        // Payoff 3 meets aspiration 2.9, so the action repeats
        for round in 2..20 {
            assert_eq!(s.act(round), 1);
        }
    }

    #[test]
    fn test_satisficing_explores_below_aspiration() {
        let m = Arc::new(PayoffMatrix::filled(2, 4, (1.0, 1.0)).unwrap());
        let mut s = Satisficing::new(0.9, 100.0, 1);
        s.initialize(&m, Role::Col);
        s.observe(&observation(1, 0, 1.0));

        let mut seen = [false; 4];
        for round in 2..200 {
            seen[s.act(round)] = true;
        }
        assert!(seen.iter().all(|&x| x));
    }

    #[test]
    fn test_satisficing_initialize_restores_aspiration() {
        let m = Arc::new(PayoffMatrix::filled(2, 2, (1.0, 1.0)).unwrap());
        let mut s = Satisficing::new(0.5, 2.0, 1);
        s.initialize(&m, Role::Row);
        s.observe(&observation(1, 0, 0.0));
        assert_eq!(s.aspiration(), 1.0);

        s.initialize(&m, Role::Row);
        assert_eq!(s.aspiration(), 2.0);
        assert!(s.previous.is_none());
    }

    #[test]
    fn test_mutual_benefit_initial_means_and_update() {
        let m = Arc::new(PayoffMatrix::from_array([
            [(2.0, 2.0), (6.0, 0.0)],
            [(0.0, 6.0), (4.0, 4.0)],
        ]));
        let mut s = MutualBenefit::new(5);
        s.initialize(&m, Role::Row);
        // (0 + 6) / 2 = 3 for every action
        assert_eq!(s.tally.means(), vec![3.0, 3.0]);

        s.observe(&Observation {
            round: 1,
            own_action: 1,
            own_payoff: 4.0,
            opp_action: 1,
            opp_payoff: 4.0,
        });
        // (3 + 8) / 2 = 5.5
        assert_eq!(s.tally.means(), vec![3.0, 5.5]);
        assert_eq!(s.act(2), 1);
    }
}
