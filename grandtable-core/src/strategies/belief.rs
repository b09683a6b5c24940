//! Strategies that read the payoff matrix through a `RoleView`

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use crate::matrix::{Action, PayoffMatrix, Role, RoleView};
use crate::strategy::{Observation, Strategy};
use crate::util::{argmax_uniform, max_indices, seeded_rng, uniform_action};

// ============================================================================
// BULLY
// ============================================================================

/// Commits to the action whose worst best-response outcome is highest
#[derive(Debug)]
pub struct Bully {
    rng: ChaCha8Rng,
    action: Action,
}

impl Bully {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(Some(seed)),
            action: 0,
        }
    }
}

/// For every own action: the opponent's best replies to it, and the lowest
/// own payoff among those replies.
pub fn security_values(view: &RoleView) -> Vec<f64> {
    (0..view.own_actions())
        .map(|own| {
            let opp_payoffs: Vec<f64> = (0..view.opp_actions())
                .map(|opp| view.payoffs(own, opp).1)
                .collect();
            max_indices(&opp_payoffs)
                .into_iter()
                .map(|opp| view.own_payoff(own, opp))
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

impl Strategy for Bully {
    fn name(&self) -> &str {
        "Bully"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        let view = RoleView::new(Arc::clone(matrix), role);
        self.action = argmax_uniform(&mut self.rng, &security_values(&view));
    }

    fn act(&mut self, _round: u32) -> Action {
        self.action
    }

    fn observe(&mut self, _obs: &Observation) {}
}

// ============================================================================
// FICTITIOUS PLAY
// ============================================================================

/// Counts how often each own action would have been a best response
#[derive(Debug)]
pub struct FictitiousPlay {
    rng: ChaCha8Rng,
    view: Option<RoleView>,
    beliefs: Vec<f64>,
}

impl FictitiousPlay {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(Some(seed)),
            view: None,
            beliefs: Vec::new(),
        }
    }
}

impl Strategy for FictitiousPlay {
    fn name(&self) -> &str {
        "FictitiousPlay"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        let view = RoleView::new(Arc::clone(matrix), role);
        self.beliefs = vec![0.0; view.own_actions()];
        self.view = Some(view);
    }

    fn act(&mut self, _round: u32) -> Action {
        argmax_uniform(&mut self.rng, &self.beliefs)
    }

    fn observe(&mut self, obs: &Observation) {
        let Some(view) = &self.view else { return };
        for best in max_indices(&view.own_column(obs.opp_action)) {
            self.beliefs[best] += 1.0;
        }
    }
}

// ============================================================================
// REGRET MATCHING
// ============================================================================

/// Proportional regret matching against the realised opponent actions
#[derive(Debug)]
pub struct RegretMatching {
    rng: ChaCha8Rng,
    view: Option<RoleView>,
    actual: f64,
    hypothetical: Vec<f64>,
    weights: Vec<f64>,
}

impl RegretMatching {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(Some(seed)),
            view: None,
            actual: 0.0,
            hypothetical: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Normalised positive average regrets, all zero when there are none
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Strategy for RegretMatching {
    fn name(&self) -> &str {
        "RegretMatching"
    }

    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role) {
        let view = RoleView::new(Arc::clone(matrix), role);
        let n = view.own_actions();
        self.actual = 0.0;
        self.hypothetical = vec![0.0; n];
        self.weights = vec![0.0; n];
        self.view = Some(view);
    }

    fn act(&mut self, _round: u32) -> Action {
        if self.weights.iter().sum::<f64>() > 0.0 {
            argmax_uniform(&mut self.rng, &self.weights)
        } else {
            uniform_action(&mut self.rng, self.weights.len())
        }
    }

    fn observe(&mut self, obs: &Observation) {
        let Some(view) = &self.view else { return };

        self.actual += obs.own_payoff;
        for (total, payoff) in self.hypothetical.iter_mut().zip(view.own_column(obs.opp_action)) {
            *total += payoff;
        }

        let round = f64::from(obs.round.max(1));
        let regrets: Vec<f64> = self
            .hypothetical
            .iter()
            .map(|h| ((h - self.actual) / round).max(0.0))
            .collect();
        let total: f64 = regrets.iter().sum();

        self.weights = if total > 0.0 {
            regrets.into_iter().map(|r| r / total).collect()
        } else {
            vec![0.0; regrets.len()]
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::FixedSuite;

    fn prisoners() -> Arc<PayoffMatrix> {
        Arc::new(PayoffMatrix::from_array([
            [(2.0, 2.0), (6.0, 0.0)],
            [(0.0, 6.0), (4.0, 4.0)],
        ]))
    }

    #[test]
    fn test_security_values_prisoners_dilemma() {
        let m = prisoners();
        assert_eq!(security_values(&RoleView::new(m.clone(), Role::Row)), vec![2.0, 0.0]);
        assert_eq!(security_values(&RoleView::new(m, Role::Col)), vec![2.0, 0.0]);
    }

    #[test]
    fn test_bully_on_first_fixed_matrix() {
        let suite = FixedSuite::new();
        let m = Arc::clone(suite.matrix(1).unwrap());
        for role in [Role::Row, Role::Col] {
            let mut bully = Bully::new(7);
            bully.initialize(&m, role);
            assert_eq!(bully.act(1), 0, "bully as {}", role);
            assert_eq!(bully.act(500), 0);
        }
    }

    #[test]
    fn test_bully_takes_minimum_over_tied_best_responses() {
        // Opponent is indifferent against row 0, so row 0 is only worth 1
        let m = Arc::new(PayoffMatrix::from_array([
            [(9.0, 5.0), (1.0, 5.0)],
            [(3.0, 1.0), (2.0, 0.0)],
        ]));
        let view = RoleView::new(m.clone(), Role::Row);
        assert_eq!(security_values(&view), vec![1.0, 3.0]);

        let mut bully = Bully::new(0);
        bully.initialize(&m, Role::Row);
        assert_eq!(bully.act(1), 1);
    }

    #[test]
    fn test_fictitious_play_counts_best_responses() {
        let m = prisoners();
        let mut fp = FictitiousPlay::new(1);
        fp.initialize(&m, Role::Row);
        assert_eq!(fp.beliefs, vec![0.0, 0.0]);

        // Against col action 1, row 0 pays 6 and row 1 pays 4
        fp.observe(&Observation {
            round: 1,
            own_action: 1,
            own_payoff: 4.0,
            opp_action: 1,
            opp_payoff: 4.0,
        });
        assert_eq!(fp.beliefs, vec![1.0, 0.0]);
        assert_eq!(fp.act(2), 0);
    }

    #[test]
    fn test_fictitious_play_col_role_reads_second_payoff() {
        let m = Arc::new(PayoffMatrix::from_array([[(0.0, 1.0), (0.0, 3.0), (0.0, 3.0)]]));
        let mut fp = FictitiousPlay::new(1);
        fp.initialize(&m, Role::Col);
        fp.observe(&Observation {
            round: 1,
            own_action: 0,
            own_payoff: 1.0,
            opp_action: 0,
            opp_payoff: 0.0,
        });
        assert_eq!(fp.beliefs, vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_regret_matching_weights() {
        let m = prisoners();
        let mut rm = RegretMatching::new(2);
        rm.initialize(&m, Role::Row);
        assert_eq!(rm.weights(), &[0.0, 0.0]);

        // Played row 1 against col 0: got 0, row 0 would have paid 2
        rm.observe(&Observation {
            round: 1,
            own_action: 1,
            own_payoff: 0.0,
            opp_action: 0,
            opp_payoff: 6.0,
        });
        assert_eq!(rm.weights(), &[1.0, 0.0]);
        assert_eq!(rm.act(2), 0);

        // Played row 0 against col 0: got 2, cumulative actual 2
        // hypothetical [4, 0] -> regrets [1, 0]
        rm.observe(&Observation {
            round: 2,
            own_action: 0,
            own_payoff: 2.0,
            opp_action: 0,
            opp_payoff: 2.0,
        });
        assert_eq!(rm.weights(), &[1.0, 0.0]);
    }

    #[test]
    fn test_regret_matching_no_regret_resets_weights() {
        let m = prisoners();
        let mut rm = RegretMatching::new(2);
        rm.initialize(&m, Role::Row);
        rm.observe(&Observation {
            round: 1,
            own_action: 0,
            own_payoff: 2.0,
            opp_action: 0,
            opp_payoff: 2.0,
        });
        assert_eq!(rm.weights(), &[0.0, 0.0]);
    }

    #[test]
    fn test_observe_before_initialize_is_ignored() {
        let mut fp = FictitiousPlay::new(1);
        fp.observe(&Observation {
            round: 1,
            own_action: 0,
            own_payoff: 0.0,
            opp_action: 0,
            opp_payoff: 0.0,
        });
        assert!(fp.beliefs.is_empty());
    }
}
