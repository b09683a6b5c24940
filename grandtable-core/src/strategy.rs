//! Strategy capability and strategy specifications
//!
//! A `Strategy` is a per-match state machine: `initialize` once per matrix,
//! then `act` / `observe` alternating every round. A `StrategySpec` is the
//! immutable recipe the tournament uses to build independent instances.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::matrix::{Action, Payoff, PayoffMatrix, Role};
use crate::strategies::{
    Bully, EpsilonGreedy, FictitiousPlay, MutualBenefit, RandomPlay, RegretMatching,
    Satisficing, Softmax, Ucb,
};

/// Result of one round from a single player's perspective
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub round: u32,
    pub own_action: Action,
    pub own_payoff: Payoff,
    pub opp_action: Action,
    pub opp_payoff: Payoff,
}

/// Online decision rule for repeated play against one opponent
pub trait Strategy: Send + fmt::Debug {
    /// Name used in reports
    fn name(&self) -> &str;

    /// Reset all state for a new matrix, playing as `role`
    fn initialize(&mut self, matrix: &Arc<PayoffMatrix>, role: Role);

    /// Choose this round's action
    fn act(&mut self, round: u32) -> Action;

    /// Learn from this round's outcome
    fn observe(&mut self, obs: &Observation);
}

// ============================================================================
// SPECIFICATIONS
// ============================================================================

/// Construction parameters for every supported strategy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    /// Uniform random play
    Random,
    /// Exploit best empirical mean, explore with probability `epsilon`
    EpsilonGreedy { epsilon: f64 },
    /// Upper confidence bound with exploration weight `confidence`
    Ucb { confidence: f64 },
    /// Repeat while payoff meets a decaying aspiration level
    Satisficing { persistence: f64, aspiration: f64 },
    /// Commit to the action with the best security value
    Bully,
    /// Best respond to accumulated beliefs about the opponent
    FictitiousPlay,
    /// Follow the largest positive average regret
    RegretMatching,
    /// Boltzmann weights over learned Q-values
    Softmax {
        initial_q: f64,
        learning_rate: f64,
        temperature: f64,
    },
    /// Maximise combined payoff of both players
    MutualBenefit,
}

impl StrategySpec {
    /// Report name of the strategy this spec builds
    pub fn name(&self) -> &'static str {
        match self {
            StrategySpec::Random => "Random",
            StrategySpec::EpsilonGreedy { .. } => "EGreedy",
            StrategySpec::Ucb { .. } => "UCB",
            StrategySpec::Satisficing { .. } => "SatisficingPlay",
            StrategySpec::Bully => "Bully",
            StrategySpec::FictitiousPlay => "FictitiousPlay",
            StrategySpec::RegretMatching => "RegretMatching",
            StrategySpec::Softmax { .. } => "Softmax",
            StrategySpec::MutualBenefit => "MutualBenefit",
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |msg: String| Err(GameError::InvalidParameter(msg));
        match *self {
            StrategySpec::EpsilonGreedy { epsilon } if !(0.0..=1.0).contains(&epsilon) => {
                invalid(format!("epsilon must be in [0, 1], got {}", epsilon))
            }
            StrategySpec::Ucb { confidence } if !confidence.is_finite() || confidence < 0.0 => {
                invalid(format!("confidence must be non-negative, got {}", confidence))
            }
            StrategySpec::Satisficing { persistence, aspiration }
                if !(0.0..=1.0).contains(&persistence) || !aspiration.is_finite() =>
            {
                invalid(format!(
                    "persistence must be in [0, 1] and aspiration finite, got ({}, {})",
                    persistence, aspiration
                ))
            }
            StrategySpec::Softmax { initial_q, learning_rate, temperature }
                if !initial_q.is_finite()
                    || !(0.0..=1.0).contains(&learning_rate)
                    || !(temperature > 0.0) =>
            {
                invalid(format!(
                    "softmax needs finite Q, learning rate in [0, 1] and positive temperature, got ({}, {}, {})",
                    initial_q, learning_rate, temperature
                ))
            }
            _ => Ok(()),
        }
    }

    /// Build a fresh, independent strategy instance
    pub fn build(&self, seed: u64) -> Box<dyn Strategy> {
        match *self {
            StrategySpec::Random => Box::new(RandomPlay::new(seed)),
            StrategySpec::EpsilonGreedy { epsilon } => Box::new(EpsilonGreedy::new(epsilon, seed)),
            StrategySpec::Ucb { confidence } => Box::new(Ucb::new(confidence, seed)),
            StrategySpec::Satisficing { persistence, aspiration } => {
                Box::new(Satisficing::new(persistence, aspiration, seed))
            }
            StrategySpec::Bully => Box::new(Bully::new(seed)),
            StrategySpec::FictitiousPlay => Box::new(FictitiousPlay::new(seed)),
            StrategySpec::RegretMatching => Box::new(RegretMatching::new(seed)),
            StrategySpec::Softmax { initial_q, learning_rate, temperature } => {
                Box::new(Softmax::new(initial_q, learning_rate, temperature, seed))
            }
            StrategySpec::MutualBenefit => Box::new(MutualBenefit::new(seed)),
        }
    }

    /// The eight classic learners
    pub fn eight() -> Vec<Self> {
        vec![
            StrategySpec::Random,
            StrategySpec::EpsilonGreedy { epsilon: 0.1 },
            StrategySpec::Ucb { confidence: 1.0 },
            StrategySpec::Satisficing { persistence: 0.1, aspiration: 2.0 },
            StrategySpec::Bully,
            StrategySpec::FictitiousPlay,
            StrategySpec::RegretMatching,
            StrategySpec::Softmax {
                initial_q: 5.0,
                learning_rate: 0.1,
                temperature: 1.0,
            },
        ]
    }

    /// The eight classic learners plus mutual benefit
    pub fn nine() -> Vec<Self> {
        let mut roster = Self::eight();
        roster.push(StrategySpec::MutualBenefit);
        roster
    }

    /// Load a roster (JSON array of specs) and validate every entry
    pub fn load_roster(path: &Path) -> anyhow::Result<Vec<Self>> {
        let content = std::fs::read_to_string(path)?;
        let roster: Vec<Self> = serde_json::from_str(&content)?;

        if roster.is_empty() {
            anyhow::bail!("Roster {} contains no strategies", path.display());
        }
        for spec in &roster {
            spec.validate()?;
        }

        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_sizes() {
        assert_eq!(StrategySpec::eight().len(), 8);
        assert_eq!(StrategySpec::nine().len(), 9);
        assert_eq!(StrategySpec::nine()[8], StrategySpec::MutualBenefit);
    }

    #[test]
    fn test_build_names_match_spec() {
        for spec in StrategySpec::nine() {
            let strategy = spec.build(1);
            assert_eq!(strategy.name(), spec.name());
        }
    }

    #[test]
    fn test_spec_json_format() {
        let json = r#"[
            {"kind": "random"},
            {"kind": "epsilon_greedy", "epsilon": 0.2},
            {"kind": "softmax", "initial_q": 1.0, "learning_rate": 0.5, "temperature": 2.0}
        ]"#;
        let roster: Vec<StrategySpec> = serde_json::from_str(json).unwrap();
        assert_eq!(roster[0], StrategySpec::Random);
        assert_eq!(roster[1], StrategySpec::EpsilonGreedy { epsilon: 0.2 });
        assert_eq!(roster[2].name(), "Softmax");
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(StrategySpec::EpsilonGreedy { epsilon: 1.5 }.validate().is_err());
        assert!(StrategySpec::Ucb { confidence: -1.0 }.validate().is_err());
        assert!(StrategySpec::Softmax {
            initial_q: 0.0,
            learning_rate: 0.1,
            temperature: 0.0
        }
        .validate()
        .is_err());
        for spec in StrategySpec::nine() {
            assert!(spec.validate().is_ok(), "{:?}", spec);
        }
    }

    #[test]
    fn test_load_roster_roundtrip_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.json");
        let json = serde_json::to_string(&StrategySpec::nine()).unwrap();
        std::fs::write(&path, json).unwrap();

        let roster = StrategySpec::load_roster(&path).unwrap();
        assert_eq!(roster, StrategySpec::nine());

        std::fs::write(&path, "[]").unwrap();
        assert!(StrategySpec::load_roster(&path).is_err());
    }
}
