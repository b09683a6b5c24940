//! Configuration types for grand table runs
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};

use crate::error::TournamentError;

/// Grand table configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Matrix regenerations after the first matrix (R + 1 matrices in total)
    pub restarts: usize,
    /// Rounds played on every matrix
    pub rounds: u32,
    /// Whether to play the matches of one round in parallel
    pub parallel: bool,
    /// Base seed for strategy RNGs (None = random)
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            restarts: 9,
            rounds: 1000,
            parallel: true,
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Create config with the given restarts and rounds per restart
    pub fn new(restarts: usize, rounds: u32) -> Self {
        Self {
            restarts,
            rounds,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Play every match on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Number of matrices played, including the first
    pub fn matrices(&self) -> usize {
        self.restarts + 1
    }

    /// Reject configurations that cannot produce a score matrix
    pub fn validate(&self, strategies: usize) -> Result<(), TournamentError> {
        if strategies == 0 {
            return Err(TournamentError::EmptyRoster);
        }
        if self.rounds == 0 {
            return Err(TournamentError::NoRounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_config_defaults() {
        let config = TournamentConfig::default();
        assert_eq!(config.restarts, 9);
        assert_eq!(config.rounds, 1000);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert_eq!(config.matrices(), 10);
    }

    #[test]
    fn test_tournament_config_builders() {
        let config = TournamentConfig::new(19, 50).with_seed(7).sequential();
        assert_eq!(config.restarts, 19);
        assert_eq!(config.rounds, 50);
        assert_eq!(config.seed, Some(7));
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate() {
        assert!(TournamentConfig::default().validate(8).is_ok());
        assert!(matches!(
            TournamentConfig::default().validate(0),
            Err(TournamentError::EmptyRoster)
        ));
        assert!(matches!(
            TournamentConfig::new(0, 0).validate(2),
            Err(TournamentError::NoRounds)
        ));
    }
}
