//! Error types for grand table runs

use grandtable_core::GameError;

/// Errors that abort a grand table run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TournamentError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("tournament needs at least one strategy")]
    EmptyRoster,

    #[error("tournament needs at least one round per restart")]
    NoRounds,

    #[error("malformed score matrix: {0}")]
    MalformedScores(String),
}
