//! Error types for population dynamics

/// Errors raised while setting up or stepping the replicator dynamic
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DynamicsError {
    #[error("{proportions} proportions given for a {strategies}x{strategies} score matrix")]
    DimensionMismatch { strategies: usize, proportions: usize },

    #[error("score matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("proportions cannot be normalised: {0}")]
    InvalidProportions(String),

    #[error("population fitness is {0}, cannot normalise step")]
    Degenerate(f64),

    #[error("no reference proportions for {0} strategies (only 8 and 9)")]
    NoPreset(usize),
}
