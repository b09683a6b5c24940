//! Error types for equilibrium solving

/// Errors raised while encoding, solving or parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("{0} executable not found in the current directory or on PATH; install Gambit or pass its path explicitly")]
    Unavailable(String),

    #[error("equilibrium solver failed: {0}")]
    Invocation(String),

    #[error("malformed solver output line '{line}': {reason}")]
    MalformedOutput { line: String, reason: String },

    #[error("score matrix must be square and non-empty: row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },
}
