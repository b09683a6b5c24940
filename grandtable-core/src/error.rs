//! Error types for matrix games

/// Errors raised by matrices, suites and strategy specifications
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("matrix suite exhausted: matrix {requested} requested but only {available} authored (too many restarts)")]
    Exhausted { requested: usize, available: usize },

    #[error("player should be either 'row' or 'col', not '{0}'")]
    InvalidRole(String),

    #[error("malformed payoff matrix: {0}")]
    MalformedMatrix(String),

    #[error("invalid strategy parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_mentions_restarts() {
        let err = GameError::Exhausted { requested: 11, available: 10 };
        let msg = err.to_string();
        assert!(msg.contains("11"));
        assert!(msg.contains("too many restarts"));
    }

    #[test]
    fn test_invalid_role_message() {
        let err = GameError::InvalidRole("diagonal".to_string());
        assert_eq!(err.to_string(), "player should be either 'row' or 'col', not 'diagonal'");
    }
}
