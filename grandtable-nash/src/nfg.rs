//! Normal-form game text encoding
//!
//! Level 2 - Phases

use std::fmt::Write;

use crate::error::SolverError;

/// Encode a square score matrix as a symmetric two-player NFG game.
///
/// Player 1's payoff at `(i, j)` is `table[i][j]` and player 2's is
/// `table[j][i]`. Outcomes are listed with player 1's action varying
/// fastest.
pub fn encode_nfg(table: &[Vec<f64>]) -> Result<String, SolverError> {
    let n = table.len();
    if n == 0 {
        return Err(SolverError::NotSquare {
            row: 0,
            len: 0,
            expected: 1,
        });
    }
    if let Some((row, entries)) = table.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(SolverError::NotSquare {
            row,
            len: entries.len(),
            expected: n,
        });
    }

    let mut out = format!(r#"NFG 1 R "" {{ "1" "2" }} {{ {} {} }}"#, n, n);
    for col in 0..n {
        for row in 0..n {
            // Writing to a String cannot fail
            let _ = write!(out, " {} {}", table[row][col], table[col][row]);
        }
    }
    Ok(out)
}
