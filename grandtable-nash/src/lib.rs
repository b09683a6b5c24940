//! GRANDTABLE Nash - Mixed equilibria of a score matrix
//!
//! This crate treats the score matrix as a symmetric two-player game and
//! hands it to an external equilibrium solver:
//! - NFG text encoding
//! - The `EquilibriumSolver` port and the gambit-enummixed adapter
//! - Parsing and rendering of the solver's equilibria
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: nash_equilibria (orchestration)
//! - Level 2: encode_nfg, EquilibriumSolver::solve, parse_equilibria (phases)
//! - Level 3: process invocation, field parsing (steps)
//! - Level 4: errors, rendering

mod error;
mod nfg;
mod parse;
mod report;
mod solver;

pub use error::SolverError;
pub use nfg::encode_nfg;
pub use parse::{parse_equilibria, Equilibrium, Weight};
pub use report::render_equilibria;
pub use solver::{EquilibriumSolver, GambitEnumMixed, GAMBIT_EXECUTABLE};

/// Encode, solve and parse (Level 1 orchestration)
///
/// # Arguments
/// * `table` - Square score matrix, `table[i][j]` is i's payoff against j
/// * `solver` - Equilibrium solver to run
///
/// # Returns
/// Every equilibrium the solver reports, in its output order
pub fn nash_equilibria(
    table: &[Vec<f64>],
    solver: &dyn EquilibriumSolver,
) -> Result<Vec<Equilibrium>, SolverError> {
    let nfg = encode_nfg(table)?;
    let output = solver.solve(&nfg)?;
    let equilibria = parse_equilibria(&output, table.len())?;
    tracing::info!("Solver reported {} equilibria", equilibria.len());
    Ok(equilibria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Canned {
        output: String,
        seen: RefCell<Option<String>>,
    }

    impl EquilibriumSolver for Canned {
        fn solve(&self, nfg: &str) -> Result<String, SolverError> {
            *self.seen.borrow_mut() = Some(nfg.to_string());
            Ok(self.output.clone())
        }
    }

    #[test]
    fn test_nash_equilibria_with_canned_solver() {
        let solver = Canned {
            output: "NE,0.00,1.00,0.00,1.00\n".to_string(),
            seen: RefCell::new(None),
        };
        let table = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let equilibria = nash_equilibria(&table, &solver).unwrap();

        assert_eq!(
            solver.seen.borrow().as_deref(),
            Some(r#"NFG 1 R "" { "1" "2" } { 2 2 } 1 1 3 2 2 3 4 4"#)
        );
        assert_eq!(equilibria.len(), 1);
        assert_eq!(equilibria[0].row, vec![Weight::Unused, Weight::Played(1.0)]);
    }

    #[test]
    fn test_nash_equilibria_rejects_ragged_table() {
        let solver = Canned {
            output: String::new(),
            seen: RefCell::new(None),
        };
        let table = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            nash_equilibria(&table, &solver),
            Err(SolverError::NotSquare { .. })
        ));
        assert!(solver.seen.borrow().is_none());
    }
}
