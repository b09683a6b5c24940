//! Payoff matrices and role-oriented views
//!
//! A `PayoffMatrix` is immutable once built. Suites replace the whole
//! matrix on restart and share it as `Arc<PayoffMatrix>` with every match.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Index into a player's move set
pub type Action = usize;

/// Reward for one action pair
pub type Payoff = f64;

// ============================================================================
// ROLE
// ============================================================================

/// Which side of the matrix a player occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Row,
    Col,
}

impl Role {
    /// The other side of the matrix
    pub fn opponent(self) -> Role {
        match self {
            Role::Row => Role::Col,
            Role::Col => Role::Row,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Row => "row",
            Role::Col => "col",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row" => Ok(Role::Row),
            "col" => Ok(Role::Col),
            other => Err(GameError::InvalidRole(other.to_string())),
        }
    }
}

// ============================================================================
// PAYOFF MATRIX
// ============================================================================

/// Two-player normal-form game.
///
/// Rows are row-player actions, columns are column-player actions and each
/// cell holds `(row_payoff, col_payoff)`. Always rectangular with at least
/// one row and one column.
#[derive(Clone, Debug, PartialEq)]
pub struct PayoffMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<(Payoff, Payoff)>,
}

impl PayoffMatrix {
    /// Build from nested rows, validating the shape
    pub fn from_rows(rows: Vec<Vec<(Payoff, Payoff)>>) -> Result<Self, GameError> {
        let row_count = rows.len();
        if row_count == 0 {
            return Err(GameError::MalformedMatrix("matrix has no rows".to_string()));
        }

        let col_count = rows[0].len();
        if col_count == 0 {
            return Err(GameError::MalformedMatrix("matrix has no columns".to_string()));
        }

        let mut cells = Vec::with_capacity(row_count * col_count);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != col_count {
                return Err(GameError::MalformedMatrix(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    col_count
                )));
            }
            cells.extend(row);
        }

        Ok(Self {
            rows: row_count,
            cols: col_count,
            cells,
        })
    }

    /// Build from a fixed-size array, for matrices authored in source and tests.
    /// Anything read at runtime goes through [`PayoffMatrix::from_rows`].
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn from_array<const R: usize, const C: usize>(cells: [[(Payoff, Payoff); C]; R]) -> Self {
        assert!(R > 0 && C > 0, "Authored matrix must be at least 1x1");
        Self {
            rows: R,
            cols: C,
            cells: cells.iter().flatten().copied().collect(),
        }
    }

    /// Row-major cells with a known-good shape
    pub(crate) fn from_parts(rows: usize, cols: usize, cells: Vec<(Payoff, Payoff)>) -> Self {
        debug_assert!(rows > 0 && cols > 0 && cells.len() == rows * cols);
        Self { rows, cols, cells }
    }

    /// Matrix where every cell holds the same payoff pair
    pub fn filled(rows: usize, cols: usize, cell: (Payoff, Payoff)) -> Result<Self, GameError> {
        Self::from_rows(vec![vec![cell; cols]; rows])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Payoff pair at `(row_action, col_action)`
    ///
    /// # Panics
    ///
    /// Panics if either action is outside the matrix.
    pub fn get(&self, row: Action, col: Action) -> (Payoff, Payoff) {
        assert!(
            row < self.rows && col < self.cols,
            "action ({}, {}) outside {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        self.cells[row * self.cols + col]
    }

    /// Action indices available to `role`
    pub fn actions(&self, role: Role) -> Range<Action> {
        match role {
            Role::Row => 0..self.rows,
            Role::Col => 0..self.cols,
        }
    }

    /// Iterate rows as slices of payoff pairs
    pub fn iter_rows(&self) -> impl Iterator<Item = &[(Payoff, Payoff)]> {
        self.cells.chunks(self.cols)
    }

    /// Nested-row copy of the cells
    pub fn to_rows(&self) -> Vec<Vec<(Payoff, Payoff)>> {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }
}

impl fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for (a, b) in row {
                write!(f, "({}, {}) ", a, b)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// ROLE VIEW
// ============================================================================

/// Read-only view of a shared matrix from one player's side.
///
/// Own payoff always comes first, so column players see the matrix
/// transposed without copying it.
#[derive(Clone, Debug)]
pub struct RoleView {
    matrix: Arc<PayoffMatrix>,
    role: Role,
}

impl RoleView {
    pub fn new(matrix: Arc<PayoffMatrix>, role: Role) -> Self {
        Self { matrix, role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Number of actions this player can choose from
    pub fn own_actions(&self) -> usize {
        self.matrix.actions(self.role).len()
    }

    /// Number of actions the opponent can choose from
    pub fn opp_actions(&self) -> usize {
        self.matrix.actions(self.role.opponent()).len()
    }

    /// `(own_payoff, opp_payoff)` when playing `own` against `opp`
    pub fn payoffs(&self, own: Action, opp: Action) -> (Payoff, Payoff) {
        match self.role {
            Role::Row => self.matrix.get(own, opp),
            Role::Col => {
                let (row_payoff, col_payoff) = self.matrix.get(opp, own);
                (col_payoff, row_payoff)
            }
        }
    }

    pub fn own_payoff(&self, own: Action, opp: Action) -> Payoff {
        self.payoffs(own, opp).0
    }

    /// Own payoffs of every action against a fixed opponent action
    pub fn own_column(&self, opp: Action) -> Vec<Payoff> {
        (0..self.own_actions())
            .map(|own| self.own_payoff(own, opp))
            .collect()
    }

    /// Lowest and highest payoff this player can receive
    pub fn own_payoff_range(&self) -> (Payoff, Payoff) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for own in 0..self.own_actions() {
            for opp in 0..self.opp_actions() {
                let p = self.own_payoff(own, opp);
                lo = lo.min(p);
                hi = hi.max(p);
            }
        }
        (lo, hi)
    }
}
