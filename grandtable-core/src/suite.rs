//! Matrix suites - sources of payoff matrices with restart support
//!
//! Three suites:
//! - `FixedSuite`: authored sequence, fails once exhausted
//! - `RandomSuite` with integer payoffs in [1, 3]
//! - `RandomSuite` with real payoffs in [0.0, 3.0)
//!
//! Random suites draw both dimensions uniformly from [2, 5].

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::GameError;
use crate::matrix::{Action, PayoffMatrix, Role};
use crate::util::seeded_rng;

/// Smallest and largest action count drawn by random suites
pub const MIN_ACTIONS: usize = 2;
pub const MAX_ACTIONS: usize = 5;

/// Source of payoff matrices that can be regenerated between restarts
pub trait MatrixSuite: Send {
    /// Stable label for reporting
    fn name(&self) -> &str;

    /// Matrix currently in play
    fn current(&self) -> &Arc<PayoffMatrix>;

    /// Number of the current matrix, starting at 1
    fn generation(&self) -> usize;

    /// Replace the current matrix with the next one
    fn regenerate(&mut self) -> Result<(), GameError>;

    /// Actions available to `role` in the current matrix
    fn actions(&self, role: Role) -> Range<Action> {
        self.current().actions(role)
    }
}

impl fmt::Display for dyn MatrixSuite + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: Matrix {}", self.name(), self.generation())?;
        write!(f, "{}", self.current())
    }
}

// ============================================================================
// FIXED SUITE
// ============================================================================

/// Predetermined sequence of matrices.
///
/// With the classic list, at most 9 restarts are possible.
#[derive(Clone, Debug)]
pub struct FixedSuite {
    matrices: Vec<Arc<PayoffMatrix>>,
    /// 1-based index of the active matrix
    k: usize,
}

impl FixedSuite {
    /// The ten classic matrices
    pub fn new() -> Self {
        Self {
            matrices: classic_matrices().into_iter().map(Arc::new).collect(),
            k: 1,
        }
    }

    /// Custom authored sequence
    pub fn from_matrices(matrices: Vec<PayoffMatrix>) -> Result<Self, GameError> {
        if matrices.is_empty() {
            return Err(GameError::MalformedMatrix(
                "fixed suite needs at least one matrix".to_string(),
            ));
        }
        Ok(Self {
            matrices: matrices.into_iter().map(Arc::new).collect(),
            k: 1,
        })
    }

    /// Number of authored matrices
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Authored matrix by 1-based number
    pub fn matrix(&self, number: usize) -> Option<&Arc<PayoffMatrix>> {
        number.checked_sub(1).and_then(|i| self.matrices.get(i))
    }
}

impl Default for FixedSuite {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixSuite for FixedSuite {
    fn name(&self) -> &str {
        "Fixed Matrix Suite"
    }

    fn current(&self) -> &Arc<PayoffMatrix> {
        &self.matrices[self.k - 1]
    }

    fn generation(&self) -> usize {
        self.k
    }

    fn regenerate(&mut self) -> Result<(), GameError> {
        if self.k >= self.matrices.len() {
            return Err(GameError::Exhausted {
                requested: self.k + 1,
                available: self.matrices.len(),
            });
        }
        self.k += 1;
        Ok(())
    }
}

/// Classic curated matrices, in play order
fn classic_matrices() -> Vec<PayoffMatrix> {
    vec![
        PayoffMatrix::from_array([[(2.0, 2.0), (6.0, 0.0)], [(0.0, 6.0), (4.0, 4.0)]]),
        PayoffMatrix::from_array([[(9.0, 2.0), (2.0, 8.0)], [(8.0, 0.0), (1.0, 7.0)]]),
        PayoffMatrix::from_array([[(1.0, 8.0), (1.0, 1.0)], [(2.0, 1.0), (2.0, 9.0)]]),
        PayoffMatrix::from_array([
            [(1.0, 8.0), (9.0, 0.0), (6.0, 3.0)],
            [(9.0, 0.0), (0.0, 9.0), (0.0, 9.0)],
            [(9.0, 0.0), (2.0, 7.0), (9.0, 0.0)],
        ]),
        PayoffMatrix::from_array([
            [(3.0, 3.0), (4.0, 4.0), (9.0, 9.0)],
            [(2.0, 2.0), (0.0, 0.0), (6.0, 6.0)],
            [(1.0, 1.0), (5.0, 5.0), (8.0, 8.0)],
        ]),
        PayoffMatrix::from_array([
            [(9.0, 1.0), (0.0, 2.0), (10.0, 1.0)],
            [(8.0, 2.0), (8.0, 2.0), (8.0, 0.0)],
            [(0.0, 1.0), (1.0, 1.0), (1.0, 9.0)],
        ]),
        PayoffMatrix::from_array([
            [(2.0, 8.0), (1.0, 8.0), (7.0, 1.0)],
            [(7.0, 0.0), (1.0, 7.0), (8.0, 2.0)],
            [(7.0, 2.0), (7.0, 2.0), (8.0, 0.0)],
        ]),
        PayoffMatrix::from_array([
            [(2.0, 2.0), (4.0, 1.0), (6.0, 0.0)],
            [(1.0, 4.0), (3.0, 3.0), (5.0, 2.0)],
            [(0.0, 6.0), (2.0, 5.0), (4.0, 4.0)],
        ]),
        PayoffMatrix::from_array([
            [(5.0, 9.0), (0.0, 10.0), (9.0, 6.0), (3.0, 2.0)],
            [(7.0, 7.0), (1.0, 1.0), (4.0, 1.0), (1.0, 7.0)],
            [(3.0, 0.0), (4.0, 0.0), (9.0, 3.0), (5.0, 9.0)],
            [(2.0, 1.0), (2.0, 7.0), (0.0, 10.0), (0.0, 9.0)],
        ]),
        PayoffMatrix::from_array([
            [(10.0, 0.0), (4.0, 6.0), (5.0, 5.0), (8.0, 2.0)],
            [(8.0, 2.0), (5.0, 5.0), (6.0, 4.0), (10.0, 0.0)],
            [(5.0, 5.0), (8.0, 2.0), (0.0, 10.0), (8.0, 2.0)],
            [(1.0, 9.0), (4.0, 6.0), (7.0, 3.0), (6.0, 4.0)],
        ]),
    ]
}

// ============================================================================
// RANDOM SUITES
// ============================================================================

/// Payoff distribution for random suites
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RandomPayoffs {
    /// Whole numbers uniform in [1, 3]
    Integer,
    /// Reals uniform in [0.0, 3.0)
    Real,
}

/// Suite that draws a fresh random matrix on every restart
#[derive(Clone, Debug)]
pub struct RandomSuite {
    payoffs: RandomPayoffs,
    rng: ChaCha8Rng,
    current: Arc<PayoffMatrix>,
    generation: usize,
}

impl RandomSuite {
    /// Create a suite and draw matrix #1
    pub fn new(payoffs: RandomPayoffs, seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let current = Arc::new(generate_matrix(payoffs, &mut rng));
        Self {
            payoffs,
            rng,
            current,
            generation: 1,
        }
    }

    /// Integer payoffs in [1, 3]
    pub fn integer(seed: Option<u64>) -> Self {
        Self::new(RandomPayoffs::Integer, seed)
    }

    /// Real payoffs in [0.0, 3.0)
    pub fn real(seed: Option<u64>) -> Self {
        Self::new(RandomPayoffs::Real, seed)
    }

    pub fn payoffs(&self) -> RandomPayoffs {
        self.payoffs
    }
}

impl MatrixSuite for RandomSuite {
    fn name(&self) -> &str {
        match self.payoffs {
            RandomPayoffs::Integer => "Random Int Matrix Suite",
            RandomPayoffs::Real => "Random Float Matrix Suite",
        }
    }

    fn current(&self) -> &Arc<PayoffMatrix> {
        &self.current
    }

    fn generation(&self) -> usize {
        self.generation
    }

    fn regenerate(&mut self) -> Result<(), GameError> {
        self.current = Arc::new(generate_matrix(self.payoffs, &mut self.rng));
        self.generation += 1;
        Ok(())
    }
}

/// Draw shape, then every payoff independently
fn generate_matrix<R: Rng>(payoffs: RandomPayoffs, rng: &mut R) -> PayoffMatrix {
    let rows = rng.gen_range(MIN_ACTIONS..=MAX_ACTIONS);
    let cols = rng.gen_range(MIN_ACTIONS..=MAX_ACTIONS);

    let mut cells = Vec::with_capacity(rows * cols);
    for _ in 0..rows * cols {
        let row_payoff = draw_payoff(payoffs, rng);
        let col_payoff = draw_payoff(payoffs, rng);
        cells.push((row_payoff, col_payoff));
    }

    PayoffMatrix::from_parts(rows, cols, cells)
}

fn draw_payoff<R: Rng>(payoffs: RandomPayoffs, rng: &mut R) -> f64 {
    match payoffs {
        RandomPayoffs::Integer => rng.gen_range(1..=3u32) as f64,
        RandomPayoffs::Real => rng.gen_range(0.0..3.0),
    }
}
