//! Discrete replicator dynamic
//!
//! Level 1 - Orchestration through Level 3 - Steps

use serde::{Deserialize, Serialize};

use crate::config::DynamicsConfig;
use crate::error::DynamicsError;

/// Every population vector visited, starting with the initial one
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub history: Vec<Vec<f64>>,
    pub steps: usize,
    pub converged: bool,
}

impl Trajectory {
    /// Population after the last step
    pub fn final_proportions(&self) -> &[f64] {
        self.history.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Replicator dynamic over a square score matrix
pub struct ReplicatorDynamic<'a> {
    table: &'a [Vec<f64>],
    proportions: Vec<f64>,
    history: Vec<Vec<f64>>,
    config: DynamicsConfig,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run the replicator dynamic from `start` until it settles
pub fn evolve(
    table: &[Vec<f64>],
    start: &[f64],
    config: DynamicsConfig,
) -> Result<Trajectory, DynamicsError> {
    ReplicatorDynamic::new(table, start, config)?.evolve()
}

impl<'a> ReplicatorDynamic<'a> {
    /// Validate the table and normalise the start proportions
    pub fn new(
        table: &'a [Vec<f64>],
        start: &[f64],
        config: DynamicsConfig,
    ) -> Result<Self, DynamicsError> {
        let n = table.len();
        for (row, entries) in table.iter().enumerate() {
            if entries.len() != n {
                return Err(DynamicsError::NotSquare {
                    row,
                    len: entries.len(),
                    expected: n,
                });
            }
        }
        if start.len() != n {
            return Err(DynamicsError::DimensionMismatch {
                strategies: n,
                proportions: start.len(),
            });
        }

        let proportions = normalise(start)?;
        Ok(Self {
            table,
            history: vec![proportions.clone()],
            proportions,
            config,
        })
    }

    pub fn proportions(&self) -> &[f64] {
        &self.proportions
    }

    pub fn history(&self) -> &[Vec<f64>] {
        &self.history
    }

    // ========================================================================
    // Level 2 - Iteration
    // ========================================================================

    /// Step until the distance between consecutive vectors drops below tolerance
    pub fn evolve(mut self) -> Result<Trajectory, DynamicsError> {
        let mut steps = 0;
        let mut converged = false;

        while steps < self.config.max_steps {
            let distance = self.step()?;
            steps += 1;
            if distance < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            tracing::info!("Replicator dynamic converged after {} steps", steps);
        } else {
            tracing::warn!(
                "Replicator dynamic did not converge within {} steps",
                self.config.max_steps
            );
        }

        Ok(Trajectory {
            history: self.history,
            steps,
            converged,
        })
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// One replicator update, returning the Euclidean distance moved
    pub fn step(&mut self) -> Result<f64, DynamicsError> {
        let fitness = mat_vec(self.table, &self.proportions);
        let weighted: Vec<f64> = self
            .proportions
            .iter()
            .zip(&fitness)
            .map(|(p, f)| p * f)
            .collect();

        let total: f64 = weighted.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(DynamicsError::Degenerate(total));
        }

        let next: Vec<f64> = weighted.into_iter().map(|w| w / total).collect();
        let distance = euclidean(&self.proportions, &next);

        tracing::debug!("Replicator step: distance {:.6}", distance);

        self.history.push(next.clone());
        self.proportions = next;
        Ok(distance)
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

fn normalise(values: &[f64]) -> Result<Vec<f64>, DynamicsError> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(DynamicsError::InvalidProportions(format!(
            "proportion {} is negative or not finite",
            bad
        )));
    }
    let total: f64 = values.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(DynamicsError::InvalidProportions(format!(
            "proportions sum to {}",
            total
        )));
    }
    Ok(values.iter().map(|v| v / total).collect())
}

fn mat_vec(table: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    table
        .iter()
        .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
        .collect()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
