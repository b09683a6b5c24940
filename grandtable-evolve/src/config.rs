//! Configuration for population dynamics
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};

/// Stopping rule for the replicator dynamic
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicsConfig {
    /// Converged once consecutive vectors are closer than this (Euclidean)
    pub tolerance: f64,
    /// Give up after this many steps
    pub max_steps: usize,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            max_steps: 10_000,
        }
    }
}

impl DynamicsConfig {
    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set step cap
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}
