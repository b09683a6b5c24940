//! Start proportion presets
//!
//! Level 4 - Utilities

use crate::error::DynamicsError;

const NON_UNIFORM_EIGHT: [f64; 8] = [0.22, 0.19, 0.04, 0.06, 0.13, 0.10, 0.05, 0.21];
const NON_UNIFORM_NINE: [f64; 9] = [0.12, 0.08, 0.06, 0.15, 0.05, 0.21, 0.06, 0.09, 0.18];

/// Equal share for every strategy
pub fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

/// Reference skewed population for the 8 and 9 strategy rosters
pub fn non_uniform(n: usize) -> Result<Vec<f64>, DynamicsError> {
    match n {
        8 => Ok(NON_UNIFORM_EIGHT.to_vec()),
        9 => Ok(NON_UNIFORM_NINE.to_vec()),
        other => Err(DynamicsError::NoPreset(other)),
    }
}
