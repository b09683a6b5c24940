//! GRANDTABLE Core - Matrix games and learning strategies
//!
//! This crate provides the building blocks for repeated matrix games:
//! - Payoff matrices and role-oriented views
//! - Matrix suites (fixed sequence, random integer, random real)
//! - Online learning strategies (bandit, belief and regret rules)
//! - Shared selection utilities (uniform tie-breaking, seeded RNG)

pub mod error;
pub mod matrix;
pub mod suite;
pub mod strategy;
pub mod strategies;
pub mod util;

// Re-exports for convenient access
pub use error::GameError;
pub use matrix::{Action, Payoff, PayoffMatrix, Role, RoleView};
pub use suite::{FixedSuite, MatrixSuite, RandomPayoffs, RandomSuite};
pub use strategy::{Observation, Strategy, StrategySpec};
pub use util::seeded_rng;
