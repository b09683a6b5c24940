//! GRANDTABLE Evolve - Population dynamics over a score matrix
//!
//! This crate provides the discrete replicator dynamic:
//! - Proportion presets for 8 and 9 strategy rosters
//! - Replicator steps iterated until the population stops moving
//! - Trajectory rendering
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: evolve (orchestration)
//! - Level 2: ReplicatorDynamic::evolve (iteration)
//! - Level 3: ReplicatorDynamic::step (single update)
//! - Level 4: configuration, presets, errors

mod config;
mod error;
pub mod proportions;
mod replicator;
mod report;

pub use config::DynamicsConfig;
pub use error::DynamicsError;
pub use replicator::{evolve, ReplicatorDynamic, Trajectory};
