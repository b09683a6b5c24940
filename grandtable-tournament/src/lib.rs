//! GRANDTABLE Tournament - Round-robin evaluation of learning strategies
//!
//! This crate provides tournament infrastructure:
//! - Match play between a row and a column strategy on one matrix
//! - The grand table: every strategy against every strategy, averaged
//!   over matrix restarts
//! - Text rendering of the resulting score matrix
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_grand_table (orchestration)
//! - Level 2: GrandTable::play (restart phases)
//! - Level 3: MatchSimulator::play_round (steps)
//! - Level 4: configuration, errors, reporting

mod config;
mod error;
mod grand_table;
mod match_play;
mod report;

pub use config::TournamentConfig;
pub use error::TournamentError;
pub use grand_table::{run_grand_table, GrandTable, ScoreMatrix};
pub use match_play::{MatchSimulator, RoundRecord};
