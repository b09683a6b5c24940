//! Plain-text rendering of a trajectory

use std::fmt::Write;

use crate::replicator::Trajectory;

impl Trajectory {
    /// Summary line plus the final share of every strategy
    pub fn render(&self, names: &[String]) -> String {
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0) + 1;
        let mut out = String::new();

        let status = if self.converged { "converged" } else { "did not converge" };
        let _ = writeln!(out, "Replicator dynamic {} after {} steps", status, self.steps);
        for (name, share) in names.iter().zip(self.final_proportions()) {
            let _ = writeln!(out, "{:>w$}: {:.4}", name, share, w = width);
        }
        out
    }

    /// The whole history as a numeric grid, one row per step
    pub fn to_grid(&self) -> String {
        let mut out = String::new();
        for (step, row) in self.history.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|p| format!("{:.6}", p)).collect();
            let _ = writeln!(out, "{} {}", step, cells.join(" "));
        }
        out
    }
}
