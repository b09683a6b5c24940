//! Text rendering of equilibria
//!
//! Level 4 - Utilities

use std::fmt::Write;

use crate::parse::{Equilibrium, Weight};

fn cell(weight: Weight) -> String {
    match weight {
        Weight::Unused => "----".to_string(),
        Weight::Played(p) => format!("{:.2}", p),
    }
}

/// One block per equilibrium: player 1 and player 2 probability per strategy
pub fn render_equilibria(names: &[String], equilibria: &[Equilibrium]) -> String {
    let padding = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) + 1;
    let hline = format!("{}|", "=".repeat(padding + 14));
    let mut out = String::new();

    for eq in equilibria {
        let _ = writeln!(out, "{}", hline);
        for ((name, row), col) in names.iter().zip(&eq.row).zip(&eq.col) {
            let _ = writeln!(
                out,
                "{:>p$}:{:^6}|{:^6}|",
                name,
                cell(*row),
                cell(*col),
                p = padding
            );
        }
    }
    let _ = writeln!(out, "{}", hline);
    out
}
