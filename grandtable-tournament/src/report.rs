//! Fixed-width text rendering of a score matrix
//!
//! Level 4 - Utilities

use std::fmt;

use crate::grand_table::ScoreMatrix;

/// Column width; names are truncated to fit
const WIDTH: usize = 7;

impl fmt::Display for ScoreMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = format!("{:>w$.w$}||", "", w = WIDTH);
        for name in self.names() {
            header.push_str(&format!("{:^w$.w$}|", name, w = WIDTH));
        }
        header.push_str(&format!("|{:^w$.w$}|", "MEAN", w = WIDTH));

        let hline = "=".repeat(header.chars().count());
        writeln!(f, "{}", hline)?;
        writeln!(f, "{}", header)?;

        for ((name, row), mean) in self.names().iter().zip(self.scores()).zip(self.row_means()) {
            write!(f, "{:>w$.w$}||", name, w = WIDTH)?;
            for score in row {
                write!(f, "{:^w$.2}|", score, w = WIDTH)?;
            }
            writeln!(f, "|{:^w$.2}|", mean, w = WIDTH)?;
        }

        writeln!(f, "{}", hline)
    }
}
