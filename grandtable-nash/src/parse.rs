//! Parsing of solver output lines
//!
//! Level 2 - Phases and Level 3 - Steps

use serde::Serialize;

use crate::error::SolverError;

/// Solver output for an action outside the support
const UNUSED: &str = "0.00";

/// Probability of one action in a mixed equilibrium
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Weight {
    Played(f64),
    /// Reported as exactly `0.00`
    Unused,
}

impl Weight {
    pub fn probability(self) -> f64 {
        match self {
            Weight::Played(p) => p,
            Weight::Unused => 0.0,
        }
    }
}

/// One equilibrium: player 1 and player 2 mixed strategies
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Equilibrium {
    pub tag: String,
    pub row: Vec<Weight>,
    pub col: Vec<Weight>,
}

/// Parse every non-blank line of solver output for an `n`-strategy game
pub fn parse_equilibria(output: &str, n: usize) -> Result<Vec<Equilibrium>, SolverError> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| parse_line(line, n))
        .collect()
}

fn parse_line(line: &str, n: usize) -> Result<Equilibrium, SolverError> {
    let malformed = |reason: String| SolverError::MalformedOutput {
        line: line.to_string(),
        reason,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 1 + 2 * n {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            1 + 2 * n,
            fields.len()
        )));
    }

    let weights = fields[1..]
        .iter()
        .map(|field| parse_weight(field).ok_or_else(|| malformed(format!("bad probability '{}'", field))))
        .collect::<Result<Vec<_>, _>>()?;
    let (row, col) = weights.split_at(n);

    Ok(Equilibrium {
        tag: fields[0].to_string(),
        row: row.to_vec(),
        col: col.to_vec(),
    })
}

/// Decimal or `a/b` fraction
fn parse_weight(field: &str) -> Option<Weight> {
    if field == UNUSED {
        return Some(Weight::Unused);
    }
    let value = match field.split_once('/') {
        Some((num, den)) => {
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num.trim().parse::<f64>().ok()? / den
        }
        None => field.parse().ok()?,
    };
    Some(Weight::Played(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_equilibrium() {
        let eq = parse_equilibria("NE,0.00,1.00,0.00,1.00\n", 2).unwrap();
        assert_eq!(
            eq,
            vec![Equilibrium {
                tag: "NE".to_string(),
                row: vec![Weight::Unused, Weight::Played(1.0)],
                col: vec![Weight::Unused, Weight::Played(1.0)],
            }]
        );
    }

    #[test]
    fn test_parse_multiple_and_blank_lines() {
        let output = "NE,0.50,0.50,0.50,0.50\n\nNE,1.00,0.00,1.00,0.00\r\n";
        let eq = parse_equilibria(output, 2).unwrap();
        assert_eq!(eq.len(), 2);
        assert_eq!(eq[1].row[1], Weight::Unused);
        assert_eq!(eq[0].col[0].probability(), 0.5);
    }

    #[test]
    fn test_parse_fractions() {
        let eq = parse_equilibria("NE,1/3,2/3,0,1", 2).unwrap();
        assert!((eq[0].row[0].probability() - 1.0 / 3.0).abs() < 1e-12);
        // A bare zero is a value, only the solver's "0.00" marks non-support
        assert_eq!(eq[0].col[0], Weight::Played(0.0));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let err = parse_equilibria("NE,0.00,1.00,0.00", 2).unwrap_err();
        assert!(matches!(err, SolverError::MalformedOutput { .. }));
        assert!(err.to_string().contains("expected 5 fields"));
    }

    #[test]
    fn test_parse_bad_number() {
        assert!(parse_equilibria("NE,abc,1.00,0.00,1.00", 2).is_err());
        assert!(parse_equilibria("NE,1/0,1.00,0.00,1.00", 2).is_err());
    }

    #[test]
    fn test_serialize_weights() {
        let eq = parse_equilibria("NE,0.00,1.00,0.25,0.75", 2).unwrap();
        let json = serde_json::to_string(&eq[0]).unwrap();
        assert_eq!(json, r#"{"tag":"NE","row":[null,1.0],"col":[0.25,0.75]}"#);
    }
}
