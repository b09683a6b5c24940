//! Probe command - step one strategy through a scripted round
//!
//! Initialises the strategy on a fixed-suite matrix, asks for the first
//! action, feeds back a made-up outcome and prints the internal state
//! before and after.

use anyhow::{bail, Context, Result};
use clap::Args;

use grandtable_core::{Action, FixedSuite, Observation, Payoff, Role, StrategySpec};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ProbeArgs {
    /// Strategy name from the built-in roster (e.g. Bully, UCB) or a JSON spec
    #[arg(long)]
    pub strategy: String,

    /// Side to play: row or col
    #[arg(long, default_value = "row")]
    pub role: String,

    /// Fixed-suite matrix number (1-10)
    #[arg(long, default_value = "1")]
    pub matrix: usize,

    /// Opponent action in the scripted round
    #[arg(long, default_value = "1")]
    pub opp_action: Action,

    /// Own payoff in the scripted round
    #[arg(long, default_value = "1.5")]
    pub own_payoff: Payoff,

    /// Opponent payoff in the scripted round
    #[arg(long, default_value = "2.0")]
    pub opp_payoff: Payoff,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run probe command
pub fn run(args: ProbeArgs, seed: Option<u64>) -> Result<()> {
    let spec = parse_strategy(&args.strategy)?;
    let role: Role = args.role.parse()?;

    let suite = FixedSuite::new();
    let matrix = suite
        .matrix(args.matrix)
        .with_context(|| format!("Fixed suite has no matrix {} (1-{})", args.matrix, suite.len()))?;
    if !matrix.actions(role.opponent()).contains(&args.opp_action) {
        bail!(
            "Opponent action {} is outside 0..{} on matrix {}",
            args.opp_action,
            matrix.actions(role.opponent()).end,
            args.matrix
        );
    }

    println!("Matrix {}:", args.matrix);
    print!("{}", matrix);

    let mut strategy = spec.build(seed.unwrap_or_else(rand::random));
    strategy.initialize(matrix, role);
    println!("{} initialised as {} player:\n{:#?}", strategy.name(), role, strategy);

    let action = strategy.act(1);
    println!("Strategy plays action: {}", action);

    strategy.observe(&Observation {
        round: 1,
        own_action: action,
        own_payoff: args.own_payoff,
        opp_action: args.opp_action,
        opp_payoff: args.opp_payoff,
    });
    println!("State after update:\n{:#?}", strategy);

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Built-in spec by report name (case-insensitive), or an inline JSON spec
pub fn parse_strategy(input: &str) -> Result<StrategySpec> {
    let spec = if input.trim_start().starts_with('{') {
        serde_json::from_str(input).with_context(|| format!("Invalid strategy spec {}", input))?
    } else {
        StrategySpec::nine()
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(input))
            .with_context(|| format!("Unknown strategy '{}'", input))?
    };
    spec.validate()?;
    Ok(spec)
}
