use clap::Args;
use serde_json::Value;

use startup_valuation_core::rounds::{self, FundingRound};

use crate::input;

/// Arguments for a funding-round valuation
#[derive(Args)]
pub struct RoundArgs {
    /// pre-seed, seed, series-a or growth
    pub round: String,

    /// Path to JSON with the round's fields (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for listing a round's fields
#[derive(Args)]
pub struct FieldsArgs {
    /// pre-seed, seed, series-a or growth
    pub round: String,
}

pub fn run_round(args: RoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let round: FundingRound = args.round.parse()?;
    let inputs: Value = input::load(args.input.as_deref())?;
    let result = rounds::value_round(round, &inputs)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fields(args: FieldsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let round: FundingRound = args.round.parse()?;
    Ok(serde_json::json!({
        "round": round,
        "fields": rounds::required_fields(round),
    }))
}
