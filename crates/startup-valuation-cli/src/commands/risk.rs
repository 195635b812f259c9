use clap::Args;
use serde_json::Value;

use startup_valuation_core::input::BusinessInput;
use startup_valuation_core::risk;

use crate::input;

/// Arguments for risk analysis
#[derive(Args)]
pub struct RiskArgs {
    /// Path to JSON BusinessInput (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_risk(args: RiskArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let business: BusinessInput = input::load(args.input.as_deref())?;
    business.validate()?;
    let result = risk::analyze_risk(&business);
    Ok(serde_json::to_value(result)?)
}
