use napi::Result as NapiResult;
use napi_derive::napi;

use startup_valuation_core::benchmarks::IndustryMultipliers;
use startup_valuation_core::input::BusinessInput;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Caller-resolved multipliers, or the defaults when none are given.
fn parse_multipliers(multipliers_json: Option<String>) -> NapiResult<IndustryMultipliers> {
    match multipliers_json {
        Some(json) => {
            let m: IndustryMultipliers = serde_json::from_str(&json).map_err(to_napi_error)?;
            m.validate().map_err(to_napi_error)?;
            Ok(m)
        }
        None => Ok(IndustryMultipliers::default()),
    }
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_startup_valuation(
    input_json: String,
    multipliers_json: Option<String>,
    ai_insights: Option<String>,
) -> NapiResult<String> {
    let input: BusinessInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let multipliers = parse_multipliers(multipliers_json)?;
    let output = startup_valuation_core::aggregator::calculate_valuation(
        &input,
        &multipliers,
        ai_insights,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_valuation_method(
    method: String,
    input_json: String,
    multipliers_json: Option<String>,
) -> NapiResult<String> {
    let kind: startup_valuation_core::methods::MethodKind =
        method.parse().map_err(to_napi_error)?;
    let input: BusinessInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let multipliers = parse_multipliers(multipliers_json)?;
    let output = startup_valuation_core::methods::run_method(kind, &input, &multipliers)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_startup_risk(input_json: String) -> NapiResult<String> {
    let input: BusinessInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = startup_valuation_core::risk::analyze_risk(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Funding rounds
// ---------------------------------------------------------------------------

#[napi]
pub fn value_funding_round(round: String, input_json: String) -> NapiResult<String> {
    let round: startup_valuation_core::rounds::FundingRound =
        round.parse().map_err(to_napi_error)?;
    let inputs: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        startup_valuation_core::rounds::value_round(round, &inputs).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn funding_round_fields(round: String) -> NapiResult<String> {
    let round: startup_valuation_core::rounds::FundingRound =
        round.parse().map_err(to_napi_error)?;
    serde_json::to_string(&startup_valuation_core::rounds::required_fields(round))
        .map_err(to_napi_error)
}
