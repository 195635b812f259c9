use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::benchmarks::normalize_industry;
use crate::error::ValuationError;
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::ValuationResult;

use super::{
    check_fields, confidence_from_risks, confidence_warning, round_assumptions, FieldRule,
    FundingRound, RoundValuation,
};

/// Regional risk multipliers applied to the terminal value.
pub const DEFAULT_REGION_MULTIPLIERS: [(&str, Multiple); 5] = [
    ("north_america", dec!(1.0)),
    ("europe", dec!(0.9)),
    ("asia_pacific", dec!(0.85)),
    ("latin_america", dec!(0.8)),
    ("africa", dec!(0.75)),
];
const UNKNOWN_REGION_MULTIPLIER: Multiple = dec!(0.8);
/// FCF at which scale risk halves.
const SCALE_UNIT: Money = dec!(1000000);
const BASE_CONFIDENCE: Decimal = dec!(0.85);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthInput {
    /// Current free cash flow
    pub fcf: Money,
    /// Perpetual growth rate
    pub growth_rate: Rate,
    pub wacc: Rate,
    pub region: String,
    /// Replaces the default region table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_multipliers: Option<BTreeMap<String, Multiple>>,
}

pub(crate) fn fields() -> Vec<FieldRule> {
    vec![
        FieldRule::number("fcf", Some(Decimal::ZERO), None, "Free cash flow in USD"),
        FieldRule::number(
            "growth_rate",
            None,
            Some(Decimal::ONE),
            "Long-term growth rate (as decimal)",
        ),
        FieldRule::number(
            "wacc",
            Some(Decimal::ZERO),
            Some(Decimal::ONE),
            "Weighted average cost of capital (as decimal)",
        ),
        FieldRule::text(
            "region",
            "Operating region, e.g. north_america, europe, asia_pacific",
        ),
    ]
}

/// Multiplier for a region, from the override table when given. Unknown
/// regions get 0.8.
pub fn region_multiplier(region: &str, overrides: Option<&BTreeMap<String, Multiple>>) -> Multiple {
    let key = normalize_industry(region);
    match overrides {
        Some(table) => table
            .iter()
            .find(|(k, _)| normalize_industry(k) == key)
            .map(|(_, m)| *m),
        None => DEFAULT_REGION_MULTIPLIERS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, m)| *m),
    }
    .unwrap_or(UNKNOWN_REGION_MULTIPLIER)
}

/// Growth-stage terminal value: Gordon growth on current FCF, scaled by a
/// regional risk multiplier.
pub fn value_growth(input: &GrowthInput) -> ValuationResult<ComputationOutput<RoundValuation>> {
    let start = Instant::now();
    check_fields(
        &fields(),
        &[
            ("fcf", input.fcf),
            ("growth_rate", input.growth_rate),
            ("wacc", input.wacc),
        ],
    )?;

    if input.wacc <= input.growth_rate {
        return Err(ValuationError::calculation(
            "growth terminal value",
            format!(
                "WACC ({}) must be greater than growth rate ({})",
                input.wacc, input.growth_rate
            ),
        ));
    }
    if input.wacc.is_zero() {
        return Err(ValuationError::DivisionByZero {
            context: "growth risk (WACC is zero)".into(),
        });
    }

    let terminal_value =
        input.fcf * (Decimal::ONE + input.growth_rate) / (input.wacc - input.growth_rate);
    let multiplier = region_multiplier(&input.region, input.region_multipliers.as_ref());
    let value = terminal_value * multiplier;

    let (risk_factors, confidence) = confidence_from_risks(
        BASE_CONFIDENCE,
        &[
            ("growth_risk", input.growth_rate / input.wacc),
            ("region_risk", Decimal::ONE - multiplier),
            ("scale_risk", Decimal::ONE / (Decimal::ONE + input.fcf / SCALE_UNIT)),
        ],
    );

    let mut warnings: Vec<String> = Vec::new();
    if input.growth_rate > dec!(0.05) {
        warnings.push(format!(
            "Perpetual growth of {} exceeds typical long-run economic growth",
            input.growth_rate
        ));
    }
    warnings.extend(confidence_warning(confidence));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Growth Terminal Value",
        &round_assumptions(FundingRound::Growth, input),
        warnings,
        elapsed,
        RoundValuation {
            value,
            confidence,
            methodology: "Growth Terminal Value".into(),
            risk_factors,
        },
    ))
}
