use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ValuationError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::wacc::{calculate_wacc, WaccInput};
use crate::ValuationResult;

use super::{
    check_fields, confidence_from_risks, confidence_warning, round_assumptions, FieldRule,
    FundingRound, RoundValuation,
};

const DCF_WEIGHT: Decimal = dec!(0.6);
const COMPARABLE_WEIGHT: Decimal = dec!(0.4);
/// WACC treated as "high" when normalizing cost-of-capital risk.
const HIGH_WACC: Rate = dec!(0.15);
const BASE_CONFIDENCE: Decimal = dec!(0.9);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesAInput {
    pub dcf_value: Money,
    pub comparable_value: Money,
    pub equity_ratio: Rate,
    pub debt_ratio: Rate,
    pub cost_of_equity: Rate,
    pub cost_of_debt: Rate,
    pub tax_rate: Rate,
}

pub(crate) fn fields() -> Vec<FieldRule> {
    vec![
        FieldRule::number("dcf_value", Some(Decimal::ZERO), None, "DCF valuation in USD"),
        FieldRule::number(
            "comparable_value",
            Some(Decimal::ZERO),
            None,
            "Comparable-company valuation in USD",
        ),
        FieldRule::number(
            "equity_ratio",
            Some(Decimal::ZERO),
            Some(Decimal::ONE),
            "Equity share of capital, E/V",
        ),
        FieldRule::number(
            "debt_ratio",
            Some(Decimal::ZERO),
            Some(Decimal::ONE),
            "Debt share of capital, D/V",
        ),
        FieldRule::number("cost_of_equity", Some(Decimal::ZERO), None, "Cost of equity (as decimal)"),
        FieldRule::number("cost_of_debt", Some(Decimal::ZERO), None, "Pre-tax cost of debt (as decimal)"),
        FieldRule::number(
            "tax_rate",
            Some(Decimal::ZERO),
            Some(Decimal::ONE),
            "Marginal tax rate (as decimal)",
        ),
    ]
}

/// Series A hybrid: 60/40 blend of DCF and comparable values, with risk
/// drawn from the capital structure.
pub fn value_series_a(input: &SeriesAInput) -> ValuationResult<ComputationOutput<RoundValuation>> {
    let start = Instant::now();
    check_fields(
        &fields(),
        &[
            ("dcf_value", input.dcf_value),
            ("comparable_value", input.comparable_value),
            ("equity_ratio", input.equity_ratio),
            ("debt_ratio", input.debt_ratio),
            ("cost_of_equity", input.cost_of_equity),
            ("cost_of_debt", input.cost_of_debt),
            ("tax_rate", input.tax_rate),
        ],
    )?;

    let wacc_output = calculate_wacc(&WaccInput {
        equity_ratio: input.equity_ratio,
        debt_ratio: input.debt_ratio,
        cost_of_equity: input.cost_of_equity,
        cost_of_debt: input.cost_of_debt,
        tax_rate: input.tax_rate,
    })?;
    let wacc = wacc_output.result.wacc;

    let value = input.dcf_value * DCF_WEIGHT + input.comparable_value * COMPARABLE_WEIGHT;

    let larger = input.dcf_value.max(input.comparable_value);
    if larger.is_zero() {
        return Err(ValuationError::DivisionByZero {
            context: "Series A valuation divergence (DCF and comparable values are both zero)"
                .into(),
        });
    }
    let divergence = (input.dcf_value - input.comparable_value).abs() / larger;

    let (risk_factors, confidence) = confidence_from_risks(
        BASE_CONFIDENCE,
        &[
            ("capital_structure_risk", input.debt_ratio),
            ("cost_of_capital_risk", wacc / HIGH_WACC),
            ("valuation_divergence", divergence),
        ],
    );

    let mut warnings = wacc_output.warnings;
    warnings.extend(confidence_warning(confidence));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Series A Hybrid",
        &round_assumptions(FundingRound::SeriesA, input),
        warnings,
        elapsed,
        RoundValuation {
            value,
            confidence,
            methodology: "Series A Hybrid".into(),
            risk_factors,
        },
    ))
}
