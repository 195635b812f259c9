use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ValuationError;
use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::ValuationResult;

/// Risk-free rate used across the engine.
pub const RISK_FREE_RATE: Rate = dec!(0.03);
/// Market risk premium applied to beta in the DCF discount rate.
pub const MARKET_RISK_PREMIUM: Rate = dec!(0.06);

/// CAPM discount rate: `Rf + beta * MRP`.
///
/// Startups carry no debt in the engine's model, so this is the full WACC.
pub fn capm_discount_rate(beta: Decimal) -> Rate {
    RISK_FREE_RATE + beta * MARKET_RISK_PREMIUM
}

/// Inputs for a capital-structure weighted cost of capital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaccInput {
    /// E/V
    pub equity_ratio: Rate,
    /// D/V
    pub debt_ratio: Rate,
    /// Re
    pub cost_of_equity: Rate,
    /// Pre-tax Rd
    pub cost_of_debt: Rate,
    /// Marginal tax rate
    pub tax_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaccOutput {
    pub wacc: Rate,
    pub after_tax_cost_of_debt: Rate,
}

/// WACC = E/V * Re + D/V * Rd * (1 - t)
pub fn weighted_cost_of_capital(input: &WaccInput) -> ValuationResult<Rate> {
    validate_wacc_input(input)?;
    let after_tax_cost_of_debt = input.cost_of_debt * (Decimal::ONE - input.tax_rate);
    Ok(input.equity_ratio * input.cost_of_equity + input.debt_ratio * after_tax_cost_of_debt)
}

pub fn calculate_wacc(input: &WaccInput) -> ValuationResult<ComputationOutput<WaccOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let wacc = weighted_cost_of_capital(input)?;
    let after_tax_cost_of_debt = input.cost_of_debt * (Decimal::ONE - input.tax_rate);

    let weight_sum = input.equity_ratio + input.debt_ratio;
    if (weight_sum - Decimal::ONE).abs() > dec!(0.01) {
        warnings.push(format!(
            "Equity and debt ratios sum to {weight_sum}, not 1.0; WACC is not a true weighted average"
        ));
    }
    if wacc > dec!(0.30) {
        warnings.push(format!("WACC of {wacc} exceeds 30%; verify cost of equity"));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "WACC from capital structure weights",
        input,
        warnings,
        elapsed,
        WaccOutput {
            wacc,
            after_tax_cost_of_debt,
        },
    ))
}

fn validate_wacc_input(input: &WaccInput) -> ValuationResult<()> {
    if input.equity_ratio < Decimal::ZERO || input.debt_ratio < Decimal::ZERO {
        return Err(ValuationError::InvalidInput {
            field: "equity_ratio / debt_ratio".into(),
            reason: "Capital structure ratios cannot be negative".into(),
        });
    }
    if input.cost_of_equity < Decimal::ZERO {
        return Err(ValuationError::InvalidInput {
            field: "cost_of_equity".into(),
            reason: "Cost of equity cannot be negative".into(),
        });
    }
    if input.cost_of_debt < Decimal::ZERO {
        return Err(ValuationError::InvalidInput {
            field: "cost_of_debt".into(),
            reason: "Cost of debt cannot be negative".into(),
        });
    }
    if input.tax_rate < Decimal::ZERO || input.tax_rate > Decimal::ONE {
        return Err(ValuationError::InvalidInput {
            field: "tax_rate".into(),
            reason: "Tax rate must be between 0 and 1".into(),
        });
    }
    Ok(())
}
