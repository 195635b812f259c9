use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::benchmarks::IndustryMultipliers;
use crate::error::ValuationError;
use crate::input::BusinessInput;
use crate::time_value::{compound, discount_factor};
use crate::types::{Money, Rate};
use crate::wacc::capm_discount_rate;
use crate::ValuationResult;

use super::{MethodCalculator, MethodKind};

pub const PROJECTION_YEARS: u32 = 5;
/// Floor on the revenue growth rate used in the projection.
pub const MIN_GROWTH_RATE: Rate = dec!(0.10);
pub const BASE_MARGIN: Rate = dec!(0.15);
pub const MARGIN_STEP: Rate = dec!(0.05);
pub const MAX_MARGIN_EXPANSION: Rate = dec!(0.15);
/// Perpetual growth after the explicit period; also the floor WACC must clear.
pub const TERMINAL_GROWTH_RATE: Rate = dec!(0.03);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfYear {
    pub year: u32,
    pub revenue: Money,
    pub margin: Rate,
    pub free_cash_flow: Money,
    pub discount_factor: Decimal,
    pub present_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfBreakdown {
    pub growth_rate: Rate,
    pub wacc: Rate,
    pub projections: Vec<DcfYear>,
    /// Sum of discounted free cash flows over the explicit period
    pub pv_of_cash_flows: Money,
    pub terminal_value: Money,
    pub pv_of_terminal: Money,
    pub value: Money,
}

/// Five-year FCF projection with margin expansion and a growing-perpetuity
/// terminal value.
///
/// The terminal value capitalises the *accumulated discounted* cash flows
/// rather than the final year's cash flow, then discounts that back five
/// years again.
pub fn dcf_breakdown(
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
) -> ValuationResult<DcfBreakdown> {
    let wacc = capm_discount_rate(multipliers.beta);
    if wacc <= TERMINAL_GROWTH_RATE {
        return Err(ValuationError::calculation(
            "dcf",
            format!(
                "WACC {wacc} must exceed the terminal growth rate {TERMINAL_GROWTH_RATE}; \
                 terminal value is undefined (beta {})",
                multipliers.beta
            ),
        ));
    }

    let growth_rate = input.market_growth_rate().max(MIN_GROWTH_RATE);
    let base_revenue = input.projected_revenue();

    let mut projections = Vec::with_capacity(PROJECTION_YEARS as usize);
    for year in 1..=PROJECTION_YEARS {
        let revenue = compound(base_revenue, growth_rate, year);
        let margin = BASE_MARGIN + (MARGIN_STEP * Decimal::from(year)).min(MAX_MARGIN_EXPANSION);
        let free_cash_flow = revenue * margin;
        let df = discount_factor(wacc, year)?;
        projections.push(DcfYear {
            year,
            revenue,
            margin,
            free_cash_flow,
            discount_factor: df,
            present_value: free_cash_flow * df,
        });
    }

    let pv_of_cash_flows: Money = projections.iter().map(|p| p.present_value).sum();
    let terminal_value =
        pv_of_cash_flows * (Decimal::ONE + TERMINAL_GROWTH_RATE) / (wacc - TERMINAL_GROWTH_RATE);
    let pv_of_terminal = terminal_value * discount_factor(wacc, PROJECTION_YEARS)?;

    Ok(DcfBreakdown {
        growth_rate,
        wacc,
        projections,
        pv_of_cash_flows,
        terminal_value,
        pv_of_terminal,
        value: (pv_of_cash_flows + pv_of_terminal).max(Decimal::ZERO),
    })
}

pub struct DiscountedCashFlow;

impl MethodCalculator for DiscountedCashFlow {
    fn kind(&self) -> MethodKind {
        MethodKind::Dcf
    }

    fn calculate(
        &self,
        input: &BusinessInput,
        multipliers: &IndustryMultipliers,
    ) -> ValuationResult<Money> {
        Ok(dcf_breakdown(input, multipliers)?.value)
    }
}
