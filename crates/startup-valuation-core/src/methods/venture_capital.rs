use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::benchmarks::IndustryMultipliers;
use crate::input::BusinessInput;
use crate::risk::assess_risk;
use crate::types::{Money, Multiple, Score};
use crate::ValuationResult;

use super::{MethodCalculator, MethodKind};

/// Required return multiple before any risk premium.
pub const BASE_TARGET_ROI: Multiple = dec!(10);
/// Years to exit.
pub const EXIT_HORIZON_YEARS: i64 = 5;
/// Overall risk above which the target ROI is loaded with a premium.
const RISK_PREMIUM_THRESHOLD: Score = dec!(0.5);
const RISK_PREMIUM_SCALE: Decimal = dec!(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentureCapitalBreakdown {
    pub terminal_value: Money,
    pub overall_risk: Score,
    pub risk_premium: Multiple,
    pub target_roi: Multiple,
    pub exit_horizon_years: i64,
    pub value: Money,
}

/// VC / terminal-multiple method: exit value discounted by `target_roi^5`.
pub fn venture_capital_breakdown(
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
) -> ValuationResult<VentureCapitalBreakdown> {
    let terminal_value = input.projected_revenue() * multipliers.revenue;
    let overall_risk = assess_risk(input).overall_risk;
    let risk_premium =
        ((overall_risk - RISK_PREMIUM_THRESHOLD) * RISK_PREMIUM_SCALE).max(Decimal::ZERO);
    let target_roi = BASE_TARGET_ROI + risk_premium;

    // target_roi >= 10, so the divisor is never zero
    let value = (terminal_value / target_roi.powi(EXIT_HORIZON_YEARS)).max(Decimal::ZERO);

    Ok(VentureCapitalBreakdown {
        terminal_value,
        overall_risk,
        risk_premium,
        target_roi,
        exit_horizon_years: EXIT_HORIZON_YEARS,
        value,
    })
}

pub struct VentureCapital;

impl MethodCalculator for VentureCapital {
    fn kind(&self) -> MethodKind {
        MethodKind::Vc
    }

    fn calculate(
        &self,
        input: &BusinessInput,
        multipliers: &IndustryMultipliers,
    ) -> ValuationResult<Money> {
        Ok(venture_capital_breakdown(input, multipliers)?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::sample_input;

    #[test]
    fn test_low_risk_uses_base_roi() {
        let out = venture_capital_breakdown(&sample_input(), &IndustryMultipliers::default())
            .unwrap();
        assert_eq!(out.terminal_value, dec!(10000000));
        // overall risk 0.2875 < 0.5: no premium
        assert_eq!(out.risk_premium, Decimal::ZERO);
        assert_eq!(out.target_roi, dec!(10));
        // 10,000,000 / 10^5
        assert_eq!(out.value, dec!(100));
    }

    #[test]
    fn test_high_risk_adds_premium() {
        let mut input = sample_input();
        input.market_metrics.market_research_score = Decimal::ZERO; // market 1.0
        input.basic_info.founder_experience = Decimal::ZERO; // execution 1.0
        input.financials.runway_months = 3; // financial 0.8
        // competition 0.25 -> overall (1 + 1 + 0.8 + 0.25) / 4 = 0.7625
        let out = venture_capital_breakdown(&input, &IndustryMultipliers::default()).unwrap();
        assert_eq!(out.overall_risk, dec!(0.7625));
        assert_eq!(out.risk_premium, dec!(2.625));
        assert_eq!(out.target_roi, dec!(12.625));
        let expected = dec!(10000000) / dec!(12.625).powi(5);
        assert!((out.value - expected).abs() < dec!(0.0001));
    }

    #[test]
    fn test_zero_revenue_is_zero() {
        let mut input = sample_input();
        input.financials.projected_revenue = None;
        let value = VentureCapital
            .calculate(&input, &IndustryMultipliers::default())
            .unwrap();
        assert_eq!(value, Decimal::ZERO);
    }
}
