use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::benchmarks::IndustryMultipliers;
use crate::input::BusinessInput;
use crate::types::{Money, Score};
use crate::ValuationResult;

use super::{MethodCalculator, MethodKind, BASE_UNIT_VALUE};

pub const MANAGEMENT_WEIGHT: Decimal = dec!(0.20);
pub const STAGE_WEIGHT: Decimal = dec!(0.15);
pub const TECHNOLOGY_WEIGHT: Decimal = dec!(0.15);
pub const COMPETITION_WEIGHT: Decimal = dec!(0.10);
pub const FUNDING_WEIGHT: Decimal = dec!(0.10);

/// Stage proxy used when the stage is unknown. Differs from the scorecard's 1.0.
const UNKNOWN_STAGE_PROXY: Decimal = dec!(0.5);
const FUNDED_RUNWAY_MONTHS: u32 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAdjustedBreakdown {
    pub management: Score,
    pub stage: Score,
    pub technology: Score,
    pub competition: Score,
    pub funding: Score,
    /// Weighted recombination; only 0.70 of weight is assigned
    pub risk_score: Score,
    pub assigned_weight: Decimal,
    pub value: Money,
}

/// Risk-adjusted method: `2,500,000 * (1 + risk_score)`.
///
/// The five weights sum to 0.70 and are applied as-is; the missing 0.30 is
/// neither renormalized nor filled.
pub fn risk_adjusted_breakdown(input: &BusinessInput) -> ValuationResult<RiskAdjustedBreakdown> {
    let management = input.basic_info.founder_experience / dec!(10);
    let stage = input
        .basic_info
        .stage
        .multiplier()
        .unwrap_or(UNKNOWN_STAGE_PROXY);
    let technology = input.market_metrics.solution_readiness / dec!(100);
    let competition = Decimal::ONE - input.total_competitor_share() / dec!(100);
    let funding = if input.financials.runway_months > FUNDED_RUNWAY_MONTHS {
        dec!(0.8)
    } else {
        dec!(0.5)
    };

    let risk_score = MANAGEMENT_WEIGHT * management
        + STAGE_WEIGHT * stage
        + TECHNOLOGY_WEIGHT * technology
        + COMPETITION_WEIGHT * competition
        + FUNDING_WEIGHT * funding;

    let value = (BASE_UNIT_VALUE * (Decimal::ONE + risk_score)).max(Decimal::ZERO);

    Ok(RiskAdjustedBreakdown {
        management,
        stage,
        technology,
        competition,
        funding,
        risk_score,
        assigned_weight: MANAGEMENT_WEIGHT
            + STAGE_WEIGHT
            + TECHNOLOGY_WEIGHT
            + COMPETITION_WEIGHT
            + FUNDING_WEIGHT,
        value,
    })
}

pub struct RiskAdjusted;

impl MethodCalculator for RiskAdjusted {
    fn kind(&self) -> MethodKind {
        MethodKind::RiskAdjusted
    }

    fn calculate(
        &self,
        input: &BusinessInput,
        _multipliers: &IndustryMultipliers,
    ) -> ValuationResult<Money> {
        Ok(risk_adjusted_breakdown(input)?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::sample_input;
    use crate::stage::Stage;

    #[test]
    fn test_sample_risk_adjusted() {
        let out = risk_adjusted_breakdown(&sample_input()).unwrap();
        // 0.2*0.8 + 0.15*1.5 + 0.15*0.8 + 0.1*0.75 + 0.1*0.8 = 0.66
        assert_eq!(out.risk_score, dec!(0.66));
        assert_eq!(out.value, dec!(4150000));
    }

    #[test]
    fn test_partial_weight_is_preserved() {
        let out = risk_adjusted_breakdown(&sample_input()).unwrap();
        assert_eq!(out.assigned_weight, dec!(0.70));
    }

    #[test]
    fn test_unknown_stage_proxy_differs_from_scorecard() {
        let mut input = sample_input();
        input.basic_info.stage = Stage::Unknown;
        let out = risk_adjusted_breakdown(&input).unwrap();
        assert_eq!(out.stage, dec!(0.5));
    }

    #[test]
    fn test_funding_requires_more_than_twelve_months() {
        let mut input = sample_input();
        input.financials.runway_months = 12;
        assert_eq!(risk_adjusted_breakdown(&input).unwrap().funding, dec!(0.5));
        input.financials.runway_months = 13;
        assert_eq!(risk_adjusted_breakdown(&input).unwrap().funding, dec!(0.8));
    }

    #[test]
    fn test_ignores_multipliers() {
        let input = sample_input();
        let a = RiskAdjusted
            .calculate(&input, &IndustryMultipliers::default())
            .unwrap();
        let b = RiskAdjusted
            .calculate(
                &input,
                &IndustryMultipliers {
                    revenue: dec!(40),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(a, b);
    }
}
