use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::benchmarks::IndustryMultipliers;
use crate::input::BusinessInput;
use crate::types::{Money, Multiple, Score};
use crate::ValuationResult;

use super::{MethodCalculator, MethodKind, BASE_UNIT_VALUE};

pub const TEAM_WEIGHT: Decimal = dec!(0.30);
pub const MARKET_SIZE_WEIGHT: Decimal = dec!(0.25);
pub const TECHNOLOGY_WEIGHT: Decimal = dec!(0.15);
pub const COMPETITION_WEIGHT: Decimal = dec!(0.10);
/// Not scored from input; its weight contributes nothing to the sum.
pub const TRACTION_WEIGHT: Decimal = dec!(0.10);
/// Not scored from input; its weight contributes nothing to the sum.
pub const BUSINESS_MODEL_WEIGHT: Decimal = dec!(0.10);

/// TAM at which the market-size score saturates.
const TAM_CAP_BILLIONS: Decimal = dec!(10);
/// Stage multiplier applied when the stage is unknown.
const UNKNOWN_STAGE_MULTIPLIER: Multiple = dec!(1.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardBreakdown {
    pub team_score: Score,
    pub market_size_score: Score,
    pub technology_score: Score,
    pub competition_score: Score,
    pub weighted_score: Score,
    /// Weight actually backed by a scored factor (0.80)
    pub modeled_weight: Decimal,
    pub stage_multiplier: Multiple,
    pub revenue_multiple: Multiple,
    pub value: Money,
}

/// Scorecard method: weighted factor score x base unit x revenue multiple x stage.
///
/// Traction and business model carry weight but have no score, so the
/// weighted sum tops out at 0.80 rather than 1.0.
pub fn scorecard_breakdown(
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
) -> ValuationResult<ScorecardBreakdown> {
    let team_score = input.basic_info.founder_experience / dec!(10);
    let tam_billions = input.tam() / dec!(1000000000);
    let market_size_score = tam_billions.min(TAM_CAP_BILLIONS) / TAM_CAP_BILLIONS;
    let technology_score = input.market_metrics.solution_readiness / dec!(100);
    let competition_score = (dec!(100) - input.total_competitor_share()) / dec!(100);

    let weighted_score = TEAM_WEIGHT * team_score
        + MARKET_SIZE_WEIGHT * market_size_score
        + TECHNOLOGY_WEIGHT * technology_score
        + COMPETITION_WEIGHT * competition_score;

    let stage_multiplier = input
        .basic_info
        .stage
        .multiplier()
        .unwrap_or(UNKNOWN_STAGE_MULTIPLIER);

    let value = (BASE_UNIT_VALUE * weighted_score * multipliers.revenue * stage_multiplier)
        .max(Decimal::ZERO);

    Ok(ScorecardBreakdown {
        team_score,
        market_size_score,
        technology_score,
        competition_score,
        weighted_score,
        modeled_weight: TEAM_WEIGHT + MARKET_SIZE_WEIGHT + TECHNOLOGY_WEIGHT + COMPETITION_WEIGHT,
        stage_multiplier,
        revenue_multiple: multipliers.revenue,
        value,
    })
}

pub struct Scorecard;

impl MethodCalculator for Scorecard {
    fn kind(&self) -> MethodKind {
        MethodKind::Scorecard
    }

    fn calculate(
        &self,
        input: &BusinessInput,
        multipliers: &IndustryMultipliers,
    ) -> ValuationResult<Money> {
        Ok(scorecard_breakdown(input, multipliers)?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::sample_input;
    use crate::stage::Stage;

    #[test]
    fn test_sample_scorecard() {
        let out = scorecard_breakdown(&sample_input(), &IndustryMultipliers::default()).unwrap();
        assert_eq!(out.team_score, dec!(0.8));
        assert_eq!(out.market_size_score, dec!(0.5));
        assert_eq!(out.technology_score, dec!(0.8));
        assert_eq!(out.competition_score, dec!(0.75));
        // 0.24 + 0.125 + 0.12 + 0.075
        assert_eq!(out.weighted_score, dec!(0.56));
        // 2,500,000 * 0.56 * 10 * 1.5
        assert_eq!(out.value, dec!(21000000));
    }

    #[test]
    fn test_partial_weight_is_preserved() {
        // Traction and business model are weighted but unscored: the modeled
        // weight stays at 0.80 and is not renormalized to 1.0.
        let out = scorecard_breakdown(&sample_input(), &IndustryMultipliers::default()).unwrap();
        assert_eq!(out.modeled_weight, dec!(0.80));
        assert_eq!(
            out.modeled_weight + TRACTION_WEIGHT + BUSINESS_MODEL_WEIGHT,
            Decimal::ONE
        );
    }

    #[test]
    fn test_tam_contribution_caps_at_ten_billion() {
        let mut input = sample_input();
        input.market_metrics.market_size.tam = Some(dec!(50000000000));
        let out = scorecard_breakdown(&input, &IndustryMultipliers::default()).unwrap();
        assert_eq!(out.market_size_score, Decimal::ONE);
    }

    #[test]
    fn test_unknown_stage_uses_unit_multiplier() {
        let mut input = sample_input();
        input.basic_info.stage = Stage::Unknown;
        let out = scorecard_breakdown(&input, &IndustryMultipliers::default()).unwrap();
        assert_eq!(out.stage_multiplier, dec!(1.0));
    }

    #[test]
    fn test_stage_monotonicity() {
        let mut input = sample_input();
        let mut previous = Decimal::ZERO;
        for stage in Stage::ORDERED {
            input.basic_info.stage = stage;
            let value = Scorecard
                .calculate(&input, &IndustryMultipliers::default())
                .unwrap();
            assert!(value >= previous, "{stage} decreased the scorecard value");
            previous = value;
        }
    }

    #[test]
    fn test_never_negative() {
        let mut input = sample_input();
        input.basic_info.founder_experience = Decimal::ZERO;
        input.market_metrics.solution_readiness = Decimal::ZERO;
        input.market_metrics.market_size.tam = Some(Decimal::ZERO);
        input.competitive.competitors[0].market_share = dec!(100);
        input.competitive.competitors[1].market_share = dec!(100);
        let value = Scorecard
            .calculate(&input, &IndustryMultipliers::default())
            .unwrap();
        assert_eq!(value, Decimal::ZERO);
    }
}
