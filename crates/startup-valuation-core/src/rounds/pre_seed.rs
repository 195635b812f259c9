use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Score};
use crate::ValuationResult;

use super::{check_fields, confidence_warning, round_assumptions, FieldRule, FundingRound, RoundValuation};

const TAM_WEIGHT: Decimal = dec!(0.4);
const TEAM_WEIGHT: Decimal = dec!(0.6);
/// Dollar value of a perfect team score.
const TEAM_UNIT_VALUE: Money = dec!(1000000);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreSeedInput {
    pub tam: Money,
    /// 0..1
    pub team_score: Score,
    /// Revenue or users to date, in the same unit as `tam`
    #[serde(default)]
    pub current_traction: Decimal,
}

pub(crate) fn fields() -> Vec<FieldRule> {
    vec![
        FieldRule::number(
            "tam",
            Some(Decimal::ZERO),
            None,
            "Total addressable market in USD",
        ),
        FieldRule::number(
            "team_score",
            Some(Decimal::ZERO),
            Some(Decimal::ONE),
            "Team strength score on a 0-1 scale",
        ),
        FieldRule::number(
            "current_traction",
            Some(Decimal::ZERO),
            None,
            "Current revenue or users",
        ),
    ]
}

/// Pre-seed scorecard: `tam * 0.4 + team_score * 1,000,000 * 0.6`.
pub fn value_pre_seed(input: &PreSeedInput) -> ValuationResult<ComputationOutput<RoundValuation>> {
    let start = Instant::now();
    check_fields(
        &fields(),
        &[
            ("tam", input.tam),
            ("team_score", input.team_score),
            ("current_traction", input.current_traction),
        ],
    )?;

    let value = input.tam * TAM_WEIGHT + input.team_score * TEAM_UNIT_VALUE * TEAM_WEIGHT;

    let traction_ratio = if input.tam > Decimal::ZERO {
        input.current_traction / input.tam
    } else {
        Decimal::ZERO
    };
    let market_risk = Decimal::ONE - traction_ratio.min(Decimal::ONE);
    let execution_risk = Decimal::ONE - input.team_score;
    let confidence = dec!(0.7) * (Decimal::ONE - market_risk) + dec!(0.3) * input.team_score;

    let risk_factors = [
        ("market_risk".to_string(), market_risk),
        ("execution_risk".to_string(), execution_risk),
    ]
    .into_iter()
    .collect();

    let warnings = confidence_warning(confidence).into_iter().collect();
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Pre-Seed Scorecard",
        &round_assumptions(FundingRound::PreSeed, input),
        warnings,
        elapsed,
        RoundValuation {
            value,
            confidence,
            methodology: "Pre-Seed Scorecard".into(),
            risk_factors,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;

    fn sample_input() -> PreSeedInput {
        PreSeedInput {
            tam: dec!(5000000),
            team_score: dec!(0.8),
            current_traction: dec!(100000),
        }
    }

    #[test]
    fn test_pre_seed_valuation() {
        // 5M * 0.4 + 0.8 * 1M * 0.6
        let out = value_pre_seed(&sample_input()).unwrap();
        assert!((out.result.value - dec!(2480000)).abs() < dec!(0.01));
        assert_eq!(out.result.methodology, "Pre-Seed Scorecard");
    }

    #[test]
    fn test_pre_seed_risks_and_confidence() {
        let out = value_pre_seed(&sample_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.risk_factors["market_risk"], dec!(0.98));
        assert_eq!(r.risk_factors["execution_risk"], dec!(0.2));
        // 0.7 * 0.02 + 0.3 * 0.8
        assert_eq!(r.confidence, dec!(0.254));
        assert!(r.risk_factors.values().all(|v| *v >= Decimal::ZERO && *v <= Decimal::ONE));
    }

    #[test]
    fn test_zero_tam_means_full_market_risk() {
        let input = PreSeedInput {
            tam: Decimal::ZERO,
            ..sample_input()
        };
        let out = value_pre_seed(&input).unwrap();
        assert_eq!(out.result.risk_factors["market_risk"], Decimal::ONE);
        assert_eq!(out.result.value, dec!(480000));
    }

    #[test]
    fn test_traction_above_tam_caps_ratio() {
        let input = PreSeedInput {
            current_traction: dec!(9000000),
            ..sample_input()
        };
        let out = value_pre_seed(&input).unwrap();
        assert_eq!(out.result.risk_factors["market_risk"], Decimal::ZERO);
    }

    #[test]
    fn test_team_score_out_of_range() {
        let input = PreSeedInput {
            team_score: dec!(1.5),
            ..sample_input()
        };
        match value_pre_seed(&input).unwrap_err() {
            ValuationError::InvalidInput { field, .. } => assert_eq!(field, "team_score"),
            e => panic!("Expected InvalidInput, got {e:?}"),
        }
    }
}
