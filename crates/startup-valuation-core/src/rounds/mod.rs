//! Single-method valuation models keyed by funding round.
//!
//! Unlike the five-method engine these take round-specific financial inputs
//! (MRR and churn for seed, capital structure for Series A, free cash flow
//! for growth) and return one value with its own confidence and risk
//! factors.

pub mod growth;
pub mod pre_seed;
pub mod seed;
pub mod series_a;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ValuationError;
use crate::types::{ComputationOutput, Money, Rate, Score};
use crate::ValuationResult;

pub use growth::{value_growth, GrowthInput, DEFAULT_REGION_MULTIPLIERS};
pub use pre_seed::{value_pre_seed, PreSeedInput};
pub use seed::{value_seed, SeedInput};
pub use series_a::{value_series_a, SeriesAInput};

/// Risk-free rate shared by the round models.
pub const ROUND_RISK_FREE_RATE: Rate = dec!(0.03);
/// Market risk premium shared by the round models.
pub const ROUND_MARKET_RISK_PREMIUM: Rate = dec!(0.055);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingRound {
    PreSeed,
    Seed,
    SeriesA,
    Growth,
}

impl FundingRound {
    pub const ALL: [FundingRound; 4] = [
        FundingRound::PreSeed,
        FundingRound::Seed,
        FundingRound::SeriesA,
        FundingRound::Growth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FundingRound::PreSeed => "pre_seed",
            FundingRound::Seed => "seed",
            FundingRound::SeriesA => "series_a",
            FundingRound::Growth => "growth",
        }
    }
}

impl fmt::Display for FundingRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FundingRound {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pre_seed" | "preseed" => Ok(FundingRound::PreSeed),
            "seed" => Ok(FundingRound::Seed),
            "series_a" | "seriesa" => Ok(FundingRound::SeriesA),
            "growth" => Ok(FundingRound::Growth),
            other => Err(ValuationError::InvalidInput {
                field: "round".into(),
                reason: format!(
                    "Unsupported funding round '{other}'; expected pre_seed, seed, series_a or growth"
                ),
            }),
        }
    }
}

/// Output of a round model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundValuation {
    pub value: Money,
    /// Not clamped; risk factors above 1 can push it below zero.
    pub confidence: Score,
    pub methodology: String,
    pub risk_factors: BTreeMap<String, Score>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Text,
}

/// Validation rule for one round-model input, for upstream forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    pub description: &'static str,
}

impl FieldRule {
    pub(crate) const fn number(
        name: &'static str,
        min: Option<Decimal>,
        max: Option<Decimal>,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            field_type: FieldType::Number,
            min,
            max,
            description,
        }
    }

    pub(crate) const fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Text,
            min: None,
            max: None,
            description,
        }
    }

    pub fn check(&self, value: Decimal) -> ValuationResult<()> {
        if let Some(min) = self.min {
            if value < min {
                return Err(ValuationError::InvalidInput {
                    field: self.name.into(),
                    reason: format!("Must be at least {min}, got {value}"),
                });
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(ValuationError::InvalidInput {
                    field: self.name.into(),
                    reason: format!("Must be at most {max}, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Field rules for a round's model.
pub fn required_fields(round: FundingRound) -> Vec<FieldRule> {
    match round {
        FundingRound::PreSeed => pre_seed::fields(),
        FundingRound::Seed => seed::fields(),
        FundingRound::SeriesA => series_a::fields(),
        FundingRound::Growth => growth::fields(),
    }
}

/// Deserialize `inputs` into the round's input type and run its model.
pub fn value_round(
    round: FundingRound,
    inputs: &serde_json::Value,
) -> ValuationResult<ComputationOutput<RoundValuation>> {
    match round {
        FundingRound::PreSeed => value_pre_seed(&parse_inputs(round, inputs)?),
        FundingRound::Seed => value_seed(&parse_inputs(round, inputs)?),
        FundingRound::SeriesA => value_series_a(&parse_inputs(round, inputs)?),
        FundingRound::Growth => value_growth(&parse_inputs(round, inputs)?),
    }
}

fn parse_inputs<T: DeserializeOwned>(
    round: FundingRound,
    inputs: &serde_json::Value,
) -> ValuationResult<T> {
    serde_json::from_value(inputs.clone()).map_err(|e| {
        let names: Vec<&str> = required_fields(round).iter().map(|r| r.name).collect();
        ValuationError::InvalidInput {
            field: "inputs".into(),
            reason: format!("{e}; {round} requires [{}]", names.join(", ")),
        }
    })
}

/// Check each `(name, value)` against the rule of the same name.
pub(crate) fn check_fields(rules: &[FieldRule], values: &[(&str, Decimal)]) -> ValuationResult<()> {
    for (name, value) in values {
        if let Some(rule) = rules.iter().find(|r| r.name == *name) {
            rule.check(*value)?;
        }
    }
    Ok(())
}

/// Build the risk-factor map and `base * (1 - mean(risks))`.
pub(crate) fn confidence_from_risks(
    base: Decimal,
    risks: &[(&str, Score)],
) -> (BTreeMap<String, Score>, Score) {
    let mean = if risks.is_empty() {
        Decimal::ZERO
    } else {
        risks.iter().map(|(_, r)| *r).sum::<Decimal>() / Decimal::from(risks.len())
    };
    let factors = risks
        .iter()
        .map(|(name, score)| (name.to_string(), *score))
        .collect();
    (factors, base * (Decimal::ONE - mean))
}

pub(crate) fn confidence_warning(confidence: Score) -> Option<String> {
    (confidence < Decimal::ZERO || confidence > Decimal::ONE).then(|| {
        format!("Confidence {confidence} is outside [0, 1]; one or more risk factors exceed 1")
    })
}

pub(crate) fn round_assumptions(round: FundingRound, inputs: &impl Serialize) -> serde_json::Value {
    serde_json::json!({
        "round": round,
        "risk_free_rate": ROUND_RISK_FREE_RATE,
        "market_risk_premium": ROUND_MARKET_RISK_PREMIUM,
        "inputs": inputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_round() {
        assert_eq!("pre-seed".parse::<FundingRound>().unwrap(), FundingRound::PreSeed);
        assert_eq!("Series_A".parse::<FundingRound>().unwrap(), FundingRound::SeriesA);
        match "series_b".parse::<FundingRound>().unwrap_err() {
            ValuationError::InvalidInput { field, .. } => assert_eq!(field, "round"),
            e => panic!("Expected InvalidInput, got {e:?}"),
        }
    }

    #[test]
    fn test_required_fields_per_round() {
        let names = |round| {
            required_fields(round)
                .into_iter()
                .map(|r| r.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(FundingRound::PreSeed), vec!["tam", "team_score", "current_traction"]);
        assert_eq!(names(FundingRound::Seed), vec!["mrr", "mom_growth", "churn", "cac", "ltv"]);
        assert_eq!(names(FundingRound::Growth), vec!["fcf", "growth_rate", "wacc", "region"]);
        assert_eq!(required_fields(FundingRound::SeriesA).len(), 7);
    }

    #[test]
    fn test_seed_rules_serialize_like_form_schema() {
        let json = serde_json::to_value(required_fields(FundingRound::Seed)).unwrap();
        assert_eq!(json[0]["name"], "mrr");
        assert_eq!(json[0]["type"], "number");
        assert_eq!(json[0]["min"], serde_json::json!(10000.0));
        assert!(json[0].get("max").is_none());
    }

    #[test]
    fn test_value_round_dispatch() {
        let inputs = serde_json::json!({
            "tam": 5000000,
            "team_score": 0.8,
            "current_traction": 100000
        });
        let out = value_round(FundingRound::PreSeed, &inputs).unwrap();
        assert_eq!(out.result.methodology, "Pre-Seed Scorecard");
        assert_eq!(out.result.value, dec!(2480000));
    }

    #[test]
    fn test_value_round_missing_field() {
        let inputs = serde_json::json!({ "tam": 5000000 });
        match value_round(FundingRound::PreSeed, &inputs).unwrap_err() {
            ValuationError::InvalidInput { field, reason } => {
                assert_eq!(field, "inputs");
                assert!(reason.contains("team_score"));
            }
            e => panic!("Expected InvalidInput, got {e:?}"),
        }
    }

    #[test]
    fn test_confidence_from_risks() {
        let (factors, confidence) =
            confidence_from_risks(dec!(0.9), &[("a", dec!(0.2)), ("b", dec!(0.4))]);
        assert_eq!(factors.len(), 2);
        assert_eq!(confidence, dec!(0.63));
    }
}
