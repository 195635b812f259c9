//! Structured risk model.
//!
//! Four independent sub-scores, each nominally on a 0..1 scale:
//!
//! 1. **Market** -- `1 - marketResearchScore/100`.
//! 2. **Execution** -- `1 - founderExperience/10`, clamped to `[0, 1]`.
//! 3. **Financial** -- step function on runway: 0.8 under 12 months, else 0.4.
//! 4. **Competition** -- aggregate competitor share / 100. Not clamped; can
//!    exceed 1 when share estimates overlap.
//!
//! `overall_risk` is the equal-weighted mean of the four.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::input::BusinessInput;
use crate::types::{clamp, with_metadata, ComputationOutput, Score};

const LOW_IMPACT_CEILING: Decimal = dec!(0.3);
const MEDIUM_IMPACT_CEILING: Decimal = dec!(0.7);
const SHORT_RUNWAY_MONTHS: u32 = 12;
const SHORT_RUNWAY_RISK: Decimal = dec!(0.8);
const ADEQUATE_RUNWAY_RISK: Decimal = dec!(0.4);
const EXPERIENCE_SCALE_YEARS: Decimal = dec!(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskImpact {
    Low,
    Medium,
    High,
}

impl RiskImpact {
    pub fn from_score(score: Score) -> Self {
        if score < LOW_IMPACT_CEILING {
            RiskImpact::Low
        } else if score < MEDIUM_IMPACT_CEILING {
            RiskImpact::Medium
        } else {
            RiskImpact::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub score: Score,
    pub impact: RiskImpact,
}

impl RiskFactor {
    fn new(name: &str, score: Score) -> Self {
        Self {
            name: name.to_string(),
            score,
            impact: RiskImpact::from_score(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    /// Always Market, Execution, Financial, Competition in that order.
    pub factors: Vec<RiskFactor>,
    pub overall_risk: Score,
}

impl RiskAnalysis {
    pub fn factor(&self, name: &str) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.name == name)
    }

    pub fn overall_impact(&self) -> RiskImpact {
        RiskImpact::from_score(self.overall_risk)
    }
}

pub fn market_risk(input: &BusinessInput) -> Score {
    Decimal::ONE - input.market_metrics.market_research_score / dec!(100)
}

pub fn execution_risk(input: &BusinessInput) -> Score {
    let raw = Decimal::ONE - input.basic_info.founder_experience / EXPERIENCE_SCALE_YEARS;
    clamp(raw, Decimal::ZERO, Decimal::ONE)
}

pub fn financial_risk(input: &BusinessInput) -> Score {
    if input.financials.runway_months < SHORT_RUNWAY_MONTHS {
        SHORT_RUNWAY_RISK
    } else {
        ADEQUATE_RUNWAY_RISK
    }
}

pub fn competition_risk(input: &BusinessInput) -> Score {
    input.total_competitor_share() / dec!(100)
}

/// Pure function of the input.
pub fn assess_risk(input: &BusinessInput) -> RiskAnalysis {
    let factors = vec![
        RiskFactor::new("Market", market_risk(input)),
        RiskFactor::new("Execution", execution_risk(input)),
        RiskFactor::new("Financial", financial_risk(input)),
        RiskFactor::new("Competition", competition_risk(input)),
    ];
    let overall_risk =
        factors.iter().map(|f| f.score).sum::<Decimal>() / Decimal::from(factors.len());
    RiskAnalysis {
        factors,
        overall_risk,
    }
}

/// Risk analysis wrapped in the standard envelope, with warnings for inputs
/// that push scores outside their nominal range.
pub fn analyze_risk(input: &BusinessInput) -> ComputationOutput<RiskAnalysis> {
    let start = Instant::now();
    let warnings = risk_warnings(input);
    let analysis = assess_risk(input);
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Four-factor startup risk model (equal weights)",
        &serde_json::json!({
            "impact_thresholds": { "low_below": LOW_IMPACT_CEILING, "medium_below": MEDIUM_IMPACT_CEILING },
            "short_runway_months": SHORT_RUNWAY_MONTHS,
            "execution_risk_clamped": true,
            "competition_risk_clamped": false,
        }),
        warnings,
        elapsed,
        analysis,
    )
}

pub(crate) fn risk_warnings(input: &BusinessInput) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.basic_info.founder_experience > EXPERIENCE_SCALE_YEARS {
        warnings.push(format!(
            "Founder experience of {} years exceeds the 10-year scale; execution risk clamped to 0",
            input.basic_info.founder_experience
        ));
    }
    let share = input.total_competitor_share();
    if share > dec!(100) {
        warnings.push(format!(
            "Competitor market shares sum to {share}%; competition risk exceeds 1.0"
        ));
    }
    warnings
}
