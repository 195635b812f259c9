//! Combines the five method values into a range and a confidence score.
//!
//! confidence = (1 - dispersion) * 0.4 + completeness * 0.3 + validation * 0.3
//!
//! where dispersion is the population variance of the method values over
//! mean^2 (squared coefficient of variation), capped at 1.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::benchmarks::IndustryMultipliers;
use crate::error::ValuationError;
use crate::input::BusinessInput;
use crate::methods::{comparables_breakdown, evaluate_all, MethodValues};
use crate::risk::{assess_risk, risk_warnings, RiskAnalysis};
use crate::types::{clamp, with_metadata, ComputationOutput, Money, Score};
use crate::ValuationResult;

const DISPERSION_WEIGHT: Decimal = dec!(0.4);
const COMPLETENESS_WEIGHT: Decimal = dec!(0.3);
const VALIDATION_WEIGHT: Decimal = dec!(0.3);

pub const INDUSTRY_AVERAGE_LABEL: &str = "Industry Average";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationRange {
    pub low: Money,
    pub high: Money,
    pub confidence: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceFactors {
    /// Capped squared coefficient of variation across methods
    pub dispersion: Decimal,
    pub data_completeness: Score,
    pub market_validation: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparableCompany {
    pub name: String,
    pub valuation: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkContext {
    pub industry: String,
    pub multipliers: IndustryMultipliers,
    pub comparables: Vec<ComparableCompany>,
}

/// The engine's output. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupValuation {
    pub methods: MethodValues,
    pub range: ValuationRange,
    pub confidence_factors: ConfidenceFactors,
    pub benchmarks: BenchmarkContext,
    pub risk_analysis: RiskAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<String>,
}

/// Squared coefficient of variation (population variance / mean^2), capped at 1.
///
/// Computed as `sum((v / mean - 1)^2) / n` so the squares stay near 1 instead of
/// growing with the magnitude of the values.
pub fn method_dispersion(values: &[Money]) -> ValuationResult<Decimal> {
    if values.is_empty() {
        return Err(ValuationError::InsufficientData(
            "No method values to aggregate".into(),
        ));
    }
    let n = Decimal::from(values.len());
    let total = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| overflow("sum of method values"))?;
    let mean = total / n;
    if mean.is_zero() {
        return Err(ValuationError::calculation(
            "aggregate",
            "mean of method values is zero; dispersion is undefined",
        ));
    }
    let squared_deviations = values
        .iter()
        .map(|v| {
            let relative = v
                .checked_div(mean)
                .and_then(|r| r.checked_sub(Decimal::ONE))
                .ok_or_else(|| overflow("relative deviation"))?;
            relative
                .checked_mul(relative)
                .ok_or_else(|| overflow("squared deviation"))
        })
        .collect::<ValuationResult<Vec<Decimal>>>()?;
    let cv_squared = squared_deviations
        .iter()
        .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(*d))
        .ok_or_else(|| overflow("sum of squared deviations"))?
        / n;
    Ok(cv_squared.min(Decimal::ONE))
}

fn overflow(what: &str) -> ValuationError {
    ValuationError::calculation(
        "aggregate",
        format!("{what} overflows decimal range; method values are too large"),
    )
}

/// Share of the required-field checklist that is present.
pub fn data_completeness(input: &BusinessInput) -> Score {
    let presence = input.required_field_presence();
    let present = presence.iter().filter(|(_, p)| *p).count();
    Decimal::from(present) / Decimal::from(presence.len())
}

pub fn market_validation(input: &BusinessInput) -> Score {
    clamp(
        input.market_metrics.market_research_score / dec!(100),
        Decimal::ZERO,
        Decimal::ONE,
    )
}

pub fn confidence_score(factors: &ConfidenceFactors) -> Score {
    let raw = (Decimal::ONE - factors.dispersion) * DISPERSION_WEIGHT
        + factors.data_completeness * COMPLETENESS_WEIGHT
        + factors.market_validation * VALIDATION_WEIGHT;
    clamp(raw, Decimal::ZERO, Decimal::ONE)
}

/// Full valuation with multipliers already in hand. Methods run sequentially.
pub fn calculate_valuation(
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
    ai_insights: Option<String>,
) -> ValuationResult<ComputationOutput<StartupValuation>> {
    let start = Instant::now();
    let methods = evaluate_all(input, multipliers)?;
    assemble(input, multipliers, methods, ai_insights, Vec::new(), start)
}

/// Range, confidence, risk and benchmark context over already computed
/// method values.
pub(crate) fn assemble(
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
    methods: MethodValues,
    ai_insights: Option<String>,
    mut warnings: Vec<String>,
    start: Instant,
) -> ValuationResult<ComputationOutput<StartupValuation>> {
    let values = methods.values();
    let low = values.iter().copied().min().unwrap_or_default();
    let high = values.iter().copied().max().unwrap_or_default();

    let dispersion = method_dispersion(&values)?;
    let factors = ConfidenceFactors {
        dispersion,
        data_completeness: data_completeness(input),
        market_validation: market_validation(input),
    };
    let confidence = confidence_score(&factors);

    warnings.extend(risk_warnings(input));
    if dispersion == Decimal::ONE {
        warnings.push(
            "Method values disagree strongly; dispersion capped at 1.0 in the confidence score"
                .to_string(),
        );
    }
    let missing: Vec<&str> = input
        .required_field_presence()
        .iter()
        .filter(|(_, present)| !*present)
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        warnings.push(format!("Missing required fields: {}", missing.join(", ")));
    }

    let industry_average = comparables_breakdown(input, multipliers)?.value;
    let benchmarks = BenchmarkContext {
        industry: input.basic_info.industry.clone(),
        multipliers: *multipliers,
        comparables: vec![ComparableCompany {
            name: INDUSTRY_AVERAGE_LABEL.to_string(),
            valuation: industry_average,
        }],
    };

    let valuation = StartupValuation {
        methods,
        range: ValuationRange {
            low,
            high,
            confidence,
        },
        confidence_factors: factors,
        benchmarks,
        risk_analysis: assess_risk(input),
        ai_insights,
    };

    info!(
        industry = %input.basic_info.industry,
        %low,
        %high,
        %confidence,
        "valuation complete"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Five-method startup valuation (scorecard, risk-adjusted, VC, DCF, comparables)",
        &serde_json::json!({
            "industry": input.basic_info.industry,
            "stage": input.basic_info.stage,
            "multipliers": multipliers,
            "confidence_weights": {
                "dispersion": DISPERSION_WEIGHT,
                "data_completeness": COMPLETENESS_WEIGHT,
                "market_validation": VALIDATION_WEIGHT,
            },
        }),
        warnings,
        elapsed,
        valuation,
    ))
}
