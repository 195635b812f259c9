use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::time_value::compound;
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::ValuationResult;

use super::{
    check_fields, confidence_from_risks, confidence_warning, round_assumptions, FieldRule,
    FundingRound, RoundValuation,
};

/// Annual multiple applied to MRR before growth and churn adjustment.
const BASE_MRR_MULTIPLE: Multiple = dec!(12);
const MONTHS_PER_YEAR: u32 = 12;
const MAX_HEALTHY_CAC_LTV: Decimal = dec!(0.3);
const BASE_CONFIDENCE: Decimal = dec!(0.8);
const CAC_ALERT_HAIRCUT: Decimal = dec!(0.8);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedInput {
    /// Monthly recurring revenue
    pub mrr: Money,
    /// Month-over-month growth as a decimal
    pub mom_growth: Rate,
    /// Monthly churn as a decimal
    pub churn: Rate,
    pub cac: Money,
    pub ltv: Money,
}

pub(crate) fn fields() -> Vec<FieldRule> {
    vec![
        FieldRule::number(
            "mrr",
            Some(dec!(10000)),
            None,
            "Monthly Recurring Revenue in USD",
        ),
        FieldRule::number(
            "mom_growth",
            Some(Decimal::ZERO),
            Some(Decimal::ONE),
            "Month over Month growth rate (as decimal)",
        ),
        FieldRule::number(
            "churn",
            Some(dec!(0.01)),
            Some(Decimal::ONE),
            "Monthly churn rate (as decimal)",
        ),
        FieldRule::number(
            "cac",
            Some(Decimal::ZERO),
            None,
            "Customer Acquisition Cost in USD",
        ),
        FieldRule::number(
            "ltv",
            Some(Decimal::ZERO),
            None,
            "Customer Lifetime Value in USD",
        ),
    ]
}

/// CAC/LTV ratio, `None` when LTV is zero (unbounded).
fn cac_ltv_ratio(cac: Money, ltv: Money) -> Option<Decimal> {
    (ltv > Decimal::ZERO).then(|| cac / ltv)
}

/// Seed bottom-up DCF: twelve months of compounded MRR times a churn- and
/// growth-adjusted multiple.
pub fn value_seed(input: &SeedInput) -> ValuationResult<ComputationOutput<RoundValuation>> {
    let start = Instant::now();
    check_fields(
        &fields(),
        &[
            ("mrr", input.mrr),
            ("mom_growth", input.mom_growth),
            ("churn", input.churn),
            ("cac", input.cac),
            ("ltv", input.ltv),
        ],
    )?;
    let mut warnings: Vec<String> = Vec::new();

    let annual_revenue = compound(input.mrr, input.mom_growth, MONTHS_PER_YEAR);
    let multiple = BASE_MRR_MULTIPLE * (Decimal::ONE + input.mom_growth) / input.churn;
    let value = annual_revenue * multiple;
    debug!(%annual_revenue, %multiple, %value, "seed bottom-up DCF");

    let ratio = cac_ltv_ratio(input.cac, input.ltv);
    let cac_alert = ratio.map_or(true, |r| r > MAX_HEALTHY_CAC_LTV);
    if cac_alert {
        warnings.push(match ratio {
            Some(r) => format!(
                "CAC/LTV ratio of {r:.2} exceeds recommended maximum of {MAX_HEALTHY_CAC_LTV}"
            ),
            None => format!(
                "CAC/LTV ratio is unbounded (LTV is zero); exceeds recommended maximum of {MAX_HEALTHY_CAC_LTV}"
            ),
        });
    }

    let churn_risk = (input.churn * Decimal::from(MONTHS_PER_YEAR)).min(Decimal::ONE);
    let growth_sustainability = Decimal::ONE / (Decimal::ONE + input.mom_growth);
    let unit_economics = ratio.unwrap_or(Decimal::ONE);

    let base = if cac_alert {
        BASE_CONFIDENCE * CAC_ALERT_HAIRCUT
    } else {
        BASE_CONFIDENCE
    };
    let (risk_factors, confidence) = confidence_from_risks(
        base,
        &[
            ("churn_risk", churn_risk),
            ("growth_sustainability", growth_sustainability),
            ("unit_economics", unit_economics),
        ],
    );
    warnings.extend(confidence_warning(confidence));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Seed Bottom-up DCF",
        &round_assumptions(FundingRound::Seed, input),
        warnings,
        elapsed,
        RoundValuation {
            value,
            confidence,
            methodology: "Seed Bottom-up DCF".into(),
            risk_factors,
        },
    ))
}
