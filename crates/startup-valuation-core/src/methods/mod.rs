//! The five independent valuation methods.
//!
//! Each method is a pure function of `(BusinessInput, IndustryMultipliers)`
//! returning a single non-negative value. They share no state, so the engine
//! may run them concurrently; adding a method means adding a
//! [`MethodKind`] variant and one [`MethodCalculator`] impl.

pub mod comparables;
pub mod dcf;
pub mod risk_adjusted;
pub mod scorecard;
pub mod venture_capital;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::benchmarks::IndustryMultipliers;
use crate::error::ValuationError;
use crate::input::BusinessInput;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ValuationResult;

pub use comparables::{comparables_breakdown, Comparables, ComparablesBreakdown};
pub use dcf::{dcf_breakdown, DcfBreakdown, DiscountedCashFlow};
pub use risk_adjusted::{risk_adjusted_breakdown, RiskAdjusted, RiskAdjustedBreakdown};
pub use scorecard::{scorecard_breakdown, Scorecard, ScorecardBreakdown};
pub use venture_capital::{venture_capital_breakdown, VentureCapital, VentureCapitalBreakdown};

/// Base unit value shared by the scorecard and risk-adjusted methods.
pub const BASE_UNIT_VALUE: Money = dec!(2500000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodKind {
    Scorecard,
    RiskAdjusted,
    Vc,
    Dcf,
    Comparables,
}

impl MethodKind {
    /// Canonical order used for results and ranges.
    pub const ALL: [MethodKind; 5] = [
        MethodKind::Scorecard,
        MethodKind::RiskAdjusted,
        MethodKind::Vc,
        MethodKind::Dcf,
        MethodKind::Comparables,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MethodKind::Scorecard => "scorecard",
            MethodKind::RiskAdjusted => "risk-adjusted",
            MethodKind::Vc => "vc",
            MethodKind::Dcf => "dcf",
            MethodKind::Comparables => "comparables",
        }
    }

    pub fn calculator(self) -> &'static dyn MethodCalculator {
        match self {
            MethodKind::Scorecard => &Scorecard,
            MethodKind::RiskAdjusted => &RiskAdjusted,
            MethodKind::Vc => &VentureCapital,
            MethodKind::Dcf => &DiscountedCashFlow,
            MethodKind::Comparables => &Comparables,
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MethodKind {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "scorecard" => Ok(MethodKind::Scorecard),
            "risk-adjusted" | "riskadjusted" => Ok(MethodKind::RiskAdjusted),
            "vc" | "venture-capital" => Ok(MethodKind::Vc),
            "dcf" => Ok(MethodKind::Dcf),
            "comparables" | "comps" => Ok(MethodKind::Comparables),
            other => Err(ValuationError::InvalidInput {
                field: "method".into(),
                reason: format!("Unknown valuation method '{other}'"),
            }),
        }
    }
}

/// One valuation method.
pub trait MethodCalculator: Send + Sync {
    fn kind(&self) -> MethodKind;

    fn calculate(
        &self,
        input: &BusinessInput,
        multipliers: &IndustryMultipliers,
    ) -> ValuationResult<Money>;
}

/// Values of all five methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodValues {
    pub scorecard: Money,
    pub risk_adjusted: Money,
    pub vc: Money,
    pub dcf: Money,
    pub comparables: Money,
}

impl MethodValues {
    pub fn get(&self, kind: MethodKind) -> Money {
        match kind {
            MethodKind::Scorecard => self.scorecard,
            MethodKind::RiskAdjusted => self.risk_adjusted,
            MethodKind::Vc => self.vc,
            MethodKind::Dcf => self.dcf,
            MethodKind::Comparables => self.comparables,
        }
    }

    /// Values in [`MethodKind::ALL`] order.
    pub fn values(&self) -> [Money; 5] {
        MethodKind::ALL.map(|k| self.get(k))
    }

    /// Assemble from `(kind, value)` pairs in any order; every kind must appear.
    pub fn from_pairs(pairs: &[(MethodKind, Money)]) -> ValuationResult<Self> {
        let find = |kind: MethodKind| {
            pairs
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, v)| *v)
                .ok_or_else(|| {
                    ValuationError::InsufficientData(format!("No value for method {kind}"))
                })
        };
        Ok(Self {
            scorecard: find(MethodKind::Scorecard)?,
            risk_adjusted: find(MethodKind::RiskAdjusted)?,
            vc: find(MethodKind::Vc)?,
            dcf: find(MethodKind::Dcf)?,
            comparables: find(MethodKind::Comparables)?,
        })
    }
}

/// Run all five methods sequentially. Any failure aborts.
pub fn evaluate_all(
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
) -> ValuationResult<MethodValues> {
    let mut pairs = Vec::with_capacity(MethodKind::ALL.len());
    for kind in MethodKind::ALL {
        let value = kind.calculator().calculate(input, multipliers)?;
        tracing::debug!(method = %kind, %value, "method evaluated");
        pairs.push((kind, value));
    }
    MethodValues::from_pairs(&pairs)
}

/// Per-method working, for inspecting a single method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodBreakdown {
    Scorecard(ScorecardBreakdown),
    RiskAdjusted(RiskAdjustedBreakdown),
    Vc(VentureCapitalBreakdown),
    Dcf(DcfBreakdown),
    Comparables(ComparablesBreakdown),
}

impl MethodBreakdown {
    pub fn value(&self) -> Money {
        match self {
            MethodBreakdown::Scorecard(b) => b.value,
            MethodBreakdown::RiskAdjusted(b) => b.value,
            MethodBreakdown::Vc(b) => b.value,
            MethodBreakdown::Dcf(b) => b.value,
            MethodBreakdown::Comparables(b) => b.value,
        }
    }
}

/// Run one method and return its full working in the standard envelope.
pub fn run_method(
    kind: MethodKind,
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
) -> ValuationResult<ComputationOutput<MethodBreakdown>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let (methodology, breakdown) = match kind {
        MethodKind::Scorecard => (
            "Scorecard (weighted factors x base value x revenue multiple x stage)",
            MethodBreakdown::Scorecard(scorecard_breakdown(input, multipliers)?),
        ),
        MethodKind::RiskAdjusted => (
            "Risk-adjusted base value",
            MethodBreakdown::RiskAdjusted(risk_adjusted_breakdown(input)?),
        ),
        MethodKind::Vc => (
            "Venture capital method (terminal revenue multiple, 5-year target ROI)",
            MethodBreakdown::Vc(venture_capital_breakdown(input, multipliers)?),
        ),
        MethodKind::Dcf => (
            "5-year FCF DCF with CAPM discount rate",
            MethodBreakdown::Dcf(dcf_breakdown(input, multipliers)?),
        ),
        MethodKind::Comparables => (
            "Comparables (revenue, user and growth-adjusted multiples)",
            MethodBreakdown::Comparables(comparables_breakdown(input, multipliers)?),
        ),
    };

    if breakdown.value().is_zero() {
        warnings.push(format!("{kind} produced a zero valuation; check inputs"));
    }
    if input.projected_revenue().is_zero()
        && matches!(
            kind,
            MethodKind::Vc | MethodKind::Dcf | MethodKind::Comparables
        )
    {
        warnings.push("Projected revenue is zero or missing".to_string());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({ "method": kind, "multipliers": multipliers }),
        warnings,
        elapsed,
        breakdown,
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal_macros::dec;

    use crate::input::{BusinessInput, Competitor};
    use crate::stage::Stage;

    /// The reference scenario: a revenue_growing SaaS company.
    pub fn sample_input() -> BusinessInput {
        let mut input = BusinessInput::default();
        input.basic_info.business_name = Some("Acme Robotics".into());
        input.basic_info.industry = "saas".into();
        input.basic_info.stage = Stage::RevenueGrowing;
        input.basic_info.founder_experience = dec!(8);
        input.financials.projected_revenue = Some(dec!(1000000));
        input.financials.runway_months = 18;
        input.market_metrics.market_size.tam = Some(dec!(5000000000));
        input.market_metrics.market_growth = Some(dec!(20));
        input.market_metrics.solution_readiness = dec!(80);
        input.market_metrics.market_research_score = dec!(70);
        input.competitive.competitors = vec![
            Competitor {
                name: "Incumbent".into(),
                market_share: dec!(10),
            },
            Competitor {
                name: "Challenger".into(),
                market_share: dec!(15),
            },
        ];
        input
    }
}
