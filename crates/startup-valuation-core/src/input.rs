//! Normalized business facts consumed by every part of the engine.
//!
//! Field names follow the web application's camelCase contract
//! (`basicInfo.founderExperience`, `marketMetrics.marketSize.tam`, ...).
//! Percent-valued fields (`marketGrowth`, `solutionReadiness`,
//! `marketResearchScore`, `marketShare`) are on a 0..100 scale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;
use crate::stage::Stage;
use crate::types::{Money, Rate};
use crate::ValuationResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInput {
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub financials: Financials,
    #[serde(default)]
    pub market_metrics: MarketMetrics,
    #[serde(default)]
    pub competitive: Competitive,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub industry: String,
    #[serde(default)]
    pub stage: Stage,
    /// Years of founder experience.
    #[serde(default)]
    pub founder_experience: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_revenue: Option<Money>,
    #[serde(default)]
    pub runway_months: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    #[serde(default)]
    pub market_size: MarketSize,
    /// Annual market growth in percent (20 = 20%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_growth: Option<Decimal>,
    #[serde(default)]
    pub solution_readiness: Decimal,
    #[serde(default)]
    pub market_research_score: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_users: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSize {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tam: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitive {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

/// A named competitor. Shares are independent estimates and need not sum to 100.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    #[serde(default)]
    pub name: String,
    pub market_share: Decimal,
}

/// Fields whose presence drives the data-completeness component of confidence.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "businessName",
    "industry",
    "stage",
    "projectedRevenue",
    "marketSize",
    "marketGrowth",
];

impl BusinessInput {
    pub fn projected_revenue(&self) -> Money {
        self.financials.projected_revenue.unwrap_or_default()
    }

    pub fn tam(&self) -> Money {
        self.market_metrics.market_size.tam.unwrap_or_default()
    }

    /// Market growth as a rate (20% -> 0.20).
    pub fn market_growth_rate(&self) -> Rate {
        self.market_metrics.market_growth.unwrap_or_default() / dec!(100)
    }

    pub fn active_users(&self) -> Decimal {
        Decimal::from(self.market_metrics.active_users.unwrap_or(0))
    }

    /// Sum of named competitors' market shares, in percent. May exceed 100.
    pub fn total_competitor_share(&self) -> Decimal {
        self.competitive
            .competitors
            .iter()
            .map(|c| c.market_share)
            .sum()
    }

    /// Presence of each entry of [`REQUIRED_FIELDS`], in the same order.
    ///
    /// A stage the engine does not recognize counts as missing, since it
    /// deserializes to [`Stage::Unknown`] just like an absent one.
    pub fn required_field_presence(&self) -> [(&'static str, bool); 6] {
        [
            (REQUIRED_FIELDS[0], self.basic_info.business_name.is_some()),
            (REQUIRED_FIELDS[1], !self.basic_info.industry.trim().is_empty()),
            (REQUIRED_FIELDS[2], self.basic_info.stage.is_known()),
            (REQUIRED_FIELDS[3], self.financials.projected_revenue.is_some()),
            (REQUIRED_FIELDS[4], self.market_metrics.market_size.tam.is_some()),
            (REQUIRED_FIELDS[5], self.market_metrics.market_growth.is_some()),
        ]
    }

    /// Upstream form validation. The engine itself assumes validated input and
    /// only guards against degenerate arithmetic.
    pub fn validate(&self) -> ValuationResult<()> {
        if self.basic_info.industry.trim().is_empty() {
            return Err(ValuationError::InvalidInput {
                field: "basicInfo.industry".into(),
                reason: "Industry key must not be empty".into(),
            });
        }
        if self.basic_info.founder_experience < Decimal::ZERO {
            return Err(ValuationError::InvalidInput {
                field: "basicInfo.founderExperience".into(),
                reason: "Founder experience cannot be negative".into(),
            });
        }
        if self.projected_revenue() < Decimal::ZERO {
            return Err(ValuationError::InvalidInput {
                field: "financials.projectedRevenue".into(),
                reason: "Projected revenue cannot be negative".into(),
            });
        }
        if self.tam() < Decimal::ZERO {
            return Err(ValuationError::InvalidInput {
                field: "marketMetrics.marketSize.tam".into(),
                reason: "Market size cannot be negative".into(),
            });
        }
        validate_percent(
            "marketMetrics.solutionReadiness",
            self.market_metrics.solution_readiness,
        )?;
        validate_percent(
            "marketMetrics.marketResearchScore",
            self.market_metrics.market_research_score,
        )?;
        for (i, c) in self.competitive.competitors.iter().enumerate() {
            validate_percent(&format!("competitive.competitors[{i}].marketShare"), c.market_share)?;
        }
        Ok(())
    }
}

fn validate_percent(field: &str, value: Decimal) -> ValuationResult<()> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(ValuationError::InvalidInput {
            field: field.into(),
            reason: format!("Must be between 0 and 100, got {value}"),
        });
    }
    Ok(())
}
