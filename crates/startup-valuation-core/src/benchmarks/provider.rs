//! Market data provider port.
//!
//! The engine never talks to a market-data or text-generation service
//! directly; it consumes this trait. Implementations may be slow or flaky,
//! which is why [`super::BenchmarkResolver`] bounds every call with a timeout
//! and swallows all errors.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::multipliers::IndustryMultipliers;
use super::normalize_industry;

/// Market data error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// Provider could not be reached or refused the request.
    #[error("Market data unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Provider has no benchmarks for this industry.
    #[error("No benchmarks for industry: {industry}")]
    UnknownIndustry {
        /// The requested industry key.
        industry: String,
    },

    /// Provider answered with something that is not a valid multiplier set.
    #[error("Malformed market data: {message}")]
    Malformed {
        /// Error details.
        message: String,
    },

    /// Provider did not answer in time.
    #[error("Market data request timed out after {timeout_ms} ms")]
    Timeout {
        /// Elapsed budget in milliseconds.
        timeout_ms: u64,
    },
}

/// Source of per-industry multipliers and qualitative market commentary.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the multiplier set for an industry key.
    async fn industry_multipliers(
        &self,
        industry: &str,
    ) -> Result<IndustryMultipliers, MarketDataError>;

    /// Free-text market commentary for an industry, if the provider has any.
    async fn market_insights(&self, _industry: &str) -> Result<Option<String>, MarketDataError> {
        Ok(None)
    }
}

#[async_trait]
impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Arc<P> {
    async fn industry_multipliers(
        &self,
        industry: &str,
    ) -> Result<IndustryMultipliers, MarketDataError> {
        (**self).industry_multipliers(industry).await
    }

    async fn market_insights(&self, industry: &str) -> Result<Option<String>, MarketDataError> {
        (**self).market_insights(industry).await
    }
}

/// One row of a benchmark table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryEntry {
    #[serde(flatten)]
    pub multipliers: IndustryMultipliers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
}

/// Table-backed provider, typically loaded from a benchmarks file.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    entries: BTreeMap<String, IndustryEntry>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw table rows; keys are normalized.
    pub fn from_entries(entries: BTreeMap<String, IndustryEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (normalize_industry(&k), v))
            .collect();
        Self { entries }
    }

    /// Parse a JSON table of `industry -> {revenue, users, growth, beta?, insights?}`.
    pub fn from_json_str(json: &str) -> Result<Self, MarketDataError> {
        let entries: BTreeMap<String, IndustryEntry> =
            serde_json::from_str(json).map_err(|e| MarketDataError::Malformed {
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(entries))
    }

    pub fn with_industry(mut self, industry: &str, multipliers: IndustryMultipliers) -> Self {
        self.entries.insert(
            normalize_industry(industry),
            IndustryEntry {
                multipliers,
                insights: None,
            },
        );
        self
    }

    pub fn with_insights(mut self, industry: &str, insights: impl Into<String>) -> Self {
        if let Some(entry) = self.entries.get_mut(&normalize_industry(industry)) {
            entry.insights = Some(insights.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, industry: &str) -> Result<&IndustryEntry, MarketDataError> {
        self.entries
            .get(&normalize_industry(industry))
            .ok_or_else(|| MarketDataError::UnknownIndustry {
                industry: industry.to_string(),
            })
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketData {
    async fn industry_multipliers(
        &self,
        industry: &str,
    ) -> Result<IndustryMultipliers, MarketDataError> {
        self.lookup(industry).map(|e| e.multipliers)
    }

    async fn market_insights(&self, industry: &str) -> Result<Option<String>, MarketDataError> {
        Ok(self.lookup(industry).ok().and_then(|e| e.insights.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_static_lookup_is_normalized() {
        let provider = StaticMarketData::new().with_industry(
            "Health Tech",
            IndustryMultipliers {
                revenue: dec!(6),
                users: dec!(120),
                growth: dec!(1.2),
                beta: dec!(1.1),
            },
        );
        let m = provider.industry_multipliers("health-tech").await.unwrap();
        assert_eq!(m.revenue, dec!(6));
    }

    #[tokio::test]
    async fn test_static_unknown_industry() {
        let provider = StaticMarketData::new();
        let err = provider.industry_multipliers("biotech").await.unwrap_err();
        assert!(matches!(err, MarketDataError::UnknownIndustry { .. }));
    }

    #[tokio::test]
    async fn test_from_json_with_insights() {
        let provider = StaticMarketData::from_json_str(
            r#"{"SaaS": {"revenue": 12, "users": 300, "growth": 1.8, "insights": "Net retention drives multiples."}}"#,
        )
        .unwrap();
        let m = provider.industry_multipliers("saas").await.unwrap();
        assert_eq!(m.beta, dec!(1.2));
        let text = provider.market_insights("saas").await.unwrap();
        assert_eq!(text.as_deref(), Some("Net retention drives multiples."));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = StaticMarketData::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, MarketDataError::Malformed { .. }));
    }
}
