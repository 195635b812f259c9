use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::multipliers::IndustryMultipliers;
use super::provider::{MarketDataError, MarketDataProvider};

/// Upper bound on a single provider call before falling back to defaults.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(3);

/// Where a resolved multiplier set came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BenchmarkSource {
    Provider,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBenchmarks {
    pub industry: String,
    pub multipliers: IndustryMultipliers,
    pub source: BenchmarkSource,
}

impl ResolvedBenchmarks {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, BenchmarkSource::Fallback { .. })
    }
}

/// Turns an industry key into a multiplier set.
///
/// Never fails: provider errors, malformed answers and timeouts all resolve to
/// [`IndustryMultipliers::default`]. One attempt per call, no caching.
#[derive(Debug, Clone)]
pub struct BenchmarkResolver<P> {
    provider: P,
    timeout: Duration,
}

impl<P: MarketDataProvider> BenchmarkResolver<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn resolve(&self, industry: &str) -> IndustryMultipliers {
        self.resolve_detailed(industry).await.multipliers
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn resolve_detailed(&self, industry: &str) -> ResolvedBenchmarks {
        match self.fetch(industry).await {
            Ok(multipliers) => {
                debug!(?multipliers, "resolved industry multipliers");
                ResolvedBenchmarks {
                    industry: industry.to_string(),
                    multipliers,
                    source: BenchmarkSource::Provider,
                }
            }
            Err(e) => {
                warn!(industry, error = %e, "market data unavailable, using default multipliers");
                ResolvedBenchmarks {
                    industry: industry.to_string(),
                    multipliers: IndustryMultipliers::default(),
                    source: BenchmarkSource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Market commentary for the industry; `None` on any provider problem.
    pub async fn insights(&self, industry: &str) -> Option<String> {
        match timeout(self.timeout, self.provider.market_insights(industry)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(industry, error = %e, "market insights unavailable");
                None
            }
            Err(_) => {
                warn!(industry, "market insights request timed out");
                None
            }
        }
    }

    async fn fetch(&self, industry: &str) -> Result<IndustryMultipliers, MarketDataError> {
        let multipliers = timeout(self.timeout, self.provider.industry_multipliers(industry))
            .await
            .map_err(|_| MarketDataError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })??;
        multipliers
            .validate()
            .map_err(|e| MarketDataError::Malformed {
                message: e.to_string(),
            })?;
        Ok(multipliers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::StaticMarketData;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct FailingProvider;

    #[async_trait]
    impl MarketDataProvider for FailingProvider {
        async fn industry_multipliers(
            &self,
            _industry: &str,
        ) -> Result<IndustryMultipliers, MarketDataError> {
            Err(MarketDataError::Unavailable {
                message: "connection refused".into(),
            })
        }

        async fn market_insights(&self, _industry: &str) -> Result<Option<String>, MarketDataError> {
            Err(MarketDataError::Unavailable {
                message: "connection refused".into(),
            })
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl MarketDataProvider for SlowProvider {
        async fn industry_multipliers(
            &self,
            _industry: &str,
        ) -> Result<IndustryMultipliers, MarketDataError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(IndustryMultipliers {
                revenue: dec!(99),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_provider_error_falls_back_to_defaults() {
        let resolver = BenchmarkResolver::new(FailingProvider);
        let m = resolver.resolve("saas").await;
        assert_eq!(
            m,
            IndustryMultipliers {
                revenue: dec!(10),
                users: dec!(500),
                growth: dec!(1.5),
                beta: dec!(1.2),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_to_defaults() {
        let resolver =
            BenchmarkResolver::new(SlowProvider).with_timeout(Duration::from_millis(50));
        let resolved = resolver.resolve_detailed("saas").await;
        assert!(resolved.is_fallback());
        assert_eq!(resolved.multipliers, IndustryMultipliers::default());
        match resolved.source {
            BenchmarkSource::Fallback { reason } => assert!(reason.contains("timed out")),
            s => panic!("Expected fallback, got {s:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_multipliers_fall_back() {
        let provider = StaticMarketData::new().with_industry(
            "saas",
            IndustryMultipliers {
                revenue: Decimal::ZERO,
                ..Default::default()
            },
        );
        let resolved = BenchmarkResolver::new(provider).resolve_detailed("saas").await;
        assert!(resolved.is_fallback());
        assert_eq!(resolved.multipliers.revenue, dec!(10));
    }

    #[tokio::test]
    async fn test_provider_values_pass_through() {
        let live = IndustryMultipliers {
            revenue: dec!(14),
            users: dec!(250),
            growth: dec!(2),
            beta: dec!(1.4),
        };
        let provider = StaticMarketData::new().with_industry("fintech", live);
        let resolved = BenchmarkResolver::new(provider).resolve_detailed("fintech").await;
        assert_eq!(resolved.source, BenchmarkSource::Provider);
        assert_eq!(resolved.multipliers, live);
    }

    #[tokio::test]
    async fn test_insights_swallow_errors() {
        let resolver = BenchmarkResolver::new(FailingProvider);
        assert!(resolver.insights("saas").await.is_none());
    }
}
