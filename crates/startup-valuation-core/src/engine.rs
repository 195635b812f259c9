//! Async valuation pipeline: resolve benchmarks once, fan the five methods
//! out on a `JoinSet`, join, aggregate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::debug;

use crate::aggregator::{assemble, StartupValuation};
use crate::benchmarks::{
    BenchmarkResolver, BenchmarkSource, IndustryMultipliers, MarketDataProvider,
};
use crate::error::ValuationError;
use crate::input::BusinessInput;
use crate::methods::{MethodKind, MethodValues};
use crate::types::{ComputationOutput, Money};
use crate::ValuationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Budget for each market-data provider call.
    pub provider_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider_timeout: crate::benchmarks::resolver::DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

pub struct ValuationEngine<P> {
    resolver: BenchmarkResolver<P>,
}

impl<P: MarketDataProvider> ValuationEngine<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, EngineConfig::default())
    }

    pub fn with_config(provider: P, config: EngineConfig) -> Self {
        Self {
            resolver: BenchmarkResolver::new(provider).with_timeout(config.provider_timeout),
        }
    }

    pub fn resolver(&self) -> &BenchmarkResolver<P> {
        &self.resolver
    }

    /// Value a business with all five methods.
    ///
    /// Benchmarks are resolved exactly once and shared by every method. When
    /// `ai_insights` is `None` the provider is asked for commentary; its
    /// absence never fails the valuation. Any method error fails the whole
    /// request.
    #[tracing::instrument(skip_all, fields(industry = %input.basic_info.industry))]
    pub async fn calculate(
        &self,
        input: &BusinessInput,
        ai_insights: Option<String>,
    ) -> ValuationResult<ComputationOutput<StartupValuation>> {
        let start = Instant::now();
        let industry = input.basic_info.industry.as_str();

        let resolved = self.resolver.resolve_detailed(industry).await;
        let mut warnings = Vec::new();
        if let BenchmarkSource::Fallback { reason } = &resolved.source {
            warnings.push(format!(
                "Industry benchmarks unavailable for '{industry}' ({reason}); default multipliers used"
            ));
        }

        let ai_insights = match ai_insights {
            Some(text) => Some(text),
            None => self.resolver.insights(industry).await,
        };

        let shared = Arc::new(input.clone());
        let methods = evaluate_concurrently(shared, resolved.multipliers).await?;

        assemble(
            input,
            &resolved.multipliers,
            methods,
            ai_insights,
            warnings,
            start,
        )
    }
}

/// Run every method as its own task and gather the values back into
/// canonical order. The first failure aborts the remaining tasks.
pub async fn evaluate_concurrently(
    input: Arc<BusinessInput>,
    multipliers: IndustryMultipliers,
) -> ValuationResult<MethodValues> {
    let mut join_set: JoinSet<(MethodKind, ValuationResult<Money>)> = JoinSet::new();

    for kind in MethodKind::ALL {
        let input = Arc::clone(&input);
        join_set.spawn(async move {
            let value = kind.calculator().calculate(&input, &multipliers);
            (kind, value)
        });
    }

    let mut pairs = Vec::with_capacity(MethodKind::ALL.len());
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((kind, Ok(value))) => {
                debug!(method = %kind, %value, "method evaluated");
                pairs.push((kind, value));
            }
            Ok((kind, Err(e))) => {
                debug!(method = %kind, error = %e, "method failed, aborting valuation");
                join_set.abort_all();
                return Err(e);
            }
            Err(e) => {
                join_set.abort_all();
                let reason = if e.is_panic() {
                    "valuation method panicked".to_string()
                } else {
                    format!("valuation method cancelled: {e}")
                };
                return Err(ValuationError::TaskFailed(reason));
            }
        }
    }

    MethodValues::from_pairs(&pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::calculate_valuation;
    use crate::benchmarks::{MarketDataError, StaticMarketData};
    use crate::methods::test_support::sample_input;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        async fn industry_multipliers(
            &self,
            _industry: &str,
        ) -> Result<IndustryMultipliers, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(IndustryMultipliers {
                revenue: dec!(8),
                ..Default::default()
            })
        }
    }

    struct DownProvider;

    #[async_trait]
    impl MarketDataProvider for DownProvider {
        async fn industry_multipliers(
            &self,
            industry: &str,
        ) -> Result<IndustryMultipliers, MarketDataError> {
            Err(MarketDataError::UnknownIndustry {
                industry: industry.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_resolves_benchmarks_once() {
        let provider = Arc::new(CountingProvider::default());
        let engine = ValuationEngine::new(Arc::clone(&provider));
        engine.calculate(&sample_input(), None).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_matches_sequential_pipeline() {
        let engine = ValuationEngine::new(CountingProvider::default());
        let multipliers = IndustryMultipliers {
            revenue: dec!(8),
            ..Default::default()
        };
        let concurrent = engine.calculate(&sample_input(), None).await.unwrap();
        let sequential = calculate_valuation(&sample_input(), &multipliers, None).unwrap();
        assert_eq!(concurrent.result, sequential.result);
    }

    #[tokio::test]
    async fn test_provider_failure_uses_defaults_and_warns() {
        let engine = ValuationEngine::new(DownProvider);
        let out = engine.calculate(&sample_input(), None).await.unwrap();
        assert_eq!(out.result.benchmarks.multipliers, IndustryMultipliers::default());
        assert_eq!(out.result.methods.scorecard, dec!(21000000));
        assert!(out.warnings.iter().any(|w| w.contains("default multipliers")));
    }

    #[tokio::test]
    async fn test_dcf_failure_aborts_fan_out() {
        // Beta 0 is rejected by the resolver, so feed it straight to the fan-out.
        let multipliers = IndustryMultipliers {
            beta: Decimal::ZERO,
            ..Default::default()
        };
        let err = evaluate_concurrently(Arc::new(sample_input()), multipliers)
            .await
            .unwrap_err();
        match err {
            ValuationError::Calculation { method, .. } => assert_eq!(method, "dcf"),
            e => panic!("Expected Calculation, got {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_beta_from_provider_is_replaced_by_defaults() {
        let provider = StaticMarketData::new().with_industry(
            "saas",
            IndustryMultipliers {
                beta: Decimal::ZERO,
                ..Default::default()
            },
        );
        let out = ValuationEngine::new(provider)
            .calculate(&sample_input(), None)
            .await
            .unwrap();
        assert_eq!(out.result.benchmarks.multipliers.beta, dec!(1.2));
    }

    #[tokio::test]
    async fn test_insights_from_provider_when_not_supplied() {
        let provider = StaticMarketData::new()
            .with_industry("saas", IndustryMultipliers::default())
            .with_insights("saas", "Net revenue retention drives multiples.");
        let engine = ValuationEngine::new(provider);

        let out = engine.calculate(&sample_input(), None).await.unwrap();
        assert_eq!(
            out.result.ai_insights.as_deref(),
            Some("Net revenue retention drives multiples.")
        );

        let out = engine
            .calculate(&sample_input(), Some("Caller supplied.".into()))
            .await
            .unwrap();
        assert_eq!(out.result.ai_insights.as_deref(), Some("Caller supplied."));
    }

    #[tokio::test]
    async fn test_evaluate_concurrently_canonical_order() {
        let values = evaluate_concurrently(
            Arc::new(sample_input()),
            IndustryMultipliers::default(),
        )
        .await
        .unwrap();
        assert_eq!(values.values()[0], dec!(21000000));
        assert_eq!(values.values()[1], dec!(4150000));
        assert_eq!(values.values()[2], dec!(100));
        assert!(values.values().iter().all(|v| *v >= Decimal::ZERO));
    }

    #[test]
    fn test_default_config() {
        assert_eq!(EngineConfig::default().provider_timeout, Duration::from_secs(3));
    }
}
