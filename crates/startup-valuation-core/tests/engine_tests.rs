use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use startup_valuation_core::aggregator::calculate_valuation;
use startup_valuation_core::benchmarks::{
    BenchmarkResolver, IndustryMultipliers, MarketDataError, MarketDataProvider, StaticMarketData,
};
use startup_valuation_core::engine::{EngineConfig, ValuationEngine};
use startup_valuation_core::input::BusinessInput;

fn reference_input() -> BusinessInput {
    serde_json::from_value(serde_json::json!({
        "basicInfo": {
            "businessName": "Acme Robotics",
            "industry": "SaaS",
            "stage": "revenue_growing",
            "founderExperience": 8
        },
        "financials": { "projectedRevenue": 1000000, "runwayMonths": 18 },
        "marketMetrics": {
            "marketSize": { "tam": 5000000000u64 },
            "marketGrowth": 20,
            "solutionReadiness": 80,
            "marketResearchScore": 70
        },
        "competitive": {
            "competitors": [
                { "name": "Incumbent", "marketShare": 10 },
                { "name": "Challenger", "marketShare": 15 }
            ]
        }
    }))
    .unwrap()
}

fn saas_table() -> StaticMarketData {
    StaticMarketData::from_json_str(
        r#"{
            "saas": { "revenue": 12, "users": 300, "growth": 1.8, "beta": 1.3,
                      "insights": "Efficient growth is rewarded over raw growth." },
            "fintech": { "revenue": 8, "users": 200, "growth": 1.4 }
        }"#,
    )
    .unwrap()
}

/// Hangs far longer than any configured timeout.
struct StalledProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for StalledProvider {
    async fn industry_multipliers(
        &self,
        _industry: &str,
    ) -> Result<IndustryMultipliers, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(MarketDataError::Unavailable {
            message: "unreachable".into(),
        })
    }
}

#[tokio::test]
async fn test_engine_uses_provider_multipliers() {
    let engine = ValuationEngine::new(saas_table());
    let out = engine.calculate(&reference_input(), None).await.unwrap();
    let v = &out.result;
    assert_eq!(v.benchmarks.multipliers.revenue, dec!(12));
    assert_eq!(v.benchmarks.multipliers.beta, dec!(1.3));
    // 2.5M * 0.56 * 12 * 1.5
    assert_eq!(v.methods.scorecard, dec!(25200000));
    assert_eq!(
        v.ai_insights.as_deref(),
        Some("Efficient growth is rewarded over raw growth.")
    );
    assert!(out.warnings.iter().all(|w| !w.contains("default multipliers")));
}

#[tokio::test]
async fn test_engine_equals_sync_pipeline_for_same_multipliers() {
    let engine = ValuationEngine::new(saas_table());
    let multipliers = BenchmarkResolver::new(saas_table()).resolve("saas").await;

    let concurrent = engine
        .calculate(&reference_input(), Some("fixed".into()))
        .await
        .unwrap();
    let sequential =
        calculate_valuation(&reference_input(), &multipliers, Some("fixed".into())).unwrap();
    assert_eq!(concurrent.result, sequential.result);
}

#[tokio::test]
async fn test_unknown_industry_falls_back() {
    let mut input = reference_input();
    input.basic_info.industry = "space mining".into();
    let out = ValuationEngine::new(saas_table())
        .calculate(&input, None)
        .await
        .unwrap();
    assert_eq!(out.result.benchmarks.multipliers, IndustryMultipliers::default());
    assert_eq!(out.result.ai_insights, None);
    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("space mining") && w.contains("default multipliers")));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_provider_times_out_to_defaults() {
    let provider = Arc::new(StalledProvider {
        calls: AtomicUsize::new(0),
    });
    let engine = ValuationEngine::with_config(
        Arc::clone(&provider),
        EngineConfig {
            provider_timeout: Duration::from_millis(250),
        },
    );
    let out = engine
        .calculate(&reference_input(), Some("supplied".into()))
        .await
        .unwrap();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.result.methods.scorecard, dec!(21000000));
    assert!(out.warnings.iter().any(|w| w.contains("timed out")));
}

#[tokio::test]
async fn test_concurrent_valuations_share_engine() {
    let engine = Arc::new(ValuationEngine::new(saas_table()));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.calculate(&reference_input(), None).await
        }));
    }
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap().result);
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
