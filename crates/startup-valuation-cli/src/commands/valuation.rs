use clap::Args;
use serde_json::Value;
use std::time::Duration;

use startup_valuation_core::benchmarks::{BenchmarkResolver, StaticMarketData};
use startup_valuation_core::engine::{EngineConfig, ValuationEngine};
use startup_valuation_core::input::BusinessInput;
use startup_valuation_core::methods::{self, MethodKind};

use crate::input;

/// Where industry multipliers come from
#[derive(Args)]
pub struct BenchmarkArgs {
    /// Industry benchmark table (YAML or JSON). Without it every industry
    /// falls back to the default multipliers.
    #[arg(long)]
    pub benchmarks: Option<String>,

    /// Budget for each market-data lookup, in milliseconds
    #[arg(long, default_value = "3000")]
    pub provider_timeout_ms: u64,
}

impl BenchmarkArgs {
    fn provider(&self) -> Result<StaticMarketData, Box<dyn std::error::Error>> {
        match self.benchmarks {
            Some(ref path) => input::file::read_benchmarks(path),
            None => Ok(StaticMarketData::new()),
        }
    }

    fn config(&self) -> EngineConfig {
        EngineConfig {
            provider_timeout: Duration::from_millis(self.provider_timeout_ms),
        }
    }
}

/// Arguments for a full valuation
#[derive(Args)]
pub struct ValuateArgs {
    /// Path to JSON BusinessInput (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Market commentary to attach instead of asking the provider
    #[arg(long)]
    pub insights: Option<String>,

    #[command(flatten)]
    pub benchmarks: BenchmarkArgs,
}

/// Arguments for a single valuation method
#[derive(Args)]
pub struct MethodArgs {
    /// scorecard, risk-adjusted, vc, dcf or comparables
    pub method: String,

    /// Path to JSON BusinessInput (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub benchmarks: BenchmarkArgs,
}

/// Arguments for multiplier resolution
#[derive(Args)]
pub struct MultipliersArgs {
    /// Industry key, e.g. saas or "health tech"
    #[arg(long)]
    pub industry: String,

    #[command(flatten)]
    pub benchmarks: BenchmarkArgs,
}

pub async fn run_valuate(args: ValuateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let business: BusinessInput = input::load(args.input.as_deref())?;
    business.validate()?;

    let engine = ValuationEngine::with_config(args.benchmarks.provider()?, args.benchmarks.config());
    let result = engine.calculate(&business, args.insights).await?;
    Ok(serde_json::to_value(result)?)
}

pub async fn run_method(args: MethodArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kind: MethodKind = args.method.parse()?;
    let business: BusinessInput = input::load(args.input.as_deref())?;
    business.validate()?;

    let resolver = BenchmarkResolver::new(args.benchmarks.provider()?)
        .with_timeout(args.benchmarks.config().provider_timeout);
    let resolved = resolver.resolve_detailed(&business.basic_info.industry).await;

    let mut result = methods::run_method(kind, &business, &resolved.multipliers)?;
    if resolved.is_fallback() {
        result.warnings.push(format!(
            "No benchmarks for '{}'; default multipliers used",
            resolved.industry
        ));
    }
    Ok(serde_json::to_value(result)?)
}

pub async fn run_multipliers(args: MultipliersArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let resolver = BenchmarkResolver::new(args.benchmarks.provider()?)
        .with_timeout(args.benchmarks.config().provider_timeout);
    let resolved = resolver.resolve_detailed(&args.industry).await;
    Ok(serde_json::to_value(resolved)?)
}
