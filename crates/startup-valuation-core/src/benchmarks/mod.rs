pub mod multipliers;

#[cfg(feature = "engine")]
pub mod provider;
#[cfg(feature = "engine")]
pub mod resolver;

pub use multipliers::IndustryMultipliers;

#[cfg(feature = "engine")]
pub use provider::{IndustryEntry, MarketDataError, MarketDataProvider, StaticMarketData};
#[cfg(feature = "engine")]
pub use resolver::{BenchmarkResolver, BenchmarkSource, ResolvedBenchmarks};

/// Canonical form of an industry key: trimmed, lowercase, with spaces and
/// hyphens folded to underscores ("Health-Tech " -> "health_tech").
pub fn normalize_industry(industry: &str) -> String {
    industry
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
