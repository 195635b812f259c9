pub mod aggregator;
pub mod benchmarks;
pub mod error;
pub mod input;
pub mod methods;
pub mod risk;
pub mod stage;
pub mod time_value;
pub mod types;
pub mod wacc;

#[cfg(feature = "engine")]
pub mod engine;

#[cfg(feature = "rounds")]
pub mod rounds;

pub use error::ValuationError;
pub use types::*;

/// Standard result type for all startup-valuation operations
pub type ValuationResult<T> = Result<T, ValuationError>;
