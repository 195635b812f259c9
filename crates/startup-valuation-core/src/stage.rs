use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Startup lifecycle stage, ordered from earliest to latest.
///
/// Wire names are snake_case (`revenue_growing`). Anything unrecognised
/// deserializes to [`Stage::Unknown`] so that each method can apply its own
/// default multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    IdeationUnvalidated,
    IdeationValidated,
    MvpDevelopment,
    MvpEarlyTraction,
    BetaTesting,
    RevenueEarly,
    RevenueGrowing,
    RevenueScaling,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Stage {
    /// Known stages in lifecycle order.
    pub const ORDERED: [Stage; 8] = [
        Stage::IdeationUnvalidated,
        Stage::IdeationValidated,
        Stage::MvpDevelopment,
        Stage::MvpEarlyTraction,
        Stage::BetaTesting,
        Stage::RevenueEarly,
        Stage::RevenueGrowing,
        Stage::RevenueScaling,
    ];

    /// Fixed stage multiplier, `None` for an unknown stage.
    ///
    /// Callers choose their own default: the scorecard uses 1.0 while the
    /// risk-adjusted method reuses the multiplier as a risk proxy with 0.5.
    pub fn multiplier(self) -> Option<Decimal> {
        let m = match self {
            Stage::IdeationUnvalidated => dec!(0.2),
            Stage::IdeationValidated => dec!(0.4),
            Stage::MvpDevelopment => dec!(0.6),
            Stage::MvpEarlyTraction => dec!(0.8),
            Stage::BetaTesting => dec!(1.0),
            Stage::RevenueEarly => dec!(1.2),
            Stage::RevenueGrowing => dec!(1.5),
            Stage::RevenueScaling => dec!(2.0),
            Stage::Unknown => return None,
        };
        Some(m)
    }

    /// Position in the lifecycle ordering (0 = earliest).
    pub fn rank(self) -> Option<usize> {
        Stage::ORDERED.iter().position(|s| *s == self)
    }

    pub fn is_known(self) -> bool {
        self != Stage::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::IdeationUnvalidated => "ideation_unvalidated",
            Stage::IdeationValidated => "ideation_validated",
            Stage::MvpDevelopment => "mvp_development",
            Stage::MvpEarlyTraction => "mvp_early_traction",
            Stage::BetaTesting => "beta_testing",
            Stage::RevenueEarly => "revenue_early",
            Stage::RevenueGrowing => "revenue_growing",
            Stage::RevenueScaling => "revenue_scaling",
            Stage::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
