use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;
use crate::types::Multiple;
use crate::ValuationResult;

pub const DEFAULT_REVENUE_MULTIPLE: Multiple = dec!(10);
pub const DEFAULT_USER_MULTIPLE: Multiple = dec!(500);
pub const DEFAULT_GROWTH_MULTIPLE: Multiple = dec!(1.5);
pub const DEFAULT_BETA: Decimal = dec!(1.2);

/// Per-industry multiplier set. Recomputed for every valuation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryMultipliers {
    /// Revenue multiple (> 0)
    pub revenue: Multiple,
    /// Value per active user (>= 0)
    pub users: Multiple,
    /// Growth sensitivity multiple (> 0)
    pub growth: Multiple,
    /// Equity beta (> 0); providers that omit it get the default
    #[serde(default = "default_beta")]
    pub beta: Decimal,
}

fn default_beta() -> Decimal {
    DEFAULT_BETA
}

impl Default for IndustryMultipliers {
    fn default() -> Self {
        Self {
            revenue: DEFAULT_REVENUE_MULTIPLE,
            users: DEFAULT_USER_MULTIPLE,
            growth: DEFAULT_GROWTH_MULTIPLE,
            beta: DEFAULT_BETA,
        }
    }
}

impl IndustryMultipliers {
    /// Check the domain constraints of each multiplier.
    pub fn validate(&self) -> ValuationResult<()> {
        if self.revenue <= Decimal::ZERO {
            return Err(ValuationError::InvalidInput {
                field: "multipliers.revenue".into(),
                reason: "Revenue multiple must be positive".into(),
            });
        }
        if self.users < Decimal::ZERO {
            return Err(ValuationError::InvalidInput {
                field: "multipliers.users".into(),
                reason: "User multiple cannot be negative".into(),
            });
        }
        if self.growth <= Decimal::ZERO {
            return Err(ValuationError::InvalidInput {
                field: "multipliers.growth".into(),
                reason: "Growth multiple must be positive".into(),
            });
        }
        if self.beta <= Decimal::ZERO {
            return Err(ValuationError::InvalidInput {
                field: "multipliers.beta".into(),
                reason: "Beta must be positive".into(),
            });
        }
        Ok(())
    }
}
