use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::benchmarks::IndustryMultipliers;
use crate::input::BusinessInput;
use crate::types::Money;
use crate::ValuationResult;

use super::{MethodCalculator, MethodKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparablesBreakdown {
    pub revenue_value: Money,
    pub user_value: Money,
    pub growth_adjusted_value: Money,
    pub value: Money,
}

/// Comparables method: equal-weighted mean of a revenue multiple, a per-user
/// multiple and a growth-adjusted revenue multiple.
pub fn comparables_breakdown(
    input: &BusinessInput,
    multipliers: &IndustryMultipliers,
) -> ValuationResult<ComparablesBreakdown> {
    let revenue_value = input.projected_revenue() * multipliers.revenue;
    let user_value = input.active_users() * multipliers.users;
    let growth_adjusted_value =
        revenue_value * (Decimal::ONE + input.market_growth_rate() * multipliers.growth);
    let value = ((revenue_value + user_value + growth_adjusted_value) / Decimal::from(3))
        .max(Decimal::ZERO);

    Ok(ComparablesBreakdown {
        revenue_value,
        user_value,
        growth_adjusted_value,
        value,
    })
}

pub struct Comparables;

impl MethodCalculator for Comparables {
    fn kind(&self) -> MethodKind {
        MethodKind::Comparables
    }

    fn calculate(
        &self,
        input: &BusinessInput,
        multipliers: &IndustryMultipliers,
    ) -> ValuationResult<Money> {
        Ok(comparables_breakdown(input, multipliers)?.value)
    }
}
