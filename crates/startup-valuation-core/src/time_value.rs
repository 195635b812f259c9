use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ValuationError;
use crate::types::{Money, Rate};
use crate::ValuationResult;

/// Future value of `amount` compounded at `rate` for `periods` whole periods.
pub fn compound(amount: Money, rate: Rate, periods: u32) -> Money {
    amount * (Decimal::ONE + rate).powi(periods as i64)
}

/// 1 / (1 + rate)^periods
pub fn discount_factor(rate: Rate, periods: u32) -> ValuationResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(ValuationError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    let growth = (Decimal::ONE + rate).powi(periods as i64);
    if growth.is_zero() {
        return Err(ValuationError::DivisionByZero {
            context: format!("discount factor at period {periods}"),
        });
    }
    Ok(Decimal::ONE / growth)
}
