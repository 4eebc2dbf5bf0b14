pub mod accrual;

use chrono::NaiveDate;

use crate::decimal::{Money, Rate};

pub use accrual::{AccrualEngine, DayCountConvention};

/// interest calculation result
#[derive(Debug, Clone, PartialEq)]
pub struct InterestCalculation {
    pub interest_amount: Money,
    pub days: u32,
    pub year_basis: u32,
    pub principal_base: Money,
    pub convention: DayCountConvention,
}

/// trait for interest calculations
pub trait InterestCalculator {
    fn calculate_interest(
        &self,
        principal: Money,
        rate: Rate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> InterestCalculation;
}

/// interest on `balance` between two dates: actual days over the length of
/// the year the period starts in
pub fn accrue_interest(balance: Money, annual_rate: Rate, period_start: NaiveDate, period_end: NaiveDate) -> Money {
    AccrualEngine::new(DayCountConvention::Actual365)
        .calculate_interest(balance, annual_rate, period_start, period_end)
        .interest_amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accrue_interest() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let interest = accrue_interest(Money::from_major(10_000), Rate::from_percentage(5), start, end);
        assert_eq!(interest.round_dp(2), Money::from_major(500));

        // argument order does not matter
        let reversed = accrue_interest(Money::from_major(10_000), Rate::from_percentage(5), end, start);
        assert_eq!(interest, reversed);
    }

    #[test]
    fn test_accrue_interest_zero_rate_and_zero_days() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let next = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();

        assert_eq!(accrue_interest(Money::from_major(1_000), Rate::ZERO, day, next), Money::ZERO);
        assert_eq!(
            accrue_interest(Money::from_major(1_000), Rate::from_decimal(dec!(0.2)), day, day),
            Money::ZERO
        );
    }
}
