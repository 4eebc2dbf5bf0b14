use chrono::{Datelike, Months, NaiveDate};

use crate::errors::{MortgageError, Result};

#[inline]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[inline]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month.clamp(1, 12) - 1) as usize]
    }
}

/// 366 in gregorian leap years, 365 otherwise
#[inline]
pub fn days_in_year(date: NaiveDate) -> u32 {
    if is_leap_year(date.year()) {
        366
    } else {
        365
    }
}

/// absolute number of days between two dates
#[inline]
pub fn days_between(a: NaiveDate, b: NaiveDate) -> u32 {
    (b - a).num_days().unsigned_abs() as u32
}

/// same month as `date`, day set to `desired_day` or the last day of the month
/// when the month is shorter
pub fn clamp_payment_day(date: NaiveDate, desired_day: u32) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    let day = desired_day.clamp(1, last);
    // day is within 1..=last, so the date always exists
    date.with_day(day).unwrap_or(date)
}

/// the payment date one calendar month after `previous`, on `desired_day`
///
/// steps from the first of the month so a clamped day never sticks
/// (jan 31 -> feb 28 -> mar 31). dates are `NaiveDate`: no time of day, no
/// time zone, so day counts never drift across DST changes.
pub fn next_payment_date(previous: NaiveDate, desired_day: u32) -> Result<NaiveDate> {
    let first = previous
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .ok_or_else(|| MortgageError::InvalidDate {
            message: format!("no payment date follows {previous}"),
        })?;
    Ok(clamp_payment_day(first, desired_day))
}

/// calendar year arithmetic; feb 29 lands on feb 28 in non-leap years
pub fn add_years(date: NaiveDate, years: u32) -> Result<NaiveDate> {
    years
        .checked_mul(12)
        .and_then(|months| date.checked_add_months(Months::new(months)))
        .ok_or_else(|| MortgageError::InvalidDate {
            message: format!("{date} plus {years} years is out of range"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2025));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));

        assert_eq!(days_in_year(date(2024, 7, 1)), 366);
        assert_eq!(days_in_year(date(2100, 7, 1)), 365);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn test_days_between_is_symmetric() {
        assert_eq!(days_between(date(2025, 1, 15), date(2025, 2, 15)), 31);
        assert_eq!(days_between(date(2025, 2, 15), date(2025, 1, 15)), 31);
        assert_eq!(days_between(date(2024, 2, 28), date(2024, 3, 1)), 2);
        assert_eq!(days_between(date(2024, 1, 1), date(2025, 1, 1)), 366);
        assert_eq!(days_between(date(2025, 6, 1), date(2025, 6, 1)), 0);
    }

    #[test]
    fn test_clamp_payment_day() {
        assert_eq!(clamp_payment_day(date(2025, 2, 1), 31), date(2025, 2, 28));
        assert_eq!(clamp_payment_day(date(2024, 2, 1), 30), date(2024, 2, 29));
        assert_eq!(clamp_payment_day(date(2025, 4, 10), 31), date(2025, 4, 30));
        assert_eq!(clamp_payment_day(date(2025, 5, 10), 31), date(2025, 5, 31));
        assert_eq!(clamp_payment_day(date(2025, 5, 10), 15), date(2025, 5, 15));
    }

    #[test]
    fn test_next_payment_date_does_not_drift() {
        let mut current = date(2025, 1, 31);
        let mut seen = Vec::new();
        for _ in 0..4 {
            current = next_payment_date(current, 31).unwrap();
            seen.push(current);
        }
        assert_eq!(
            seen,
            vec![date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30), date(2025, 5, 31)]
        );
    }

    #[test]
    fn test_next_payment_date_across_year_end() {
        assert_eq!(next_payment_date(date(2025, 12, 10), 10).unwrap(), date(2026, 1, 10));
        // first payment may move to a different day than the start date
        assert_eq!(next_payment_date(date(2025, 1, 10), 25).unwrap(), date(2025, 2, 25));
    }

    #[test]
    fn test_add_years() {
        assert_eq!(add_years(date(2025, 3, 15), 20).unwrap(), date(2045, 3, 15));
        assert_eq!(add_years(date(2024, 2, 29), 1).unwrap(), date(2025, 2, 28));
        assert!(add_years(date(2025, 1, 1), u32::MAX).is_err());
    }
}
