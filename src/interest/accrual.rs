use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::{days_between, days_in_year};
use crate::decimal::{Money, Rate};
use crate::interest::{InterestCalculation, InterestCalculator};

/// day count convention for interest accrual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayCountConvention {
    /// actual days / days in the year the period starts in
    #[default]
    #[serde(rename = "ACTUAL_365")]
    Actual365,
    /// 30 days per month / 360 days per year
    #[serde(rename = "THIRTY_360")]
    Thirty360,
    /// actual days, split at year ends, each part over its own year length
    ActualActual,
}

/// engine for accruing interest between payment dates
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine {
    pub convention: DayCountConvention,
}

impl AccrualEngine {
    pub fn new(convention: DayCountConvention) -> Self {
        Self { convention }
    }

    /// calculate days between dates based on convention
    pub fn calculate_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        match self.convention {
            DayCountConvention::Actual365 | DayCountConvention::ActualActual => {
                days_between(start, end)
            }
            DayCountConvention::Thirty360 => {
                let (from, to) = if start <= end { (start, end) } else { (end, start) };
                days_30_360(from, to)
            }
        }
    }

    /// year basis for a period starting on `start`
    pub fn year_basis(&self, start: NaiveDate) -> u32 {
        match self.convention {
            DayCountConvention::Actual365 | DayCountConvention::ActualActual => days_in_year(start),
            DayCountConvention::Thirty360 => 360,
        }
    }

    /// actual/actual: each calendar-year slice of the period uses its own basis
    fn actual_actual(&self, principal: Money, rate: Rate, start: NaiveDate, end: NaiveDate) -> Money {
        let (mut cursor, end) = if start <= end { (start, end) } else { (end, start) };
        let mut interest = Money::ZERO;

        while cursor < end {
            let slice_end = NaiveDate::from_ymd_opt(cursor.year() + 1, 1, 1)
                .map_or(end, |next_year| next_year.min(end));
            interest += principal.apply_rate(rate, days_between(cursor, slice_end), days_in_year(cursor));
            cursor = slice_end;
        }

        interest
    }
}

impl InterestCalculator for AccrualEngine {
    fn calculate_interest(
        &self,
        principal: Money,
        rate: Rate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> InterestCalculation {
        let days = self.calculate_days(start_date, end_date);
        let year_basis = self.year_basis(start_date.min(end_date));

        let interest_amount = match self.convention {
            DayCountConvention::ActualActual => {
                self.actual_actual(principal, rate, start_date, end_date)
            }
            DayCountConvention::Actual365 | DayCountConvention::Thirty360 => {
                principal.apply_rate(rate, days, year_basis)
            }
        };

        InterestCalculation {
            interest_amount,
            days,
            year_basis,
            principal_base: principal,
            convention: self.convention,
        }
    }
}

/// 30/360 (US) day count between ordered dates
fn days_30_360(start: NaiveDate, end: NaiveDate) -> u32 {
    let y1 = start.year();
    let y2 = end.year();
    let m1 = start.month() as i32;
    let m2 = end.month() as i32;
    let d1 = start.day().min(30) as i32;
    let d2 = if d1 == 30 { end.day().min(30) as i32 } else { end.day() as i32 };

    let days = 360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1);
    days.max(0) as u32
}
