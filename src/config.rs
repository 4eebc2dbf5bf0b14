use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::interest::DayCountConvention;
use crate::types::{ExtraPayment, PaymentType, RegularPayment};

/// balance below which the loan counts as repaid
pub const DEFAULT_BALANCE_EPSILON: Money = Money::CENT;

/// immutable loan terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    #[serde(rename = "loanAmount")]
    pub principal: Money,
    /// annual rate; serialized as a percentage
    #[serde(rename = "interestRate")]
    pub annual_interest_rate: Rate,
    #[serde(rename = "loanTerm")]
    pub term_years: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub payment_type: PaymentType,
    /// day of month payments fall due; the start date's day when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    #[serde(default)]
    pub day_count: DayCountConvention,
}

impl LoanTerms {
    /// annuity loan paid on the start date's day of month, actual/365 accrual
    pub fn new(principal: Money, annual_interest_rate: Rate, term_years: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_interest_rate,
            term_years,
            start_date,
            payment_type: PaymentType::Annuity,
            payment_day: None,
            day_count: DayCountConvention::Actual365,
        }
    }

    pub fn with_payment_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = payment_type;
        self
    }

    pub fn with_payment_day(mut self, day: u32) -> Self {
        self.payment_day = Some(day);
        self
    }

    pub fn with_day_count(mut self, convention: DayCountConvention) -> Self {
        self.day_count = convention;
        self
    }

    /// number of scheduled monthly payments
    pub fn term_months(&self) -> Result<u32> {
        self.term_years
            .checked_mul(12)
            .ok_or_else(|| MortgageError::invalid_input("loanTerm", format!("{} years is too long", self.term_years)))
    }

    /// day of month used for every payment date
    pub fn payment_day_of_month(&self) -> u32 {
        self.payment_day.unwrap_or_else(|| self.start_date.day())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(MortgageError::invalid_input(
                "loanAmount",
                format!("must be greater than 0, got {}", self.principal),
            ));
        }

        let rate = self.annual_interest_rate.as_decimal();
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(MortgageError::InvalidInterestRate {
                rate: self.annual_interest_rate,
            });
        }

        if self.term_years == 0 {
            return Err(MortgageError::invalid_input("loanTerm", "must be greater than 0"));
        }
        self.term_months()?;

        if let Some(day) = self.payment_day {
            if !(1..=31).contains(&day) {
                return Err(MortgageError::invalid_input(
                    "paymentDay",
                    format!("must be between 1 and 31, got {day}"),
                ));
            }
        }

        Ok(())
    }
}

/// everything one schedule run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParams {
    #[serde(flatten)]
    pub loan: LoanTerms,
    #[serde(default)]
    pub early_payments: Vec<ExtraPayment>,
    #[serde(default)]
    pub regular_payments: Vec<RegularPayment>,
}

impl ScheduleParams {
    pub fn new(loan: LoanTerms) -> Self {
        Self {
            loan,
            early_payments: Vec::new(),
            regular_payments: Vec::new(),
        }
    }

    pub fn with_early_payment(mut self, payment: ExtraPayment) -> Self {
        self.early_payments.push(payment);
        self
    }

    pub fn with_regular_payment(mut self, payment: RegularPayment) -> Self {
        self.regular_payments.push(payment);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.loan.validate()?;
        for payment in &self.early_payments {
            payment.validate()?;
        }
        for payment in &self.regular_payments {
            payment.validate()?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
