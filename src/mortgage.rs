use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanTerms;
use crate::dates::add_years;
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::formulas::{annuity_payment, differentiated_payment, total_cost_differentiated};
use crate::types::PaymentType;

/// loan economics when nothing extra is ever paid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageSummary {
    /// the annuity installment, or the first (largest) differentiated one
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub payoff_date: NaiveDate,
    /// in years
    pub loan_term: u32,
    pub payment_type: PaymentType,
}

impl MortgageSummary {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// baseline monthly payment, total cost and payoff date from the loan terms
pub fn calculate_mortgage(loan: &LoanTerms) -> Result<MortgageSummary> {
    loan.validate()?;

    let term_months = loan.term_months()?;
    let rate = loan.annual_interest_rate;

    let (monthly_payment, total_cost) = match loan.payment_type {
        PaymentType::Annuity => {
            let payment = annuity_payment(loan.principal, rate, term_months)?;
            (payment, payment * Decimal::from(term_months))
        }
        PaymentType::Differentiated => (
            differentiated_payment(loan.principal, rate, term_months, 1)?,
            total_cost_differentiated(loan.principal, rate, term_months)?,
        ),
    };

    Ok(MortgageSummary {
        monthly_payment,
        total_interest: total_cost - loan.principal,
        total_cost,
        payoff_date: add_years(loan.start_date, loan.term_years)?,
        loan_term: loan.term_years,
        payment_type: loan.payment_type,
    })
}
