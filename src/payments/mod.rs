pub mod amortization;
pub mod formulas;
pub mod overpayment;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::types::PaymentType;

pub use amortization::{
    generate_amortization_schedule, AmortizationCalculator, AmortizationResult, ScheduleEntry, ScheduleSummary,
};
pub use formulas::{
    annuity_payment, differentiated_payment, term_for_payment, term_for_principal, total_cost_differentiated,
};
pub use overpayment::{OverpaymentHandler, OverpaymentResult};

/// the part of the monthly payment that stays fixed between recalculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Installment {
    /// total payment is fixed, the principal share is what is left after interest
    Annuity { payment: Money },
    /// principal share is fixed, interest is paid on top
    Differentiated { principal: Money },
}

impl Installment {
    /// installment at loan start for `term_months` payments
    pub fn initial(payment_type: PaymentType, principal: Money, annual_rate: Rate, term_months: u32) -> Result<Self> {
        match payment_type {
            PaymentType::Annuity => Ok(Installment::Annuity {
                payment: annuity_payment(principal, annual_rate, term_months)?,
            }),
            PaymentType::Differentiated => {
                if term_months == 0 {
                    return Err(MortgageError::invalid_input("termMonths", "differentiated schedule needs at least one payment"));
                }
                Ok(Installment::Differentiated {
                    principal: principal / Decimal::from(term_months),
                })
            }
        }
    }

    /// the fixed amount: total payment for annuities, principal share otherwise
    pub fn amount(&self) -> Money {
        match self {
            Installment::Annuity { payment } => *payment,
            Installment::Differentiated { principal } => *principal,
        }
    }

    pub fn payment_type(&self) -> PaymentType {
        match self {
            Installment::Annuity { .. } => PaymentType::Annuity,
            Installment::Differentiated { .. } => PaymentType::Differentiated,
        }
    }

    /// principal due this month given the accrued interest
    ///
    /// An annuity installment that does not cover the interest pays no
    /// principal; the balance never grows.
    pub fn scheduled_principal(&self, interest: Money) -> Money {
        match self {
            Installment::Annuity { payment } => (*payment - interest).max(Money::ZERO),
            Installment::Differentiated { principal } => *principal,
        }
    }
}

/// running loan state during a schedule simulation
#[derive(Debug, Clone, PartialEq)]
pub struct LoanState {
    /// 1-based index of the payment being processed
    pub month: u32,
    pub balance: Money,
    /// month index of the last scheduled payment; only ever shrinks
    pub remaining_term: u32,
    pub installment: Installment,
    pub annual_rate: Rate,
}

impl LoanState {
    /// scheduled payments after the current one
    pub fn months_left(&self) -> u32 {
        self.remaining_term.saturating_sub(self.month)
    }

    pub fn is_final_month(&self) -> bool {
        self.month >= self.remaining_term
    }
}
