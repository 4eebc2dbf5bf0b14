use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::types::RecalculationPolicy;

use super::formulas::{annuity_payment, term_for_payment, term_for_principal};
use super::{Installment, LoanState};

/// applies an extra payment and recalculates the loan per its policy
pub struct OverpaymentHandler {
    policy: RecalculationPolicy,
}

impl OverpaymentHandler {
    pub fn new(policy: RecalculationPolicy) -> Self {
        Self { policy }
    }

    /// reduce the balance by `overpayment` (capped at what is owed), then
    /// re-derive the installment or the horizon if anything is left to pay
    pub fn handle(
        &self,
        overpayment: Money,
        date: NaiveDate,
        state: &mut LoanState,
        events: &mut EventStore,
    ) -> Result<OverpaymentResult> {
        let old_balance = state.balance;
        let old_installment = state.installment;
        let old_term = state.remaining_term;

        let amount_applied = overpayment.min(state.balance).max(Money::ZERO);
        state.balance -= amount_applied;

        if state.balance.is_positive() && state.months_left() > 0 {
            match self.policy {
                RecalculationPolicy::ReducePayment => self.reduce_payment(date, state, events)?,
                RecalculationPolicy::ReduceTerm => self.reduce_term(date, state, events),
            }
        }

        Ok(OverpaymentResult {
            policy: self.policy,
            amount_applied,
            old_balance,
            new_balance: state.balance,
            old_installment,
            new_installment: state.installment,
            old_term,
            new_term: state.remaining_term,
        })
    }

    /// keep the horizon, spread the smaller balance over the months left
    fn reduce_payment(&self, date: NaiveDate, state: &mut LoanState, events: &mut EventStore) -> Result<()> {
        let months_left = state.months_left();
        let old = state.installment;

        state.installment = match old {
            Installment::Annuity { .. } => Installment::Annuity {
                payment: annuity_payment(state.balance, state.annual_rate, months_left)?,
            },
            Installment::Differentiated { .. } => Installment::Differentiated {
                principal: state.balance / Decimal::from(months_left),
            },
        };

        debug!(
            %date,
            old = %old.amount(),
            new = %state.installment.amount(),
            months_left,
            "installment recalculated"
        );
        events.emit(Event::InstallmentRecalculated {
            date,
            payment_type: old.payment_type(),
            old_amount: old.amount(),
            new_amount: state.installment.amount(),
            months_left,
        });

        Ok(())
    }

    /// keep the installment, pull the horizon in to when the balance runs out
    fn reduce_term(&self, date: NaiveDate, state: &mut LoanState, events: &mut EventStore) {
        let needed = match state.installment {
            Installment::Annuity { payment } => term_for_payment(state.balance, state.annual_rate, payment),
            Installment::Differentiated { principal } => term_for_principal(state.balance, principal),
        };

        // an installment that cannot outrun the interest leaves the horizon alone
        let Some(needed) = needed else {
            return;
        };

        let old_term = state.remaining_term;
        let new_term = old_term.min(state.month.saturating_add(needed));
        if new_term == old_term {
            return;
        }

        state.remaining_term = new_term;
        debug!(%date, old_term, new_term, "term recalculated");
        events.emit(Event::TermRecalculated {
            date,
            old_term,
            new_term,
        });
    }
}

/// overpayment result
#[derive(Debug, Clone, PartialEq)]
pub struct OverpaymentResult {
    pub policy: RecalculationPolicy,
    pub amount_applied: Money,
    pub old_balance: Money,
    pub new_balance: Money,
    pub old_installment: Installment,
    pub new_installment: Installment,
    pub old_term: u32,
    pub new_term: u32,
}
