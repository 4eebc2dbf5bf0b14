use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{ScheduleParams, DEFAULT_BALANCE_EPSILON};
use crate::dates::next_payment_date;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::interest::{AccrualEngine, InterestCalculator};
use crate::mortgage::calculate_mortgage;
use crate::types::{ExtraPayment, PaymentId, PaymentType, RecalculationPolicy};

use super::overpayment::OverpaymentHandler;
use super::{Installment, LoanState};

/// one month of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub month: u32,
    pub date: NaiveDate,
    /// regular installment paid this month: principal + interest, extras excluded
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// cumulative through this month
    pub total_interest: Money,
    /// outstanding after the installment and any extra payments
    pub balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_payment: Option<Money>,
    #[serde(rename = "extraPaymentType", default, skip_serializing_if = "Option::is_none")]
    pub extra_payment_policy: Option<RecalculationPolicy>,
    #[serde(default)]
    pub is_regular_payment: bool,
}

/// before/after comparison of the loan with its extra payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub original_term: u32,
    pub new_term: u32,
    pub original_total_interest: Money,
    pub new_total_interest: Money,
    pub original_monthly_payment: Money,
    /// installment in effect for the last scheduled month
    pub final_monthly_payment: Money,
    /// interest saved; negative if day-accurate accrual costs more than the baseline
    pub total_savings: Money,
    pub payment_type: PaymentType,
}

/// full simulation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationResult {
    pub schedule: Vec<ScheduleEntry>,
    pub summary: ScheduleSummary,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl AmortizationResult {
    /// get entry for a 1-based month
    pub fn get_payment(&self, month: u32) -> Option<&ScheduleEntry> {
        month
            .checked_sub(1)
            .and_then(|index| self.schedule.get(index as usize))
    }

    /// outstanding balance after the given month, 0 once the schedule has ended
    pub fn balance_after_payment(&self, month: u32) -> Money {
        match self.get_payment(month) {
            Some(entry) => entry.balance,
            None => Money::ZERO,
        }
    }

    pub fn total_extra_payments(&self) -> Money {
        self.schedule.iter().filter_map(|entry| entry.extra_payment).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// extra payment due on a particular payment date
struct DueExtraPayment {
    id: PaymentId,
    amount: Money,
    policy: RecalculationPolicy,
    is_regular: bool,
}

/// month-by-month loan simulator
pub struct AmortizationCalculator<'a> {
    params: &'a ScheduleParams,
    accrual: AccrualEngine,
    epsilon: Money,
}

impl<'a> AmortizationCalculator<'a> {
    pub fn new(params: &'a ScheduleParams) -> Self {
        Self {
            params,
            accrual: AccrualEngine::new(params.loan.day_count),
            epsilon: DEFAULT_BALANCE_EPSILON,
        }
    }

    /// balance at or below which the loan counts as repaid
    pub fn with_epsilon(mut self, epsilon: Money) -> Self {
        self.epsilon = epsilon.max(Money::ZERO);
        self
    }

    /// run the simulation
    pub fn calculate(&self) -> Result<AmortizationResult> {
        self.params.validate()?;

        let loan = &self.params.loan;
        let baseline = calculate_mortgage(loan)?;
        let original_term = loan.term_months()?;
        let payment_day = loan.payment_day_of_month();
        let one_off_by_date = self.one_off_payments_by_date();

        let mut state = LoanState {
            month: 1,
            balance: loan.principal,
            remaining_term: original_term,
            installment: Installment::initial(loan.payment_type, loan.principal, loan.annual_interest_rate, original_term)?,
            annual_rate: loan.annual_interest_rate,
        };
        let mut events = EventStore::new();
        let mut schedule = Vec::with_capacity(original_term as usize);
        let mut total_interest = Money::ZERO;
        let mut previous_date = loan.start_date;
        let mut final_installment = baseline.monthly_payment;

        debug!(
            principal = %loan.principal,
            rate = %loan.annual_interest_rate,
            term_months = original_term,
            payment_type = ?loan.payment_type,
            day_count = ?loan.day_count,
            early_payments = self.params.early_payments.len(),
            regular_payments = self.params.regular_payments.len(),
            "generating amortization schedule"
        );

        while state.month <= state.remaining_term && state.balance > self.epsilon {
            let date = next_payment_date(previous_date, payment_day)?;
            let interest = self
                .accrual
                .calculate_interest(state.balance, state.annual_rate, previous_date, date)
                .interest_amount;

            let principal = if state.is_final_month() {
                state.balance
            } else {
                state.installment.scheduled_principal(interest).min(state.balance)
            };
            final_installment = match state.installment {
                Installment::Annuity { payment } => payment,
                Installment::Differentiated { principal: fixed } => fixed + interest,
            };

            state.balance -= principal;
            total_interest += interest;

            let mut extra_total = Money::ZERO;
            let mut extra_policy = None;
            let mut is_regular_payment = false;

            for due in self.due_extra_payments(&one_off_by_date, date) {
                if !state.balance.is_positive() {
                    break;
                }

                let result = OverpaymentHandler::new(due.policy).handle(due.amount, date, &mut state, &mut events)?;
                events.emit(Event::ExtraPaymentApplied {
                    payment_id: due.id,
                    date,
                    amount: result.amount_applied,
                    policy: due.policy,
                    is_regular: due.is_regular,
                    balance_after: result.new_balance,
                });

                extra_total += result.amount_applied;
                extra_policy = Some(due.policy);
                is_regular_payment |= due.is_regular;
            }

            trace!(
                month = state.month,
                %date,
                %interest,
                %principal,
                extra = %extra_total,
                balance = %state.balance,
                "scheduled payment"
            );

            schedule.push(ScheduleEntry {
                month: state.month,
                date,
                payment: principal + interest,
                principal,
                interest,
                total_interest,
                balance: state.balance,
                extra_payment: extra_policy.map(|_| extra_total),
                extra_payment_policy: extra_policy,
                is_regular_payment,
            });

            if state.balance <= self.epsilon {
                events.emit(Event::LoanPaidOff {
                    date,
                    month: state.month,
                });
            }

            previous_date = date;
            state.month += 1;
        }

        let scheduled_dates: HashSet<NaiveDate> = schedule.iter().map(|entry| entry.date).collect();
        for payment in &self.params.early_payments {
            if !scheduled_dates.contains(&payment.date) {
                debug!(payment_id = %payment.id, date = %payment.date, "extra payment matched no payment date");
                events.emit(Event::ExtraPaymentUnmatched {
                    payment_id: payment.id,
                    date: payment.date,
                    amount: payment.amount,
                });
            }
        }

        let summary = ScheduleSummary {
            original_term,
            new_term: schedule.len() as u32,
            original_total_interest: baseline.total_interest,
            new_total_interest: total_interest,
            original_monthly_payment: baseline.monthly_payment,
            final_monthly_payment: final_installment,
            total_savings: baseline.total_interest - total_interest,
            payment_type: loan.payment_type,
        };

        debug!(
            new_term = summary.new_term,
            original_term,
            total_interest = %summary.new_total_interest,
            savings = %summary.total_savings,
            "amortization schedule generated"
        );

        Ok(AmortizationResult {
            schedule,
            summary,
            events: events.take_events(),
        })
    }

    /// one-off payments grouped by date, input order kept within a date
    fn one_off_payments_by_date(&self) -> BTreeMap<NaiveDate, Vec<&'a ExtraPayment>> {
        let params: &'a ScheduleParams = self.params;
        let mut by_date: BTreeMap<NaiveDate, Vec<&'a ExtraPayment>> = BTreeMap::new();
        for payment in &params.early_payments {
            by_date.entry(payment.date).or_default().push(payment);
        }
        by_date
    }

    /// one-off payments on `date` first, then every regular payment active that month
    fn due_extra_payments(
        &self,
        one_off_by_date: &BTreeMap<NaiveDate, Vec<&'a ExtraPayment>>,
        date: NaiveDate,
    ) -> Vec<DueExtraPayment> {
        let one_off = one_off_by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(|payment| DueExtraPayment {
                id: payment.id,
                amount: payment.amount,
                policy: payment.policy,
                is_regular: false,
            });

        let regular = self
            .params
            .regular_payments
            .iter()
            .filter(|payment| payment.is_active_on(date))
            .map(|payment| DueExtraPayment {
                id: payment.id,
                amount: payment.amount,
                policy: payment.policy,
                is_regular: true,
            });

        one_off.chain(regular).collect()
    }
}

/// full month-by-month schedule with extra payments applied
pub fn generate_amortization_schedule(params: &ScheduleParams) -> Result<AmortizationResult> {
    AmortizationCalculator::new(params).calculate()
}

impl ScheduleParams {
    pub fn generate_schedule(&self) -> Result<AmortizationResult> {
        generate_amortization_schedule(self)
    }
}
