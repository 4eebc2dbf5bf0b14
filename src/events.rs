use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{PaymentId, PaymentType, RecalculationPolicy};

/// what happened during a schedule run, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    ExtraPaymentApplied {
        payment_id: PaymentId,
        date: NaiveDate,
        /// amount actually applied, capped at the outstanding balance
        amount: Money,
        policy: RecalculationPolicy,
        is_regular: bool,
        balance_after: Money,
    },
    /// installment changed under the reduce-payment policy; for differentiated
    /// loans the amounts are the fixed principal share
    InstallmentRecalculated {
        date: NaiveDate,
        payment_type: PaymentType,
        old_amount: Money,
        new_amount: Money,
        months_left: u32,
    },
    TermRecalculated {
        date: NaiveDate,
        old_term: u32,
        new_term: u32,
    },
    /// one-off payment whose date never matched a payment date
    ExtraPaymentUnmatched {
        payment_id: PaymentId,
        date: NaiveDate,
        amount: Money,
    },
    LoanPaidOff {
        date: NaiveDate,
        month: u32,
    },
}

/// event store for collecting events during a schedule run
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_emit_and_take() {
        let mut store = EventStore::new();
        let date = NaiveDate::from_ymd_opt(2030, 5, 15).unwrap();

        store.emit(Event::LoanPaidOff { date, month: 60 });
        store.emit(Event::ExtraPaymentUnmatched {
            payment_id: Uuid::nil(),
            date,
            amount: Money::from_major(10),
        });
        assert_eq!(store.events().len(), 2);

        let taken = store.take_events();
        assert_eq!(taken[0], Event::LoanPaidOff { date, month: 60 });
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::TermRecalculated {
            date: NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
            old_term: 240,
            new_term: 180,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"termRecalculated":{"date":"2027-01-15","oldTerm":240,"newTerm":180}}"#
        );
    }
}
