use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{MortgageError, Result};

/// unique identifier for an extra payment
pub type PaymentId = Uuid;

/// how the regular monthly installment is structured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentType {
    /// equal total payment every month, principal share grows over time
    #[default]
    Annuity,
    /// equal principal every month, total payment shrinks with the interest
    Differentiated,
}

/// what an extra payment buys: a shorter loan or a smaller installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecalculationPolicy {
    /// keep the installment, finish earlier
    ReduceTerm,
    /// keep the horizon, pay less each month
    ReducePayment,
}

/// one-off extra payment on a scheduled payment date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPayment {
    pub id: PaymentId,
    /// only takes effect if it equals a generated payment date
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(rename = "type")]
    pub policy: RecalculationPolicy,
}

impl ExtraPayment {
    pub fn new(date: NaiveDate, amount: Money, policy: RecalculationPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            policy,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(MortgageError::invalid_input(
                "earlyPayments.amount",
                format!("extra payment {} must be greater than 0, got {}", self.id, self.amount),
            ));
        }
        Ok(())
    }
}

/// recurring extra payment made on every payment date within a month range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularPayment {
    pub id: PaymentId,
    pub amount: Money,
    /// first month (inclusive); only year and month are significant
    pub start_month: NaiveDate,
    /// last month (inclusive); open-ended when absent
    #[serde(default, deserialize_with = "empty_date_as_none", skip_serializing_if = "Option::is_none")]
    pub end_month: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub policy: RecalculationPolicy,
}

impl RegularPayment {
    pub fn new(amount: Money, start_month: NaiveDate, policy: RecalculationPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            start_month,
            end_month: None,
            policy,
        }
    }

    /// stop after the given month
    pub fn until(mut self, end_month: NaiveDate) -> Self {
        self.end_month = Some(end_month);
        self
    }

    /// whether a payment due on `date` falls inside the active month range
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        let month = month_key(date);
        if month < month_key(self.start_month) {
            return false;
        }
        match self.end_month {
            Some(end) => month <= month_key(end),
            None => true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(MortgageError::invalid_input(
                "regularPayments.amount",
                format!("regular payment {} must be greater than 0, got {}", self.id, self.amount),
            ));
        }
        if let Some(end) = self.end_month {
            if month_key(end) < month_key(self.start_month) {
                return Err(MortgageError::invalid_input(
                    "regularPayments.endMonth",
                    format!("end month {end} is before start month {}", self.start_month),
                ));
            }
        }
        Ok(())
    }
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// the web form sends `""` for an open-ended range
fn empty_date_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value.trim().parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_regular_payment_month_range() {
        let payment = RegularPayment::new(
            Money::from_major(1_000),
            date(2025, 3, 20),
            RecalculationPolicy::ReduceTerm,
        )
        .until(date(2025, 5, 1));

        // day of month is ignored at both ends
        assert!(!payment.is_active_on(date(2025, 2, 28)));
        assert!(payment.is_active_on(date(2025, 3, 1)));
        assert!(payment.is_active_on(date(2025, 5, 31)));
        assert!(!payment.is_active_on(date(2025, 6, 1)));
    }

    #[test]
    fn test_open_ended_regular_payment() {
        let payment = RegularPayment::new(
            Money::from_major(500),
            date(2025, 1, 1),
            RecalculationPolicy::ReducePayment,
        );
        assert!(payment.is_active_on(date(2060, 12, 31)));
        assert!(payment.validate().is_ok());
    }

    #[test]
    fn test_regular_payment_rejects_inverted_range() {
        let payment = RegularPayment::new(
            Money::from_major(500),
            date(2025, 6, 1),
            RecalculationPolicy::ReduceTerm,
        )
        .until(date(2025, 5, 31));

        assert!(matches!(
            payment.validate(),
            Err(MortgageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_extra_payment_rejects_zero_amount() {
        let payment = ExtraPayment::new(date(2025, 1, 1), Money::ZERO, RecalculationPolicy::ReduceTerm);
        assert!(payment.validate().is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = r#"{
            "id": "6f1c1d1e-8f4e-4b8a-9a57-2d0f5c2b9a11",
            "date": "2026-01-15",
            "amount": "1000000",
            "type": "reducePayment"
        }"#;
        let payment: ExtraPayment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.policy, RecalculationPolicy::ReducePayment);
        assert_eq!(payment.date, date(2026, 1, 15));
        assert_eq!(payment.amount, Money::from_major(1_000_000));

        let payment_type: PaymentType = serde_json::from_str("\"differentiated\"").unwrap();
        assert_eq!(payment_type, PaymentType::Differentiated);
    }

    #[test]
    fn test_regular_payment_end_month_wire_forms() {
        let parse = |end_month: &str| -> RegularPayment {
            let json = format!(
                r#"{{
                    "id": "2b7e4c1a-5d3f-4e8b-9c6a-1f0d2e3c4b5a",
                    "amount": "50000",
                    "startMonth": "2026-01-01",
                    {end_month}
                    "type": "reduceTerm"
                }}"#
            );
            serde_json::from_str(&json).unwrap()
        };

        assert_eq!(parse(r#""endMonth": "","#).end_month, None);
        assert_eq!(parse(r#""endMonth": null,"#).end_month, None);
        assert_eq!(parse("").end_month, None);
        assert_eq!(parse(r#""endMonth": "2026-12-01","#).end_month, Some(date(2026, 12, 1)));

        let bad = r#"{"id": "2b7e4c1a-5d3f-4e8b-9c6a-1f0d2e3c4b5a", "amount": "1", "startMonth": "2026-01-01", "endMonth": "soon", "type": "reduceTerm"}"#;
        assert!(serde_json::from_str::<RegularPayment>(bad).is_err());

        let payment = parse(r#""endMonth": "2026-12-01","#);
        let roundtrip: RegularPayment = serde_json::from_str(&serde_json::to_string(&payment).unwrap()).unwrap();
        assert_eq!(roundtrip, payment);
    }
}
