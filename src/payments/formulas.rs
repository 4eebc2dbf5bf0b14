use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};

/// annuity installment: P * r * (1 + r)^n / ((1 + r)^n - 1), r = annual / 12
pub fn annuity_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
    if term_months == 0 {
        return Err(MortgageError::invalid_input("termMonths", "annuity needs at least one payment"));
    }

    let r = annual_rate.monthly_rate().as_decimal();
    if r.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    // evaluated as P * r / (1 - (1 + r)^-n); once (1 + r)^n no longer fits in a
    // Decimal the discount factor is zero at this precision and the payment is P * r
    let discount = match (Decimal::ONE + r).checked_powu(term_months as u64) {
        Some(compound) => Decimal::ONE.checked_div(compound).unwrap_or(Decimal::ZERO),
        None => Decimal::ZERO,
    };
    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|numerator| numerator.checked_div(denominator))
        .map(Money::from_decimal)
        .ok_or_else(|| MortgageError::overflow("annuity payment"))
}

/// differentiated installment number `payment_index` (1-based): fixed principal
/// share plus a month of interest on what is still owed
pub fn differentiated_payment(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    payment_index: u32,
) -> Result<Money> {
    if term_months == 0 {
        return Err(MortgageError::invalid_input("termMonths", "differentiated schedule needs at least one payment"));
    }
    if payment_index == 0 || payment_index > term_months {
        return Err(MortgageError::invalid_input(
            "paymentIndex",
            format!("{payment_index} is outside 1..={term_months}"),
        ));
    }

    let fixed_principal = principal / Decimal::from(term_months);
    let remaining = principal - fixed_principal * Decimal::from(payment_index - 1);
    let interest = remaining * annual_rate.monthly_rate().as_decimal();

    Ok(fixed_principal + interest)
}

/// sum of every differentiated installment; there is no closed form
pub fn total_cost_differentiated(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
    let mut total = Money::ZERO;
    for index in 1..=term_months {
        total += differentiated_payment(principal, annual_rate, term_months, index)?;
    }
    Ok(total)
}

/// months needed to amortize `balance` at a fixed annuity `payment`
///
/// n = ceil(ln(pmt / (pmt - B * r)) / ln(1 + r)). `None` when the payment
/// never gets ahead of the interest.
pub fn term_for_payment(balance: Money, annual_rate: Rate, payment: Money) -> Option<u32> {
    if !balance.is_positive() {
        return Some(0);
    }
    if !payment.is_positive() {
        return None;
    }

    let r = annual_rate.monthly_rate().as_decimal();
    let b = balance.as_decimal();
    let p = payment.as_decimal();

    if r.is_zero() {
        return (b / p).ceil().to_u32();
    }

    let interest_portion = b * r;
    if p <= interest_portion {
        return None;
    }

    let ratio = p.checked_div(p - interest_portion)?;
    let months = ratio.checked_ln()?.checked_div((Decimal::ONE + r).checked_ln()?)?;
    months.ceil().to_u32()
}

/// months needed to repay `balance` with a fixed principal share per month
pub fn term_for_principal(balance: Money, principal_portion: Money) -> Option<u32> {
    if !balance.is_positive() {
        return Some(0);
    }
    if !principal_portion.is_positive() {
        return None;
    }
    (balance.as_decimal() / principal_portion.as_decimal()).ceil().to_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn closed_form(principal: f64, annual_percent: f64, months: i32) -> f64 {
        let r = annual_percent / 100.0 / 12.0;
        let compound = (1.0 + r).powi(months);
        principal * r * compound / (compound - 1.0)
    }

    #[test]
    fn test_annuity_payment() {
        let principal = Money::from_major(100_000);
        let rate = Rate::from_percentage(12);

        let emi = annuity_payment(principal, rate, 12).unwrap();

        // approximate EMI for 100k at 12% for 12 months
        assert!(emi > Money::from_major(8800));
        assert!(emi < Money::from_major(8900));
    }

    #[test]
    fn test_annuity_matches_closed_form() {
        let payment = annuity_payment(
            Money::from_major(5_400_000),
            Rate::from_percent(dec!(18.75)),
            240,
        )
        .unwrap()
        .as_decimal()
        .to_f64()
        .unwrap();

        let expected = closed_form(5_400_000.0, 18.75, 240);
        assert!(((payment - expected) / expected).abs() < 1e-6, "{payment} vs {expected}");
        assert!(payment > 86_000.0 && payment < 87_000.0);
    }

    #[test]
    fn test_annuity_zero_interest() {
        let emi = annuity_payment(Money::from_major(12_000), Rate::ZERO, 12).unwrap();
        assert_eq!(emi, Money::from_major(1000));
    }

    #[test]
    fn test_annuity_zero_term_is_rejected() {
        let result = annuity_payment(Money::from_major(12_000), Rate::from_percentage(5), 0);
        assert!(matches!(result, Err(MortgageError::InvalidInput { .. })));
    }

    #[test]
    fn test_annuity_long_term_at_max_rate() {
        // 50 years at 100%: compounding is huge but the payment barely exceeds interest
        let principal = Money::from_major(1_000_000_000);
        let rate = Rate::from_percentage(100);
        let payment = annuity_payment(principal, rate, 600).unwrap();
        let monthly_interest = principal * rate.monthly_rate().as_decimal();
        assert!(payment >= monthly_interest);
        assert!(payment - monthly_interest < Money::ONE);
    }

    #[test]
    fn test_annuity_compounding_past_decimal_range() {
        // (1 + r)^n exceeds Decimal::MAX for both of these
        for (years, rate) in [(70, Rate::from_percentage(100)), (400, Rate::from_percent(dec!(18.75)))] {
            let principal = Money::from_major(5_400_000);
            let payment = annuity_payment(principal, rate, years * 12).unwrap();
            assert_eq!(payment, principal * rate.monthly_rate().as_decimal(), "{years} years at {rate}");
        }
    }

    #[test]
    fn test_differentiated_payment() {
        let principal = Money::from_major(120_000);
        let rate = Rate::from_percentage(12);

        let first = differentiated_payment(principal, rate, 12, 1).unwrap();
        let second = differentiated_payment(principal, rate, 12, 2).unwrap();
        let last = differentiated_payment(principal, rate, 12, 12).unwrap();

        // 10k principal + 1% of the outstanding balance
        assert_eq!(first, Money::from_major(11_200));
        assert_eq!(second, Money::from_major(11_100));
        assert_eq!(last, Money::from_major(10_100));

        assert!(differentiated_payment(principal, rate, 12, 0).is_err());
        assert!(differentiated_payment(principal, rate, 12, 13).is_err());
    }

    #[test]
    fn test_total_cost_differentiated() {
        let principal = Money::from_major(120_000);
        let rate = Rate::from_percentage(12);

        let total = total_cost_differentiated(principal, rate, 12).unwrap();
        // interest: 1% of 120k, 110k, ..., 10k = 7,800
        assert_eq!(total, Money::from_major(127_800));

        // cheaper than the annuity over the same term
        let annuity_total = annuity_payment(principal, rate, 12).unwrap() * Decimal::from(12);
        assert!(total < annuity_total);
    }

    #[test]
    fn test_term_for_payment() {
        let principal = Money::from_major(100_000);
        let rate = Rate::from_percentage(12);
        let emi = Money::from_major(10_000);

        let term = term_for_payment(principal, rate, emi).unwrap();

        // should be around 11 months
        assert!(term >= 10);
        assert!(term <= 12);
    }

    #[test]
    fn test_term_for_payment_inverts_annuity() {
        let principal = Money::from_major(5_400_000);
        let rate = Rate::from_percent(dec!(18.75));
        let payment = annuity_payment(principal, rate, 240).unwrap();

        let term = term_for_payment(principal, rate, payment).unwrap();
        assert!((240..=241).contains(&term));

        let shorter = term_for_payment(principal - Money::from_major(1_000_000), rate, payment).unwrap();
        assert!(shorter < 240);
    }

    #[test]
    fn test_term_for_payment_edge_cases() {
        let rate = Rate::from_percentage(12);
        assert_eq!(term_for_payment(Money::ZERO, rate, Money::from_major(100)), Some(0));
        assert_eq!(term_for_payment(Money::from_major(1_000), rate, Money::ZERO), None);
        // payment only covers interest
        assert_eq!(term_for_payment(Money::from_major(10_000), rate, Money::from_major(100)), None);
        // zero rate divides evenly, rounding up
        assert_eq!(term_for_payment(Money::from_major(1_050), Rate::ZERO, Money::from_major(100)), Some(11));
    }

    #[test]
    fn test_term_for_principal() {
        assert_eq!(term_for_principal(Money::from_major(1_000), Money::from_major(100)), Some(10));
        assert_eq!(term_for_principal(Money::from_major(1_001), Money::from_major(100)), Some(11));
        assert_eq!(term_for_principal(Money::ZERO, Money::from_major(100)), Some(0));
        assert_eq!(term_for_principal(Money::from_major(1_000), Money::ZERO), None);
    }
}
