/// extra payments - reduce term vs reduce payment, plus a yearly top-up
use chrono::NaiveDate;
use mortgage_schedule_rs::{
    generate_amortization_schedule, Event, ExtraPayment, LoanTerms, Money, Rate, RecalculationPolicy,
    RegularPayment, ScheduleParams,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== extra payments example ===\n");

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid date");
    let loan = LoanTerms::new(Money::from_major(5_400_000), Rate::from_percent(dec!(18.75)), 20, date(2025, 1, 15)?);

    for policy in [RecalculationPolicy::ReduceTerm, RecalculationPolicy::ReducePayment] {
        let params = ScheduleParams::new(loan.clone()).with_early_payment(ExtraPayment::new(
            date(2027, 1, 15)?,
            Money::from_major(1_000_000),
            policy,
        ));
        let summary = generate_amortization_schedule(&params)?.summary;

        println!("{policy:?}:");
        println!("  term:          {} -> {} months", summary.original_term, summary.new_term);
        println!(
            "  payment:       {} -> {}",
            summary.original_monthly_payment.round_dp(2),
            summary.final_monthly_payment.round_dp(2)
        );
        println!("  interest saved {}\n", summary.total_savings.round_dp(2));
    }

    // 50,000 on every payment date through 2026
    let params = ScheduleParams::new(loan).with_regular_payment(
        RegularPayment::new(Money::from_major(50_000), date(2025, 1, 1)?, RecalculationPolicy::ReduceTerm)
            .until(date(2026, 12, 1)?),
    );
    let result = generate_amortization_schedule(&params)?;
    println!("regular top-ups: {} extra paid", result.total_extra_payments());
    println!("new term: {} months", result.summary.new_term);

    let recalculations = result
        .events
        .iter()
        .filter(|event| matches!(event, Event::TermRecalculated { .. }))
        .count();
    println!("term recalculated {recalculations} times");

    Ok(())
}
