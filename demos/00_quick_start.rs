/// quick start - baseline payment and the first year of the schedule
use chrono::NaiveDate;
use mortgage_schedule_rs::{calculate_mortgage, generate_amortization_schedule, LoanTerms, Money, Rate, ScheduleParams};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).ok_or("invalid start date")?;
    let loan = LoanTerms::new(Money::from_major(5_400_000), Rate::from_percent(dec!(18.75)), 20, start);

    let summary = calculate_mortgage(&loan)?;
    println!("monthly payment: {}", summary.monthly_payment.round_dp(2));
    println!("total interest:  {}", summary.total_interest.round_dp(2));
    println!("payoff date:     {}", summary.payoff_date);

    let result = generate_amortization_schedule(&ScheduleParams::new(loan))?;
    println!("\nmonth  date        payment      principal    interest     balance");
    for entry in result.schedule.iter().take(12) {
        println!(
            "{:>5}  {}  {:>11}  {:>11}  {:>11}  {:>13}",
            entry.month,
            entry.date,
            entry.payment.round_dp(2),
            entry.principal.round_dp(2),
            entry.interest.round_dp(2),
            entry.balance.round_dp(2),
        );
    }

    Ok(())
}
