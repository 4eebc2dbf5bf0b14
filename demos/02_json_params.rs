/// json params - drive the engine from the web form's wire shape
use mortgage_schedule_rs::ScheduleParams;

const PARAMS: &str = r#"{
    "loanAmount": "3000000",
    "interestRate": "12.5",
    "loanTerm": 15,
    "startDate": "2025-03-10",
    "paymentType": "differentiated",
    "earlyPayments": [
        {
            "id": "6f1c1f43-8f7e-4b5c-9a62-0d3d7b1d2f10",
            "date": "2026-03-10",
            "amount": "250000",
            "type": "reducePayment"
        }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = ScheduleParams::from_json(PARAMS)?;
    let result = params.generate_schedule()?;

    println!("{}", serde_json::to_string_pretty(&result.summary)?);
    println!("{} events", result.events.len());

    Ok(())
}
