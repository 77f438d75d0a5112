/// emi calculator - monthly installment and full repayment plan
use loan_ledger_rs::chrono::NaiveDate;
use loan_ledger_rs::payments::{quote_from_input, EmiInput};
use loan_ledger_rs::{quote_emi, Money, Rate, RepaymentSchedule};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== emi calculator ===\n");

    let principal = Money::from_major(12_000);
    let rate = Rate::from_percentage(12);

    println!("principal: {}", principal.round_currency());
    println!("rate: {}", rate);
    println!("\n{:>8} {:>12} {:>14} {:>14}", "months", "emi", "total", "interest");
    for months in [6, 12, 24, 36] {
        let quote = quote_emi(principal, rate, months)?.rounded(2);
        println!(
            "{:>8} {:>12} {:>14} {:>14}",
            months, quote.emi, quote.total_payable, quote.total_interest
        );
    }

    // zero interest splits the principal evenly
    let flat = quote_emi(principal, Rate::ZERO, 12)?;
    println!("\nzero rate over 12 months: {}", flat.emi);

    // the calculator form works on raw text
    let from_form = quote_from_input(&EmiInput {
        principal: "50000".to_string(),
        annual_rate_percent: "10.5".to_string(),
        duration_months: "24".to_string(),
    })?;
    println!("form quote (50000 @ 10.5% for 24): {}", from_form.rounded(2).emi);

    match quote_from_input(&EmiInput {
        principal: "-1".to_string(),
        annual_rate_percent: "abc".to_string(),
        duration_months: "0".to_string(),
    }) {
        Ok(_) => println!("unexpected quote"),
        Err(err) => println!("rejected form: {}", err),
    }

    println!("\n=== repayment schedule ===\n");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let schedule = RepaymentSchedule::generate(principal, rate, 12, start)?;

    println!("{:>3} {:>12} {:>10} {:>10} {:>10} {:>12}", "#", "due", "payment", "interest", "principal", "balance");
    for row in &schedule.installments {
        println!(
            "{:>3} {:>12} {:>10} {:>10} {:>10} {:>12}",
            row.number,
            row.due_date.format("%d-%m-%Y"),
            row.payment.round_currency(),
            row.interest_portion.round_currency(),
            row.principal_portion.round_currency(),
            row.closing_balance.round_currency(),
        );
    }
    println!("\ntotal interest: {}", schedule.total_interest.round_currency());
    println!("total payment: {}", schedule.total_payment.round_currency());

    Ok(())
}
