/// statistics - dashboard totals, search and aadhaar history
use loan_ledger_rs::chrono::{TimeZone, Utc};
use loan_ledger_rs::{
    Identity, InMemoryLoanApi, LedgerConfig, LoanInput, LoanLedger, PaymentStatus,
    SafeTimeProvider, StaticSession, StatisticsView, TimeSource, Uuid,
};

fn form(name: &str, aadhaar: &str, amount: &str, purpose: &str) -> LoanInput {
    LoanInput {
        borrower_name: name.to_string(),
        borrower_mobile: "9876543210".to_string(),
        borrower_aadhaar: aadhaar.to_string(),
        borrower_address: "Pune".to_string(),
        borrower_identity: Some(Uuid::new_v4()),
        amount: amount.to_string(),
        purpose: purpose.to_string(),
        loan_start_date: "01-02-2024".to_string(),
        loan_end_date: "01-02-2025".to_string(),
        profile_image: None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    ));
    let lender = Identity::lender(Uuid::new_v4());
    let mut ledger = LoanLedger::new(
        InMemoryLoanApi::new(&time),
        StaticSession::signed_in(lender),
        LedgerConfig::default(),
    );

    let first = ledger.create_loan(&form("Asha Verma", "123456789012", "12000", "Shop renovation"))?;
    ledger.create_loan(&form("Vikram Shah", "555566667777", "5000", "School fees"))?;
    ledger.create_loan(&form("Asha Verma", "123456789012", "2500.50", "Seeds"))?;
    ledger.set_payment_status(first.id, PaymentStatus::Paid)?;

    let stats = ledger.role_statistics()?;
    let view = StatisticsView::from_statistics(&stats, &ledger.config().currency);
    println!("=== dashboard ===\n{}", view.to_json_pretty()?);

    let loans = ledger.outward_loans()?;
    println!("\n=== search \"asha\" ===");
    for record in loans.search("asha") {
        println!("  {} {} {}", record.borrower_name, record.amount.round_currency(), record.status);
    }

    println!("\n=== history for 123456789012 ===");
    let history = ledger.history_for_aadhaar("123456789012")?;
    for record in history.records() {
        println!("  {} lent {} on {}", record.lender_identity, record.amount, record.loan_start_date);
    }

    Ok(())
}
