/// lifecycle - a loan from creation through the borrower's answer to repayment
use loan_ledger_rs::chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    AcceptanceStatus, Identity, InMemoryLoanApi, LedgerConfig, LoanInput, LoanLedger, LoanPatch,
    Money, SafeTimeProvider, StaticSession, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== loan lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let lender = Identity::lender(Uuid::new_v4());
    let borrower = Identity::borrower(Uuid::new_v4());

    // 1. lender records the loan
    println!("1. creation");
    let mut ledger = LoanLedger::new(
        InMemoryLoanApi::new(&time),
        StaticSession::signed_in(lender),
        LedgerConfig::default(),
    );
    let record = ledger.create_loan(&LoanInput {
        borrower_name: "Asha Verma".to_string(),
        borrower_mobile: "9876543210".to_string(),
        borrower_aadhaar: "123456789012".to_string(),
        borrower_address: "12 MG Road, Pune".to_string(),
        borrower_identity: Some(borrower.id),
        amount: "12000".to_string(),
        purpose: "Shop renovation".to_string(),
        loan_start_date: "2024-01-01".to_string(),
        loan_end_date: "2025-01-01".to_string(),
        profile_image: None,
    })?;
    println!("  loan {} for {}", record.id, record.amount.round_currency());
    println!("  acceptance: {}", record.borrower_acceptance_status);

    // the lender fixes a typo before the borrower answers
    controller.advance(Duration::hours(2));
    let record = ledger.update_loan(
        record.id,
        LoanPatch {
            amount: Some(Money::from_major(10_000)),
            ..Default::default()
        },
    )?;
    println!("  amount corrected to {}", record.amount.round_currency());

    // 2. borrower answers
    println!("\n2. borrower response");
    controller.advance(Duration::days(1));
    let mut borrower_ledger = LoanLedger::new(
        ledger.into_api(),
        StaticSession::signed_in(borrower),
        LedgerConfig::default(),
    );
    let accepted = borrower_ledger.respond_to_loan(record.id, AcceptanceStatus::Accepted)?;
    println!("  acceptance: {}", accepted.borrower_acceptance_status);

    match borrower_ledger.respond_to_loan(record.id, AcceptanceStatus::Rejected) {
        Ok(_) => println!("  unexpected second answer"),
        Err(err) => println!("  second answer refused: {}", err),
    }
    match borrower_ledger.toggle_payment_status(record.id) {
        Ok(_) => println!("  unexpected payment change"),
        Err(err) => println!("  borrower cannot mark paid: {}", err),
    }

    // 3. repayment
    println!("\n3. repayment");
    controller.advance(Duration::days(365));
    let mut ledger = LoanLedger::new(
        borrower_ledger.into_api(),
        StaticSession::signed_in(lender),
        LedgerConfig::default(),
    );
    let paid = ledger.toggle_payment_status(record.id)?;
    println!("  status: {} (updated {})", paid.status, paid.updated_at.format("%Y-%m-%d"));
    println!("  pending amount: {}", paid.pending_amount().round_currency());

    // mistakes can be undone
    let reopened = ledger.toggle_payment_status(record.id)?;
    println!("  reverted to: {}", reopened.status);

    println!("\nevents recorded by the lender's ledger:");
    for event in ledger.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
