/// quick start - record a loan and print the lender's view of it
use loan_ledger_rs::chrono::{TimeZone, Utc};
use loan_ledger_rs::{
    Identity, InMemoryLoanApi, LedgerConfig, LoanInput, LoanLedger, LoanView, SafeTimeProvider,
    StaticSession, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let lender = Identity::lender(Uuid::new_v4());

    let mut ledger = LoanLedger::new(
        InMemoryLoanApi::new(&time),
        StaticSession::signed_in(lender),
        LedgerConfig::default(),
    );

    // lend 12,000 for a year
    let record = ledger.create_loan(&LoanInput {
        borrower_name: "Asha Verma".to_string(),
        borrower_mobile: "9876543210".to_string(),
        borrower_aadhaar: "123456789012".to_string(),
        borrower_address: "12 MG Road, Pune".to_string(),
        borrower_identity: Some(Uuid::new_v4()),
        amount: "12000".to_string(),
        purpose: "Shop renovation".to_string(),
        loan_start_date: "2024-01-01".to_string(),
        loan_end_date: "2025-01-01".to_string(),
        profile_image: None,
    })?;

    let view = LoanView::from_record(&record, &lender, &ledger.config().currency);
    println!("{}", view.to_json_pretty()?);

    Ok(())
}
