/// validation - every problem on a form is reported at once
use loan_ledger_rs::{validate_loan_input, validate_registration, LedgerConfig, LoanInput, RegistrationInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LedgerConfig::default();

    println!("=== loan form ===\n");
    let input = LoanInput {
        borrower_name: "Asha 2".to_string(),
        borrower_mobile: "98765".to_string(),
        borrower_aadhaar: "1234".to_string(),
        borrower_address: "12 MG Road, Pune".to_string(),
        borrower_identity: None,
        amount: "0".to_string(),
        purpose: "Stock".to_string(),
        loan_start_date: "2024-06-01".to_string(),
        loan_end_date: "2024-01-01".to_string(),
        profile_image: None,
    };

    match validate_loan_input(&input, &config.validation) {
        Ok(terms) => println!("valid: {:?}", terms),
        Err(errors) => {
            for violation in errors.violations() {
                println!("  {:<20} {}", violation.field.label(), violation.message);
            }
        }
    }

    println!("\n=== registration form ===\n");
    let signup = RegistrationInput {
        name: "Vikram Shah".to_string(),
        aadhaar_number: "555566667777".to_string(),
        mobile_number: "9123456780".to_string(),
        email: "vikram@".to_string(),
        address: "4 Park Street, Kolkata".to_string(),
        password: "abc".to_string(),
    };

    if let Err(errors) = validate_registration(&signup, &config.validation) {
        println!("{}", errors);
    }

    Ok(())
}
