use chrono::{Months, NaiveDate};
use std::str::FromStr;

use crate::config::ValidationRules;
use crate::decimal::Money;
use crate::errors::{FormField, ValidationErrors};
use crate::record::{LoanInput, LoanPatch, LoanRecord, LoanTerms};
use crate::validation::{is_blank, is_digits, is_plain_name};

/// accepted date layouts: iso first, then the list-view format
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Validate the lender's loan form.
///
/// Every rule runs and violations come back in a fixed order with at most
/// one per field, so the first message for a field is always the most basic
/// one (a missing value wins over a malformed one):
///
/// 1. required fields, in form order
/// 2. amount is a number greater than zero and at most `max_amount`
/// 3. dates parse, start is strictly before end, and the loan runs at most
///    `max_duration_months`
/// 4. aadhaar is exactly `aadhaar_digits` digits
/// 5. mobile is exactly `mobile_digits` digits
/// 6. name characters and purpose length
pub fn validate_loan_input(
    input: &LoanInput,
    rules: &ValidationRules,
) -> std::result::Result<LoanTerms, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let required = [
        (FormField::BorrowerName, &input.borrower_name),
        (FormField::BorrowerMobile, &input.borrower_mobile),
        (FormField::BorrowerAadhaar, &input.borrower_aadhaar),
        (FormField::BorrowerAddress, &input.borrower_address),
        (FormField::Amount, &input.amount),
        (FormField::LoanStartDate, &input.loan_start_date),
        (FormField::LoanEndDate, &input.loan_end_date),
        (FormField::Purpose, &input.purpose),
    ];
    for (field, value) in required {
        if is_blank(value) {
            errors.push(field, format!("The {} is required.", field.label()));
        }
    }
    if input.borrower_identity.is_none() {
        errors.push(FormField::BorrowerIdentity, "Select the borrower's account.");
    }

    let amount = check_amount(&input.amount, rules, &mut errors);
    let dates = check_dates(&input.loan_start_date, &input.loan_end_date, rules, &mut errors);

    let aadhaar = input.borrower_aadhaar.trim();
    if !is_digits(aadhaar, rules.aadhaar_digits) {
        errors.push(
            FormField::BorrowerAadhaar,
            format!("Aadhaar number must be {} digits.", rules.aadhaar_digits),
        );
    }

    let mobile = input.borrower_mobile.trim();
    if !is_digits(mobile, rules.mobile_digits) {
        errors.push(
            FormField::BorrowerMobile,
            format!("Mobile number must be {} digits.", rules.mobile_digits),
        );
    }

    check_name(&input.borrower_name, rules, &mut errors);
    check_purpose(&input.purpose, rules, &mut errors);

    errors.into_result()?;

    // every branch above pushed a violation when these were missing
    match (amount, dates, input.borrower_identity) {
        (Some(amount), Some((start, end)), Some(borrower_identity)) => Ok(LoanTerms {
            borrower_name: input.borrower_name.trim().to_string(),
            borrower_mobile: mobile.to_string(),
            borrower_aadhaar: aadhaar.to_string(),
            borrower_address: input.borrower_address.trim().to_string(),
            borrower_identity,
            amount,
            purpose: input.purpose.trim().to_string(),
            loan_start_date: start,
            loan_end_date: end,
            profile_image: input.profile_image.clone(),
        }),
        _ => Err(ValidationErrors::single(
            FormField::Amount,
            "All fields are required.",
        )),
    }
}

/// Validate a full-record edit against the record it will be merged into.
pub fn validate_loan_patch(
    record: &LoanRecord,
    patch: &LoanPatch,
    rules: &ValidationRules,
) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(name) = &patch.borrower_name {
        if is_blank(name) {
            errors.push(FormField::BorrowerName, "The name is required.");
        }
        check_name(name, rules, &mut errors);
    }
    if let Some(mobile) = &patch.borrower_mobile {
        if !is_digits(mobile.trim(), rules.mobile_digits) {
            errors.push(
                FormField::BorrowerMobile,
                format!("Mobile number must be {} digits.", rules.mobile_digits),
            );
        }
    }
    if let Some(address) = &patch.borrower_address {
        if is_blank(address) {
            errors.push(FormField::BorrowerAddress, "The address is required.");
        }
    }
    if let Some(amount) = patch.amount {
        if !amount.is_positive() {
            errors.push(FormField::Amount, "Loan amount should be a positive number.");
        }
        check_amount_limit(amount, rules, &mut errors);
    }
    if let Some(purpose) = &patch.purpose {
        if is_blank(purpose) {
            errors.push(FormField::Purpose, "The purpose is required.");
        }
        check_purpose(purpose, rules, &mut errors);
    }

    let merged = record.merged_with(patch);
    check_date_order(merged.loan_start_date, merged.loan_end_date, rules, &mut errors);

    errors.into_result()
}

fn check_amount(raw: &str, rules: &ValidationRules, errors: &mut ValidationErrors) -> Option<Money> {
    if is_blank(raw) {
        return None;
    }
    match Money::from_str(raw) {
        Ok(amount) if amount.is_positive() => check_amount_limit(amount, rules, errors).then_some(amount),
        _ => {
            errors.push(FormField::Amount, "Loan amount should be a positive number.");
            None
        }
    }
}

fn check_amount_limit(amount: Money, rules: &ValidationRules, errors: &mut ValidationErrors) -> bool {
    if amount > rules.max_amount {
        errors.push(
            FormField::Amount,
            format!("Loan amount cannot exceed {}.", rules.max_amount),
        );
        return false;
    }
    true
}

fn check_dates(
    raw_start: &str,
    raw_end: &str,
    rules: &ValidationRules,
    errors: &mut ValidationErrors,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = parse_date_field(FormField::LoanStartDate, raw_start, errors);
    let end = parse_date_field(FormField::LoanEndDate, raw_end, errors);

    let (start, end) = (start?, end?);
    check_date_order(start, end, rules, errors).then_some((start, end))
}

/// start strictly before end, and no longer than the configured maximum
fn check_date_order(
    start: NaiveDate,
    end: NaiveDate,
    rules: &ValidationRules,
    errors: &mut ValidationErrors,
) -> bool {
    if start >= end {
        errors.push(
            FormField::LoanEndDate,
            "Loan end date must be after the start date.",
        );
        return false;
    }
    let latest = start.checked_add_months(Months::new(rules.max_duration_months));
    if latest.map_or(true, |latest| end > latest) {
        errors.push(
            FormField::LoanEndDate,
            format!("Loan cannot run longer than {} months.", rules.max_duration_months),
        );
        return false;
    }
    true
}

fn parse_date_field(field: FormField, raw: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    if is_blank(raw) {
        return None;
    }
    let parsed = parse_form_date(raw);
    if parsed.is_none() {
        errors.push(
            field,
            format!("The {} must be a date like 2024-01-31.", field.label()),
        );
    }
    parsed
}

fn check_name(name: &str, rules: &ValidationRules, errors: &mut ValidationErrors) {
    if rules.letters_only_names && !is_plain_name(name.trim()) {
        errors.push(
            FormField::BorrowerName,
            "Name can contain only letters and spaces.",
        );
    }
}

fn check_purpose(purpose: &str, rules: &ValidationRules, errors: &mut ValidationErrors) {
    if purpose.trim().chars().count() > rules.max_purpose_len {
        errors.push(
            FormField::Purpose,
            format!("Purpose must be at most {} characters.", rules.max_purpose_len),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures;
    use crate::types::PaymentStatus;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn valid_input() -> LoanInput {
        LoanInput {
            borrower_name: "Asha Verma".to_string(),
            borrower_mobile: "9876543210".to_string(),
            borrower_aadhaar: "123456789012".to_string(),
            borrower_address: "12 MG Road, Pune".to_string(),
            borrower_identity: Some(Uuid::new_v4()),
            amount: "12000.50".to_string(),
            purpose: "Shop renovation".to_string(),
            loan_start_date: "2024-01-01".to_string(),
            loan_end_date: "31-12-2024".to_string(),
            profile_image: None,
        }
    }

    fn rules() -> ValidationRules {
        ValidationRules::default()
    }

    #[test]
    fn test_valid_form() {
        let terms = validate_loan_input(&valid_input(), &rules()).unwrap();
        assert_eq!(terms.amount.as_decimal(), dec!(12000.50));
        assert_eq!(terms.loan_start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(terms.loan_end_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_empty_form_reports_every_field_in_order() {
        let errors = validate_loan_input(&LoanInput::default(), &rules()).unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                FormField::BorrowerName,
                FormField::BorrowerMobile,
                FormField::BorrowerAadhaar,
                FormField::BorrowerAddress,
                FormField::Amount,
                FormField::LoanStartDate,
                FormField::LoanEndDate,
                FormField::Purpose,
                FormField::BorrowerIdentity,
            ]
        );
        assert_eq!(errors.message_for(FormField::Amount), Some("The amount is required."));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        for amount in ["0", "-250", "0.00", "abc", "1,000"] {
            let input = LoanInput {
                amount: amount.to_string(),
                ..valid_input()
            };
            let errors = validate_loan_input(&input, &rules()).unwrap_err();
            assert_eq!(errors.fields(), vec![FormField::Amount], "amount {amount:?}");
        }
    }

    #[test]
    fn test_rejects_bad_aadhaar() {
        for aadhaar in ["12345678901", "1234567890123", "12345678901x", "1234 5678 9012"] {
            let input = LoanInput {
                borrower_aadhaar: aadhaar.to_string(),
                ..valid_input()
            };
            let errors = validate_loan_input(&input, &rules()).unwrap_err();
            assert_eq!(
                errors.message_for(FormField::BorrowerAadhaar),
                Some("Aadhaar number must be 12 digits.")
            );
        }
    }

    #[test]
    fn test_rejects_bad_mobile() {
        let input = LoanInput {
            borrower_mobile: "98765".to_string(),
            ..valid_input()
        };
        let errors = validate_loan_input(&input, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::BorrowerMobile]);
    }

    #[test]
    fn test_date_ordering() {
        let same_day = LoanInput {
            loan_end_date: "2024-01-01".to_string(),
            ..valid_input()
        };
        let errors = validate_loan_input(&same_day, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::LoanEndDate]);

        let garbage = LoanInput {
            loan_start_date: "yesterday".to_string(),
            ..valid_input()
        };
        let errors = validate_loan_input(&garbage, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::LoanStartDate]);
    }

    #[test]
    fn test_name_and_purpose_rules() {
        let input = LoanInput {
            borrower_name: "R2D2".to_string(),
            purpose: "x".repeat(501),
            ..valid_input()
        };
        let errors = validate_loan_input(&input, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::BorrowerName, FormField::Purpose]);

        let relaxed = ValidationRules {
            letters_only_names: false,
            ..rules()
        };
        let input = LoanInput {
            borrower_name: "R2D2".to_string(),
            ..valid_input()
        };
        assert!(validate_loan_input(&input, &relaxed).is_ok());
    }

    #[test]
    fn test_amount_and_duration_limits() {
        let huge = LoanInput {
            amount: "50000000000000000000000000000".to_string(),
            ..valid_input()
        };
        let errors = validate_loan_input(&huge, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::Amount]);

        let at_limit = LoanInput {
            amount: "1000000000".to_string(),
            ..valid_input()
        };
        assert!(validate_loan_input(&at_limit, &rules()).is_ok());

        let long = LoanInput {
            loan_end_date: "2074-01-02".to_string(),
            ..valid_input()
        };
        let errors = validate_loan_input(&long, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::LoanEndDate]);

        let fifty_years = LoanInput {
            loan_end_date: "2074-01-01".to_string(),
            ..valid_input()
        };
        assert!(validate_loan_input(&fifty_years, &rules()).is_ok());

        let record = fixtures::record(Uuid::new_v4(), Uuid::new_v4());
        let patch = LoanPatch {
            amount: Some(Money::from_decimal(dec!(1000000000.01))),
            loan_end_date: NaiveDate::from_ymd_opt(2100, 1, 1),
            ..Default::default()
        };
        let errors = validate_loan_patch(&record, &patch, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::Amount, FormField::LoanEndDate]);
    }

    #[test]
    fn test_patch_validation() {
        let record = fixtures::record(Uuid::new_v4(), Uuid::new_v4());

        let ok = LoanPatch {
            amount: Some(Money::from_major(500)),
            ..Default::default()
        };
        assert!(validate_loan_patch(&record, &ok, &rules()).is_ok());

        let bad = LoanPatch {
            amount: Some(Money::ZERO),
            loan_end_date: Some(record.loan_start_date),
            ..Default::default()
        };
        let errors = validate_loan_patch(&record, &bad, &rules()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::Amount, FormField::LoanEndDate]);

        // lifecycle fields are not part of a patch
        assert_eq!(record.merged_with(&ok).status, PaymentStatus::Pending);
    }
}
