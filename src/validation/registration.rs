use serde::{Deserialize, Serialize};
use validator::validate_email;

use crate::config::ValidationRules;
use crate::errors::{FormField, ValidationErrors};
use crate::validation::{is_blank, is_digits};

/// sign-up form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub name: String,
    pub aadhaar_number: String,
    pub mobile_number: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

pub fn validate_registration(
    input: &RegistrationInput,
    rules: &ValidationRules,
) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_blank(&input.name) {
        errors.push(FormField::BorrowerName, "Name is required.");
    }
    if !is_digits(input.aadhaar_number.trim(), rules.aadhaar_digits) {
        errors.push(
            FormField::BorrowerAadhaar,
            format!("Aadhaar number must be {} digits.", rules.aadhaar_digits),
        );
    }
    if !is_digits(input.mobile_number.trim(), rules.mobile_digits) {
        errors.push(
            FormField::BorrowerMobile,
            format!("Mobile number must be {} digits.", rules.mobile_digits),
        );
    }
    if !validate_email(input.email.trim()) {
        errors.push(FormField::Email, "Please enter a valid email address.");
    }
    if is_blank(&input.address) {
        errors.push(FormField::BorrowerAddress, "Address is required.");
    }
    if input.password.chars().count() < rules.min_password_len {
        errors.push(
            FormField::Password,
            format!("Password must be at least {} characters.", rules.min_password_len),
        );
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegistrationInput {
        RegistrationInput {
            name: "Ravi Kumar".to_string(),
            aadhaar_number: "987654321098".to_string(),
            mobile_number: "9123456780".to_string(),
            email: "ravi@example.in".to_string(),
            address: "4 Park Street, Kolkata".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&valid(), &ValidationRules::default()).is_ok());
    }

    #[test]
    fn test_collects_all_problems() {
        let errors = validate_registration(&RegistrationInput::default(), &ValidationRules::default())
            .unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                FormField::BorrowerName,
                FormField::BorrowerAadhaar,
                FormField::BorrowerMobile,
                FormField::Email,
                FormField::BorrowerAddress,
                FormField::Password,
            ]
        );
    }

    #[test]
    fn test_email_and_password_rules() {
        let input = RegistrationInput {
            email: "ravi.example.in".to_string(),
            password: "12345".to_string(),
            ..valid()
        };
        let errors = validate_registration(&input, &ValidationRules::default()).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::Email, FormField::Password]);
    }
}
