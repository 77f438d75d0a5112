pub mod loan;
pub mod registration;

pub use loan::{parse_form_date, validate_loan_input, validate_loan_patch};
pub use registration::{validate_registration, RegistrationInput};

/// exactly `len` ascii digits
pub(crate) fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// letters and spaces only, as the name inputs allow
pub(crate) fn is_plain_name(value: &str) -> bool {
    value.chars().all(|c| c.is_alphabetic() || c == ' ')
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_shape() {
        assert!(is_digits("123456789012", 12));
        assert!(!is_digits("12345678901", 12));
        assert!(!is_digits("12345678901a", 12));
        assert!(!is_digits("１２３４５６７８９０１２", 12));
    }

    #[test]
    fn test_name_shape() {
        assert!(is_plain_name("Asha Verma"));
        assert!(!is_plain_name("Asha V3rma"));
        assert!(is_blank("   "));
    }
}
