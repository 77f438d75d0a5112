use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{LoanId, IdentityId, Role};

/// form fields a violation can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    BorrowerName,
    BorrowerMobile,
    BorrowerAadhaar,
    BorrowerAddress,
    BorrowerIdentity,
    Amount,
    LoanStartDate,
    LoanEndDate,
    Purpose,
    InterestRate,
    DurationMonths,
    Email,
    Password,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::BorrowerName => "name",
            FormField::BorrowerMobile => "contact number",
            FormField::BorrowerAadhaar => "aadhaar number",
            FormField::BorrowerAddress => "address",
            FormField::BorrowerIdentity => "borrower",
            FormField::Amount => "amount",
            FormField::LoanStartDate => "loan start date",
            FormField::LoanEndDate => "loan end date",
            FormField::Purpose => "purpose",
            FormField::InterestRate => "interest rate",
            FormField::DurationMonths => "duration",
            FormField::Email => "email",
            FormField::Password => "password",
        }
    }
}

/// one user-correctable problem with a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: FormField,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// ordered list of violations, at most one per field
#[derive(Error, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[error("{}", joined_messages(.violations))]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: FormField, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// record a violation unless the field already has one
    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        if !self.has(field) {
            self.violations.push(FieldViolation::new(field, message));
        }
    }

    pub fn has(&self, field: FormField) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn message_for(&self, field: FormField) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn fields(&self) -> Vec<FormField> {
        self.violations.iter().map(|v| v.field).collect()
    }

    /// Ok when nothing was recorded
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn joined_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// failures reported by the remote loan service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("loan not found: {id}")]
    NotFound { id: LoanId },

    #[error("loan {id} changed since it was read: expected {expected}, found {found}")]
    Conflict {
        id: LoanId,
        expected: String,
        found: String,
    },

    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("unexpected response for loan {id}: {message}")]
    UnexpectedResponse { id: LoanId, message: String },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("identity {actor} is not the {required} of this loan")]
    Authorization {
        actor: IdentityId,
        required: Role,
    },

    #[error("cannot change {field} from {current} to {requested}")]
    State {
        field: &'static str,
        current: String,
        requested: String,
    },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("calculation error: {message}")]
    Calculation { message: String },

    #[error("no signed-in user")]
    Unauthenticated,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ValidationErrors> for LedgerError {
    fn from(errors: ValidationErrors) -> Self {
        LedgerError::Validation(errors)
    }
}

impl LedgerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, LedgerError::Authorization { .. })
    }

    pub fn is_state(&self) -> bool {
        matches!(self, LedgerError::State { .. })
    }

    /// field-level messages when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            LedgerError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_violation_per_field() {
        let mut errors = ValidationErrors::new();
        errors.push(FormField::Amount, "amount is required");
        errors.push(FormField::Amount, "amount must be positive");
        errors.push(FormField::Purpose, "purpose is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for(FormField::Amount), Some("amount is required"));
        assert_eq!(errors.fields(), vec![FormField::Amount, FormField::Purpose]);
        assert_eq!(errors.to_string(), "amount is required; purpose is required");

        let wrapped = LedgerError::from(errors);
        assert!(wrapped.is_validation());
        assert!(wrapped.to_string().contains("purpose is required"));
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let auth = LedgerError::Authorization {
            actor: uuid::Uuid::nil(),
            required: Role::Lender,
        };
        let state = LedgerError::State {
            field: "borrowerAcceptanceStatus",
            current: "accepted".to_string(),
            requested: "rejected".to_string(),
        };

        assert!(auth.is_authorization() && !auth.is_state());
        assert!(state.is_state() && !state.is_authorization());
        assert_eq!(
            state.to_string(),
            "cannot change borrowerAcceptanceStatus from accepted to rejected"
        );
    }
}
