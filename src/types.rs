use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan, assigned by the remote system
pub type LoanId = Uuid;

/// unique identifier for a registered user
pub type IdentityId = Uuid;

/// repayment status, flipped by the lender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// principal not yet repaid
    #[default]
    Pending,
    /// lender has marked the loan as repaid
    Paid,
}

impl PaymentStatus {
    /// the other value, used by the lender's one-tap toggle
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Pending => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// borrower acknowledgement of the loan terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AcceptanceStatus {
    /// borrower has not responded yet
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl AcceptanceStatus {
    /// accepted and rejected never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AcceptanceStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptanceStatus::Pending => "pending",
            AcceptanceStatus::Accepted => "accepted",
            AcceptanceStatus::Rejected => "rejected",
        }
    }
}

/// which side of a loan an identity is acting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Lender,
    Borrower,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lender => "lender",
            Role::Borrower => "borrower",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AcceptanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// the acting user as reported by the session provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub role: Role,
}

impl Identity {
    pub fn lender(id: IdentityId) -> Self {
        Self { id, role: Role::Lender }
    }

    pub fn borrower(id: IdentityId) -> Self {
        Self { id, role: Role::Borrower }
    }
}
