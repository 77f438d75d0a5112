use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{AcceptanceStatus, IdentityId, LoanId, PaymentStatus};

/// a loan as stored by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    #[serde(rename = "_id")]
    pub id: LoanId,

    // borrower snapshot taken at creation
    pub borrower_name: String,
    pub borrower_mobile: String,
    pub borrower_aadhaar: String,
    pub borrower_address: String,
    pub borrower_identity: IdentityId,

    // terms
    pub amount: Money,
    pub purpose: String,
    pub loan_start_date: NaiveDate,
    pub loan_end_date: NaiveDate,

    // lifecycle
    pub status: PaymentStatus,
    pub borrower_acceptance_status: AcceptanceStatus,

    pub lender_identity: IdentityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoanRecord {
    /// build the stored form of a validated payload
    pub fn from_new_loan(id: LoanId, loan: NewLoan, now: DateTime<Utc>) -> Self {
        let terms = loan.terms;
        Self {
            id,
            borrower_name: terms.borrower_name,
            borrower_mobile: terms.borrower_mobile,
            borrower_aadhaar: terms.borrower_aadhaar,
            borrower_address: terms.borrower_address,
            borrower_identity: terms.borrower_identity,
            amount: terms.amount,
            purpose: terms.purpose,
            loan_start_date: terms.loan_start_date,
            loan_end_date: terms.loan_end_date,
            status: PaymentStatus::Pending,
            borrower_acceptance_status: AcceptanceStatus::Pending,
            lender_identity: loan.lender_identity,
            profile_image: terms.profile_image,
            created_at: now,
            updated_at: now,
        }
    }

    /// amount still owed to the lender
    pub fn pending_amount(&self) -> Money {
        match self.status {
            PaymentStatus::Pending => self.amount,
            PaymentStatus::Paid => Money::ZERO,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// whole months between start and end, at least one
    pub fn duration_months(&self) -> u32 {
        use chrono::Datelike;
        let years = self.loan_end_date.year() - self.loan_start_date.year();
        let months = years * 12 + self.loan_end_date.month() as i32 - self.loan_start_date.month() as i32;
        let months = if self.loan_end_date.day() < self.loan_start_date.day() {
            months - 1
        } else {
            months
        };
        months.max(1) as u32
    }

    /// apply a partial edit, leaving lifecycle fields alone
    pub fn merged_with(&self, patch: &LoanPatch) -> LoanRecord {
        let mut merged = self.clone();
        if let Some(name) = &patch.borrower_name {
            merged.borrower_name = name.clone();
        }
        if let Some(mobile) = &patch.borrower_mobile {
            merged.borrower_mobile = mobile.clone();
        }
        if let Some(address) = &patch.borrower_address {
            merged.borrower_address = address.clone();
        }
        if let Some(amount) = patch.amount {
            merged.amount = amount;
        }
        if let Some(purpose) = &patch.purpose {
            merged.purpose = purpose.clone();
        }
        if let Some(start) = patch.loan_start_date {
            merged.loan_start_date = start;
        }
        if let Some(end) = patch.loan_end_date {
            merged.loan_end_date = end;
        }
        if let Some(image) = &patch.profile_image {
            merged.profile_image = Some(image.clone());
        }
        merged
    }
}

/// raw loan form as typed by the lender
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    pub borrower_name: String,
    pub borrower_mobile: String,
    pub borrower_aadhaar: String,
    pub borrower_address: String,
    pub borrower_identity: Option<IdentityId>,
    pub amount: String,
    pub purpose: String,
    pub loan_start_date: String,
    pub loan_end_date: String,
    pub profile_image: Option<String>,
}

/// validated loan form fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub borrower_name: String,
    pub borrower_mobile: String,
    pub borrower_aadhaar: String,
    pub borrower_address: String,
    pub borrower_identity: IdentityId,
    pub amount: Money,
    pub purpose: String,
    pub loan_start_date: NaiveDate,
    pub loan_end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// create-loan payload sent to the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub lender_identity: IdentityId,
}

impl NewLoan {
    pub fn new(terms: LoanTerms, lender_identity: IdentityId) -> Self {
        Self {
            terms,
            lender_identity,
        }
    }
}

/// partial edit of a loan's terms and borrower contact details
///
/// Identity fields (aadhaar, borrower and lender identities) are fixed at
/// creation and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl LoanPatch {
    pub fn is_empty(&self) -> bool {
        self == &LoanPatch::default()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_wire_names() {
        let record = fixtures::record(Uuid::new_v4(), Uuid::new_v4());
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("_id").is_some());
        assert_eq!(json["borrowerAcceptanceStatus"], "pending");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["loanStartDate"], "2024-01-01");
        assert!(json.get("profileImage").is_none());

        let back: LoanRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_pending_amount_and_duration() {
        let mut record = fixtures::record(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(record.pending_amount(), Money::from_major(12_000));
        assert_eq!(record.duration_months(), 12);

        record.status = PaymentStatus::Paid;
        assert_eq!(record.pending_amount(), Money::ZERO);

        record.loan_end_date = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(record.duration_months(), 1);
    }

    #[test]
    fn test_merge_keeps_lifecycle_fields() {
        let mut record = fixtures::record(Uuid::new_v4(), Uuid::new_v4());
        record.borrower_acceptance_status = AcceptanceStatus::Accepted;

        let patch = LoanPatch {
            amount: Some(Money::from_major(15_000)),
            purpose: Some("Working capital".to_string()),
            ..Default::default()
        };
        let merged = record.merged_with(&patch);

        assert_eq!(merged.amount, Money::from_major(15_000));
        assert_eq!(merged.purpose, "Working capital");
        assert_eq!(merged.borrower_acceptance_status, AcceptanceStatus::Accepted);
        assert_eq!(merged.id, record.id);
        assert!(LoanPatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
