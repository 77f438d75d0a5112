pub mod stats;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::record::LoanRecord;
use crate::types::{AcceptanceStatus, LoanId, PaymentStatus, Role};

pub use stats::{aggregate_loans, identity_statistics, AcceptanceCounts, LoanStatistics, PaymentCounts};

/// one side of a user's ledger as last fetched from the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCollection {
    role: Role,
    records: Vec<LoanRecord>,
}

impl LoanCollection {
    pub fn new(role: Role, records: Vec<LoanRecord>) -> Self {
        Self { role, records }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: LoanId) -> Option<&LoanRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// replace the record with the same id, or append it
    pub fn upsert(&mut self, record: LoanRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// sum of all principal amounts, paid or not
    pub fn total_amount(&self) -> Money {
        self.records.iter().map(|r| r.amount).sum()
    }

    pub fn statistics(&self) -> LoanStatistics {
        aggregate_loans(&self.records, self.role)
    }

    /// case-insensitive substring match on the borrower's name
    pub fn search_by_borrower_name(&self, query: &str) -> Vec<&LoanRecord> {
        let query = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.borrower_name.to_lowercase().contains(&query))
            .collect()
    }

    /// case-insensitive substring match on the loan purpose
    pub fn search_by_purpose(&self, query: &str) -> Vec<&LoanRecord> {
        let query = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.purpose.to_lowercase().contains(&query))
            .collect()
    }

    /// search the field each list view searches: names for lenders, purposes for borrowers
    pub fn search(&self, query: &str) -> Vec<&LoanRecord> {
        match self.role {
            Role::Lender => self.search_by_borrower_name(query),
            Role::Borrower => self.search_by_purpose(query),
        }
    }

    /// earlier loans recorded against an aadhaar number
    pub fn history_for_aadhaar(&self, aadhaar: &str) -> Vec<&LoanRecord> {
        let aadhaar = aadhaar.trim();
        self.records
            .iter()
            .filter(|r| r.borrower_aadhaar == aadhaar)
            .collect()
    }

    pub fn with_status(&self, status: PaymentStatus) -> Vec<&LoanRecord> {
        self.records.iter().filter(|r| r.status == status).collect()
    }

    /// loans still waiting on the borrower
    pub fn awaiting_response(&self) -> Vec<&LoanRecord> {
        self.records
            .iter()
            .filter(|r| r.borrower_acceptance_status == AcceptanceStatus::Pending)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures;
    use uuid::Uuid;

    fn collection() -> LoanCollection {
        let lender = Uuid::new_v4();
        let mut a = fixtures::record(lender, Uuid::new_v4());
        a.borrower_name = "Asha Verma".to_string();
        a.purpose = "Shop renovation".to_string();
        let mut b = fixtures::record(lender, Uuid::new_v4());
        b.borrower_name = "Vikram Shah".to_string();
        b.purpose = "School fees".to_string();
        b.borrower_aadhaar = "555566667777".to_string();
        b.status = PaymentStatus::Paid;
        LoanCollection::new(Role::Lender, vec![a, b])
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let loans = collection();
        assert_eq!(loans.search_by_borrower_name("ASHA").len(), 1);
        assert_eq!(loans.search_by_purpose("school").len(), 1);
        assert_eq!(loans.search("").len(), 2);
        assert_eq!(loans.search("vik")[0].borrower_name, "Vikram Shah");
    }

    #[test]
    fn test_history_and_filters() {
        let loans = collection();
        assert_eq!(loans.history_for_aadhaar("555566667777").len(), 1);
        assert!(loans.history_for_aadhaar("000000000000").is_empty());
        assert_eq!(loans.with_status(PaymentStatus::Paid).len(), 1);
        assert_eq!(loans.awaiting_response().len(), 2);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut loans = collection();
        let mut updated = loans.records()[0].clone();
        updated.status = PaymentStatus::Paid;
        loans.upsert(updated.clone());

        assert_eq!(loans.len(), 2);
        assert_eq!(loans.get(updated.id).unwrap().status, PaymentStatus::Paid);
        assert_eq!(loans.statistics().outstanding_amount, Money::ZERO);
        assert_eq!(loans.total_amount(), Money::from_major(24_000));

        loans.upsert(fixtures::record(Uuid::new_v4(), Uuid::new_v4()));
        assert_eq!(loans.len(), 3);
    }
}
