use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::record::LoanRecord;
use crate::types::{AcceptanceStatus, IdentityId, PaymentStatus, Role};

/// counts by repayment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentCounts {
    pub pending: usize,
    pub paid: usize,
}

/// counts by borrower response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcceptanceCounts {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// aggregates over one identity's loans, recomputed on demand
///
/// Amount totals saturate at [`Money::MAX`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStatistics {
    pub role: Option<Role>,
    pub total_loans: usize,
    pub total_amount: Money,
    /// sum of amounts still pending repayment
    pub outstanding_amount: Money,
    pub paid_amount: Money,
    pub given: usize,
    pub taken: usize,
    pub payment: PaymentCounts,
    pub acceptance: AcceptanceCounts,
}

impl LoanStatistics {
    fn tally(&mut self, record: &LoanRecord) {
        self.total_loans += 1;
        self.total_amount = self.total_amount.saturating_add(record.amount);

        match record.status {
            PaymentStatus::Pending => {
                self.payment.pending += 1;
                self.outstanding_amount = self.outstanding_amount.saturating_add(record.amount);
            }
            PaymentStatus::Paid => {
                self.payment.paid += 1;
                self.paid_amount = self.paid_amount.saturating_add(record.amount);
            }
        }

        match record.borrower_acceptance_status {
            AcceptanceStatus::Pending => self.acceptance.pending += 1,
            AcceptanceStatus::Accepted => self.acceptance.accepted += 1,
            AcceptanceStatus::Rejected => self.acceptance.rejected += 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_loans == 0
    }
}

/// aggregate a list fetched for one side of the ledger
///
/// Every record counts as given when `role` is lender and as taken when it is
/// borrower. An empty list yields all-zero statistics.
pub fn aggregate_loans(records: &[LoanRecord], role: Role) -> LoanStatistics {
    let mut stats = LoanStatistics {
        role: Some(role),
        ..Default::default()
    };
    for record in records {
        stats.tally(record);
    }
    match role {
        Role::Lender => stats.given = stats.total_loans,
        Role::Borrower => stats.taken = stats.total_loans,
    }
    stats
}

/// aggregate a mixed list from one identity's point of view
///
/// Records the identity is not party to are ignored.
pub fn identity_statistics(records: &[LoanRecord], identity: IdentityId) -> LoanStatistics {
    let mut stats = LoanStatistics::default();
    for record in records {
        let gave = record.lender_identity == identity;
        let took = record.borrower_identity == identity;
        if !gave && !took {
            continue;
        }
        stats.tally(record);
        if gave {
            stats.given += 1;
        }
        if took {
            stats.taken += 1;
        }
    }
    stats
}
