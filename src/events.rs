use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{AcceptanceStatus, IdentityId, LoanId, PaymentStatus};

/// everything the ledger records about changes it pushed to the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoanEvent {
    LoanCreated {
        loan_id: LoanId,
        lender: IdentityId,
        borrower: IdentityId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    AcceptanceChanged {
        loan_id: LoanId,
        borrower: IdentityId,
        old_status: AcceptanceStatus,
        new_status: AcceptanceStatus,
        timestamp: DateTime<Utc>,
    },
    PaymentStatusChanged {
        loan_id: LoanId,
        lender: IdentityId,
        old_status: PaymentStatus,
        new_status: PaymentStatus,
        timestamp: DateTime<Utc>,
    },
    LoanUpdated {
        loan_id: LoanId,
        lender: IdentityId,
        old_amount: Money,
        new_amount: Money,
        timestamp: DateTime<Utc>,
    },
}

impl LoanEvent {
    pub fn loan_id(&self) -> LoanId {
        match self {
            LoanEvent::LoanCreated { loan_id, .. }
            | LoanEvent::AcceptanceChanged { loan_id, .. }
            | LoanEvent::PaymentStatusChanged { loan_id, .. }
            | LoanEvent::LoanUpdated { loan_id, .. } => *loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LoanEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: LoanEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LoanEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LoanEvent] {
        &self.events
    }

    /// events for a single loan, oldest first
    pub fn for_loan(&self, loan_id: LoanId) -> Vec<&LoanEvent> {
        self.events.iter().filter(|e| e.loan_id() == loan_id).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_events_by_loan_and_take() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
        let lender = Uuid::new_v4();
        let mut store = EventStore::new();

        store.emit(LoanEvent::LoanCreated {
            loan_id: first,
            lender,
            borrower: Uuid::new_v4(),
            amount: Money::from_major(1_000),
            timestamp: at,
        });
        store.emit(LoanEvent::PaymentStatusChanged {
            loan_id: second,
            lender,
            old_status: PaymentStatus::Pending,
            new_status: PaymentStatus::Paid,
            timestamp: at,
        });

        assert_eq!(store.for_loan(first).len(), 1);
        assert_eq!(store.for_loan(second)[0].loan_id(), second);
        assert_eq!(store.take_events().len(), 2);
        assert!(store.events().is_empty());
    }
}
