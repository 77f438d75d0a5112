//! Boundary to the remote loan service and the session provider.
//!
//! The core never performs network calls. Implementations of [`LoanApi`]
//! must apply updates keyed by loan id, reject an update whose precondition
//! no longer holds ([`UpdateRequest::check_precondition`]), and return the
//! stored record after the change.

use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::errors::{LedgerError, RemoteError, Result};
use crate::lifecycle::UpdateRequest;
use crate::record::{LoanRecord, NewLoan};
use crate::types::{Identity, IdentityId, LoanId};

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// remote loan service
pub trait LoanApi {
    fn create_loan(&mut self, loan: NewLoan) -> RemoteResult<LoanRecord>;

    fn fetch_loan(&self, id: LoanId) -> RemoteResult<LoanRecord>;

    fn fetch_by_borrower_id(&self, borrower: IdentityId) -> RemoteResult<Vec<LoanRecord>>;

    fn fetch_by_lender_id(&self, lender: IdentityId) -> RemoteResult<Vec<LoanRecord>>;

    /// every loan recorded against a national id, regardless of lender
    fn fetch_by_aadhaar(&self, aadhaar: &str) -> RemoteResult<Vec<LoanRecord>>;

    /// acceptance or payment-status change
    fn update_loan_status(&mut self, request: &UpdateRequest) -> RemoteResult<LoanRecord>;

    /// full-record edit
    fn update_loan(&mut self, request: &UpdateRequest) -> RemoteResult<LoanRecord>;
}

/// supplies the signed-in user
pub trait SessionProvider {
    fn current_identity(&self) -> Result<Identity>;
}

/// fixed session, or none when signed out
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSession {
    identity: Option<Identity>,
}

impl StaticSession {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn signed_out() -> Self {
        Self { identity: None }
    }
}

impl SessionProvider for StaticSession {
    fn current_identity(&self) -> Result<Identity> {
        self.identity.ok_or(LedgerError::Unauthenticated)
    }
}

/// in-process loan service for tests and demos
pub struct InMemoryLoanApi<'t> {
    loans: Vec<LoanRecord>,
    time: &'t SafeTimeProvider,
    fail_next: Option<RemoteError>,
}

impl<'t> InMemoryLoanApi<'t> {
    pub fn new(time: &'t SafeTimeProvider) -> Self {
        Self {
            loans: Vec::new(),
            time,
            fail_next: None,
        }
    }

    /// make the next call fail with `error`
    pub fn fail_next(&mut self, error: RemoteError) {
        self.fail_next = Some(error);
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    fn injected_failure(&mut self) -> RemoteResult<()> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn select(&self, keep: impl Fn(&LoanRecord) -> bool) -> Vec<LoanRecord> {
        self.loans.iter().filter(|r| keep(r)).cloned().collect()
    }

    fn apply(&mut self, request: &UpdateRequest) -> RemoteResult<LoanRecord> {
        let now = self.time.now();
        let id = request.loan_id();
        let stored = self
            .loans
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RemoteError::NotFound { id })?;

        request.check_precondition(stored)?;
        *stored = LoanRecord {
            updated_at: now,
            ..request.apply(stored)
        };
        Ok(stored.clone())
    }
}

impl LoanApi for InMemoryLoanApi<'_> {
    fn create_loan(&mut self, loan: NewLoan) -> RemoteResult<LoanRecord> {
        self.injected_failure()?;
        let record = LoanRecord::from_new_loan(Uuid::new_v4(), loan, self.time.now());
        self.loans.push(record.clone());
        Ok(record)
    }

    fn fetch_loan(&self, id: LoanId) -> RemoteResult<LoanRecord> {
        self.loans
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RemoteError::NotFound { id })
    }

    fn fetch_by_borrower_id(&self, borrower: IdentityId) -> RemoteResult<Vec<LoanRecord>> {
        Ok(self.select(|r| r.borrower_identity == borrower))
    }

    fn fetch_by_lender_id(&self, lender: IdentityId) -> RemoteResult<Vec<LoanRecord>> {
        Ok(self.select(|r| r.lender_identity == lender))
    }

    fn fetch_by_aadhaar(&self, aadhaar: &str) -> RemoteResult<Vec<LoanRecord>> {
        Ok(self.select(|r| r.borrower_aadhaar == aadhaar))
    }

    fn update_loan_status(&mut self, request: &UpdateRequest) -> RemoteResult<LoanRecord> {
        self.injected_failure()?;
        if matches!(request, UpdateRequest::Terms { .. }) {
            return Err(RemoteError::UnexpectedResponse {
                id: request.loan_id(),
                message: "status endpoint cannot apply a terms edit".to_string(),
            });
        }
        self.apply(request)
    }

    fn update_loan(&mut self, request: &UpdateRequest) -> RemoteResult<LoanRecord> {
        self.injected_failure()?;
        self.apply(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::lifecycle::toggle_payment_status;
    use crate::record::LoanTerms;
    use crate::types::PaymentStatus;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn new_loan(lender: IdentityId, borrower: IdentityId) -> NewLoan {
        NewLoan::new(
            LoanTerms {
                borrower_name: "Asha Verma".to_string(),
                borrower_mobile: "9876543210".to_string(),
                borrower_aadhaar: "123456789012".to_string(),
                borrower_address: "12 MG Road, Pune".to_string(),
                borrower_identity: borrower,
                amount: Money::from_major(5_000),
                purpose: "Stock".to_string(),
                loan_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                loan_end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                profile_image: None,
            },
            lender,
        )
    }

    #[test]
    fn test_create_and_fetch() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(start));
        let mut api = InMemoryLoanApi::new(&time);
        let (lender, borrower) = (Uuid::new_v4(), Uuid::new_v4());

        let created = api.create_loan(new_loan(lender, borrower)).unwrap();
        assert_eq!(created.created_at, start);
        assert_eq!(created.status, PaymentStatus::Pending);

        assert_eq!(api.fetch_by_lender_id(lender).unwrap().len(), 1);
        assert_eq!(api.fetch_by_borrower_id(borrower).unwrap().len(), 1);
        assert_eq!(api.fetch_by_aadhaar("123456789012").unwrap().len(), 1);
        assert!(api.fetch_by_lender_id(borrower).unwrap().is_empty());
        assert_eq!(api.fetch_loan(created.id).unwrap(), created);
    }

    #[test]
    fn test_updates_are_compare_and_set() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(start));
        let controller = time.test_control().unwrap();
        let mut api = InMemoryLoanApi::new(&time);
        let lender = Identity::lender(Uuid::new_v4());

        let record = api.create_loan(new_loan(lender.id, Uuid::new_v4())).unwrap();
        let request = toggle_payment_status(&record, &lender).unwrap();

        controller.advance(Duration::days(3));
        let updated = api.update_loan_status(&request).unwrap();
        assert_eq!(updated.status, PaymentStatus::Paid);
        assert_eq!(updated.updated_at, start + Duration::days(3));

        // replaying the same request against the moved record is a conflict
        let err = api.update_loan_status(&request).unwrap_err();
        assert!(matches!(err, RemoteError::Conflict { .. }));
    }

    #[test]
    fn test_missing_loan_and_injected_failure() {
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let mut api = InMemoryLoanApi::new(&time);

        let missing = Uuid::new_v4();
        assert_eq!(api.fetch_loan(missing).unwrap_err(), RemoteError::NotFound { id: missing });

        api.fail_next(RemoteError::Transport {
            message: "connection reset".to_string(),
        });
        assert!(api.create_loan(new_loan(Uuid::new_v4(), Uuid::new_v4())).is_err());
        assert!(api.is_empty());
    }

    #[test]
    fn test_signed_out_session() {
        assert!(matches!(
            StaticSession::signed_out().current_identity(),
            Err(LedgerError::Unauthenticated)
        ));
        let me = Identity::lender(Uuid::new_v4());
        assert_eq!(StaticSession::signed_in(me).current_identity().unwrap(), me);
    }
}
