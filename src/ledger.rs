use tracing::{info, warn};

use crate::collection::{aggregate_loans, identity_statistics, LoanCollection, LoanStatistics};
use crate::config::LedgerConfig;
use crate::errors::{FormField, LedgerError, RemoteError, Result, ValidationErrors};
use crate::events::{EventStore, LoanEvent};
use crate::lifecycle::{self, UpdateRequest};
use crate::record::{LoanInput, LoanPatch, LoanRecord, NewLoan};
use crate::remote::{LoanApi, SessionProvider};
use crate::types::{AcceptanceStatus, Identity, LoanId, PaymentStatus, Role};
use crate::validation::{is_digits, validate_loan_input};

/// data-access layer: reads through the remote api, guards every change
pub struct LoanLedger<A, S> {
    api: A,
    session: S,
    config: LedgerConfig,
    events: EventStore,
}

impl<A: LoanApi, S: SessionProvider> LoanLedger<A, S> {
    pub fn new(api: A, session: S, config: LedgerConfig) -> Self {
        Self {
            api,
            session,
            config,
            events: EventStore::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    /// release the api, e.g. to sign in as someone else
    pub fn into_api(self) -> A {
        self.api
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<LoanEvent> {
        self.events.take_events()
    }

    /// current user lends a loan described by a raw form
    pub fn create_loan(&mut self, input: &LoanInput) -> Result<LoanRecord> {
        let actor = self.session.current_identity()?;
        let terms = validate_loan_input(input, &self.config.validation)?;

        let record = self.api.create_loan(NewLoan::new(terms, actor.id))?;
        info!(loan_id = %record.id, lender = %actor.id, amount = %record.amount, "loan created");

        self.events.emit(LoanEvent::LoanCreated {
            loan_id: record.id,
            lender: record.lender_identity,
            borrower: record.borrower_identity,
            amount: record.amount,
            timestamp: record.created_at,
        });
        Ok(record)
    }

    /// loans the current user has given
    pub fn outward_loans(&self) -> Result<LoanCollection> {
        let actor = self.session.current_identity()?;
        let records = self.api.fetch_by_lender_id(actor.id)?;
        Ok(LoanCollection::new(Role::Lender, records))
    }

    /// loans the current user has taken
    pub fn inward_loans(&self) -> Result<LoanCollection> {
        let actor = self.session.current_identity()?;
        let records = self.api.fetch_by_borrower_id(actor.id)?;
        Ok(LoanCollection::new(Role::Borrower, records))
    }

    /// loans on the side of the ledger matching the session's role
    pub fn my_loans(&self) -> Result<LoanCollection> {
        match self.session.current_identity()?.role {
            Role::Lender => self.outward_loans(),
            Role::Borrower => self.inward_loans(),
        }
    }

    /// statistics for the side matching the session's role
    pub fn role_statistics(&self) -> Result<LoanStatistics> {
        let loans = self.my_loans()?;
        Ok(aggregate_loans(loans.records(), loans.role()))
    }

    /// given and taken loans of the current user combined
    pub fn statistics(&self) -> Result<LoanStatistics> {
        let actor = self.session.current_identity()?;
        let mut records = self.api.fetch_by_lender_id(actor.id)?;
        for record in self.api.fetch_by_borrower_id(actor.id)? {
            // a self-loan appears in both lists
            if !records.iter().any(|r| r.id == record.id) {
                records.push(record);
            }
        }
        Ok(identity_statistics(&records, actor.id))
    }

    /// earlier loans recorded against a borrower's aadhaar number
    pub fn history_for_aadhaar(&self, aadhaar: &str) -> Result<LoanCollection> {
        self.session.current_identity()?;
        let aadhaar = aadhaar.trim();
        let digits = self.config.validation.aadhaar_digits;
        if !is_digits(aadhaar, digits) {
            return Err(LedgerError::Validation(ValidationErrors::single(
                FormField::BorrowerAadhaar,
                format!("Aadhaar number must be {digits} digits."),
            )));
        }
        let records = self.api.fetch_by_aadhaar(aadhaar)?;
        Ok(LoanCollection::new(Role::Borrower, records))
    }

    /// borrower accepts or rejects a loan
    pub fn respond_to_loan(&mut self, loan_id: LoanId, response: AcceptanceStatus) -> Result<LoanRecord> {
        let actor = self.session.current_identity()?;
        let record = self.api.fetch_loan(loan_id)?;
        let request = guarded(
            lifecycle::attempt_acceptance_transition(&record, &actor, response),
            &actor,
            loan_id,
        )?;
        let updated = self.submit_status(&request)?;

        info!(%loan_id, borrower = %actor.id, status = %updated.borrower_acceptance_status, "loan response recorded");
        self.events.emit(LoanEvent::AcceptanceChanged {
            loan_id,
            borrower: actor.id,
            old_status: record.borrower_acceptance_status,
            new_status: updated.borrower_acceptance_status,
            timestamp: updated.updated_at,
        });
        Ok(updated)
    }

    /// lender sets repayment status
    pub fn set_payment_status(&mut self, loan_id: LoanId, status: PaymentStatus) -> Result<LoanRecord> {
        let actor = self.session.current_identity()?;
        let record = self.api.fetch_loan(loan_id)?;
        let request = guarded(
            lifecycle::attempt_payment_status_transition(&record, &actor, status),
            &actor,
            loan_id,
        )?;
        self.finish_payment_change(&actor, &record, &request)
    }

    /// lender flips repayment status
    pub fn toggle_payment_status(&mut self, loan_id: LoanId) -> Result<LoanRecord> {
        let actor = self.session.current_identity()?;
        let record = self.api.fetch_loan(loan_id)?;
        let request = guarded(lifecycle::toggle_payment_status(&record, &actor), &actor, loan_id)?;
        self.finish_payment_change(&actor, &record, &request)
    }

    /// lender edits terms or contact details
    pub fn update_loan(&mut self, loan_id: LoanId, patch: LoanPatch) -> Result<LoanRecord> {
        let actor = self.session.current_identity()?;
        let record = self.api.fetch_loan(loan_id)?;
        let request = guarded(
            lifecycle::attempt_loan_update(&record, &actor, patch, &self.config.validation),
            &actor,
            loan_id,
        )?;

        let returned = self.api.update_loan(&request).map_err(|err| remote_failure(err, loan_id))?;
        let updated = lifecycle::interpret_response(&request, returned)?;

        info!(%loan_id, lender = %actor.id, "loan terms updated");
        self.events.emit(LoanEvent::LoanUpdated {
            loan_id,
            lender: actor.id,
            old_amount: record.amount,
            new_amount: updated.amount,
            timestamp: updated.updated_at,
        });
        Ok(updated)
    }

    fn finish_payment_change(
        &mut self,
        actor: &Identity,
        record: &LoanRecord,
        request: &UpdateRequest,
    ) -> Result<LoanRecord> {
        let updated = self.submit_status(request)?;

        info!(loan_id = %record.id, lender = %actor.id, status = %updated.status, "payment status updated");
        self.events.emit(LoanEvent::PaymentStatusChanged {
            loan_id: record.id,
            lender: actor.id,
            old_status: record.status,
            new_status: updated.status,
            timestamp: updated.updated_at,
        });
        Ok(updated)
    }

    fn submit_status(&mut self, request: &UpdateRequest) -> Result<LoanRecord> {
        let loan_id = request.loan_id();
        let returned = self
            .api
            .update_loan_status(request)
            .map_err(|err| remote_failure(err, loan_id))?;
        lifecycle::interpret_response(request, returned)
    }
}

fn guarded(outcome: Result<UpdateRequest>, actor: &Identity, loan_id: LoanId) -> Result<UpdateRequest> {
    if let Err(err) = &outcome {
        warn!(%loan_id, actor = %actor.id, error = %err, "transition refused");
    }
    outcome
}

fn remote_failure(err: RemoteError, loan_id: LoanId) -> LedgerError {
    warn!(%loan_id, error = %err, "remote update failed");
    LedgerError::Remote(err)
}
