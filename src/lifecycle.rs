//! Transition guards for a loan record.
//!
//! Two independent fields move over a loan's life:
//!
//! * `borrower_acceptance_status`: `pending -> accepted | rejected`, set once
//!   by the borrower and never again.
//! * `status`: `pending <-> paid`, flipped by the lender in either direction.
//!
//! Guards check the actor first and the current state second, and on success
//! return the [`UpdateRequest`] the remote service must apply. Each request
//! carries the value it was computed from so the service can refuse it if the
//! record moved in the meantime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ValidationRules;
use crate::errors::{LedgerError, RemoteError, Result};
use crate::record::{LoanPatch, LoanRecord};
use crate::types::{AcceptanceStatus, Identity, IdentityId, LoanId, PaymentStatus, Role};
use crate::validation::validate_loan_patch;

pub const ACCEPTANCE_FIELD: &str = "borrowerAcceptanceStatus";
pub const PAYMENT_FIELD: &str = "status";
pub const TERMS_FIELD: &str = "loan terms";

/// update the remote service is asked to apply, keyed by loan id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UpdateRequest {
    #[serde(rename_all = "camelCase")]
    Acceptance {
        loan_id: LoanId,
        from: AcceptanceStatus,
        to: AcceptanceStatus,
    },
    #[serde(rename_all = "camelCase")]
    PaymentStatus {
        loan_id: LoanId,
        from: PaymentStatus,
        to: PaymentStatus,
    },
    #[serde(rename_all = "camelCase")]
    Terms {
        loan_id: LoanId,
        patch: LoanPatch,
        /// last modification seen by the editor
        read_at: DateTime<Utc>,
    },
}

impl UpdateRequest {
    pub fn loan_id(&self) -> LoanId {
        match self {
            UpdateRequest::Acceptance { loan_id, .. }
            | UpdateRequest::PaymentStatus { loan_id, .. }
            | UpdateRequest::Terms { loan_id, .. } => *loan_id,
        }
    }

    /// the record as it should look once the update lands
    pub fn apply(&self, record: &LoanRecord) -> LoanRecord {
        match self {
            UpdateRequest::Acceptance { to, .. } => LoanRecord {
                borrower_acceptance_status: *to,
                ..record.clone()
            },
            UpdateRequest::PaymentStatus { to, .. } => LoanRecord {
                status: *to,
                ..record.clone()
            },
            UpdateRequest::Terms { patch, .. } => record.merged_with(patch),
        }
    }

    /// refuse the update if `current` no longer matches what the request was built from
    pub fn check_precondition(&self, current: &LoanRecord) -> std::result::Result<(), RemoteError> {
        let (expected, found) = match self {
            UpdateRequest::Acceptance { from, .. } => {
                if current.borrower_acceptance_status == *from {
                    return Ok(());
                }
                (from.to_string(), current.borrower_acceptance_status.to_string())
            }
            UpdateRequest::PaymentStatus { from, .. } => {
                if current.status == *from {
                    return Ok(());
                }
                (from.to_string(), current.status.to_string())
            }
            UpdateRequest::Terms { read_at, .. } => {
                if current.updated_at == *read_at {
                    return Ok(());
                }
                (read_at.to_rfc3339(), current.updated_at.to_rfc3339())
            }
        };
        Err(RemoteError::Conflict {
            id: self.loan_id(),
            expected,
            found,
        })
    }
}

/// borrower accepts or rejects the loan terms
pub fn attempt_acceptance_transition(
    record: &LoanRecord,
    actor: &Identity,
    new_status: AcceptanceStatus,
) -> Result<UpdateRequest> {
    require_party(actor, record.borrower_identity, Role::Borrower, record.id)?;

    let current = record.borrower_acceptance_status;
    if current.is_terminal() || new_status == AcceptanceStatus::Pending {
        debug!(loan_id = %record.id, %current, requested = %new_status, "acceptance transition refused");
        return Err(LedgerError::State {
            field: ACCEPTANCE_FIELD,
            current: current.to_string(),
            requested: new_status.to_string(),
        });
    }

    Ok(UpdateRequest::Acceptance {
        loan_id: record.id,
        from: current,
        to: new_status,
    })
}

/// lender sets the repayment status; both directions are allowed
pub fn attempt_payment_status_transition(
    record: &LoanRecord,
    actor: &Identity,
    new_status: PaymentStatus,
) -> Result<UpdateRequest> {
    require_party(actor, record.lender_identity, Role::Lender, record.id)?;

    if record.status == new_status {
        debug!(loan_id = %record.id, status = %new_status, "payment status already set");
        return Err(LedgerError::State {
            field: PAYMENT_FIELD,
            current: record.status.to_string(),
            requested: new_status.to_string(),
        });
    }

    Ok(UpdateRequest::PaymentStatus {
        loan_id: record.id,
        from: record.status,
        to: new_status,
    })
}

/// lender flips pending and paid
pub fn toggle_payment_status(record: &LoanRecord, actor: &Identity) -> Result<UpdateRequest> {
    attempt_payment_status_transition(record, actor, record.status.toggled())
}

/// lender edits the loan terms or the borrower's contact snapshot
pub fn attempt_loan_update(
    record: &LoanRecord,
    actor: &Identity,
    patch: LoanPatch,
    rules: &ValidationRules,
) -> Result<UpdateRequest> {
    require_party(actor, record.lender_identity, Role::Lender, record.id)?;

    if patch.is_empty() {
        return Err(LedgerError::State {
            field: TERMS_FIELD,
            current: "unchanged".to_string(),
            requested: "empty edit".to_string(),
        });
    }
    validate_loan_patch(record, &patch, rules)?;

    Ok(UpdateRequest::Terms {
        loan_id: record.id,
        patch,
        read_at: record.updated_at,
    })
}

/// check the service's answer actually reflects the request
pub fn interpret_response(request: &UpdateRequest, returned: LoanRecord) -> Result<LoanRecord> {
    let loan_id = request.loan_id();
    if returned.id != loan_id {
        return Err(unexpected(loan_id, format!("response is for loan {}", returned.id)));
    }

    match request {
        UpdateRequest::Acceptance { to, .. } if returned.borrower_acceptance_status != *to => {
            Err(unexpected(
                loan_id,
                format!("acceptance is {} instead of {}", returned.borrower_acceptance_status, to),
            ))
        }
        UpdateRequest::PaymentStatus { to, .. } if returned.status != *to => Err(unexpected(
            loan_id,
            format!("status is {} instead of {}", returned.status, to),
        )),
        // every edited field must already hold its new value
        UpdateRequest::Terms { patch, .. } if returned.merged_with(patch) != returned => {
            Err(unexpected(loan_id, "edit was not fully applied".to_string()))
        }
        _ => Ok(returned),
    }
}

fn require_party(actor: &Identity, party: IdentityId, required: Role, loan_id: LoanId) -> Result<()> {
    if actor.id != party {
        debug!(%loan_id, actor = %actor.id, %required, "actor is not a party to this transition");
        return Err(LedgerError::Authorization {
            actor: actor.id,
            required,
        });
    }
    Ok(())
}

fn unexpected(id: LoanId, message: String) -> LedgerError {
    LedgerError::Remote(RemoteError::UnexpectedResponse { id, message })
}
