pub mod collection;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod lifecycle;
pub mod payments;
pub mod record;
pub mod remote;
pub mod serialization;
pub mod types;
pub mod validation;

// re-export key types
pub use collection::{aggregate_loans, identity_statistics, LoanCollection, LoanStatistics};
pub use config::{CurrencyConfig, LedgerConfig, ValidationRules, MAX_DURATION_MONTHS};
pub use decimal::{Money, Rate};
pub use errors::{FieldViolation, FormField, LedgerError, RemoteError, Result, ValidationErrors};
pub use events::{EventStore, LoanEvent};
pub use ledger::LoanLedger;
pub use lifecycle::{
    attempt_acceptance_transition, attempt_loan_update, attempt_payment_status_transition,
    interpret_response, toggle_payment_status, UpdateRequest,
};
pub use payments::{compute_emi, quote_emi, EmiQuote, RepaymentSchedule};
pub use record::{LoanInput, LoanPatch, LoanRecord, LoanTerms, NewLoan};
pub use remote::{InMemoryLoanApi, LoanApi, SessionProvider, StaticSession};
pub use serialization::{LoanView, StatisticsView};
pub use types::{AcceptanceStatus, Identity, IdentityId, LoanId, PaymentStatus, Role};
pub use validation::{validate_loan_input, validate_registration, RegistrationInput};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
