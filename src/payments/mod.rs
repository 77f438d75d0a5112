pub mod emi;
pub mod schedule;

pub use emi::{compute_emi, quote_emi, quote_from_input, EmiInput, EmiQuote};
pub use schedule::{Installment, RepaymentSchedule};
