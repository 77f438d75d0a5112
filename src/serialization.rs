//! Presentation views of records and statistics.
use serde::{Deserialize, Serialize};

use crate::collection::LoanStatistics;
use crate::config::CurrencyConfig;
use crate::decimal::Money;
use crate::lifecycle;
use crate::record::LoanRecord;
use crate::types::{AcceptanceStatus, Identity, LoanId, PaymentStatus};

/// shown when a borrower has no profile image
pub const PLACEHOLDER_IMAGE: &str = "placeholder:avatar";

/// actions the viewer may take on a loan, decided by the lifecycle guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedActions {
    pub toggle_payment: bool,
    pub accept: bool,
    pub reject: bool,
    pub edit: bool,
}

impl AllowedActions {
    pub fn for_viewer(record: &LoanRecord, viewer: &Identity) -> Self {
        Self {
            toggle_payment: lifecycle::toggle_payment_status(record, viewer).is_ok(),
            accept: lifecycle::attempt_acceptance_transition(record, viewer, AcceptanceStatus::Accepted).is_ok(),
            reject: lifecycle::attempt_acceptance_transition(record, viewer, AcceptanceStatus::Rejected).is_ok(),
            edit: viewer.id == record.lender_identity,
        }
    }
}

/// one list row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub id: LoanId,
    pub borrower_name: String,
    pub borrower_mobile: String,
    pub purpose: String,
    pub amount: String,
    pub pending_amount: String,
    pub loan_start_date: String,
    pub loan_end_date: String,
    pub status: PaymentStatus,
    pub borrower_acceptance_status: AcceptanceStatus,
    pub image: String,
    pub actions: AllowedActions,
}

impl LoanView {
    pub fn from_record(record: &LoanRecord, viewer: &Identity, currency: &CurrencyConfig) -> Self {
        LoanView {
            id: record.id,
            borrower_name: record.borrower_name.clone(),
            borrower_mobile: record.borrower_mobile.clone(),
            purpose: record.purpose.clone(),
            amount: format_money(record.amount, currency),
            pending_amount: format_money(record.pending_amount(), currency),
            loan_start_date: record.loan_start_date.format(&currency.date_format).to_string(),
            loan_end_date: record.loan_end_date.format(&currency.date_format).to_string(),
            status: record.status,
            borrower_acceptance_status: record.borrower_acceptance_status,
            image: record
                .profile_image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            actions: AllowedActions::for_viewer(record, viewer),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// dashboard summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsView {
    pub total_loans: usize,
    pub total_amount: String,
    pub outstanding_amount: String,
    pub given: usize,
    pub taken: usize,
    pub paid: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub awaiting_response: usize,
}

impl StatisticsView {
    pub fn from_statistics(stats: &LoanStatistics, currency: &CurrencyConfig) -> Self {
        StatisticsView {
            total_loans: stats.total_loans,
            total_amount: format_money(stats.total_amount, currency),
            outstanding_amount: format_money(stats.outstanding_amount, currency),
            given: stats.given,
            taken: stats.taken,
            paid: stats.payment.paid,
            pending: stats.payment.pending,
            accepted: stats.acceptance.accepted,
            rejected: stats.acceptance.rejected,
            awaiting_response: stats.acceptance.pending,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// "12000.00 Rs" style amount
pub fn format_money(amount: Money, currency: &CurrencyConfig) -> String {
    let rounded = amount.round_dp(currency.decimal_places).as_decimal();
    format!(
        "{:.*} {}",
        currency.decimal_places as usize,
        rounded,
        currency.symbol
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::aggregate_loans;
    use crate::record::fixtures;
    use crate::types::Role;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_view_for_lender_and_borrower() {
        let lender = Identity::lender(Uuid::new_v4());
        let borrower = Identity::borrower(Uuid::new_v4());
        let record = fixtures::record(lender.id, borrower.id);
        let currency = CurrencyConfig::default();

        let lender_view = LoanView::from_record(&record, &lender, &currency);
        assert_eq!(lender_view.amount, "12000.00 Rs");
        assert_eq!(lender_view.loan_start_date, "01-01-2024");
        assert_eq!(lender_view.image, PLACEHOLDER_IMAGE);
        assert_eq!(
            lender_view.actions,
            AllowedActions {
                toggle_payment: true,
                accept: false,
                reject: false,
                edit: true
            }
        );

        let borrower_view = LoanView::from_record(&record, &borrower, &currency);
        assert!(borrower_view.actions.accept && borrower_view.actions.reject);
        assert!(!borrower_view.actions.toggle_payment);
    }

    #[test]
    fn test_money_format() {
        let currency = CurrencyConfig::default();
        assert_eq!(format_money(Money::from_decimal(dec!(1066.18546)), &currency), "1066.19 Rs");
        assert_eq!(format_money(Money::ZERO, &currency), "0.00 Rs");
    }

    #[test]
    fn test_statistics_view() {
        let record = fixtures::record(Uuid::new_v4(), Uuid::new_v4());
        let stats = aggregate_loans(&[record], Role::Lender);
        let view = StatisticsView::from_statistics(&stats, &CurrencyConfig::default());

        assert_eq!(view.outstanding_amount, "12000.00 Rs");
        assert_eq!(view.awaiting_response, 1);
        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"outstandingAmount\""));
    }
}
