use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::payments::emi::{compute_emi, overflow};

/// one row of a repayment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub closing_balance: Money,
}

/// equal-installment repayment plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub duration_months: u32,
    pub start_date: NaiveDate,
    pub installments: Vec<Installment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl RepaymentSchedule {
    /// build the plan; first installment falls one month after `start_date`
    pub fn generate(
        principal: Money,
        annual_rate: Rate,
        duration_months: i64,
        start_date: NaiveDate,
    ) -> Result<Self> {
        let emi = compute_emi(principal, annual_rate, duration_months)?;
        let months = duration_months as u32;
        let monthly_rate = annual_rate.monthly_rate().as_decimal();

        let mut installments = Vec::with_capacity(months as usize);
        let mut balance = principal;

        for number in 1..=months {
            let due_date = start_date
                .checked_add_months(Months::new(number))
                .ok_or_else(|| LedgerError::Calculation {
                    message: format!("due date of installment {number} is out of range"),
                })?;
            let interest_portion = balance.checked_mul(monthly_rate).ok_or_else(overflow)?;
            let principal_portion = emi
                .checked_sub(interest_portion)
                .ok_or_else(overflow)?
                .min(balance);
            let closing_balance = balance
                .checked_sub(principal_portion)
                .ok_or_else(overflow)?
                .max(Money::ZERO);
            let payment = interest_portion
                .checked_add(principal_portion)
                .ok_or_else(overflow)?;

            installments.push(Installment {
                number,
                due_date,
                opening_balance: balance,
                payment,
                interest_portion,
                principal_portion,
                closing_balance,
            });

            balance = closing_balance;
        }

        // last installment absorbs rounding drift
        if let Some(last) = installments.last_mut() {
            if last.closing_balance > Money::ZERO {
                last.principal_portion = last
                    .principal_portion
                    .checked_add(last.closing_balance)
                    .ok_or_else(overflow)?;
                last.payment = last.payment.checked_add(last.closing_balance).ok_or_else(overflow)?;
                last.closing_balance = Money::ZERO;
            }
        }

        let total_interest = checked_total(installments.iter().map(|i| i.interest_portion))?;
        let total_payment = checked_total(installments.iter().map(|i| i.payment))?;

        Ok(Self {
            principal,
            annual_rate,
            duration_months: months,
            start_date,
            installments,
            total_interest,
            total_payment,
        })
    }

    pub fn installment(&self, number: u32) -> Option<&Installment> {
        number
            .checked_sub(1)
            .and_then(|idx| self.installments.get(idx as usize))
    }

    /// balance left after `number` installments
    pub fn balance_after(&self, number: u32) -> Money {
        self.installment(number)
            .map(|i| i.closing_balance)
            .unwrap_or(self.principal)
    }

    /// installments due on or before `date`
    pub fn due_by(&self, date: NaiveDate) -> usize {
        self.installments.iter().filter(|i| i.due_date <= date).count()
    }

    /// average payment, handy for sanity checks against the emi
    pub fn average_payment(&self) -> Money {
        if self.installments.is_empty() {
            return Money::ZERO;
        }
        self.total_payment / Decimal::from(self.installments.len() as u32)
    }
}

fn checked_total(mut amounts: impl Iterator<Item = Money>) -> Result<Money> {
    amounts
        .try_fold(Money::ZERO, Money::checked_add)
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn test_equal_installments_schedule() {
        let principal = Money::from_major(12_000);
        let schedule = RepaymentSchedule::generate(principal, Rate::from_percentage(12), 12, start()).unwrap();

        assert_eq!(schedule.installments.len(), 12);

        let first = schedule.installment(1).unwrap();
        assert_eq!(first.opening_balance, principal);
        assert_eq!(first.interest_portion.as_decimal(), dec!(120));
        assert_eq!(first.due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let last = schedule.installment(12).unwrap();
        assert_eq!(last.closing_balance, Money::ZERO);
        assert_eq!(last.due_date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());

        // interest declines each month
        for pair in schedule.installments.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }

        let principal_repaid: Money = schedule.installments.iter().map(|i| i.principal_portion).sum();
        assert_eq!(principal_repaid.round_currency(), principal);
        assert_eq!(schedule.total_interest.round_currency().as_decimal(), dec!(794.23));
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = RepaymentSchedule::generate(Money::from_major(1_200), Rate::ZERO, 4, start()).unwrap();

        for installment in &schedule.installments {
            assert_eq!(installment.payment, Money::from_major(300));
            assert_eq!(installment.interest_portion, Money::ZERO);
        }
        assert_eq!(schedule.total_payment, Money::from_major(1_200));
        assert_eq!(schedule.balance_after(2), Money::from_major(600));
        assert_eq!(schedule.balance_after(0), Money::from_major(1_200));
        assert_eq!(schedule.due_by(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()), 3);
    }

    #[test]
    fn test_invalid_terms_propagate() {
        let err = RepaymentSchedule::generate(Money::from_major(1_000), Rate::ZERO, 0, start()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_oversized_principal_is_a_calculation_error() {
        let principal = Money::from_str_exact("79000000000000000000000000000").unwrap();
        let err = RepaymentSchedule::generate(principal, Rate::from_percentage(12), 12, start()).unwrap_err();
        assert!(matches!(err, LedgerError::Calculation { .. }));
    }
}
