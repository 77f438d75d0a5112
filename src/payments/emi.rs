use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::MAX_DURATION_MONTHS;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, FormField, Result, ValidationErrors};

/// monthly installment with its totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiQuote {
    pub principal: Money,
    pub annual_rate: Rate,
    pub duration_months: u32,
    pub emi: Money,
    pub total_payable: Money,
    pub total_interest: Money,
}

impl EmiQuote {
    /// same quote rounded to the given number of decimal places
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            emi: self.emi.round_dp(dp),
            total_payable: self.total_payable.round_dp(dp),
            total_interest: self.total_interest.round_dp(dp),
            ..*self
        }
    }
}

/// raw calculator form: principal, annual rate in percent, months
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiInput {
    pub principal: String,
    pub annual_rate_percent: String,
    pub duration_months: String,
}

/// fixed monthly installment of an amortizing loan
///
/// `emi = P * r * (1 + r)^n / ((1 + r)^n - 1)` with `r` the monthly rate.
/// A zero rate returns exactly `principal / n`. The result is not rounded to
/// currency; use [`Money::round_currency`] for display.
pub fn compute_emi(principal: Money, annual_rate: Rate, duration_months: i64) -> Result<Money> {
    let months = check_terms(principal, annual_rate, duration_months)?;

    let r = annual_rate.monthly_rate().as_decimal();
    if r.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let compound = compound_factor(r, months)?;
    let numerator = principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .ok_or_else(overflow)?;
    let denominator = compound - Decimal::ONE;
    // rate too small to move the compound factor at 28 digits
    if denominator.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    numerator
        .checked_div(denominator)
        .map(Money::from_decimal)
        .ok_or_else(overflow)
}

/// emi plus total payable and total interest
pub fn quote_emi(principal: Money, annual_rate: Rate, duration_months: i64) -> Result<EmiQuote> {
    let emi = compute_emi(principal, annual_rate, duration_months)?;
    let months = duration_months as u32;
    let total_payable = emi.checked_mul(Decimal::from(months)).ok_or_else(overflow)?;
    let total_interest = total_payable.checked_sub(principal).ok_or_else(overflow)?;

    Ok(EmiQuote {
        principal,
        annual_rate,
        duration_months: months,
        emi,
        total_payable,
        total_interest: total_interest.max(Money::ZERO),
    })
}

/// parse the calculator form and quote it, reporting every bad field
pub fn quote_from_input(input: &EmiInput) -> Result<EmiQuote> {
    let mut errors = ValidationErrors::new();

    let principal = match Money::from_str(&input.principal) {
        Ok(p) => Some(p),
        Err(_) => {
            errors.push(FormField::Amount, "Loan amount should be a number.");
            None
        }
    };
    let rate = match Decimal::from_str(input.annual_rate_percent.trim()) {
        Ok(p) => Some(Rate::from_percent_decimal(p)),
        Err(_) => {
            errors.push(FormField::InterestRate, "Interest rate should be a number.");
            None
        }
    };
    let months = match input.duration_months.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(FormField::DurationMonths, "Duration should be a whole number of months.");
            None
        }
    };

    match (principal, rate, months) {
        (Some(p), Some(r), Some(n)) => quote_emi(p, r, n),
        _ => Err(LedgerError::Validation(errors)),
    }
}

fn check_terms(principal: Money, annual_rate: Rate, duration_months: i64) -> Result<u32> {
    let mut errors = ValidationErrors::new();

    if !principal.is_positive() {
        errors.push(FormField::Amount, "Loan amount should be a positive number.");
    }
    if annual_rate.is_negative() {
        errors.push(FormField::InterestRate, "Interest rate cannot be negative.");
    }
    let months = match u32::try_from(duration_months) {
        Ok(n) if (1..=MAX_DURATION_MONTHS).contains(&n) => n,
        _ if duration_months > 0 => {
            errors.push(
                FormField::DurationMonths,
                format!("Duration must be at most {MAX_DURATION_MONTHS} months."),
            );
            0
        }
        _ => {
            errors.push(FormField::DurationMonths, "Duration must be at least one month.");
            0
        }
    };

    errors.into_result()?;
    Ok(months)
}

/// (1 + r)^n
fn compound_factor(r: Decimal, months: u32) -> Result<Decimal> {
    Decimal::ONE
        .checked_add(r)
        .and_then(|base| base.checked_powu(u64::from(months)))
        .ok_or_else(overflow)
}

pub(crate) fn overflow() -> LedgerError {
    LedgerError::Calculation {
        message: "installment exceeds representable range".to_string(),
    }
}
