use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};

/// hard ceiling on any loan or calculator duration
pub const MAX_DURATION_MONTHS: u32 = 1_200;

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LedgerConfig {
    pub validation: ValidationRules,
    pub currency: CurrencyConfig,
}

/// field rules applied by the form validators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// length of a national id (aadhaar) number
    pub aadhaar_digits: usize,
    /// length of a mobile number without country code
    pub mobile_digits: usize,
    pub min_password_len: usize,
    pub max_purpose_len: usize,
    /// reject names containing anything but letters and spaces
    pub letters_only_names: bool,
    /// largest principal a form may record
    pub max_amount: Money,
    /// longest loan a form may record, at most [`MAX_DURATION_MONTHS`]
    pub max_duration_months: u32,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            aadhaar_digits: 12,
            mobile_digits: 10,
            min_password_len: 6,
            max_purpose_len: 500,
            letters_only_names: true,
            max_amount: Money::from_decimal(dec!(1000000000)),
            max_duration_months: 600,
        }
    }
}

/// currency used for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub code: String,
    pub symbol: String,
    pub decimal_places: u32,
    /// date format used in list views
    pub date_format: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: "INR".to_string(),
            symbol: "Rs".to_string(),
            decimal_places: 2,
            date_format: "%d-%m-%Y".to_string(),
        }
    }
}

impl LedgerConfig {
    /// parse from json, missing keys fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let rules = &self.validation;
        if rules.aadhaar_digits == 0 || rules.mobile_digits == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "digit counts must be non-zero".to_string(),
            });
        }
        if rules.max_purpose_len == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "max_purpose_len must be non-zero".to_string(),
            });
        }
        if !rules.max_amount.is_positive() {
            return Err(LedgerError::InvalidConfiguration {
                message: "max_amount must be positive".to_string(),
            });
        }
        if rules.max_duration_months == 0 || rules.max_duration_months > MAX_DURATION_MONTHS {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("max_duration_months must be between 1 and {MAX_DURATION_MONTHS}"),
            });
        }
        if self.currency.decimal_places > 8 {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "decimal_places {} exceeds supported precision of 8",
                    self.currency.decimal_places
                ),
            });
        }
        if self.currency.code.trim().is_empty() {
            return Err(LedgerError::InvalidConfiguration {
                message: "currency code is required".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_indian_forms() {
        let config = LedgerConfig::default();
        assert_eq!(config.validation.aadhaar_digits, 12);
        assert_eq!(config.validation.mobile_digits, 10);
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.validation.max_amount, Money::from_major(1_000_000_000));
        assert_eq!(config.validation.max_duration_months, 600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LedgerConfig::from_json_str(r#"{"validation": {"min_password_len": 8}}"#).unwrap();
        assert_eq!(config.validation.min_password_len, 8);
        assert_eq!(config.validation.aadhaar_digits, 12);
        assert_eq!(config.currency.code, "INR");
    }

    #[test]
    fn test_rejects_bad_config() {
        let err = LedgerConfig::from_json_str(r#"{"currency": {"decimal_places": 12}}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfiguration { .. }));

        let err = LedgerConfig::from_json_str(r#"{"validation": {"max_amount": "0"}}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfiguration { .. }));

        let err = LedgerConfig::from_json_str(r#"{"validation": {"max_duration_months": 5000}}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfiguration { .. }));

        let err = LedgerConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, LedgerError::Serialization(_)));
    }
}
