//! Converter configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Default endpoint; the base currency is appended as the last path segment.
pub const DEFAULT_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Free tier limits make anything shorter than five minutes pointless.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5 * 60;

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Fallback rate must be positive, got {0}")]
    NonPositiveFallback(Decimal),
    #[error("Commission fee must be in [0, 1), got {0}")]
    CommissionOutOfRange(Decimal),
    #[error("Initial amount must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("Refresh interval must be non-zero")]
    ZeroRefreshInterval,
}

/// Settings for one [`RateConverter`](crate::RateConverter).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterConfig {
    pub rate_api_url: String,
    pub base_currency: String,
    pub quote_currency: String,
    /// Used until the first fetch lands and whenever a fetch fails.
    pub fallback_rate: Decimal,
    pub commission_fee: Decimal,
    pub initial_amount: Decimal,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            rate_api_url: DEFAULT_RATE_API_URL.to_string(),
            base_currency: "CNY".to_string(),
            quote_currency: "RUB".to_string(),
            fallback_rate: Decimal::new(115, 1),
            commission_fee: Decimal::new(2, 2),
            initial_amount: Decimal::from(1000),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ConverterConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects settings that would break the positive-rate or
    /// net-not-above-gross guarantees.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_rate <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveFallback(self.fallback_rate));
        }
        if self.commission_fee < Decimal::ZERO || self.commission_fee >= Decimal::ONE {
            return Err(ConfigError::CommissionOutOfRange(self.commission_fee));
        }
        if self.initial_amount < Decimal::ZERO {
            return Err(ConfigError::NegativeAmount(self.initial_amount));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.fallback_rate, dec!(11.5));
        assert_eq!(config.commission_fee, dec!(0.02));
        assert_eq!(config.initial_amount, dec!(1000));
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ConverterConfig {
            fallback_rate: Decimal::ZERO,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveFallback(Decimal::ZERO))
        );

        let config = ConverterConfig {
            commission_fee: dec!(1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CommissionOutOfRange(_))
        ));

        let config = ConverterConfig {
            refresh_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRefreshInterval));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"refreshIntervalSecs": 60}"#).unwrap();
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.quote_currency, "RUB");
    }
}
