use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RateFetchError;

/// Response of `GET /v4/latest/{BASE}`.
///
/// `base` and `date` are informational; a payload without them is still
/// usable as long as `rates` has the currency we need. Rate values are kept
/// as raw JSON so a malformed entry for some other currency doesn't reject
/// the whole document.
#[derive(Debug, Deserialize)]
pub struct LatestRatesResponse {
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub rates: HashMap<String, Value>,
}

impl LatestRatesResponse {
    pub fn rate_for(&self, currency: &str) -> Result<Decimal, RateFetchError> {
        let value = self
            .rates
            .get(currency)
            .ok_or_else(|| RateFetchError::MissingRate {
                currency: currency.to_string(),
            })?;

        let invalid = || RateFetchError::InvalidRate {
            currency: currency.to_string(),
            value: value.to_string(),
        };

        let value = value.as_f64().ok_or_else(invalid)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid());
        }
        // Display gives the shortest round-trip form, so 12.345678 stays 12.345678.
        Decimal::from_str(&value.to_string()).map_err(|_| invalid())
    }
}
