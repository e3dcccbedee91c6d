//! Rate provider trait definition.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::RateFetchError;

/// A source of live exchange rates.
///
/// Implementations return the raw rate as reported upstream ("1 `base` =
/// rate `quote`"). Rounding and the fallback policy are the converter's job,
/// so a provider should report every failure as an error rather than
/// substituting a value of its own.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Constant identifier used in logs, e.g. "EXCHANGE_RATE_API".
    fn id(&self) -> &'static str;

    /// Fetch the latest rate for one unit of `base` in `quote`.
    async fn latest_rate(&self, base: &str, quote: &str) -> Result<Decimal, RateFetchError>;
}
