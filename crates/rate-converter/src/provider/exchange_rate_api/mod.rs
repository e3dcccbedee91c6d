//! ExchangeRate-API provider.
//!
//! Uses the keyless `v4/latest/{BASE}` endpoint, which returns every rate for
//! one base currency in a single document. The free tier refreshes roughly
//! once per hour, so polling faster than a few minutes gains nothing.

mod models;

pub use models::LatestRatesResponse;

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::config::{DEFAULT_RATE_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::RateFetchError;
use crate::provider::RateProvider;

const PROVIDER_ID: &str = "EXCHANGE_RATE_API";

pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new(
            DEFAULT_RATE_API_URL,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

impl ExchangeRateApiProvider {
    /// `base_url` is everything before the base-currency path segment.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, base: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), base)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_rate(&self, base: &str, quote: &str) -> Result<Decimal, RateFetchError> {
        let url = self.url_for(base);
        debug!("{}: GET {}", PROVIDER_ID, url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateFetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: LatestRatesResponse =
            serde_json::from_str(&body).map_err(|e| RateFetchError::Decode {
                message: e.to_string(),
            })?;

        payload.rate_for(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(
            format!("{}/v4/latest/", server.uri()),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(ExchangeRateApiProvider::default().id(), "EXCHANGE_RATE_API");
    }

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let provider =
            ExchangeRateApiProvider::new("http://rates.test/v4/latest/", Duration::from_secs(1));
        assert_eq!(provider.url_for("CNY"), "http://rates.test/v4/latest/CNY");
    }

    #[tokio::test]
    async fn test_latest_rate_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/CNY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "base": "CNY",
                "date": "2025-06-01",
                "rates": { "CNY": 1, "RUB": 12.345678 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rate = provider_for(&server).latest_rate("CNY", "RUB").await.unwrap();
        assert_eq!(rate, dec!(12.345678));
    }

    #[tokio::test]
    async fn test_latest_rate_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider_for(&server).latest_rate("CNY", "RUB").await.unwrap_err();
        assert!(matches!(err, RateFetchError::HttpStatus { status: 500 }));
    }

    #[tokio::test]
    async fn test_latest_rate_missing_currency() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/CNY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "base": "CNY",
                "date": "2025-06-01",
                "rates": { "USD": 0.139 }
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).latest_rate("CNY", "RUB").await.unwrap_err();
        assert!(matches!(err, RateFetchError::MissingRate { .. }));
    }

    #[tokio::test]
    async fn test_latest_rate_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).latest_rate("CNY", "RUB").await.unwrap_err();
        assert!(matches!(err, RateFetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_latest_rate_unreachable() {
        let provider = ExchangeRateApiProvider::new("http://127.0.0.1:1", Duration::from_secs(1));
        let err = provider.latest_rate("CNY", "RUB").await.unwrap_err();
        assert!(matches!(err, RateFetchError::Network(_)));
    }
}
