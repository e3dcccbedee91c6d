//! Error types for rate fetching.
//!
//! Every failure mode of the upstream quote endpoint collapses into
//! [`RateFetchError`]. The converter never surfaces these to its caller; it
//! records the message and substitutes the fallback rate.

use thiserror::Error;

/// Errors that can occur while fetching the live exchange rate.
#[derive(Error, Debug)]
pub enum RateFetchError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("HTTP error: {status}")]
    HttpStatus {
        /// Status code returned by the endpoint
        status: u16,
    },

    /// The response body was not the expected JSON document.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Decoder error message
        message: String,
    },

    /// The payload decoded but did not carry the requested currency.
    #[error("{currency} rate not found in response")]
    MissingRate {
        /// ISO 4217 code that was looked up
        currency: String,
    },

    /// The payload carried a rate that can't be used (zero, negative, NaN).
    #[error("Invalid rate for {currency}: {value}")]
    InvalidRate {
        /// ISO 4217 code that was looked up
        currency: String,
        /// The raw value as reported by the provider
        value: String,
    },
}
