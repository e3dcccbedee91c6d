//! Rate provider abstraction and the HTTP implementation.

mod traits;

pub mod exchange_rate_api;

pub use exchange_rate_api::ExchangeRateApiProvider;
pub use traits::RateProvider;
