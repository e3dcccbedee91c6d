//! CNY/RUB rate converter.
//!
//! Holds the state behind the currency conversion widget: the entered amount,
//! the conversion direction, the current exchange rate, and the gross/net
//! results after a fixed commission. The rate is refreshed from a public
//! quote endpoint on a fixed interval and falls back to a hardcoded value
//! whenever the endpoint can't be used.
//!
//! # Architecture
//!
//! ```text
//! +------------------+    schedule()    +-------------------+
//! |  RateConverter   | ---------------> | RefreshScheduler  |  (tokio / manual)
//! +------------------+                  +-------------------+
//!    |          ^                                 |
//!    |          | apply_rate_result()             | tick
//!    v          |                                 v
//! +------------------+   latest_rate()  +-------------------+
//! | ConversionState  |  <-------------- |   RateProvider    |  (ExchangeRate-API)
//! +------------------+                  +-------------------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use nf_rate_converter::{ConverterConfig, RateConverter};
//!
//! let converter = RateConverter::live(ConverterConfig::default())?;
//! converter.init();
//! converter.set_amount("5 000");
//! println!("{}", converter.snapshot().net_converted);
//! converter.dispose();
//! ```

pub mod clock;
pub mod config;
pub mod converter;
pub mod errors;
pub mod models;
pub mod money;
pub mod provider;
pub mod scheduler;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ConverterConfig};
pub use converter::RateConverter;
pub use errors::RateFetchError;
pub use models::{
    ConversionState, Direction, LastUpdated, RateOutcome, RateStatus, OFFLINE_LABEL,
    QUICK_AMOUNTS,
};
pub use provider::{ExchangeRateApiProvider, RateProvider};
pub use scheduler::{
    ManualScheduler, RefreshScheduler, RefreshTask, ScheduleHandle, TokioScheduler,
};
