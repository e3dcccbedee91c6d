use std::sync::Arc;

use nf_rate_converter::RateConverter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub converter: RateConverter,
}

impl AppState {
    pub fn new(converter: RateConverter) -> Self {
        Self { converter }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("NF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds the live converter and starts its refresh schedule.
///
/// Must run inside the tokio runtime.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let converter = RateConverter::live(config.converter.clone())?;
    converter.init();
    tracing::info!(
        "Converter started: {} every {}s, fallback {}",
        config.converter.rate_api_url,
        config.converter.refresh_interval_secs,
        config.converter.fallback_rate
    );
    Ok(Arc::new(AppState::new(converter)))
}
