use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use nf_rate_converter::ConverterConfig;
use rust_decimal::Decimal;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub converter: ConverterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            converter: ConverterConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = std::env::var("NF_LISTEN_ADDR")
            .unwrap_or_else(|_| defaults.listen_addr.to_string())
            .parse()
            .context("Invalid NF_LISTEN_ADDR")?;
        let cors_allow = std::env::var("NF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("NF_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let mut converter = defaults.converter;
        if let Ok(url) = std::env::var("NF_RATE_API_URL") {
            converter.rate_api_url = url;
        }
        if let Ok(secs) = std::env::var("NF_REFRESH_INTERVAL_SECS") {
            converter.refresh_interval_secs =
                secs.parse().context("Invalid NF_REFRESH_INTERVAL_SECS")?;
        }
        if let Ok(rate) = std::env::var("NF_FALLBACK_RATE") {
            converter.fallback_rate =
                Decimal::from_str(&rate).context("Invalid NF_FALLBACK_RATE")?;
        }
        converter.validate()?;

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            converter,
        })
    }
}
