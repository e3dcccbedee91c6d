use chrono::NaiveTime;
use serde::{Deserialize, Serialize, Serializer};

/// Outcome of the most recent rate fetch.
///
/// ```text
/// Loading --ok--> Live
/// Loading --err-> StaleFallback
/// Live | StaleFallback --next fetch--> Loading
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStatus {
    /// A fetch is in flight (or none has finished yet).
    #[default]
    Loading,
    /// The rate came from the endpoint.
    Live,
    /// The endpoint failed; the fallback rate is in use.
    StaleFallback,
}

impl std::fmt::Display for RateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Live => write!(f, "live"),
            Self::StaleFallback => write!(f, "stale_fallback"),
        }
    }
}

/// Marker rendered when the fallback rate is in use.
pub const OFFLINE_LABEL: &str = "offline";

/// When the rate was last refreshed, as shown next to it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LastUpdated {
    /// No fetch has completed yet.
    #[default]
    Pending,
    /// Local wall-clock time of the last successful fetch.
    At(NaiveTime),
    /// The last fetch failed.
    Offline,
}

impl LastUpdated {
    /// Human-readable label: `""`, `"HH:MM"` or `"offline"`.
    pub fn label(&self) -> String {
        match self {
            Self::Pending => String::new(),
            Self::At(time) => time.format("%H:%M").to_string(),
            Self::Offline => OFFLINE_LABEL.to_string(),
        }
    }
}

impl Serialize for LastUpdated {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}
