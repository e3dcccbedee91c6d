//! Converter state and its value types.

mod direction;
mod state;
mod status;

pub use direction::Direction;
pub use state::{ConversionState, RateOutcome};
pub use status::{LastUpdated, RateStatus, OFFLINE_LABEL};

/// Preset amounts offered as one-click buttons.
pub const QUICK_AMOUNTS: [u32; 4] = [500, 1000, 5000, 10000];
