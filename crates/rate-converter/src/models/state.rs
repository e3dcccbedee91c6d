use chrono::NaiveTime;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use super::direction::Direction;
use super::status::{LastUpdated, RateStatus};
use crate::errors::RateFetchError;
use crate::money::{commission_amount, gross_amount, net_amount, round_money, round_rate};

/// Everything the display surface reads.
///
/// Derived fields (`gross_converted`, `net_converted`, `commission_amount`)
/// are only written by [`ConversionState::recompute`], which every mutator
/// calls, so they never lag behind `amount`, `rate` or `direction`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionState {
    pub amount: Decimal,
    pub direction: Direction,
    /// 1 CNY = `rate` RUB. Always positive.
    pub rate: Decimal,
    pub commission_fee: Decimal,
    pub gross_converted: Decimal,
    pub net_converted: Decimal,
    pub commission_amount: Decimal,
    pub rate_status: RateStatus,
    pub last_updated: LastUpdated,
    /// Reason of the last failed fetch, cleared when a new fetch starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ConversionState {
    pub fn new(amount: Decimal, rate: Decimal, commission_fee: Decimal) -> Self {
        let mut state = Self {
            amount,
            direction: Direction::default(),
            rate,
            commission_fee,
            gross_converted: Decimal::ZERO,
            net_converted: Decimal::ZERO,
            commission_amount: Decimal::ZERO,
            rate_status: RateStatus::Loading,
            last_updated: LastUpdated::Pending,
            last_error: None,
        };
        state.recompute();
        state
    }

    /// Refreshes all derived values from the current inputs.
    pub fn recompute(&mut self) {
        self.gross_converted = gross_amount(self.amount, self.rate, self.direction);
        self.net_converted = net_amount(self.gross_converted, self.commission_fee);
        self.commission_amount = commission_amount(self.gross_converted, self.commission_fee);
    }

    pub fn set_amount(&mut self, amount: Decimal) {
        self.amount = amount;
        self.recompute();
    }

    /// Flips the direction and carries the net result over as the new amount.
    ///
    /// This is not an inverse: each toggle deducts the commission again, so
    /// toggling twice leaves less than the starting amount.
    pub fn toggle_direction(&mut self) {
        self.amount = round_money(self.net_converted);
        self.direction = self.direction.toggled();
        self.recompute();
    }

    /// Marks a fetch as started.
    pub fn begin_fetch(&mut self) {
        self.rate_status = RateStatus::Loading;
        self.last_error = None;
    }

    /// Applies the outcome of a fetch.
    ///
    /// A usable rate is rounded to 3 places and marked live. Any error, or a
    /// rate that rounds to zero or below, puts `fallback_rate` in place.
    pub fn apply_rate_result(
        &mut self,
        result: Result<Decimal, RateFetchError>,
        fallback_rate: Decimal,
        now: NaiveTime,
    ) {
        match RateOutcome::from_result(result) {
            RateOutcome::Live(rate) => {
                info!("Exchange rate updated: {} (was {})", rate, self.rate);
                self.rate = rate;
                self.rate_status = RateStatus::Live;
                self.last_updated = LastUpdated::At(now);
                self.last_error = None;
            }
            RateOutcome::Fallback(reason) => {
                warn!(
                    "Failed to fetch exchange rate: {}. Using fallback {}",
                    reason, fallback_rate
                );
                self.rate = fallback_rate;
                self.rate_status = RateStatus::StaleFallback;
                self.last_updated = LastUpdated::Offline;
                self.last_error = Some(reason);
            }
        }
        self.recompute();
    }
}

/// The fallback decision, separated from the HTTP call.
#[derive(Clone, Debug, PartialEq)]
pub enum RateOutcome {
    /// Rounded, strictly positive rate.
    Live(Decimal),
    /// Use the fallback; carries the failure reason.
    Fallback(String),
}

impl RateOutcome {
    pub fn from_result(result: Result<Decimal, RateFetchError>) -> Self {
        match result {
            Ok(raw) => {
                let rate = round_rate(raw);
                if rate > Decimal::ZERO {
                    Self::Live(rate)
                } else {
                    Self::Fallback(format!("Rate rounds to non-positive value: {}", raw))
                }
            }
            Err(e) => Self::Fallback(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 30, 0).unwrap()
    }

    #[test]
    fn test_new_state_is_computed() {
        let state = ConversionState::new(dec!(1000), dec!(11.5), dec!(0.02));
        assert_eq!(state.gross_converted, dec!(11500.00));
        assert_eq!(state.net_converted, dec!(11270.00));
        assert_eq!(state.commission_amount, dec!(230.00));
        assert_eq!(state.rate_status, RateStatus::Loading);
        assert_eq!(state.last_updated, LastUpdated::Pending);
    }

    #[test]
    fn test_toggle_carries_net_amount() {
        let mut state = ConversionState::new(dec!(1000), dec!(10), dec!(0.02));
        state.toggle_direction();
        assert_eq!(state.direction, Direction::RubToCny);
        assert_eq!(state.amount, dec!(9800.00));

        state.toggle_direction();
        assert_eq!(state.direction, Direction::CnyToRub);
        assert_eq!(state.amount, dec!(960.40));
    }

    #[test]
    fn test_outcome_rounds_live_rate() {
        assert_eq!(
            RateOutcome::from_result(Ok(dec!(12.345678))),
            RateOutcome::Live(dec!(12.346))
        );
    }

    #[test]
    fn test_outcome_rejects_rate_rounding_to_zero() {
        assert!(matches!(
            RateOutcome::from_result(Ok(dec!(0.0004))),
            RateOutcome::Fallback(_)
        ));
        assert!(matches!(
            RateOutcome::from_result(Ok(dec!(-3))),
            RateOutcome::Fallback(_)
        ));
    }

    #[test]
    fn test_outcome_error_is_fallback() {
        let outcome = RateOutcome::from_result(Err(RateFetchError::HttpStatus { status: 500 }));
        assert_eq!(outcome, RateOutcome::Fallback("HTTP error: 500".to_string()));
    }

    #[test]
    fn test_apply_live_then_fallback() {
        let mut state = ConversionState::new(dec!(1000), dec!(11.5), dec!(0.02));

        state.begin_fetch();
        state.apply_rate_result(Ok(dec!(12.345678)), dec!(11.5), noon());
        assert_eq!(state.rate, dec!(12.346));
        assert_eq!(state.rate_status, RateStatus::Live);
        assert_eq!(state.last_updated.label(), "12:30");
        assert_eq!(state.gross_converted, dec!(12346.00));

        state.begin_fetch();
        assert_eq!(state.rate_status, RateStatus::Loading);
        state.apply_rate_result(
            Err(RateFetchError::MissingRate {
                currency: "RUB".to_string(),
            }),
            dec!(11.5),
            noon(),
        );
        assert_eq!(state.rate, dec!(11.5));
        assert_eq!(state.rate_status, RateStatus::StaleFallback);
        assert_eq!(state.last_updated.label(), "offline");
        assert_eq!(
            state.last_error.as_deref(),
            Some("RUB rate not found in response")
        );
        assert_eq!(state.gross_converted, dec!(11500.00));
    }

    #[test]
    fn test_serializes_for_display() {
        let state = ConversionState::new(dec!(1000), dec!(11.5), dec!(0.02));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["direction"], "CNY_TO_RUB");
        assert_eq!(json["rateStatus"], "loading");
        assert_eq!(json["lastUpdated"], "");
        assert!(json.get("lastError").is_none());
        assert!(json.get("grossConverted").is_some());
    }
}
