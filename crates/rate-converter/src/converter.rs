//! The converter handle.
//!
//! A [`RateConverter`] owns one [`ConversionState`] for as long as the widget
//! that displays it is mounted. `init()` starts the refresh schedule and
//! `dispose()` stops it; after `dispose()` the handle ignores every fetch
//! result, including ones already in flight.
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`, so amount edits and toggles go through immediately while a fetch
//! is pending. Fetches are not sequenced: if two overlap, whichever finishes
//! last wins, even if it was started first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures::FutureExt;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, ConverterConfig};
use crate::models::ConversionState;
use crate::money::sanitize_amount;
use crate::provider::{ExchangeRateApiProvider, RateProvider};
use crate::scheduler::{RefreshScheduler, RefreshTask, ScheduleHandle, TokioScheduler};

struct Inner {
    config: ConverterConfig,
    provider: Arc<dyn RateProvider>,
    scheduler: Arc<dyn RefreshScheduler>,
    clock: Arc<dyn Clock>,
    state: Mutex<ConversionState>,
    schedule: Mutex<Option<ScheduleHandle>>,
    disposed: AtomicBool,
}

/// Cloneable handle to one converter instance.
#[derive(Clone)]
pub struct RateConverter {
    inner: Arc<Inner>,
}

impl RateConverter {
    pub fn new(
        config: ConverterConfig,
        provider: Arc<dyn RateProvider>,
        scheduler: Arc<dyn RefreshScheduler>,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(config, provider, scheduler, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: ConverterConfig,
        provider: Arc<dyn RateProvider>,
        scheduler: Arc<dyn RefreshScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = ConversionState::new(
            config.initial_amount,
            config.fallback_rate,
            config.commission_fee,
        );

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                provider,
                scheduler,
                clock,
                state: Mutex::new(state),
                schedule: Mutex::new(None),
                disposed: AtomicBool::new(false),
            }),
        })
    }

    /// Converter backed by ExchangeRate-API and the tokio timer.
    pub fn live(config: ConverterConfig) -> Result<Self, ConfigError> {
        let provider = ExchangeRateApiProvider::new(
            config.rate_api_url.clone(),
            config.request_timeout(),
        );
        Self::new(config, Arc::new(provider), Arc::new(TokioScheduler))
    }

    fn lock_state(&self) -> MutexGuard<'_, ConversionState> {
        self.inner.state.lock().unwrap_or_else(|poisoned| {
            warn!("Converter state mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_schedule(&self) -> MutexGuard<'_, Option<ScheduleHandle>> {
        self.inner
            .schedule
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.lock_schedule().is_some()
    }

    /// Starts refreshing: one fetch right away, then one per refresh interval.
    ///
    /// Calling it again while running, or after `dispose()`, does nothing.
    pub fn init(&self) {
        if self.is_disposed() {
            warn!("init() called on a disposed converter, ignoring");
            return;
        }

        let mut schedule = self.lock_schedule();
        if schedule.is_some() {
            debug!("Converter already running");
            return;
        }

        let period = self.inner.config.refresh_interval();
        info!("Starting rate refresh every {:?}", period);
        *schedule = Some(self.inner.scheduler.schedule(period, self.refresh_task()));
    }

    /// The scheduled task holds only a weak reference, so the schedule
    /// doesn't keep the converter alive.
    fn refresh_task(&self) -> RefreshTask {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        Arc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    RateConverter { inner }.fetch_rate().await;
                }
            }
            .boxed()
        })
    }

    /// Stops refreshing and detaches from any in-flight fetch. Idempotent.
    pub fn dispose(&self) {
        {
            let _state = self.lock_state();
            if self.inner.disposed.swap(true, Ordering::SeqCst) {
                return;
            }
        }
        let handle = self.lock_schedule().take();
        if let Some(handle) = handle {
            handle.cancel();
        }
        info!("Converter disposed");
    }

    /// Current state, for rendering.
    pub fn snapshot(&self) -> ConversionState {
        self.lock_state().clone()
    }

    /// Sets the amount from raw user input. Non-digits are dropped and
    /// anything unparseable counts as zero.
    pub fn set_amount(&self, raw: &str) {
        let amount = sanitize_amount(raw);
        self.lock_state().set_amount(amount);
    }

    /// Sets the amount from one of the quick-amount buttons.
    pub fn set_amount_from_preset(&self, value: u32) {
        self.lock_state().set_amount(Decimal::from(value));
    }

    /// Flips the direction, carrying the net result over as the new amount.
    pub fn toggle_direction(&self) {
        let mut state = self.lock_state();
        state.toggle_direction();
        debug!("Direction is now {}, amount {}", state.direction, state.amount);
    }

    /// Fetches the live rate and applies it, or the fallback on failure.
    ///
    /// Never fails: the outcome is recorded in `rate_status`,
    /// `last_updated` and `last_error`.
    pub async fn fetch_rate(&self) {
        if self.is_disposed() {
            debug!("Skipping rate fetch on disposed converter");
            return;
        }

        let config = &self.inner.config;
        self.lock_state().begin_fetch();
        debug!(
            "Fetching {}/{} from {}",
            config.base_currency,
            config.quote_currency,
            self.inner.provider.id()
        );

        let result = self
            .inner
            .provider
            .latest_rate(&config.base_currency, &config.quote_currency)
            .await;

        let now = self.inner.clock.now();
        // `dispose()` flips the flag under this lock, so no result lands after it.
        let mut state = self.lock_state();
        if self.is_disposed() {
            debug!("Converter disposed while fetching, dropping result");
            return;
        }
        state.apply_rate_result(result, config.fallback_rate, now);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let schedule = self
            .schedule
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = schedule.take() {
            handle.cancel();
        }
    }
}

impl std::fmt::Debug for RateConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateConverter")
            .field("provider", &self.inner.provider.id())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
