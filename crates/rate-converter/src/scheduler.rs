//! Periodic refresh scheduling.
//!
//! The converter doesn't own a timer directly. It hands a task to a
//! [`RefreshScheduler`] and keeps the returned [`ScheduleHandle`]; dropping or
//! cancelling the handle stops the schedule.
//!
//! Both implementations run the task once immediately and then once per
//! period:
//! - [`TokioScheduler`]: a `tokio::time::interval` loop on a spawned task.
//! - [`ManualScheduler`]: virtual time driven by [`ManualScheduler::advance`],
//!   for deterministic tests and hosts without a runtime timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::BoxFuture;
use log::{debug, warn};
use tokio::time::MissedTickBehavior;

/// Work run on every tick.
pub type RefreshTask = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

pub trait RefreshScheduler: Send + Sync {
    /// Runs `task` now and then every `period` until the handle is cancelled
    /// or dropped.
    fn schedule(&self, period: Duration, task: RefreshTask) -> ScheduleHandle;
}

/// Owns a running schedule. Cancels it on drop.
pub struct ScheduleHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduleHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for ScheduleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Schedules on the ambient tokio runtime.
///
/// Must be called from within a runtime. Ticks never overlap: a slow task
/// delays the next tick instead of bursting.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

impl RefreshScheduler for TokioScheduler {
    fn schedule(&self, period: Duration, task: RefreshTask) -> ScheduleHandle {
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task().await;
            }
        });
        debug!("Refresh scheduled every {:?}", period);
        ScheduleHandle::new(move || join.abort())
    }
}

struct Entry {
    id: u64,
    period: Duration,
    next_due: Duration,
    task: RefreshTask,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

/// Scheduler driven by explicit time advancement.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Manual scheduler mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.lock().now
    }

    /// Number of live schedules.
    pub fn active(&self) -> usize {
        self.lock().entries.len()
    }

    /// Runs every task that is due right now.
    pub async fn run_due(&self) {
        self.advance(Duration::ZERO).await;
    }

    /// Moves virtual time forward by `by`, running each due task in order of
    /// its due time. Tasks are awaited one at a time with the lock released,
    /// so a task may cancel schedules.
    pub async fn advance(&self, by: Duration) {
        let target = self.lock().now + by;
        loop {
            let next = {
                let mut state = self.lock();
                let due = state
                    .entries
                    .iter_mut()
                    .filter(|e| e.next_due <= target)
                    .min_by_key(|e| (e.next_due, e.id));
                match due {
                    Some(entry) => {
                        let at = entry.next_due;
                        entry.next_due += entry.period;
                        let task = entry.task.clone();
                        state.now = at;
                        Some(task)
                    }
                    None => None,
                }
            };
            match next {
                Some(task) => task().await,
                None => break,
            }
        }
        self.lock().now = target;
    }
}

impl RefreshScheduler for ManualScheduler {
    fn schedule(&self, period: Duration, task: RefreshTask) -> ScheduleHandle {
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            let next_due = state.now;
            state.entries.push(Entry {
                id,
                period,
                next_due,
                task,
            });
            id
        };

        let state = Arc::downgrade(&self.state);
        ScheduleHandle::new(move || {
            if let Some(state) = state.upgrade() {
                let mut guard = state.lock().unwrap_or_else(|p| p.into_inner());
                guard.entries.retain(|e| e.id != id);
            }
        })
    }
}
