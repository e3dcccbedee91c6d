use chrono::{Local, NaiveTime};

/// Source of the local wall-clock time used for the "last updated" label.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// The machine's local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always returns the same time.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}
