//! Time source injected into services that read "today" or "now".

use chrono::{Local, NaiveDate, Utc};

/// Source of the current calendar date and wall-clock instant.
pub trait Clock {
    /// Current local calendar date (local midnight semantics).
    fn today(&self) -> NaiveDate;
    /// Current instant as Unix epoch milliseconds.
    fn now_epoch_ms(&self) -> i64;
}

/// Reads the host clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to a fixed date and instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now_epoch_ms: i64,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now_epoch_ms: i64) -> Self {
        Self {
            today,
            now_epoch_ms,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_epoch_ms(&self) -> i64 {
        self.now_epoch_ms
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_epoch_ms(&self) -> i64 {
        (**self).now_epoch_ms()
    }
}
