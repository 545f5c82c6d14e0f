use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::ledger::TimeSource;
use crate::error::VestingError;

/// Wall clock of the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn unix_timestamp(&self) -> Result<i64, VestingError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| VestingError::ClockUnavailable)?;
        i64::try_from(elapsed.as_secs()).map_err(|_| VestingError::ClockUnavailable)
    }
}

/// Clock that only moves when told to. Shared across threads by reference.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn unix_timestamp(&self) -> Result<i64, VestingError> {
        Ok(self.now.load(Ordering::SeqCst))
    }
}
