//! Timestamp sources for `createdAt` / `updatedAt` stamping.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of Unix epoch millisecond timestamps.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Wall clock that never hands out the same millisecond twice.
///
/// Two stamps taken by one `SystemClock` are strictly increasing, so an
/// update issued in the same millisecond as its create still yields
/// `updatedAt > createdAt`.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_ms: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX));
        let mut last = self.last_ms.load(Ordering::Relaxed);
        loop {
            let next = wall.max(last + 1);
            match self
                .last_ms
                .compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(observed) => last = observed,
            }
        }
    }
}

/// Deterministic clock: returns `start`, then advances by `step` per call.
#[derive(Debug)]
pub struct StepClock {
    next_ms: AtomicI64,
    step_ms: i64,
}

impl StepClock {
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self {
            next_ms: AtomicI64::new(start_ms),
            step_ms,
        }
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> i64 {
        self.next_ms.fetch_add(self.step_ms, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, StepClock, SystemClock};

    #[test]
    fn system_clock_is_strictly_increasing() {
        let clock = SystemClock::new();
        let stamps: Vec<i64> = (0..1000).map(|_| clock.now_ms()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn step_clock_advances_by_step() {
        let clock = StepClock::new(100, 5);
        assert_eq!(clock.now_ms(), 100);
        assert_eq!(clock.now_ms(), 105);
    }
}
