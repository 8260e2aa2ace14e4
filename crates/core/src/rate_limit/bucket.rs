//! Lock-free token bucket.
//!
//! Stored as a theoretical arrival time (GCRA) in a single atomic, which
//! behaves exactly like a bucket of `burst` tokens refilled at a fixed rate
//! while needing only integer arithmetic and one compare-and-swap per request.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Instant;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Token bucket safe for concurrent use without a lock.
#[derive(Debug)]
pub struct TokenBucket {
    origin: Instant,
    /// Nanoseconds after `origin` at which the bucket is full again.
    tat: AtomicU64,
    /// Nanoseconds needed to restore one token.
    interval: u64,
    /// How far `tat` may run ahead of now while a token is still available.
    tolerance: u64,
}

impl TokenBucket {
    /// Creates a full bucket holding `burst` tokens, restoring
    /// `refill_per_second` tokens every second.
    ///
    /// Zero values are treated as one. Rates above one token per
    /// nanosecond are capped at that rate.
    #[must_use]
    pub fn new(burst: u32, refill_per_second: u32) -> Self {
        let interval = (NANOS_PER_SEC / u64::from(refill_per_second.max(1))).max(1);
        let tolerance = interval * u64::from(burst.max(1) - 1);

        Self {
            origin: Instant::now(),
            tat: AtomicU64::new(0),
            interval,
            tolerance,
        }
    }

    /// Takes one token if available.
    pub fn try_acquire(&self) -> bool {
        let now = self.now();
        let mut current = self.tat.load(Ordering::Acquire);

        loop {
            let tat = current.max(now);
            if tat - now > self.tolerance {
                return false;
            }

            match self.tat.compare_exchange_weak(
                current,
                tat + self.interval,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Returns the number of tokens currently available.
    #[must_use]
    pub fn available(&self) -> u32 {
        let now = self.now();
        let backlog = self.tat.load(Ordering::Acquire).max(now) - now;

        if backlog > self.tolerance {
            0
        } else {
            u32::try_from((self.tolerance - backlog) / self.interval + 1).unwrap_or(u32::MAX)
        }
    }

    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
