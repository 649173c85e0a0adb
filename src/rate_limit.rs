//! Lookup pacing
//!
//! The affiliation service rate-limits callers without saying so. The limiter
//! caps how many lookups are in flight and spaces the start of consecutive
//! lookups by a minimum interval, across every task sharing it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep_until, Instant};

use crate::config::RorSettings;

pub struct RateLimiter {
    permits: Arc<Semaphore>,
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

/// Held for the duration of one lookup; dropping it frees a concurrency slot
pub struct RatePermit {
    _permit: OwnedSemaphorePermit,
}

impl RateLimiter {
    pub fn new(interval: Duration, max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn from_settings(settings: &RorSettings) -> Self {
        Self::new(settings.request_interval, settings.max_concurrent)
    }

    /// No spacing and effectively no concurrency cap
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO, Semaphore::MAX_PERMITS)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for a concurrency slot, then for the next free start time.
    pub async fn acquire(&self) -> Result<RatePermit> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .context("Failed to acquire rate limit permit")?;

        if !self.interval.is_zero() {
            // Held across the sleep so waiters queue up in arrival order
            let mut next_slot = self.next_slot.lock().await;
            if let Some(at) = *next_slot {
                if at > Instant::now() {
                    sleep_until(at).await;
                }
            }
            *next_slot = Some(Instant::now() + self.interval);
        }

        Ok(RatePermit { _permit: permit })
    }
}
