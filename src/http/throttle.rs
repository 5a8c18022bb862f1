//! Single-slot request throttle
//!
//! At most one request holds the slot at a time. The slot is released
//! `delay` after the holder finishes, by a timer task, so the finishing
//! request never waits for its own cooldown.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

/// Shared gate spacing outbound requests by a fixed cooldown
#[derive(Clone)]
pub struct Throttle {
    delay: Duration,
    gate: Arc<Semaphore>,
}

impl Throttle {
    /// Create a throttle with the given cooldown
    ///
    /// A zero delay disables the gate entirely.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            gate: Arc::new(Semaphore::new(1)),
        }
    }

    /// Create a throttle that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The configured cooldown
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Check if the gate is active
    pub fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }

    /// Check if the slot is free right now
    pub fn is_idle(&self) -> bool {
        self.gate.available_permits() > 0
    }

    /// Wait for the slot
    ///
    /// The returned permit schedules the release when dropped.
    pub async fn acquire(&self) -> ThrottlePermit {
        if !self.is_enabled() {
            return ThrottlePermit {
                permit: None,
                delay: Duration::ZERO,
            };
        }

        // The semaphore is never closed, so acquisition cannot fail
        let permit = self.gate.clone().acquire_owned().await.ok();
        trace!("Throttle slot acquired");

        ThrottlePermit {
            permit,
            delay: self.delay,
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("delay", &self.delay)
            .field("idle", &self.is_idle())
            .finish()
    }
}

/// Holds the throttle slot for one request
#[derive(Debug)]
pub struct ThrottlePermit {
    permit: Option<OwnedSemaphorePermit>,
    delay: Duration,
}

impl Drop for ThrottlePermit {
    fn drop(&mut self) {
        let Some(permit) = self.permit.take() else {
            return;
        };
        let delay = self.delay;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                trace!("Throttle slot held for {:?}", delay);
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    drop(permit);
                });
            }
            // No runtime to run the timer on; release immediately
            Err(_) => drop(permit),
        }
    }
}

#[cfg(test)]
mod throttle_tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_disabled_throttle_never_waits() {
        let throttle = Throttle::disabled();
        let start = Instant::now();
        for _ in 0..5 {
            let _permit = throttle.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(!throttle.is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_acquire_waits_for_cooldown() {
        let throttle = Throttle::new(Duration::from_secs(2));

        let first = throttle.acquire().await;
        assert!(!throttle.is_idle());
        drop(first);

        let start = Instant::now();
        let _second = throttle.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_counts_from_release() {
        let throttle = Throttle::new(Duration::from_secs(1));
        let start = Instant::now();

        let first = throttle.acquire().await;
        // Simulate a slow request holding the slot
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(first);

        let _second = throttle.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_released_after_cooldown() {
        let throttle = Throttle::new(Duration::from_millis(500));
        drop(throttle.acquire().await);
        assert!(!throttle.is_idle());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(throttle.is_idle());
    }
}
