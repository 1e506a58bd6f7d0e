//! Minimum spacing between outbound provider calls.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{self, Instant};
use tracing::debug;

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Shared between every network adapter of one orchestrator. Callers
/// serialize on the lock, so two concurrent calls are always spaced by
/// at least `min_interval`.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the next call is allowed and records it.
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                debug!(delay_ms = delay.as_millis() as u64, "Throttling outbound call");
                time::sleep(delay).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
