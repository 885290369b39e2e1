use std::time::{Duration, Instant};
use tracing::info;

/// Run timer passed through each phase by value.
///
/// `lap` logs the time since the previous checkpoint and returns a stopwatch
/// whose checkpoint is now.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started: Instant,
    checkpoint: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            checkpoint: now,
        }
    }

    #[must_use]
    pub fn lap(self, phase: &str) -> Self {
        let now = Instant::now();
        let lap = now.duration_since(self.checkpoint);
        let total = now.duration_since(self.started);
        info!(
            phase,
            lap_ms = lap.as_millis() as u64,
            total_ms = total.as_millis() as u64,
            "phase complete"
        );
        Self {
            started: self.started,
            checkpoint: now,
        }
    }

    pub fn total(&self) -> Duration {
        self.started.elapsed()
    }
}
