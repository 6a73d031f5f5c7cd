//! Fixed-spacing pacer for oracle guesses.
//!
//! The oracle throttles clients that guess too quickly. Every submission
//! waits until at least `min_interval` has passed since the previous one,
//! whether or not that previous submission succeeded.

use tokio::time::{sleep_until, Duration, Instant};

/// Pacing status, logged after each scored guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacerStatus {
    pub min_interval_ms: u64,
    pub submissions: u64,
    pub next_available_in_ms: Option<u64>,
}

/// Enforces a minimum delay between successive submissions.
#[derive(Debug)]
pub struct GuessPacer {
    min_interval: Duration,
    last_submission: Option<Instant>,
    submissions: u64,
}

impl GuessPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_submission: None,
            submissions: 0,
        }
    }

    /// Wait for the next slot and claim it.
    ///
    /// The first call returns immediately.
    pub async fn wait_turn(&mut self) {
        if let Some(last) = self.last_submission {
            sleep_until(last + self.min_interval).await;
        }
        self.last_submission = Some(Instant::now());
        self.submissions += 1;
    }

    pub fn status(&self) -> PacerStatus {
        let next_available_in_ms = self.last_submission.and_then(|last| {
            let ready = last + self.min_interval;
            let now = Instant::now();
            (ready > now).then(|| (ready - now).as_millis() as u64)
        });
        PacerStatus {
            min_interval_ms: self.min_interval.as_millis() as u64,
            submissions: self.submissions,
            next_available_in_ms,
        }
    }
}
