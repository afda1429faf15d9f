//! Bounded retry with exponential backoff.

use std::thread;
use std::time::{Duration, Instant};

use super::result::ViesError;

/// Retry policy applied around a single remote `checkVat` call.
///
/// Retries stop when `max_attempts` is reached, when the next sleep would
/// push the total elapsed time past `max_elapsed`, or on the first
/// non-retryable error (see [`ViesError::is_retryable`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total time budget across all attempts and sleeps.
    pub max_elapsed: Duration,
    /// Sleep before the second attempt.
    pub initial_backoff: Duration,
    /// Upper bound for a single sleep.
    pub max_backoff: Duration,
    /// Growth factor applied to the sleep after each failure.
    pub multiplier: f64,
    /// Optional hard cap on the number of attempts.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_elapsed: Duration::from_secs(10),
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(2),
            multiplier: 2.0,
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Default policy: 10 s budget, 250 ms initial backoff doubling up to 2 s.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single attempt, no retries.
    pub fn no_retry() -> Self {
        Self::default().with_max_attempts(1)
    }

    /// Set the total time budget.
    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    /// Set the initial backoff. `Duration::ZERO` retries immediately.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Set the upper bound for a single sleep.
    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    /// Set the backoff growth factor (values below 1.0 are treated as 1.0).
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier.max(1.0);
        self
    }

    /// Cap the number of attempts (at least 1).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    /// Run `op` until it succeeds or the policy gives up.
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// once the budget is exhausted.
    pub fn run<T, F>(&self, mut op: F) -> Result<T, ViesError>
    where
        F: FnMut(u32) -> Result<T, ViesError>,
    {
        let start = Instant::now();
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            let err = match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !err.is_retryable() {
                return Err(err);
            }
            if self.max_attempts.is_some_and(|max| attempt >= max) {
                return Err(err);
            }
            if start.elapsed().saturating_add(backoff) >= self.max_elapsed {
                return Err(err);
            }

            log::debug!("attempt {attempt} failed, retrying in {backoff:?}");
            if !backoff.is_zero() {
                thread::sleep(backoff);
            }
            backoff = Duration::try_from_secs_f64(backoff.as_secs_f64() * self.multiplier)
                .unwrap_or(self.max_backoff)
                .min(self.max_backoff);
            attempt += 1;
        }
    }
}
