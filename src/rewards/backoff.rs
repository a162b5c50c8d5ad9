use std::time::Duration;

use crate::error::{Result, RewardsError};

/// Consecutive rate-limit counter for one collection run.
///
/// Each rate-limited attempt doubles the wait: 2s, 4s, 8s, ... The counter
/// goes back to zero whenever a page is fetched successfully.
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt: u32,
    max_retries: u32,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self { attempt: 0, max_retries }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Register one more rate-limited attempt and return how long to wait
    /// before retrying, or `RetryLimitExceeded` once the cap is passed.
    pub fn next_backoff(&mut self) -> Result<Duration> {
        if self.attempt >= self.max_retries {
            return Err(RewardsError::RetryLimitExceeded { attempts: self.attempt });
        }
        self.attempt += 1;
        Ok(Self::delay_for(self.attempt))
    }

    /// Wait time for the given attempt number, saturating instead of overflowing
    pub fn delay_for(attempt: u32) -> Duration {
        Duration::from_secs(2u64.saturating_pow(attempt))
    }
}
