use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use shared::BackendError;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryStrategy {
    max_retries: u32,
    initial_interval: Duration,
    max_interval: Duration,
}

impl RetryStrategy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
        }
    }

    pub fn with_intervals(mut self, initial_interval: Duration, max_interval: Duration) -> Self {
        self.initial_interval = initial_interval;
        self.max_interval = max_interval;
        self
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    pub fn create_backoff(&self) -> ExponentialBackoff {
        // Attempts are bounded by max_retries, not by elapsed time.
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(2.0)
            .with_max_elapsed_time(None)
            .build()
    }

    pub fn should_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }

    pub fn is_retryable_error(&self, error: &BackendError) -> bool {
        error.is_transient()
    }
}
