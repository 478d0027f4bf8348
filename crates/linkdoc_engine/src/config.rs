//! Engine configuration.

use std::time::Duration;

/// Configuration for a [`crate::ConsistencyEngine`].
///
/// Controls how optimistic commits are retried and whether redundant
/// overwrites are committed at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Retries after the first conflicting attempt (0 = fail on first conflict).
    pub max_commit_retries: usize,

    /// Delay before the first retry. Doubles on each further retry.
    pub retry_backoff: Duration,

    /// Upper bound on the delay between retries.
    pub max_retry_backoff: Duration,

    /// Skip the commit when an overwrite would store the same document and
    /// the same link set.
    pub skip_unchanged_overwrites: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_commit_retries: 16,
            retry_backoff: Duration::from_micros(50),
            max_retry_backoff: Duration::from_millis(5),
            skip_unchanged_overwrites: true,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that never retries a conflicting commit.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_commit_retries: 0,
            ..Self::default()
        }
    }

    /// Creates a configuration for many writers touching the same entities.
    #[must_use]
    pub fn high_contention() -> Self {
        Self {
            max_commit_retries: 128,
            retry_backoff: Duration::from_micros(100),
            max_retry_backoff: Duration::from_millis(20),
            skip_unchanged_overwrites: true,
        }
    }

    /// Builder method to set the retry bound.
    #[must_use]
    pub fn with_max_commit_retries(mut self, retries: usize) -> Self {
        self.max_commit_retries = retries;
        self
    }

    /// Builder method to set the initial backoff.
    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Builder method to set the backoff cap.
    #[must_use]
    pub fn with_max_retry_backoff(mut self, backoff: Duration) -> Self {
        self.max_retry_backoff = backoff;
        self
    }

    /// Builder method to toggle skipping of unchanged overwrites.
    #[must_use]
    pub fn with_skip_unchanged_overwrites(mut self, skip: bool) -> Self {
        self.skip_unchanged_overwrites = skip;
        self
    }

    /// Total number of commit attempts a call may make.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_commit_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (0-based), exponential and capped.
    #[must_use]
    pub fn backoff_for(&self, retry: usize) -> Duration {
        let shift = u32::try_from(retry.min(31)).unwrap_or(31);
        self.retry_backoff
            .saturating_mul(1u32 << shift)
            .min(self.max_retry_backoff)
    }
}
