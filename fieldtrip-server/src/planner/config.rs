//! Group planning configuration.

use std::time::Duration;

use crate::domain::ModeCapacities;

/// Retry behaviour for transient planning failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per planning call, including the first.
    /// Values below 1 are treated as 1.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_backoff: Duration,

    /// Upper bound on the delay between retries.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Never retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based), doubling each time.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Configuration for splitting a group across itineraries.
#[derive(Debug, Clone)]
pub struct GroupPlanConfig {
    /// Maximum planning calls per group plan.
    pub max_iterations: usize,

    /// Passengers per vehicle for each transit mode.
    pub capacities: ModeCapacities,

    /// Retry policy for each planning call.
    pub retry: RetryPolicy,
}

impl GroupPlanConfig {
    /// Create a configuration with the given parameters.
    pub fn new(max_iterations: usize, capacities: ModeCapacities, retry: RetryPolicy) -> Self {
        Self {
            max_iterations,
            capacities,
            retry,
        }
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_capacities(mut self, capacities: ModeCapacities) -> Self {
        self.capacities = capacities;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for GroupPlanConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            capacities: ModeCapacities::default(),
            retry: RetryPolicy::default(),
        }
    }
}
