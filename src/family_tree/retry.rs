//! # Retry Policy
//!
//! How often, and how patiently, a confirmed commit re-sends a call that
//! failed.
//!
//! ```rust
//! use std::time::Duration;
//! use ensab::family_tree::retry::{BackoffStrategy, RetryPolicy};
//!
//! let policy = RetryPolicy::new(4, BackoffStrategy::Exponential {
//!     base: Duration::from_millis(200),
//!     max: Duration::from_secs(5),
//! });
//! assert_eq!(policy.delay_for(3), Duration::from_millis(400));
//! ```

use std::time::Duration;

/// Delay between attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Retry immediately
    None,
    /// Fixed interval between retries
    Fixed(Duration),
    /// Doubling interval, capped at `max`
    Exponential { base: Duration, max: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, the first one included
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: BackoffStrategy::Exponential {
                base: Duration::from_millis(250),
                max: Duration::from_secs(30),
            },
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: BackoffStrategy) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A single attempt, no retries
    pub fn once() -> Self {
        Self::new(1, BackoffStrategy::None)
    }

    /// Delay to wait before `attempt` (1-based; the first attempt never waits)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        match &self.backoff {
            BackoffStrategy::None => Duration::ZERO,
            BackoffStrategy::Fixed(interval) => *interval,
            BackoffStrategy::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(2));
                base.saturating_mul(factor).min(*max)
            }
        }
    }
}
