// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy for failed journal calls

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long to wait between consecutive failures, and when to give up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Delay after the first failure
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    /// Growth factor per consecutive failure (1 = fixed delay)
    pub multiplier: u32,
    /// Stop retrying after this many consecutive failures; unset retries forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_consecutive_failures: Option<u32>,
}

impl RetryPolicy {
    /// Same delay every time, forever
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1,
            max_consecutive_failures: None,
        }
    }

    /// Doubling delay capped at `max`, forever
    pub fn exponential(initial: Duration, max: Duration) -> Self {
        Self {
            initial_delay: initial,
            max_delay: max,
            multiplier: 2,
            max_consecutive_failures: None,
        }
    }

    pub fn with_max_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = Some(max);
        self
    }

    /// Delay after the `failures`-th consecutive failure (1-based)
    pub fn delay_for(&self, failures: u32) -> Duration {
        let mut delay = self.initial_delay;
        for _ in 1..failures {
            if delay.is_zero() || delay >= self.max_delay {
                break;
            }
            delay = delay.saturating_mul(self.multiplier.max(1));
        }
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_millis(500))
    }
}

/// What to do after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Wait, then try again
    Retry { delay: Duration },
    /// Consecutive failures exceeded the policy
    GiveUp { failures: u32 },
}

/// Consecutive-failure counter for one kind of call
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: RetryPolicy,
    failures: u32,
}

impl Backoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    /// Record a failure and decide the next step
    pub fn record_failure(&mut self) -> RetryAction {
        self.failures = self.failures.saturating_add(1);
        if let Some(max) = self.policy.max_consecutive_failures {
            if self.failures > max {
                return RetryAction::GiveUp {
                    failures: self.failures,
                };
            }
        }
        RetryAction::Retry {
            delay: self.policy.delay_for(self.failures),
        }
    }

    /// A call succeeded; the next failure starts from the initial delay
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
