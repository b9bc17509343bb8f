use std::time::Duration;

/// Delay before the second attempt; each later delay doubles.
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// Outcome of [`RetryPolicy::decide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the given delay, then issue the next attempt.
    RetryAfter(Duration),
    /// All attempts failed; surface the last failure.
    Exhausted,
}

/// Exponential backoff with a ceiling and a bounded attempt count.
///
/// The policy is a pure function of the attempt number. Callers track how
/// many attempts have failed and perform the wait themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    ceiling: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, ceiling: Duration) -> Self {
        Self {
            max_attempts,
            ceiling,
        }
    }

    /// Total attempts allowed, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Upper bound for any single delay.
    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// Decides what to do after `attempt` (1-based) has failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        let attempt = attempt.max(1);
        let decision = if attempt >= self.max_attempts {
            RetryDecision::Exhausted
        } else {
            RetryDecision::RetryAfter(self.backoff(attempt))
        };

        #[cfg(feature = "tracing")]
        self.trace_decision(attempt, decision);

        decision
    }

    /// Delay before attempt `attempt + 1`, or `None` once retries are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match self.decide(attempt) {
            RetryDecision::RetryAfter(delay) => Some(delay),
            RetryDecision::Exhausted => None,
        }
    }

    /// Every delay the policy will produce, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..self.max_attempts).map(move |attempt| self.backoff(attempt))
    }

    #[cfg(feature = "tracing")]
    fn trace_decision(&self, attempt: u32, decision: RetryDecision) {
        match decision {
            RetryDecision::RetryAfter(delay) => tracing::debug!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                "retrying elasticsearch request"
            ),
            RetryDecision::Exhausted => tracing::debug!(
                attempt,
                max_attempts = self.max_attempts,
                "elasticsearch request retries exhausted"
            ),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        1u32.checked_shl(exponent)
            .and_then(|factor| BASE_DELAY.checked_mul(factor))
            .map_or(self.ceiling, |delay| delay.min(self.ceiling))
    }
}
