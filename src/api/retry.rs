use std::time::Duration;

/// Default number of extra attempts against a single endpoint.
pub const DEFAULT_RETRY_COUNT: u32 = 2;

/// Default base delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Retry settings for a single endpoint.
///
/// Backoff is linear: the wait after failed attempt `n` is `retry_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(retry_count: u32, retry_delay: Duration) -> Self {
        Self {
            retry_count,
            retry_delay,
        }
    }

    /// A policy that tries exactly once.
    pub const fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub const fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    /// Wait before the attempt following failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_linear() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500));
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(1500));
    }

    #[test]
    fn test_max_attempts() {
        assert_eq!(RetryPolicy::default().max_attempts(), 3);
        assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
        assert_eq!(
            RetryPolicy::new(u32::MAX, Duration::ZERO).max_attempts(),
            u32::MAX
        );
    }
}
