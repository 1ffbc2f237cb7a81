//! Retry timing for the ticket request.
//!
//! Delays grow exponentially from `base_delay` (300 ms, 600 ms, 1.2 s, ...)
//! and each one is jittered by ±50% so many clients restarting together
//! don't hammer the endpoint in lockstep.

use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::TicketError;

/// How many times to retry a transient failure and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Center of the first retry's delay.
    pub base_delay: Duration,

    /// Retries after the first attempt. `3` means up to 4 requests total.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(300),
            max_retries: 3,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_retries: 0,
        }
    }

    /// The un-jittered delay before retry number `retry` (1-based).
    pub fn nominal_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }

    /// The delay before retry number `retry`, jittered into
    /// `[nominal / 2, nominal * 3 / 2)`.
    pub fn delay(&self, retry: u32) -> Duration {
        let nominal = self.nominal_delay(retry);
        if nominal.is_zero() {
            return nominal;
        }
        let factor = rand::rng().random_range(0.5..1.5);
        nominal.mul_f64(factor)
    }
}

/// Sleeps for `delay`, returning early with [`TicketError::Cancelled`] if
/// `token` fires first.
pub(crate) async fn sleep_or_cancel(
    delay: Duration,
    token: &CancellationToken,
) -> Result<(), TicketError> {
    tokio::select! {
        biased;
        () = token.cancelled() => Err(TicketError::Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.nominal_delay(1), Duration::from_millis(300));
        assert_eq!(policy.nominal_delay(2), Duration::from_millis(600));
        assert_eq!(policy.nominal_delay(3), Duration::from_millis(1200));
    }

    #[test]
    fn test_delay_stays_within_jitter_bounds() {
        let policy = RetryPolicy::default();
        for retry in 1..=3 {
            let nominal = policy.nominal_delay(retry);
            for _ in 0..50 {
                let d = policy.delay(retry);
                assert!(d >= nominal / 2, "{d:?} too short for retry {retry}");
                assert!(d < nominal * 3 / 2, "{d:?} too long for retry {retry}");
            }
        }
    }

    #[test]
    fn test_delay_huge_retry_does_not_overflow() {
        let policy = RetryPolicy::default();
        let _ = policy.delay(u32::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_or_cancel_completes_without_cancel() {
        let token = CancellationToken::new();
        let result = sleep_or_cancel(Duration::from_secs(5), &token).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_or_cancel_returns_cancelled_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let start = tokio::time::Instant::now();

        let result = sleep_or_cancel(Duration::from_secs(60), &token).await;

        assert!(matches!(result, Err(TicketError::Cancelled)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
