//! Bounded exponential backoff schedule

use std::time::{Duration, Instant};

/// Backoff parameters for polling a remote until a condition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Total time budget across all delays
    pub timeout: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    /// Default schedule with a custom overall timeout
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Delays to sleep between attempts
    ///
    /// Each delay doubles, capped at `max_delay`; the last delay is
    /// shortened so the sum never exceeds `timeout`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let max_delay = self.max_delay;
        let mut remaining = self.timeout;
        let mut next = self.initial_delay.min(max_delay);

        std::iter::from_fn(move || {
            if remaining.is_zero() || next.is_zero() {
                return None;
            }
            let delay = next.min(remaining);
            remaining -= delay;
            next = next.saturating_mul(2).min(max_delay);
            Some(delay)
        })
    }
}

/// Poll `check` until it yields a value, sleeping between attempts
///
/// `check` runs once immediately and once after every delay of the
/// schedule. Time spent inside `check` counts against `timeout`: each
/// sleep is cut to what is left before the deadline, and polling stops
/// once the deadline has passed. Returns `Ok(None)` when the schedule is
/// exhausted.
///
/// # Errors
/// Propagates the first error returned by `check`
pub fn poll<T, F, S>(backoff: &Backoff, mut check: F, mut sleep: S) -> anyhow::Result<Option<T>>
where
    F: FnMut(usize) -> anyhow::Result<Option<T>>,
    S: FnMut(Duration),
{
    // Unrepresentable deadlines (huge timeouts) leave only the schedule as the bound
    let deadline = Instant::now().checked_add(backoff.timeout);
    let mut attempt = 1;
    if let Some(value) = check(attempt)? {
        return Ok(Some(value));
    }

    for delay in backoff.delays() {
        let remaining =
            deadline.map_or(delay, |deadline| deadline.saturating_duration_since(Instant::now()));
        if remaining.is_zero() {
            break;
        }
        sleep(delay.min(remaining));
        attempt += 1;
        if let Some(value) = check(attempt)? {
            return Ok(Some(value));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_delays_double_until_cap() {
        let backoff = Backoff {
            initial_delay: ms(100),
            max_delay: ms(400),
            timeout: ms(10_000),
        };
        let delays: Vec<_> = backoff.delays().take(5).collect();
        assert_eq!(delays, vec![ms(100), ms(200), ms(400), ms(400), ms(400)]);
    }

    #[test]
    fn test_delays_never_exceed_timeout() {
        let backoff = Backoff {
            initial_delay: ms(100),
            max_delay: ms(1000),
            timeout: ms(650),
        };
        let delays: Vec<_> = backoff.delays().collect();
        assert_eq!(delays, vec![ms(100), ms(200), ms(350)]);
        assert_eq!(delays.iter().sum::<Duration>(), ms(650));
    }

    #[test]
    fn test_default_schedule_fits_timeout() {
        let backoff = Backoff::default();
        let total: Duration = backoff.delays().sum();
        assert_eq!(total, backoff.timeout);
    }

    #[test]
    fn test_zero_timeout_has_no_delays() {
        let backoff = Backoff::with_timeout(Duration::ZERO);
        assert_eq!(backoff.delays().count(), 0);
    }

    #[test]
    fn test_poll_returns_immediately_on_first_success() {
        let mut slept = Vec::new();
        let result = poll(&Backoff::default(), |_| Ok(Some(1)), |d| slept.push(d)).unwrap();
        assert_eq!(result, Some(1));
        assert!(slept.is_empty());
    }

    #[test]
    fn test_poll_retries_until_success() {
        let mut slept = Vec::new();
        let result = poll(
            &Backoff::default(),
            |attempt| Ok((attempt == 3).then_some(attempt)),
            |d| slept.push(d),
        )
        .unwrap();
        assert_eq!(result, Some(3));
        assert_eq!(slept, vec![ms(500), ms(1000)]);
    }

    #[test]
    fn test_poll_gives_up_after_timeout() {
        let backoff = Backoff {
            initial_delay: ms(1000),
            max_delay: ms(1000),
            timeout: ms(3000),
        };
        let mut attempts = 0;
        let result: Option<()> = poll(
            &backoff,
            |_| {
                attempts += 1;
                Ok(None)
            },
            |_| {},
        )
        .unwrap();
        assert_eq!(result, None);
        assert_eq!(attempts, 4);
    }

    #[test]
    fn test_poll_propagates_errors() {
        let result: anyhow::Result<Option<()>> =
            poll(&Backoff::default(), |_| anyhow::bail!("boom"), |_| {});
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn test_poll_counts_slow_checks_against_timeout() {
        let backoff = Backoff {
            initial_delay: ms(10),
            max_delay: ms(10),
            timeout: ms(50),
        };
        let start = Instant::now();
        let mut attempts = 0;
        let result: Option<()> = poll(
            &backoff,
            |_| {
                attempts += 1;
                std::thread::sleep(ms(40));
                Ok(None)
            },
            std::thread::sleep,
        )
        .unwrap();

        assert_eq!(result, None);
        // 40ms check, at most a 10ms sleep, one more check, then the deadline is gone
        assert!(attempts <= 2, "attempts: {attempts}");
        assert!(start.elapsed() < ms(500), "elapsed: {:?}", start.elapsed());
    }
}
