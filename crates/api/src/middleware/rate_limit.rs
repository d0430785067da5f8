//! Login throttling.
//!
//! Attempts are limited per username so a password cannot be brute forced through
//! `/admin/user/login`. Limiters live in memory; each instance counts on its own.

use std::num::NonZeroU32;

use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Per-username login limiter. `None` quota means throttling is off.
pub struct LoginThrottle {
    limiter: Option<KeyedLimiter>,
    attempts_per_minute: u32,
}

impl LoginThrottle {
    /// `attempts_per_minute == 0` disables throttling.
    pub fn new(attempts_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(attempts_per_minute)
            .map(|n| RateLimiter::keyed(Quota::per_minute(n)));
        Self {
            limiter,
            attempts_per_minute,
        }
    }

    /// Counts one attempt for `username`. `Err` carries the seconds until the next
    /// attempt is allowed.
    pub fn check(&self, username: &str) -> Result<(), u64> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };
        limiter.check_key(&username.to_lowercase()).map_err(|not_until| {
            let wait = not_until.wait_time_from(governor::clock::Clock::now(
                &DefaultClock::default(),
            ));
            wait.as_secs().max(1)
        })
    }

    /// Drops limiters that are back at full capacity.
    pub fn retain_recent(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// Usernames currently tracked.
    pub fn tracked(&self) -> usize {
        self.limiter.as_ref().map_or(0, |l| l.len())
    }
}

impl std::fmt::Debug for LoginThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginThrottle")
            .field("attempts_per_minute", &self.attempts_per_minute)
            .field("tracked", &self.tracked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_exhaustion_per_username() {
        let throttle = LoginThrottle::new(2);
        assert_ok!(throttle.check("alice"));
        assert_ok!(throttle.check("alice"));

        let retry = assert_err!(throttle.check("alice"));
        assert!(retry >= 1);

        // Other accounts are unaffected.
        assert_ok!(throttle.check("bob"));
    }

    #[test]
    fn test_username_case_is_ignored() {
        let throttle = LoginThrottle::new(1);
        assert_ok!(throttle.check("Admin"));
        assert_err!(throttle.check("admin"));
    }

    #[test]
    fn test_zero_disables() {
        let throttle = LoginThrottle::new(0);
        for _ in 0..100 {
            assert_ok!(throttle.check("alice"));
        }
        assert_eq!(throttle.tracked(), 0);
    }

    #[test]
    fn test_debug_shows_quota() {
        let throttle = LoginThrottle::new(5);
        throttle.check("a").unwrap();
        let debug = format!("{:?}", throttle);
        assert!(debug.contains("attempts_per_minute: 5"));
        assert!(debug.contains("tracked: 1"));
    }
}
