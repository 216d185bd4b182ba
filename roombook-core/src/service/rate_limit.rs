use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::{Error, Result};

/// Rate limiting error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Rate limit exceeded. Try again in {retry_after_seconds}s")]
    RateLimitExceeded { retry_after_seconds: u64 },
}

impl From<RateLimitError> for Error {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::RateLimitExceeded { retry_after_seconds } => {
                Self::InvalidInput(format!("Rate limit exceeded. Try again in {retry_after_seconds}s"))
            }
        }
    }
}

/// Per-client request limiter backed by the `governor` crate (GCRA algorithm).
///
/// Each key (normally the client address) gets its own bucket of
/// `per_minute` requests. Limits are per process.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Option<Arc<DefaultKeyedRateLimiter<String>>>,
    per_minute: u32,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("enabled", &self.is_enabled())
            .field("per_minute", &self.per_minute)
            .finish()
    }
}

impl RateLimiter {
    pub fn from_config(config: &RateLimitConfig) -> Result<Self> {
        if !config.enabled {
            debug!("Rate limiting disabled");
            return Ok(Self::disabled());
        }

        let per_minute = NonZeroU32::new(config.per_minute)
            .ok_or_else(|| Error::InvalidInput("rate_limit.per_minute must be greater than 0".to_string()))?;

        Ok(Self {
            limiter: Some(Arc::new(GovernorRateLimiter::keyed(Quota::per_minute(per_minute)))),
            per_minute: per_minute.get(),
        })
    }

    /// Limiter that lets every request through
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            limiter: None,
            per_minute: 0,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Configured requests per minute, 0 when disabled
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.per_minute
    }

    /// Count one request against `key`
    pub fn check(&self, key: &str) -> std::result::Result<(), RateLimitError> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        limiter.check_key(&key.to_string()).map_err(|not_until| {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            RateLimitError::RateLimitExceeded {
                retry_after_seconds: wait.as_secs().max(1),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(per_minute: u32) -> RateLimiter {
        RateLimiter::from_config(&RateLimitConfig {
            enabled: true,
            per_minute,
        })
        .unwrap()
    }

    #[test]
    fn test_limit_exceeded_after_burst() {
        let limiter = limiter(3);

        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1").is_ok());
        }
        let err = limiter.check("10.0.0.1").unwrap_err();
        let RateLimitError::RateLimitExceeded { retry_after_seconds } = err;
        assert!(retry_after_seconds >= 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_disabled_never_limits() {
        let limiter = RateLimiter::from_config(&RateLimitConfig {
            enabled: false,
            per_minute: 0,
        })
        .unwrap();

        assert!(!limiter.is_enabled());
        for _ in 0..1000 {
            assert!(limiter.check("10.0.0.1").is_ok());
        }
    }

    #[test]
    fn test_zero_quota_rejected() {
        let result = RateLimiter::from_config(&RateLimitConfig {
            enabled: true,
            per_minute: 0,
        });
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = RateLimitError::RateLimitExceeded { retry_after_seconds: 5 }.into();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("5s")));
    }
}
