//! Lockout configuration.

use chrono::{Duration, Utc};

use crate::error::ConfigError;

/// Configuration for the lockout tracker.
///
/// The values are fixed once the tracker is built.
///
/// # Example
///
/// ```rust
/// use chrono::Duration;
/// use lockout_core::LockoutConfig;
///
/// let config = LockoutConfig {
///     max_attempts: 3,
///     lock_duration: Duration::minutes(30),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutConfig {
    /// When false the tracker never records failures and never reports a lock.
    pub enabled: bool,
    /// Failures within one attempt window before the identity is locked.
    pub max_attempts: u32,
    /// How long a lock lasts once triggered. Not extended by further failures.
    pub lock_duration: Duration,
    /// How long a run of failures stays contiguous. A failure arriving later
    /// than this after the previous one starts a fresh count.
    pub attempt_window: Duration,
    /// How often the background sweep reclaims fully expired records.
    pub sweep_interval: Duration,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 5,
            lock_duration: Duration::minutes(15),
            attempt_window: Duration::minutes(60),
            sweep_interval: Duration::minutes(5),
        }
    }
}

impl LockoutConfig {
    /// A configuration that turns protection off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Check that the thresholds and durations are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }

        for (name, value) in [
            ("lock_duration", self.lock_duration),
            ("attempt_window", self.attempt_window),
            ("sweep_interval", self.sweep_interval),
        ] {
            if value <= Duration::zero() {
                return Err(ConfigError::NonPositiveDuration(name));
            }
        }

        // Locks are stamped as now + lock_duration
        Utc::now()
            .checked_add_signed(self.lock_duration)
            .ok_or(ConfigError::DurationOutOfRange("lock_duration"))?;

        self.sweep_interval
            .to_std()
            .map_err(|_| ConfigError::DurationOutOfRange("sweep_interval"))?;

        Ok(())
    }
}
