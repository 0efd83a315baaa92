//! Builder for [`LockoutTracker`] instances.
//!
//! Unlike [`LockoutTracker::new`], the builder validates the configuration
//! before handing out a tracker.
//!
//! # Example
//!
//! ```rust
//! use chrono::Duration;
//! use lockout_core::LockoutTrackerBuilder;
//!
//! # fn main() -> Result<(), lockout_core::Error> {
//! let tracker = LockoutTrackerBuilder::new()
//!     .with_max_attempts(3)
//!     .with_lock_duration(Duration::minutes(30))
//!     .build()?;
//!
//! assert_eq!(tracker.remaining_attempts("user@bank.com"), 3);
//! # Ok(())
//! # }
//! ```

use chrono::Duration;

use crate::{
    Error, LockoutConfig, LockoutTracker,
    clock::{Clock, SystemClock},
};

/// A builder for constructing [`LockoutTracker`] instances.
///
/// # Defaults
///
/// - Protection: enabled
/// - Max attempts: 5
/// - Lock duration: 15 minutes
/// - Attempt window: 60 minutes
/// - Sweep interval: 5 minutes
/// - Clock: [`SystemClock`]
pub struct LockoutTrackerBuilder<C: Clock = SystemClock> {
    config: LockoutConfig,
    clock: C,
}

impl Default for LockoutTrackerBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl LockoutTrackerBuilder<SystemClock> {
    pub fn new() -> Self {
        Self {
            config: LockoutConfig::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> LockoutTrackerBuilder<C> {
    /// Replace the whole configuration.
    pub fn with_config(mut self, config: LockoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = max_attempts;
        self
    }

    pub fn with_lock_duration(mut self, lock_duration: Duration) -> Self {
        self.config.lock_duration = lock_duration;
        self
    }

    pub fn with_attempt_window(mut self, attempt_window: Duration) -> Self {
        self.config.attempt_window = attempt_window;
        self
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.config.sweep_interval = sweep_interval;
        self
    }

    /// Turn protection on or off.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Use a different time source, typically a [`ManualClock`](crate::ManualClock) in tests.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> LockoutTrackerBuilder<C2> {
        LockoutTrackerBuilder {
            config: self.config,
            clock,
        }
    }

    /// Validate the configuration and build the tracker.
    pub fn build(self) -> Result<LockoutTracker<C>, Error> {
        self.config.validate()?;

        tracing::debug!(
            enabled = self.config.enabled,
            max_attempts = self.config.max_attempts,
            lock_duration_secs = self.config.lock_duration.num_seconds(),
            attempt_window_secs = self.config.attempt_window.num_seconds(),
            sweep_interval_secs = self.config.sweep_interval.num_seconds(),
            "Building lockout tracker"
        );

        Ok(LockoutTracker::with_clock(self.config, self.clock))
    }
}
