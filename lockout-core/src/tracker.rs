//! Per-identity failed login tracking with time-bounded lockout.
//!
//! [`LockoutTracker`] owns every [`AttemptRecord`] in a sharded concurrent map.
//! Request handlers call it synchronously before and after credential
//! verification:
//!
//! ```rust
//! use lockout_core::{LockoutConfig, LockoutTracker};
//!
//! let tracker = LockoutTracker::new(LockoutConfig::default());
//!
//! // Before checking credentials
//! if tracker.check_locked("user@bank.com").is_locked() {
//!     // reject with 429
//! }
//!
//! // After checking credentials
//! let credentials_ok = false;
//! tracker.record_attempt("user@bank.com", credentials_ok);
//! assert_eq!(tracker.remaining_attempts("user@bank.com"), 4);
//! ```
//!
//! # Concurrency
//!
//! Every read-modify-write on a record runs under the map entry's shard lock,
//! so simultaneous failures for one identity are all counted and exactly one of
//! them sets the lock. Lazy expiry uses conditional removal that re-checks the
//! record under the same lock, so a read never discards a concurrent write.
//! The sweep walks one shard at a time and never holds the whole map.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{
    IdentityKey, LockoutConfig,
    clock::{Clock, SystemClock},
};

/// Used by the sweeper when the configured interval is zero or negative.
const FALLBACK_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

/// Failure state tracked for one identity.
///
/// A record exists only while there is at least one failure since the identity
/// was last reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// Failures in the current attempt window
    pub attempts: u32,
    /// When set and in the future, the identity is locked
    pub locked_until: Option<DateTime<Utc>>,
    /// Most recent failure; anchors the attempt window
    pub last_attempt: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// True once more than `window` has passed since the last failure.
    pub fn window_elapsed_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.last_attempt > window
    }

    fn lock_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until <= now)
    }

    /// Neither locked nor inside its attempt window.
    fn is_reclaimable_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        !self.is_locked_at(now) && self.window_elapsed_at(now, window)
    }

    fn register_failure(&mut self, now: DateTime<Utc>, config: &LockoutConfig) -> AttemptOutcome {
        if self.window_elapsed_at(now, config.attempt_window) {
            self.attempts = 0;
            // An active lock outlives the window it was triggered in
            if !self.is_locked_at(now) {
                self.locked_until = None;
            }
        }

        self.attempts = self.attempts.saturating_add(1);
        self.last_attempt = now;

        if let Some(locked_until) = self.locked_until.filter(|until| *until > now) {
            return AttemptOutcome::Locked {
                attempts: self.attempts,
                locked_until,
                newly_locked: false,
            };
        }

        if self.attempts >= config.max_attempts {
            let locked_until = now
                .checked_add_signed(config.lock_duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            self.locked_until = Some(locked_until);
            return AttemptOutcome::Locked {
                attempts: self.attempts,
                locked_until,
                newly_locked: true,
            };
        }

        AttemptOutcome::Failed {
            attempts: self.attempts,
            remaining: config.max_attempts - self.attempts,
        }
    }
}

/// Result of [`LockoutTracker::check_locked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Unlocked,
    Locked {
        locked_until: DateTime<Utc>,
        /// Time until the lock lifts, always positive
        remaining: Duration,
    },
}

impl LockStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockStatus::Locked { .. })
    }

    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        match self {
            LockStatus::Locked { locked_until, .. } => Some(*locked_until),
            LockStatus::Unlocked => None,
        }
    }

    /// Milliseconds until the lock lifts, `0` when unlocked.
    pub fn remaining_ms(&self) -> i64 {
        match self {
            LockStatus::Locked { remaining, .. } => remaining.num_milliseconds(),
            LockStatus::Unlocked => 0,
        }
    }

    /// Whole minutes until the lock lifts, rounded up.
    pub fn remaining_minutes_ceil(&self) -> i64 {
        let ms = self.remaining_ms();
        if ms <= 0 {
            return 0;
        }
        (ms + 59_999) / 60_000
    }

    /// Seconds until the lock lifts, rounded up, for a `Retry-After` header.
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            LockStatus::Locked { .. } => {
                let ms = self.remaining_ms().max(0) as u64;
                Some(ms.div_ceil(1000))
            }
            LockStatus::Unlocked => None,
        }
    }
}

/// What [`LockoutTracker::record_attempt`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Protection disabled or the identity was empty; nothing recorded
    Ignored,
    /// Successful login; `cleared` tells whether a record existed
    Succeeded { cleared: bool },
    /// Failure recorded, identity still below the threshold
    Failed { attempts: u32, remaining: u32 },
    /// Failure recorded and the identity is locked
    Locked {
        attempts: u32,
        locked_until: DateTime<Utc>,
        /// True only for the failure that triggered this lock
        newly_locked: bool,
    },
}

/// In-memory brute force protection for login identities.
///
/// Construct once at startup and share it through an `Arc` with the HTTP
/// layer and the sweeper task.
pub struct LockoutTracker<C: Clock = SystemClock> {
    records: DashMap<IdentityKey, AttemptRecord>,
    config: LockoutConfig,
    clock: C,
}

impl LockoutTracker<SystemClock> {
    /// Create a tracker reading wall-clock time.
    ///
    /// The config is used as given; use [`LockoutTracker::builder`] to validate it.
    pub fn new(config: LockoutConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn builder() -> crate::LockoutTrackerBuilder<SystemClock> {
        crate::LockoutTrackerBuilder::new()
    }
}

impl<C: Clock> LockoutTracker<C> {
    pub fn with_clock(config: LockoutConfig, clock: C) -> Self {
        Self {
            records: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &LockoutConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Report whether `identity` is currently locked.
    ///
    /// A record whose lock has expired is removed as part of the call, so the
    /// identity starts over with a full set of attempts.
    pub fn check_locked(&self, identity: &str) -> LockStatus {
        if !self.config.enabled {
            return LockStatus::Unlocked;
        }
        let Some(key) = IdentityKey::parse(identity) else {
            return LockStatus::Unlocked;
        };

        let now = self.clock.now();
        let locked_until = match self.records.get(&key) {
            Some(record) => record.locked_until,
            None => return LockStatus::Unlocked,
        };

        match locked_until {
            Some(until) if until > now => LockStatus::Locked {
                locked_until: until,
                remaining: until - now,
            },
            Some(_) => {
                if self
                    .records
                    .remove_if(&key, |_, record| record.lock_expired_at(now))
                    .is_some()
                {
                    tracing::debug!(identity = %key, "Lock expired, removed attempt record");
                }
                LockStatus::Unlocked
            }
            None => LockStatus::Unlocked,
        }
    }

    /// Failures left before `identity` is locked.
    ///
    /// A record whose attempt window has elapsed is removed and the full
    /// allowance returned. An active lock is never discarded here.
    pub fn remaining_attempts(&self, identity: &str) -> u32 {
        let max = self.config.max_attempts;
        if !self.config.enabled {
            return max;
        }
        let Some(key) = IdentityKey::parse(identity) else {
            return max;
        };

        let now = self.clock.now();
        let window = self.config.attempt_window;
        let attempts = match self.records.get(&key) {
            Some(record) if record.is_reclaimable_at(now, window) => None,
            Some(record) => Some(record.attempts),
            None => return max,
        };

        match attempts {
            Some(attempts) => max.saturating_sub(attempts),
            None => {
                if self
                    .records
                    .remove_if(&key, |_, record| record.is_reclaimable_at(now, window))
                    .is_some()
                {
                    tracing::debug!(identity = %key, "Attempt window elapsed, removed attempt record");
                }
                max
            }
        }
    }

    /// Record the outcome of a credential check.
    ///
    /// A success removes all failure state. A failure either starts a new
    /// count (no record, or the window elapsed) or increments the existing
    /// one, locking the identity when the threshold is reached. Failures while
    /// already locked still count but never push the lock further out.
    pub fn record_attempt(&self, identity: &str, success: bool) -> AttemptOutcome {
        if !self.config.enabled {
            return AttemptOutcome::Ignored;
        }
        let Some(key) = IdentityKey::parse(identity) else {
            return AttemptOutcome::Ignored;
        };

        if success {
            let cleared = self.records.remove(&key).is_some();
            if cleared {
                tracing::debug!(identity = %key, "Successful login cleared failed attempts");
            }
            return AttemptOutcome::Succeeded { cleared };
        }

        let now = self.clock.now();
        let outcome = self
            .records
            .entry(key.clone())
            .or_insert_with(|| AttemptRecord {
                attempts: 0,
                locked_until: None,
                last_attempt: now,
            })
            .register_failure(now, &self.config);

        match outcome {
            AttemptOutcome::Locked {
                attempts,
                locked_until,
                newly_locked: true,
            } => {
                tracing::info!(
                    identity = %key,
                    attempts,
                    locked_until = %locked_until,
                    "Identity locked after repeated failed logins"
                );
            }
            AttemptOutcome::Failed { attempts, .. } | AttemptOutcome::Locked { attempts, .. } => {
                tracing::debug!(identity = %key, attempts, "Recorded failed login attempt");
            }
            _ => {}
        }

        outcome
    }

    /// Remove any record for `identity`, returning whether one existed.
    pub fn clear(&self, identity: &str) -> bool {
        let Some(key) = IdentityKey::parse(identity) else {
            return false;
        };

        let existed = self.records.remove(&key).is_some();
        if existed {
            tracing::info!(identity = %key, "Attempt record cleared");
        }
        existed
    }

    /// Snapshot of the record for `identity`, without any expiry side effects.
    pub fn status(&self, identity: &str) -> Option<AttemptRecord> {
        let key = IdentityKey::parse(identity)?;
        self.records.get(&key).map(|record| record.clone())
    }

    /// Number of identities with a record.
    pub fn tracked_identities(&self) -> usize {
        self.records.len()
    }

    /// Remove every record that is neither locked nor inside its attempt window.
    ///
    /// Returns how many records were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let window = self.config.attempt_window;
        let mut removed = 0;

        self.records.retain(|_, record| {
            let keep = !record.is_reclaimable_at(now, window);
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }

    /// Start the background reclamation task.
    ///
    /// The task runs [`sweep`](Self::sweep) every `sweep_interval` until the
    /// `shutdown` watch changes or its sender is dropped.
    pub fn spawn_sweeper(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let period = self
            .config
            .sweep_interval
            .to_std()
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or(FALLBACK_SWEEP_INTERVAL);

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(period);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval_timer.tick().await;

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = self.sweep();
                        if removed > 0 {
                            tracing::info!(
                                removed,
                                remaining = self.tracked_identities(),
                                "Reclaimed expired login attempt records"
                            );
                        }
                    }
                    _ = shutdown.changed() => {
                        tracing::info!("Shutting down lockout sweep task");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const USER: &str = "user@bank.com";

    fn tracker_with(config: LockoutConfig) -> (LockoutTracker<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (LockoutTracker::with_clock(config, clock.clone()), clock)
    }

    fn default_tracker() -> (LockoutTracker<ManualClock>, ManualClock) {
        tracker_with(LockoutConfig::default())
    }

    fn fail_times(tracker: &LockoutTracker<ManualClock>, identity: &str, n: u32) {
        for _ in 0..n {
            tracker.record_attempt(identity, false);
        }
    }

    #[test]
    fn test_unknown_identity_has_full_allowance() {
        let (tracker, _) = default_tracker();

        assert_eq!(tracker.remaining_attempts(USER), 5);
        assert_eq!(tracker.check_locked(USER), LockStatus::Unlocked);
        assert!(tracker.status(USER).is_none());
        assert_eq!(tracker.tracked_identities(), 0);
    }

    #[test]
    fn test_first_failure_creates_record() {
        let (tracker, clock) = default_tracker();

        let outcome = tracker.record_attempt(USER, false);
        assert_eq!(
            outcome,
            AttemptOutcome::Failed {
                attempts: 1,
                remaining: 4
            }
        );

        let record = tracker.status(USER).unwrap();
        assert_eq!(record.attempts, 1);
        assert_eq!(record.locked_until, None);
        assert_eq!(record.last_attempt, clock.now());
        assert_eq!(tracker.remaining_attempts(USER), 4);
    }

    #[test]
    fn test_lock_after_max_attempts() {
        let (tracker, clock) = default_tracker();

        for i in 1..5 {
            let outcome = tracker.record_attempt(USER, false);
            assert!(matches!(outcome, AttemptOutcome::Failed { attempts, .. } if attempts == i));
            assert!(!tracker.check_locked(USER).is_locked());
        }

        let outcome = tracker.record_attempt(USER, false);
        let expected_until = clock.now() + Duration::minutes(15);
        assert_eq!(
            outcome,
            AttemptOutcome::Locked {
                attempts: 5,
                locked_until: expected_until,
                newly_locked: true
            }
        );

        let status = tracker.check_locked(USER);
        assert!(status.is_locked());
        assert_eq!(status.remaining_ms(), 900_000);
        assert_eq!(status.locked_until(), Some(expected_until));
        assert_eq!(tracker.remaining_attempts(USER), 0);
    }

    #[test]
    fn test_identity_normalization_shares_record() {
        let (tracker, _) = default_tracker();

        tracker.record_attempt("Foo@Bar.com", false);
        tracker.record_attempt("foo@bar.com ", false);
        tracker.record_attempt("  FOO@bar.COM", false);

        assert_eq!(tracker.status("foo@bar.com").unwrap().attempts, 3);
        assert_eq!(tracker.remaining_attempts("FOO@BAR.COM"), 2);
        assert_eq!(tracker.tracked_identities(), 1);
    }

    #[test]
    fn test_success_clears_even_while_locked() {
        let (tracker, _) = default_tracker();
        fail_times(&tracker, USER, 5);
        assert!(tracker.check_locked(USER).is_locked());

        let outcome = tracker.record_attempt(USER, true);
        assert_eq!(outcome, AttemptOutcome::Succeeded { cleared: true });

        assert!(!tracker.check_locked(USER).is_locked());
        assert_eq!(tracker.remaining_attempts(USER), 5);
        assert!(tracker.status(USER).is_none());
    }

    #[test]
    fn test_success_without_record() {
        let (tracker, _) = default_tracker();
        assert_eq!(
            tracker.record_attempt(USER, true),
            AttemptOutcome::Succeeded { cleared: false }
        );
    }

    #[test]
    fn test_failure_after_window_resets_counter() {
        let (tracker, clock) = default_tracker();
        fail_times(&tracker, USER, 3);
        assert_eq!(tracker.remaining_attempts(USER), 2);

        clock.advance(Duration::minutes(61));
        let outcome = tracker.record_attempt(USER, false);

        assert_eq!(
            outcome,
            AttemptOutcome::Failed {
                attempts: 1,
                remaining: 4
            }
        );
        assert_eq!(tracker.remaining_attempts(USER), 4);
    }

    #[test]
    fn test_failure_exactly_at_window_boundary_keeps_counting() {
        let (tracker, clock) = default_tracker();
        fail_times(&tracker, USER, 2);

        clock.advance(Duration::minutes(60));
        tracker.record_attempt(USER, false);

        assert_eq!(tracker.status(USER).unwrap().attempts, 3);
    }

    #[test]
    fn test_remaining_attempts_drops_stale_record() {
        let (tracker, clock) = default_tracker();
        fail_times(&tracker, USER, 2);

        clock.advance(Duration::minutes(61));
        assert_eq!(tracker.remaining_attempts(USER), 5);
        assert!(tracker.status(USER).is_none());
    }

    #[test]
    fn test_lock_expires_without_success() {
        let (tracker, clock) = default_tracker();
        fail_times(&tracker, USER, 5);

        clock.advance(Duration::minutes(14));
        assert!(tracker.check_locked(USER).is_locked());

        clock.advance(Duration::minutes(1));
        assert_eq!(tracker.check_locked(USER), LockStatus::Unlocked);
        // Expired lock is removed, not just reported
        assert!(tracker.status(USER).is_none());
        assert_eq!(tracker.remaining_attempts(USER), 5);
    }

    #[test]
    fn test_failures_while_locked_do_not_extend_lock() {
        let (tracker, clock) = default_tracker();
        fail_times(&tracker, USER, 5);
        let original = tracker.status(USER).unwrap().locked_until.unwrap();

        clock.advance(Duration::minutes(1));
        let outcome = tracker.record_attempt(USER, false);
        assert_eq!(
            outcome,
            AttemptOutcome::Locked {
                attempts: 6,
                locked_until: original,
                newly_locked: false
            }
        );

        let record = tracker.status(USER).unwrap();
        assert_eq!(record.attempts, 6);
        assert_eq!(record.locked_until, Some(original));
    }

    #[test]
    fn test_clear_unlocks() {
        let (tracker, _) = default_tracker();
        fail_times(&tracker, USER, 5);

        assert!(tracker.clear(USER));
        assert!(!tracker.check_locked(USER).is_locked());
        assert_eq!(tracker.remaining_attempts(USER), 5);

        assert!(!tracker.clear(USER));
        assert!(!tracker.clear("nobody@bank.com"));
    }

    #[test]
    fn test_status_has_no_side_effects() {
        let (tracker, clock) = default_tracker();
        fail_times(&tracker, USER, 5);

        // Lock and window both long gone
        clock.advance(Duration::hours(3));
        let record = tracker.status(USER).unwrap();
        assert_eq!(record.attempts, 5);
        assert!(record.locked_until.is_some());
        assert!(tracker.status(USER).is_some());
        assert_eq!(tracker.tracked_identities(), 1);
    }

    #[test]
    fn test_empty_identity_fails_open() {
        let (tracker, _) = default_tracker();

        assert_eq!(tracker.record_attempt("   ", false), AttemptOutcome::Ignored);
        assert_eq!(tracker.record_attempt("", true), AttemptOutcome::Ignored);
        assert_eq!(tracker.check_locked(""), LockStatus::Unlocked);
        assert_eq!(tracker.remaining_attempts(" "), 5);
        assert!(!tracker.clear(""));
        assert!(tracker.status("").is_none());
        assert_eq!(tracker.tracked_identities(), 0);
    }

    #[test]
    fn test_disabled_tracker_never_records() {
        let (tracker, _) = tracker_with(LockoutConfig::disabled());

        for _ in 0..10 {
            assert_eq!(tracker.record_attempt(USER, false), AttemptOutcome::Ignored);
        }
        assert!(!tracker.check_locked(USER).is_locked());
        assert_eq!(tracker.remaining_attempts(USER), 5);
        assert_eq!(tracker.tracked_identities(), 0);
        assert!(!tracker.is_enabled());
    }

    #[test]
    fn test_single_attempt_threshold_locks_on_first_failure() {
        let (tracker, _) = tracker_with(LockoutConfig {
            max_attempts: 1,
            ..Default::default()
        });

        let outcome = tracker.record_attempt(USER, false);
        assert!(matches!(
            outcome,
            AttemptOutcome::Locked {
                attempts: 1,
                newly_locked: true,
                ..
            }
        ));
        assert!(tracker.check_locked(USER).is_locked());
    }

    #[test]
    fn test_lock_longer_than_window_survives_window_expiry() {
        let (tracker, clock) = tracker_with(LockoutConfig {
            max_attempts: 2,
            lock_duration: Duration::hours(2),
            attempt_window: Duration::minutes(30),
            ..Default::default()
        });
        fail_times(&tracker, USER, 2);

        clock.advance(Duration::minutes(45));
        assert_eq!(tracker.remaining_attempts(USER), 0);
        assert!(tracker.check_locked(USER).is_locked());

        let outcome = tracker.record_attempt(USER, false);
        assert!(matches!(
            outcome,
            AttemptOutcome::Locked {
                attempts: 1,
                newly_locked: false,
                ..
            }
        ));
        assert_eq!(tracker.sweep(), 0);
        assert!(tracker.check_locked(USER).is_locked());
    }

    #[test]
    fn test_relock_after_expiry_without_intervening_check() {
        let (tracker, clock) = tracker_with(LockoutConfig {
            max_attempts: 2,
            ..Default::default()
        });
        fail_times(&tracker, USER, 2);
        let first_until = tracker.status(USER).unwrap().locked_until.unwrap();

        // Lock lapses while still inside the attempt window
        clock.advance(Duration::minutes(20));
        let outcome = tracker.record_attempt(USER, false);

        match outcome {
            AttemptOutcome::Locked {
                attempts,
                locked_until,
                newly_locked,
            } => {
                assert_eq!(attempts, 3);
                assert!(newly_locked);
                assert_eq!(locked_until, clock.now() + Duration::minutes(15));
                assert!(locked_until > first_until);
            }
            other => panic!("expected a new lock, got {other:?}"),
        }
    }

    #[test]
    fn test_sweep_removes_only_fully_expired_records() {
        let (tracker, clock) = default_tracker();

        fail_times(&tracker, "locked@bank.com", 5);
        fail_times(&tracker, "stale@bank.com", 1);
        clock.advance(Duration::minutes(30));
        fail_times(&tracker, "recent@bank.com", 1);

        // locked: lock expired at 15m but window runs to 60m
        clock.advance(Duration::minutes(31));
        assert_eq!(tracker.sweep(), 2);
        assert!(tracker.status("locked@bank.com").is_none());
        assert!(tracker.status("stale@bank.com").is_none());
        assert!(tracker.status("recent@bank.com").is_some());

        clock.advance(Duration::minutes(30));
        assert_eq!(tracker.sweep(), 1);
        assert_eq!(tracker.tracked_identities(), 0);
    }

    #[test]
    fn test_lock_past_representable_time_is_clamped() {
        let (tracker, clock) = tracker_with(LockoutConfig {
            lock_duration: Duration::try_minutes(1_000_000_000_000).unwrap(),
            ..Default::default()
        });

        fail_times(&tracker, USER, 4);
        let outcome = tracker.record_attempt(USER, false);
        assert_eq!(
            outcome,
            AttemptOutcome::Locked {
                attempts: 5,
                locked_until: DateTime::<Utc>::MAX_UTC,
                newly_locked: true,
            }
        );

        clock.advance(Duration::days(365));
        assert!(tracker.check_locked(USER).is_locked());
    }

    #[test]
    fn test_lock_status_helpers() {
        let now = Utc::now();
        let status = LockStatus::Locked {
            locked_until: now + Duration::milliseconds(60_001),
            remaining: Duration::milliseconds(60_001),
        };
        assert_eq!(status.remaining_minutes_ceil(), 2);
        assert_eq!(status.retry_after_seconds(), Some(61));

        let status = LockStatus::Locked {
            locked_until: now + Duration::minutes(15),
            remaining: Duration::minutes(15),
        };
        assert_eq!(status.remaining_minutes_ceil(), 15);
        assert_eq!(status.retry_after_seconds(), Some(900));

        assert_eq!(LockStatus::Unlocked.remaining_ms(), 0);
        assert_eq!(LockStatus::Unlocked.remaining_minutes_ceil(), 0);
        assert_eq!(LockStatus::Unlocked.retry_after_seconds(), None);
        assert_eq!(LockStatus::Unlocked.locked_until(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_reclaims_on_interval() {
        let clock = ManualClock::default();
        let tracker = Arc::new(LockoutTracker::with_clock(
            LockoutConfig {
                sweep_interval: Duration::minutes(5),
                ..Default::default()
            },
            clock.clone(),
        ));
        fail_times(&tracker, USER, 2);
        clock.advance(Duration::minutes(61));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tracker.clone().spawn_sweeper(shutdown_rx);

        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert_eq!(tracker.tracked_identities(), 1);

        tokio::time::sleep(std::time::Duration::from_secs(250)).await;
        assert_eq!(tracker.tracked_identities(), 0);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_sender_dropped() {
        let tracker = Arc::new(LockoutTracker::new(LockoutConfig::default()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tracker.spawn_sweeper(shutdown_rx);

        drop(shutdown_tx);
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
