//! Core functionality for the lockout project
//!
//! This crate implements brute force login protection: it counts failed login
//! attempts per identity, locks an identity for a fixed period once a threshold
//! is crossed, and forgets failures after an attempt window elapses.
//!
//! All state lives in memory inside a [`LockoutTracker`] that the application
//! creates at startup and shares with its request handlers. A background task
//! started with [`LockoutTracker::spawn_sweeper`] reclaims records that are no
//! longer relevant.
//!
//! See [`LockoutTracker`] for the operations, [`LockoutConfig`] for the knobs,
//! and [`events`] for the security events the HTTP layer emits.
//!
pub mod builder;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod tracker;

pub use builder::LockoutTrackerBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LockoutConfig;
pub use error::Error;
pub use events::{Event, EventBus, EventHandler, UnlockReason};
pub use identity::IdentityKey;
pub use tracker::{AttemptOutcome, AttemptRecord, LockStatus, LockoutTracker};
