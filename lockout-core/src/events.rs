use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{IdentityKey, error::EventError};

/// Reason why an identity was unlocked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UnlockReason {
    /// A successful login cleared the failure history
    LoginSucceeded,
    /// Support staff cleared the record
    AdminAction,
}

/// Security events emitted around login attempts.
///
/// The tracker itself is synchronous and emits nothing; the async layers that
/// call it (HTTP middleware, admin routes) translate outcomes into events so
/// audit logging and alerting can hang off an [`EventBus`].
#[derive(Debug, Clone)]
pub enum Event {
    /// Emitted when a login attempt fails.
    LoginFailed {
        /// The normalized identity that was attempted
        identity: IdentityKey,
        /// Failures in the current attempt window, including this one
        failed_attempts: u32,
        /// When the attempt was recorded
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an identity becomes locked.
    ///
    /// Fired once per lock, not for failures that arrive while already locked.
    AccountLocked {
        identity: IdentityKey,
        failed_attempts: u32,
        /// When the lock lifts
        locked_until: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when tracked failure state is cleared.
    AccountUnlocked {
        identity: IdentityKey,
        reason: UnlockReason,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn identity(&self) -> &IdentityKey {
        match self {
            Event::LoginFailed { identity, .. }
            | Event::AccountLocked { identity, .. }
            | Event::AccountUnlocked { identity, .. } => identity,
        }
    }
}

/// A trait for handling events emitted by the event bus
///
/// Implementors of this trait can be registered with the [`EventBus`] to receive and process events.
///
/// # Examples
///
/// ```
/// # use lockout_core::events::{Event, EventHandler};
/// # use lockout_core::error::EventError;
/// # use async_trait::async_trait;
/// struct AuditLog;
///
/// #[async_trait]
/// impl EventHandler for AuditLog {
///     async fn handle_event(&self, event: &Event) -> Result<(), EventError> {
///         println!("security event for {}", event.identity());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    async fn handle_event(&self, event: &Event) -> Result<(), EventError>;
}

/// Event bus that can emit events and register event handlers
///
/// Clones share the same handler list.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<RwLock<Vec<Arc<dyn EventHandler>>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register an event handler with the event bus
    pub async fn register(&self, handler: Arc<dyn EventHandler>) {
        self.handlers.write().await.push(handler);
    }

    /// Emit an event to all registered handlers, stopping at the first error
    pub async fn emit(&self, event: &Event) -> Result<(), EventError> {
        for handler in self.handlers.read().await.iter() {
            handler.handle_event(event).await?;
        }

        Ok(())
    }

    /// Emit an event and log handler failures instead of returning them.
    ///
    /// Used on request paths where an audit sink outage must not change the
    /// login response.
    pub async fn emit_logged(&self, event: &Event) {
        if let Err(e) = self.emit(event).await {
            tracing::warn!(
                identity = %event.identity(),
                error = %e,
                "Failed to dispatch lockout event"
            );
        }
    }
}
