use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use lockout_core::{
    AttemptOutcome, Clock, Event, EventBus, IdentityKey, LockoutTracker, SystemClock, UnlockReason,
};

use crate::{error::LockoutError, extractors::identity_from_json, types::GuardConfig};

/// Shared state for the login guard and the admin routes.
pub struct LockoutState<C: Clock = SystemClock> {
    pub tracker: Arc<LockoutTracker<C>>,
    pub events: EventBus,
    pub config: GuardConfig,
}

impl<C: Clock> Clone for LockoutState<C> {
    fn clone(&self) -> Self {
        Self {
            tracker: self.tracker.clone(),
            events: self.events.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: Clock> LockoutState<C> {
    pub fn new(tracker: Arc<LockoutTracker<C>>) -> Self {
        Self {
            tracker,
            events: EventBus::default(),
            config: GuardConfig::default(),
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_guard_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Translate a recorded outcome into security events.
    pub(crate) async fn emit_outcome(&self, identity: &IdentityKey, outcome: AttemptOutcome) {
        let timestamp = self.tracker.clock().now();

        match outcome {
            AttemptOutcome::Failed { attempts, .. } => {
                self.events
                    .emit_logged(&Event::LoginFailed {
                        identity: identity.clone(),
                        failed_attempts: attempts,
                        timestamp,
                    })
                    .await;
            }
            AttemptOutcome::Locked {
                attempts,
                locked_until,
                newly_locked,
            } => {
                self.events
                    .emit_logged(&Event::LoginFailed {
                        identity: identity.clone(),
                        failed_attempts: attempts,
                        timestamp,
                    })
                    .await;
                if newly_locked {
                    self.events
                        .emit_logged(&Event::AccountLocked {
                            identity: identity.clone(),
                            failed_attempts: attempts,
                            locked_until,
                            timestamp,
                        })
                        .await;
                }
            }
            AttemptOutcome::Succeeded { cleared: true } => {
                self.events
                    .emit_logged(&Event::AccountUnlocked {
                        identity: identity.clone(),
                        reason: UnlockReason::LoginSucceeded,
                        timestamp,
                    })
                    .await;
            }
            AttemptOutcome::Succeeded { cleared: false } | AttemptOutcome::Ignored => {}
        }
    }
}

/// How a login handler's response maps onto an attempt outcome.
///
/// 2xx is a successful login and 401 a credential failure. Anything else
/// (malformed input, server faults) says nothing about the credentials and is
/// not recorded.
pub fn login_outcome(status: StatusCode) -> Option<bool> {
    if status.is_success() {
        Some(true)
    } else if status == StatusCode::UNAUTHORIZED {
        Some(false)
    } else {
        None
    }
}

/// 413 when the body hit the size limit, 400 for any other read failure.
fn body_rejection(err: &axum::Error) -> LockoutError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return LockoutError::PayloadTooLarge;
        }
        source = e.source();
    }
    LockoutError::UnreadableBody
}

/// Brute force guard for login routes.
///
/// Runs before the login handler: a locked identity is rejected with 429 and
/// the handler is never called. Otherwise the handler runs, the response gets
/// the remaining attempt count as a header, and its status is recorded with
/// the tracker.
///
/// Requests without a readable identity pass straight through.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/auth/login", post(login_handler))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), login_guard::<SystemClock>));
/// ```
pub async fn login_guard<C: Clock>(
    State(state): State<LockoutState<C>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, state.config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let rejection = body_rejection(&e);
            tracing::debug!(error = %e, rejection = %rejection, "Rejected login body");
            return rejection.into_response();
        }
    };

    let identity = identity_from_json(&bytes, &state.config.identity_field)
        .and_then(|raw| IdentityKey::parse(&raw));
    let mut request = Request::from_parts(parts, Body::from(bytes));

    let Some(identity) = identity else {
        tracing::debug!("Login request without identity, skipping lockout checks");
        return next.run(request).await;
    };

    let status = state.tracker.check_locked(identity.as_str());
    if let Some(rejection) = LockoutError::from_status(status) {
        tracing::info!(
            identity = %identity,
            remaining_ms = status.remaining_ms(),
            "Rejected login for locked identity"
        );
        return rejection.into_response();
    }

    let remaining = state.tracker.remaining_attempts(identity.as_str());
    request.extensions_mut().insert(identity.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        state.config.remaining_header.clone(),
        HeaderValue::from(remaining),
    );

    if let Some(success) = login_outcome(response.status()) {
        let outcome = state.tracker.record_attempt(identity.as_str(), success);
        state.emit_outcome(&identity, outcome).await;
    }

    response
}
