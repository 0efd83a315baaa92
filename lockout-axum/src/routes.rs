use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use lockout_core::{Clock, Event, IdentityKey, UnlockReason};

use crate::{
    error::{LockoutError, Result},
    middleware::LockoutState,
    types::*,
};

/// Administrative routes for support tooling.
///
/// - `GET /lockouts`: tracker summary
/// - `GET /lockouts/{identity}`: current counters for one identity
/// - `DELETE /lockouts/{identity}`: clear the failures and lock of one identity
///
/// These routes carry no authentication of their own; serve them on an
/// internal listener or behind the application's admin auth.
pub fn admin_router<C: Clock>(state: LockoutState<C>) -> Router {
    Router::new()
        .route("/lockouts", get(summary_handler::<C>))
        .route(
            "/lockouts/{identity}",
            get(status_handler::<C>).delete(clear_handler::<C>),
        )
        .with_state(state)
}

async fn summary_handler<C: Clock>(State(state): State<LockoutState<C>>) -> impl IntoResponse {
    let config = state.tracker.config();

    Json(TrackerSummaryResponse {
        enabled: config.enabled,
        tracked_identities: state.tracker.tracked_identities(),
        max_attempts: config.max_attempts,
        lock_duration_secs: config.lock_duration.num_seconds(),
        attempt_window_secs: config.attempt_window.num_seconds(),
    })
}

async fn status_handler<C: Clock>(
    State(state): State<LockoutState<C>>,
    Path(identity): Path<String>,
) -> Result<impl IntoResponse> {
    let key = IdentityKey::parse(&identity).ok_or(LockoutError::IdentityNotFound)?;
    let record = state
        .tracker
        .status(key.as_str())
        .ok_or(LockoutError::IdentityNotFound)?;

    let now = state.tracker.clock().now();
    let max_attempts = state.tracker.config().max_attempts;

    Ok(Json(RecordStatusResponse {
        identity: key.into_inner(),
        attempts: record.attempts,
        remaining_attempts: max_attempts.saturating_sub(record.attempts),
        locked: record.is_locked_at(now),
        locked_until: record.locked_until.map(format_timestamp),
        last_attempt: format_timestamp(record.last_attempt),
    }))
}

async fn clear_handler<C: Clock>(
    State(state): State<LockoutState<C>>,
    Path(identity): Path<String>,
) -> Result<impl IntoResponse> {
    let key = IdentityKey::parse(&identity).ok_or(LockoutError::IdentityNotFound)?;
    let cleared = state.tracker.clear(key.as_str());

    if cleared {
        state
            .events
            .emit_logged(&Event::AccountUnlocked {
                identity: key.clone(),
                reason: UnlockReason::AdminAction,
                timestamp: state.tracker.clock().now(),
            })
            .await;
    }

    Ok(Json(ClearResponse {
        identity: key.into_inner(),
        cleared,
    }))
}
