use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use lockout_core::LockStatus;
use serde_json::json;
use thiserror::Error;

use crate::types::LockedResponse;

#[derive(Debug, Error)]
pub enum LockoutError {
    /// Business rejection for a locked identity, rendered as a 429.
    #[error("Too many failed login attempts")]
    Locked {
        locked_until: DateTime<Utc>,
        remaining: Duration,
    },

    /// The login body exceeded the guard's limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The login body stream failed before it was fully read.
    #[error("Could not read request body")]
    UnreadableBody,

    #[error("Identity not found")]
    IdentityNotFound,
}

impl LockoutError {
    /// Build the lock rejection from a tracker status, `None` when unlocked.
    pub fn from_status(status: LockStatus) -> Option<Self> {
        match status {
            LockStatus::Locked {
                locked_until,
                remaining,
            } => Some(LockoutError::Locked {
                locked_until,
                remaining,
            }),
            LockStatus::Unlocked => None,
        }
    }
}

impl IntoResponse for LockoutError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            LockoutError::Locked {
                locked_until,
                remaining,
            } => return locked_response(locked_until, remaining),
            LockoutError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            }
            LockoutError::UnreadableBody => {
                (StatusCode::BAD_REQUEST, "Could not read request body")
            }
            LockoutError::IdentityNotFound => (StatusCode::NOT_FOUND, "Identity not found"),
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

fn locked_response(locked_until: DateTime<Utc>, remaining: Duration) -> Response {
    let status = LockStatus::Locked {
        locked_until,
        remaining,
    };
    let body = LockedResponse::new(locked_until, status.remaining_minutes_ceil());
    let retry_after = status.retry_after_seconds().unwrap_or_default();

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, HeaderValue::from(retry_after))],
        Json(body),
    )
        .into_response()
}

pub type Result<T> = std::result::Result<T, LockoutError>;
