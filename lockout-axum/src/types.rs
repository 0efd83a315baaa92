use axum::http::HeaderName;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Default header carrying the remaining attempt count on login responses.
pub const REMAINING_ATTEMPTS_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// How the login guard finds the identity and reports on it.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// JSON field of the login body that holds the identifier
    pub identity_field: String,
    /// Response header set to the remaining attempt count
    pub remaining_header: HeaderName,
    /// Largest login body the guard will buffer
    pub max_body_bytes: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            identity_field: "email".to_string(),
            remaining_header: REMAINING_ATTEMPTS_HEADER,
            max_body_bytes: 16 * 1024,
        }
    }
}

impl GuardConfig {
    pub fn new(identity_field: impl Into<String>) -> Self {
        Self {
            identity_field: identity_field.into(),
            ..Default::default()
        }
    }

    pub fn with_remaining_header(mut self, header: HeaderName) -> Self {
        self.remaining_header = header;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// Body of the 429 returned for a locked identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    /// RFC 3339 timestamp in UTC with millisecond precision
    pub locked_until: String,
}

impl LockedResponse {
    pub fn new(locked_until: DateTime<Utc>, remaining_minutes: i64) -> Self {
        let unit = if remaining_minutes == 1 {
            "minute"
        } else {
            "minutes"
        };

        Self {
            success: false,
            error: "Too many failed login attempts".to_string(),
            message: format!(
                "Account temporarily locked. Try again in {remaining_minutes} {unit}."
            ),
            locked_until: format_timestamp(locked_until),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStatusResponse {
    pub identity: String,
    pub attempts: u32,
    pub remaining_attempts: u32,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<String>,
    pub last_attempt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub identity: String,
    pub cleared: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSummaryResponse {
    pub enabled: bool,
    pub tracked_identities: usize,
    pub max_attempts: u32,
    pub lock_duration_secs: i64,
    pub attempt_window_secs: i64,
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
