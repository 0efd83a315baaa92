use thiserror::Error;

/// Errors produced while configuring the tracker or dispatching events.
///
/// Tracker operations themselves never fail: a malformed identity degrades to
/// "no record" rather than an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("{0} must be a positive duration")]
    NonPositiveDuration(&'static str),

    #[error("{0} is out of range for the runtime timer")]
    DurationOutOfRange(&'static str),
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event bus error: {0}")]
    BusError(String),

    #[error("Event handler error: {0}")]
    HandlerError(String),
}

impl Error {
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    pub fn is_event_error(&self) -> bool {
        matches!(self, Error::Event(_))
    }
}
