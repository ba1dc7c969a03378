//! Error types for the auth-flow event pipeline.

use std::fmt;
use std::time::SystemTime;

/// Failure context captured by a screen controller, typically a rejected
/// network or auth call.
///
/// The collector forwards this value to the scribe untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFlowError {
    message: String,
    code: Option<i32>,
}

impl AuthFlowError {
    /// Error with a message and no API error code.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None }
    }

    /// Error carrying the API error code returned by the auth backend.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self { message: message.into(), code: Some(code) }
    }

    /// Backend message, unchanged.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Backend error code, if the backend sent one.
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl fmt::Display for AuthFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AuthFlowError {}

/// Raised by an [`EventLogger`](crate::EventLogger) callback.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoggerError {
    /// The listener's backend rejected the milestone.
    #[error("listener rejected milestone: {0}")]
    Rejected(String),
    /// The listener is not accepting events any more.
    #[error("listener unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced while building [`EventDetails`](crate::EventDetails).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The flow start time was never set.
    #[error("auth start time is required")]
    MissingAuthStartTime,
    /// The flow start time is later than the event time.
    #[error("auth start time {start:?} is after current time {current:?}")]
    StartAfterCurrent {
        /// Flow start.
        start: SystemTime,
        /// Event time.
        current: SystemTime,
    },
}
