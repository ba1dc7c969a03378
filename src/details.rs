//! Timing context handed to listeners on milestone events.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::clock::{Clock, SystemClock};
use crate::error::BuildError;

/// Timing metadata for one auth-flow attempt.
///
/// Built once by the caller and passed by reference into the collector's
/// milestone dispatch methods. Equality is by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventDetails {
    auth_start_time: SystemTime,
    current_time: SystemTime,
}

impl EventDetails {
    /// Construct a new builder with defaults.
    pub fn builder() -> EventDetailsBuilder {
        EventDetailsBuilder::new()
    }

    /// When the auth flow was started.
    pub fn auth_start_time(&self) -> SystemTime {
        self.auth_start_time
    }

    /// When the event being reported happened.
    pub fn current_time(&self) -> SystemTime {
        self.current_time
    }

    /// Time spent in the flow up to this event.
    pub fn elapsed(&self) -> Duration {
        self.current_time.duration_since(self.auth_start_time).unwrap_or_default()
    }
}

/// Builder for [`EventDetails`].
#[derive(Debug, Clone)]
pub struct EventDetailsBuilder {
    auth_start_time: Option<SystemTime>,
    current_time: Option<SystemTime>,
    clock: Arc<dyn Clock>,
}

impl EventDetailsBuilder {
    /// Empty builder reading the system clock.
    pub fn new() -> Self {
        Self { auth_start_time: None, current_time: None, clock: Arc::new(SystemClock) }
    }

    /// When the flow started. Required.
    pub fn with_auth_start_time(mut self, at: SystemTime) -> Self {
        self.auth_start_time = Some(at);
        self
    }

    /// Event time. Falls back to the clock when unset.
    pub fn with_current_time(mut self, at: SystemTime) -> Self {
        self.current_time = Some(at);
        self
    }

    /// Provide a custom clock implementation.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Build the details, validating that the flow started before the event.
    pub fn build(self) -> Result<EventDetails, BuildError> {
        let start = self.auth_start_time.ok_or(BuildError::MissingAuthStartTime)?;
        let current = self.current_time.unwrap_or_else(|| self.clock.now());
        if start > current {
            return Err(BuildError::StartAfterCurrent { start, current });
        }
        Ok(EventDetails { auth_start_time: start, current_time: current })
    }
}

impl Default for EventDetailsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
