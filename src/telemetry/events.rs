use std::fmt;

use crate::error::AuthFlowError;
use crate::taxonomy::{Component, Element};

/// Value form of a single scribe call.
///
/// Sinks that buffer, forward, or serialize calls (rather than acting on them
/// inline) turn each call into one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScribeEvent {
    /// A screen became visible.
    Impression {
        /// Screen shown.
        component: Component,
    },
    /// A control on a screen was pressed.
    Click {
        /// Screen the control lives on.
        component: Component,
        /// Control pressed.
        element: Element,
    },
    /// A screen's operation completed.
    Success {
        /// Screen reporting success.
        component: Component,
    },
    /// A screen's operation was rejected.
    Failure {
        /// Screen reporting failure.
        component: Component,
    },
    /// A screen's operation raised an error.
    Error {
        /// Screen reporting the error.
        component: Component,
        /// Error exactly as the caller supplied it.
        error: AuthFlowError,
    },
}

impl ScribeEvent {
    /// Screen the event is addressed to.
    pub fn component(&self) -> Component {
        match self {
            ScribeEvent::Impression { component }
            | ScribeEvent::Click { component, .. }
            | ScribeEvent::Success { component }
            | ScribeEvent::Failure { component }
            | ScribeEvent::Error { component, .. } => *component,
        }
    }

    /// Short name of the call, e.g. `"click"`.
    pub fn kind(&self) -> &'static str {
        match self {
            ScribeEvent::Impression { .. } => "impression",
            ScribeEvent::Click { .. } => "click",
            ScribeEvent::Success { .. } => "success",
            ScribeEvent::Failure { .. } => "failure",
            ScribeEvent::Error { .. } => "error",
        }
    }
}

impl fmt::Display for ScribeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScribeEvent::Impression { component } => write!(f, "Impression({})", component),
            ScribeEvent::Click { component, element } => {
                write!(f, "Click({}, {})", component, element)
            }
            ScribeEvent::Success { component } => write!(f, "Success({})", component),
            ScribeEvent::Failure { component } => write!(f, "Failure({})", component),
            ScribeEvent::Error { component, error } => {
                write!(f, "Error({}, {})", component, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_display_names_both_parts() {
        let event = ScribeEvent::Click { component: Component::Failure, element: Element::Retry };
        assert_eq!(event.to_string(), "Click(failure, retry)");
        assert_eq!(event.kind(), "click");
        assert_eq!(event.component(), Component::Failure);
    }

    #[test]
    fn error_display_includes_error() {
        let event = ScribeEvent::Error {
            component: Component::Pin,
            error: AuthFlowError::new("pin rejected"),
        };
        assert!(event.to_string().contains("pin rejected"));
        assert_eq!(event.component(), Component::Pin);
    }

    #[test]
    fn unit_events_display() {
        let event = ScribeEvent::Impression { component: Component::Empty };
        assert_eq!(event.to_string(), "Impression(<empty>)");
        let event = ScribeEvent::Failure { component: Component::Email };
        assert_eq!(event.to_string(), "Failure(email)");
    }
}
