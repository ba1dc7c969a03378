//! Scribe addressing taxonomy.
//!
//! Every telemetry call is addressed by a [`Component`] (the screen the event
//! originates from) and, for clicks, an [`Element`] (the control that was
//! pressed). Both sets are closed; there is no way to build one from a string.

use std::fmt;

/// Screen identity within the auth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// The flow as a whole (begin, overall success/failure).
    Empty,
    /// Phone number entry.
    Auth,
    /// Confirmation code entry for an existing account.
    Login,
    /// Confirmation code entry for a new account.
    Signup,
    /// Two-factor pin entry.
    Pin,
    /// Email collection.
    Email,
    /// Contacts upload prompt.
    Contacts,
    /// Terminal failure screen.
    Failure,
}

impl Component {
    /// All components, in declaration order.
    pub const ALL: [Component; 8] = [
        Component::Empty,
        Component::Auth,
        Component::Login,
        Component::Signup,
        Component::Pin,
        Component::Email,
        Component::Contacts,
        Component::Failure,
    ];

    /// Wire name used by sinks that serialize the address.
    pub const fn as_str(self) -> &'static str {
        match self {
            Component::Empty => "",
            Component::Auth => "auth",
            Component::Login => "login",
            Component::Signup => "signup",
            Component::Pin => "pin",
            Component::Email => "email",
            Component::Contacts => "contacts",
            Component::Failure => "failure",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Empty => write!(f, "<empty>"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Control identity within a screen. Only used with click events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Submit,
    Retry,
    Cancel,
    Dismiss,
    /// Country code picker on the phone screen.
    CountryCode,
    Resend,
    /// "Call me" fallback for code delivery.
    Call,
}

impl Element {
    /// All elements, in declaration order.
    pub const ALL: [Element; 7] = [
        Element::Submit,
        Element::Retry,
        Element::Cancel,
        Element::Dismiss,
        Element::CountryCode,
        Element::Resend,
        Element::Call,
    ];

    /// Wire name of the element.
    pub const fn as_str(self) -> &'static str {
        match self {
            Element::Submit => "submit",
            Element::Retry => "retry",
            Element::Cancel => "cancel",
            Element::Dismiss => "dismiss",
            Element::CountryCode => "country_code",
            Element::Resend => "resend",
            Element::Call => "call",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wire_names_are_unique() {
        let components: HashSet<_> = Component::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(components.len(), Component::ALL.len());
        let elements: HashSet<_> = Element::ALL.iter().map(|e| e.as_str()).collect();
        assert_eq!(elements.len(), Element::ALL.len());
    }

    #[test]
    fn empty_component_displays_placeholder() {
        assert_eq!(Component::Empty.to_string(), "<empty>");
        assert_eq!(Component::Contacts.to_string(), "contacts");
        assert_eq!(Element::CountryCode.to_string(), "country_code");
    }
}
