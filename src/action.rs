//! Dispatch table: every (screen, action) pair the collector understands.
//!
//! Each [`AuthAction`] maps at compile time to the [`Component`] it is
//! scribed under, the [`ActionKind`] that selects the scribe call, and the
//! [`Milestone`] listeners hear about (if any). Adding a variant without
//! extending every `match` below is a compile error.

use std::fmt;

use crate::taxonomy::{Component, Element};

/// Which scribe call an action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Impression,
    Click(Element),
    Success,
    Failure,
    /// Needs an [`AuthFlowError`](crate::AuthFlowError) to be scribed.
    Exception,
}

/// Business-level milestone broadcast to registered listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    LoginBegin,
    LoginSuccess,
    PhoneNumberImpression,
    PhoneNumberSubmit,
    PhoneNumberSuccess,
    LoginCodeSuccess,
    SignupSuccess,
}

impl Milestone {
    /// Whether the listener callback takes [`EventDetails`](crate::EventDetails).
    pub const fn needs_details(self) -> bool {
        !matches!(self, Milestone::LoginSuccess)
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Milestone::LoginBegin => "login_begin",
            Milestone::LoginSuccess => "login_success",
            Milestone::PhoneNumberImpression => "phone_number_impression",
            Milestone::PhoneNumberSubmit => "phone_number_submit",
            Milestone::PhoneNumberSuccess => "phone_number_success",
            Milestone::LoginCodeSuccess => "login_code_success",
            Milestone::SignupSuccess => "signup_success",
        };
        f.write_str(name)
    }
}

/// One caller-facing action, grouped by screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthAction {
    // Flow as a whole
    AuthImpression,
    AuthSuccess,
    AuthFailure,
    // Phone screen
    PhoneImpression,
    PhoneCountryCodeClick,
    PhoneSubmitClick,
    PhoneRetryClick,
    PhoneSubmitSuccess,
    PhoneSubmitFailure,
    PhoneSubmitException,
    // Login screen
    LoginImpression,
    LoginSubmitClick,
    LoginResendClick,
    LoginCallMeClick,
    LoginCodeSuccess,
    LoginFailure,
    LoginException,
    // Signup screen
    SignupImpression,
    SignupSubmitClick,
    SignupResendClick,
    SignupCallMeClick,
    SignupSuccess,
    SignupFailure,
    SignupException,
    // Pin screen
    PinImpression,
    PinSubmitClick,
    PinVerificationSuccess,
    PinVerificationFailure,
    PinVerificationException,
    // Email screen
    EmailImpression,
    EmailSubmitClick,
    EmailSubmitSuccess,
    EmailSubmitFailure,
    EmailSubmitException,
    // Contacts screen
    ContactsImpression,
    ContactsCancelClick,
    ContactsSubmitClick,
    // Failure screen
    FailureImpression,
    FailureRetryClick,
    FailureDismissClick,
}

impl AuthAction {
    /// Every action, grouped by screen in declaration order.
    pub const ALL: [AuthAction; 40] = [
        AuthAction::AuthImpression,
        AuthAction::AuthSuccess,
        AuthAction::AuthFailure,
        AuthAction::PhoneImpression,
        AuthAction::PhoneCountryCodeClick,
        AuthAction::PhoneSubmitClick,
        AuthAction::PhoneRetryClick,
        AuthAction::PhoneSubmitSuccess,
        AuthAction::PhoneSubmitFailure,
        AuthAction::PhoneSubmitException,
        AuthAction::LoginImpression,
        AuthAction::LoginSubmitClick,
        AuthAction::LoginResendClick,
        AuthAction::LoginCallMeClick,
        AuthAction::LoginCodeSuccess,
        AuthAction::LoginFailure,
        AuthAction::LoginException,
        AuthAction::SignupImpression,
        AuthAction::SignupSubmitClick,
        AuthAction::SignupResendClick,
        AuthAction::SignupCallMeClick,
        AuthAction::SignupSuccess,
        AuthAction::SignupFailure,
        AuthAction::SignupException,
        AuthAction::PinImpression,
        AuthAction::PinSubmitClick,
        AuthAction::PinVerificationSuccess,
        AuthAction::PinVerificationFailure,
        AuthAction::PinVerificationException,
        AuthAction::EmailImpression,
        AuthAction::EmailSubmitClick,
        AuthAction::EmailSubmitSuccess,
        AuthAction::EmailSubmitFailure,
        AuthAction::EmailSubmitException,
        AuthAction::ContactsImpression,
        AuthAction::ContactsCancelClick,
        AuthAction::ContactsSubmitClick,
        AuthAction::FailureImpression,
        AuthAction::FailureRetryClick,
        AuthAction::FailureDismissClick,
    ];

    /// Screen the action is scribed under.
    pub const fn component(self) -> Component {
        use AuthAction::*;
        match self {
            AuthImpression | AuthSuccess | AuthFailure => Component::Empty,
            PhoneImpression | PhoneCountryCodeClick | PhoneSubmitClick | PhoneRetryClick
            | PhoneSubmitSuccess | PhoneSubmitFailure | PhoneSubmitException => Component::Auth,
            LoginImpression | LoginSubmitClick | LoginResendClick | LoginCallMeClick
            | LoginCodeSuccess | LoginFailure | LoginException => Component::Login,
            SignupImpression | SignupSubmitClick | SignupResendClick | SignupCallMeClick
            | SignupSuccess | SignupFailure | SignupException => Component::Signup,
            PinImpression | PinSubmitClick | PinVerificationSuccess | PinVerificationFailure
            | PinVerificationException => Component::Pin,
            EmailImpression | EmailSubmitClick | EmailSubmitSuccess | EmailSubmitFailure
            | EmailSubmitException => Component::Email,
            ContactsImpression | ContactsCancelClick | ContactsSubmitClick => Component::Contacts,
            FailureImpression | FailureRetryClick | FailureDismissClick => Component::Failure,
        }
    }

    /// Scribe call the action produces.
    pub const fn kind(self) -> ActionKind {
        use AuthAction::*;
        match self {
            AuthImpression | PhoneImpression | LoginImpression | SignupImpression
            | PinImpression | EmailImpression | ContactsImpression | FailureImpression => {
                ActionKind::Impression
            }
            PhoneCountryCodeClick => ActionKind::Click(Element::CountryCode),
            PhoneSubmitClick | LoginSubmitClick | SignupSubmitClick | PinSubmitClick
            | EmailSubmitClick | ContactsSubmitClick => ActionKind::Click(Element::Submit),
            PhoneRetryClick | FailureRetryClick => ActionKind::Click(Element::Retry),
            LoginResendClick | SignupResendClick => ActionKind::Click(Element::Resend),
            LoginCallMeClick | SignupCallMeClick => ActionKind::Click(Element::Call),
            ContactsCancelClick => ActionKind::Click(Element::Cancel),
            FailureDismissClick => ActionKind::Click(Element::Dismiss),
            AuthSuccess | PhoneSubmitSuccess | LoginCodeSuccess | SignupSuccess
            | PinVerificationSuccess | EmailSubmitSuccess => ActionKind::Success,
            AuthFailure | PhoneSubmitFailure | LoginFailure | SignupFailure
            | PinVerificationFailure | EmailSubmitFailure => ActionKind::Failure,
            PhoneSubmitException | LoginException | SignupException | PinVerificationException
            | EmailSubmitException => ActionKind::Exception,
        }
    }

    /// Milestone broadcast to listeners, if the action is one.
    pub const fn milestone(self) -> Option<Milestone> {
        match self {
            AuthAction::AuthImpression => Some(Milestone::LoginBegin),
            AuthAction::AuthSuccess => Some(Milestone::LoginSuccess),
            AuthAction::PhoneImpression => Some(Milestone::PhoneNumberImpression),
            AuthAction::PhoneSubmitClick => Some(Milestone::PhoneNumberSubmit),
            AuthAction::PhoneSubmitSuccess => Some(Milestone::PhoneNumberSuccess),
            AuthAction::LoginCodeSuccess => Some(Milestone::LoginCodeSuccess),
            AuthAction::SignupSuccess => Some(Milestone::SignupSuccess),
            _ => None,
        }
    }

    /// Element pressed, for click actions.
    pub const fn element(self) -> Option<Element> {
        match self.kind() {
            ActionKind::Click(element) => Some(element),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_lists_each_action_once() {
        let unique: HashSet<_> = AuthAction::ALL.iter().collect();
        assert_eq!(unique.len(), AuthAction::ALL.len());
    }

    #[test]
    fn every_component_has_an_impression() {
        for component in Component::ALL {
            assert!(
                AuthAction::ALL
                    .iter()
                    .any(|a| a.component() == component && a.kind() == ActionKind::Impression),
                "no impression for {component:?}"
            );
        }
    }

    #[test]
    fn milestones_are_a_fixed_subset() {
        let milestones: Vec<_> = AuthAction::ALL.iter().filter_map(|a| a.milestone()).collect();
        assert_eq!(milestones.len(), 7);
        let unique: HashSet<_> = milestones.iter().collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn exceptions_are_never_milestones() {
        for action in AuthAction::ALL {
            if action.kind() == ActionKind::Exception {
                assert!(action.milestone().is_none(), "{action:?}");
            }
        }
    }

    #[test]
    fn element_only_for_clicks() {
        assert_eq!(AuthAction::FailureDismissClick.element(), Some(Element::Dismiss));
        assert_eq!(AuthAction::PhoneCountryCodeClick.element(), Some(Element::CountryCode));
        assert_eq!(AuthAction::PhoneSubmitSuccess.element(), None);
    }

    #[test]
    fn only_login_success_skips_details() {
        assert!(!Milestone::LoginSuccess.needs_details());
        assert!(Milestone::LoginBegin.needs_details());
        assert!(Milestone::SignupSuccess.needs_details());
    }
}
