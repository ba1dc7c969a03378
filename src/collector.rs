//! Central dispatcher for auth-flow analytics.
//!
//! Each dispatch method makes exactly one call into the [`ScribeClient`],
//! addressed through the fixed [`AuthAction`] table, and then, for milestone
//! actions, notifies every registered [`EventLogger`] in registration order.
//!
//! ```rust
//! use authscribe::telemetry::{MemoryScribe, ScribeEvent};
//! use authscribe::{Component, Element, EventCollector};
//!
//! let scribe = MemoryScribe::new();
//! let collector = EventCollector::new(scribe.clone());
//!
//! collector.retry_click_on_failure_screen();
//!
//! assert_eq!(
//!     scribe.events(),
//!     vec![ScribeEvent::Click { component: Component::Failure, element: Element::Retry }]
//! );
//! ```
//!
//! The collector holds no flow state: screen ordering is the caller's job, and
//! every dispatch is independent of the ones before it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use tracing::{debug, warn};

use crate::action::{ActionKind, AuthAction, Milestone};
use crate::details::EventDetails;
use crate::error::AuthFlowError;
use crate::logger::{self, EventLogger};
use crate::telemetry::ScribeClient;

/// What the collector does when a listener callback returns an error.
///
/// Only `Err` returns are handled. A listener that panics unwinds through the
/// dispatch call, and listeners registered after it are not notified for that
/// event under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerFailurePolicy {
    /// Log and count the failure, then carry on with the next listener.
    #[default]
    Isolate,
    /// Log and count the failure, then skip the remaining listeners for this event.
    StopBroadcast,
}

/// Collector settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectorConfig {
    /// Reaction to a listener returning an error.
    pub failure_policy: ListenerFailurePolicy,
}

/// Routes auth-flow actions to a scribe and to milestone listeners.
pub struct EventCollector<S> {
    sink: S,
    listeners: Mutex<Vec<Arc<dyn EventLogger>>>,
    config: CollectorConfig,
    failed_notifications: AtomicU64,
}

impl<S> fmt::Debug for EventCollector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("EventCollector");
        out.field("sink", &"<scribe>");
        match self.listeners.try_lock() {
            Ok(listeners) => out.field("listeners", &listeners.len()),
            Err(TryLockError::Poisoned(poisoned)) => {
                out.field("listeners", &poisoned.into_inner().len())
            }
            Err(TryLockError::WouldBlock) => out.field("listeners", &"<locked>"),
        };
        out.field("config", &self.config)
            .field("failed_notifications", &self.failed_notifications.load(Ordering::Relaxed))
            .finish()
    }
}

impl<S> EventCollector<S> {
    /// Construct a new builder around `sink`.
    pub fn builder(sink: S) -> EventCollectorBuilder<S> {
        EventCollectorBuilder::new(sink)
    }

    /// Register a listener unless this exact instance is already registered.
    ///
    /// Identity is the `Arc` allocation, not value equality: two separately
    /// allocated listeners that compare equal are both kept. Returns `true`
    /// when the listener was added.
    pub fn add_listener(&self, listener: Arc<dyn EventLogger>) -> bool {
        let added = {
            let mut listeners = self.lock_listeners();
            let present = listeners.iter().any(|existing| same_listener(existing, &listener));
            if !present {
                listeners.push(listener.clone());
            }
            !present
        };
        // Guard released: a listener's Debug may lock the registry again.
        if !added {
            debug!(target: "authscribe::collector", listener = ?listener, "listener already registered");
        }
        added
    }

    /// Number of distinct registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    /// Listener callbacks that returned an error since construction.
    pub fn failed_notifications(&self) -> u64 {
        self.failed_notifications.load(Ordering::Relaxed)
    }

    /// The scribe every dispatch reports to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Settings the collector was built with.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<Arc<dyn EventLogger>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: ScribeClient> EventCollector<S> {
    /// Collector with default settings and no listeners.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, CollectorConfig::default())
    }

    /// Collector with explicit settings and no listeners.
    pub fn with_config(sink: S, config: CollectorConfig) -> Self {
        Self {
            sink,
            listeners: Mutex::new(Vec::new()),
            config,
            failed_notifications: AtomicU64::new(0),
        }
    }

    /// Scribe `action` and, if it is a milestone, notify listeners.
    ///
    /// `details` is handed to listeners whose milestone callback takes it;
    /// it is ignored otherwise.
    pub fn record(&self, action: AuthAction, details: Option<&EventDetails>) {
        self.scribe(action, None);
        if let Some(milestone) = action.milestone() {
            self.broadcast(milestone, details);
        }
    }

    /// Scribe an exception-kind `action` with the caller's error.
    pub fn record_exception(&self, action: AuthAction, error: &AuthFlowError) {
        self.scribe(action, Some(error));
        if let Some(milestone) = action.milestone() {
            self.broadcast(milestone, None);
        }
    }

    fn scribe(&self, action: AuthAction, error: Option<&AuthFlowError>) {
        let component = action.component();
        debug!(target: "authscribe::collector", action = ?action, component = %component, "dispatch");
        match (action.kind(), error) {
            (ActionKind::Impression, _) => self.sink.impression(component),
            (ActionKind::Click(element), _) => self.sink.click(component, element),
            (ActionKind::Success, _) => self.sink.success(component),
            (ActionKind::Failure, _) => self.sink.failure(component),
            (ActionKind::Exception, Some(error)) => self.sink.error(component, error),
            (ActionKind::Exception, None) => {
                warn!(target: "authscribe::collector", action = ?action, "exception recorded without an error value");
                let placeholder = AuthFlowError::new(format!("{action:?} recorded without error"));
                self.sink.error(component, &placeholder);
            }
        }
        if error.is_some() && action.kind() != ActionKind::Exception {
            warn!(target: "authscribe::collector", action = ?action, "error value ignored for non-exception action");
        }
    }

    fn broadcast(&self, milestone: Milestone, details: Option<&EventDetails>) {
        if milestone.needs_details() && details.is_none() {
            warn!(target: "authscribe::collector", milestone = %milestone, "milestone dispatched without event details; listeners skipped");
            return;
        }

        // Snapshot under the registry guard so a listener registered from
        // inside a callback only sees later events.
        let listeners: Vec<Arc<dyn EventLogger>> = self.lock_listeners().clone();
        for (index, listener) in listeners.iter().enumerate() {
            let Err(e) = logger::notify(listener.as_ref(), milestone, details) else {
                continue;
            };
            self.failed_notifications.fetch_add(1, Ordering::Relaxed);
            warn!(
                target: "authscribe::collector",
                milestone = %milestone,
                listener = index,
                error = %e,
                "listener failed"
            );
            if self.config.failure_policy == ListenerFailurePolicy::StopBroadcast {
                let skipped = listeners.len() - index - 1;
                if skipped > 0 {
                    warn!(target: "authscribe::collector", milestone = %milestone, skipped, "remaining listeners skipped");
                }
                break;
            }
        }
    }

    // Flow as a whole

    /// Scribe [`AuthAction::AuthImpression`].
    pub fn auth_impression(&self, details: &EventDetails) {
        self.record(AuthAction::AuthImpression, Some(details));
    }

    /// Scribe [`AuthAction::AuthSuccess`].
    pub fn auth_success(&self) {
        self.record(AuthAction::AuthSuccess, None);
    }

    /// Scribe [`AuthAction::AuthFailure`].
    pub fn auth_failure(&self) {
        self.record(AuthAction::AuthFailure, None);
    }

    // Phone screen

    /// Scribe [`AuthAction::PhoneImpression`].
    pub fn phone_screen_impression(&self, details: &EventDetails) {
        self.record(AuthAction::PhoneImpression, Some(details));
    }

    /// Scribe [`AuthAction::PhoneCountryCodeClick`].
    pub fn country_code_click_on_phone_screen(&self) {
        self.record(AuthAction::PhoneCountryCodeClick, None);
    }

    /// Scribe [`AuthAction::PhoneSubmitClick`].
    pub fn submit_click_on_phone_screen(&self, details: &EventDetails) {
        self.record(AuthAction::PhoneSubmitClick, Some(details));
    }

    /// Scribe [`AuthAction::PhoneRetryClick`].
    pub fn retry_click_on_phone_screen(&self) {
        self.record(AuthAction::PhoneRetryClick, None);
    }

    /// Scribe [`AuthAction::PhoneSubmitSuccess`].
    pub fn submit_phone_success(&self, details: &EventDetails) {
        self.record(AuthAction::PhoneSubmitSuccess, Some(details));
    }

    /// Scribe [`AuthAction::PhoneSubmitFailure`].
    pub fn submit_phone_failure(&self) {
        self.record(AuthAction::PhoneSubmitFailure, None);
    }

    /// Scribe [`AuthAction::PhoneSubmitException`].
    pub fn submit_phone_exception(&self, error: &AuthFlowError) {
        self.record_exception(AuthAction::PhoneSubmitException, error);
    }

    // Login screen

    /// Scribe [`AuthAction::LoginImpression`].
    pub fn login_screen_impression(&self) {
        self.record(AuthAction::LoginImpression, None);
    }

    /// Scribe [`AuthAction::LoginSubmitClick`].
    pub fn submit_click_on_login_screen(&self) {
        self.record(AuthAction::LoginSubmitClick, None);
    }

    /// Scribe [`AuthAction::LoginResendClick`].
    pub fn resend_click_on_login_screen(&self) {
        self.record(AuthAction::LoginResendClick, None);
    }

    /// Scribe [`AuthAction::LoginCallMeClick`].
    pub fn call_me_click_on_login_screen(&self) {
        self.record(AuthAction::LoginCallMeClick, None);
    }

    /// Scribe [`AuthAction::LoginCodeSuccess`].
    pub fn login_code_success(&self, details: &EventDetails) {
        self.record(AuthAction::LoginCodeSuccess, Some(details));
    }

    /// Scribe [`AuthAction::LoginFailure`].
    pub fn login_failure(&self) {
        self.record(AuthAction::LoginFailure, None);
    }

    /// Scribe [`AuthAction::LoginException`].
    pub fn login_exception(&self, error: &AuthFlowError) {
        self.record_exception(AuthAction::LoginException, error);
    }

    // Signup screen

    /// Scribe [`AuthAction::SignupImpression`].
    pub fn signup_screen_impression(&self) {
        self.record(AuthAction::SignupImpression, None);
    }

    /// Scribe [`AuthAction::SignupSubmitClick`].
    pub fn submit_click_on_signup_screen(&self) {
        self.record(AuthAction::SignupSubmitClick, None);
    }

    /// Scribe [`AuthAction::SignupResendClick`].
    pub fn resend_click_on_signup_screen(&self) {
        self.record(AuthAction::SignupResendClick, None);
    }

    /// Scribe [`AuthAction::SignupCallMeClick`].
    pub fn call_me_click_on_signup_screen(&self) {
        self.record(AuthAction::SignupCallMeClick, None);
    }

    /// Scribe [`AuthAction::SignupSuccess`].
    pub fn signup_success(&self, details: &EventDetails) {
        self.record(AuthAction::SignupSuccess, Some(details));
    }

    /// Scribe [`AuthAction::SignupFailure`].
    pub fn signup_failure(&self) {
        self.record(AuthAction::SignupFailure, None);
    }

    /// Scribe [`AuthAction::SignupException`].
    pub fn signup_exception(&self, error: &AuthFlowError) {
        self.record_exception(AuthAction::SignupException, error);
    }

    // Pin screen

    /// Scribe [`AuthAction::PinImpression`].
    pub fn pin_screen_impression(&self) {
        self.record(AuthAction::PinImpression, None);
    }

    /// Scribe [`AuthAction::PinSubmitClick`].
    pub fn submit_click_on_pin_screen(&self) {
        self.record(AuthAction::PinSubmitClick, None);
    }

    /// Scribe [`AuthAction::PinVerificationSuccess`].
    pub fn two_factor_pin_verification_success(&self) {
        self.record(AuthAction::PinVerificationSuccess, None);
    }

    /// Scribe [`AuthAction::PinVerificationFailure`].
    pub fn two_factor_pin_verification_failure(&self) {
        self.record(AuthAction::PinVerificationFailure, None);
    }

    /// Scribe [`AuthAction::PinVerificationException`].
    pub fn two_factor_pin_verification_exception(&self, error: &AuthFlowError) {
        self.record_exception(AuthAction::PinVerificationException, error);
    }

    // Email screen

    /// Scribe [`AuthAction::EmailImpression`].
    pub fn email_screen_impression(&self) {
        self.record(AuthAction::EmailImpression, None);
    }

    /// Scribe [`AuthAction::EmailSubmitClick`].
    pub fn submit_click_on_email_screen(&self) {
        self.record(AuthAction::EmailSubmitClick, None);
    }

    /// Scribe [`AuthAction::EmailSubmitSuccess`].
    pub fn submit_email_success(&self) {
        self.record(AuthAction::EmailSubmitSuccess, None);
    }

    /// Scribe [`AuthAction::EmailSubmitFailure`].
    pub fn submit_email_failure(&self) {
        self.record(AuthAction::EmailSubmitFailure, None);
    }

    /// Scribe [`AuthAction::EmailSubmitException`].
    pub fn submit_email_exception(&self, error: &AuthFlowError) {
        self.record_exception(AuthAction::EmailSubmitException, error);
    }

    // Contacts screen

    /// Scribe [`AuthAction::ContactsImpression`].
    pub fn contact_screen_impression(&self) {
        self.record(AuthAction::ContactsImpression, None);
    }

    /// Scribe [`AuthAction::ContactsCancelClick`].
    pub fn cancel_click_on_contact_screen(&self) {
        self.record(AuthAction::ContactsCancelClick, None);
    }

    /// Scribe [`AuthAction::ContactsSubmitClick`].
    pub fn submit_click_on_contact_screen(&self) {
        self.record(AuthAction::ContactsSubmitClick, None);
    }

    // Failure screen

    /// Scribe [`AuthAction::FailureImpression`].
    pub fn failure_screen_impression(&self) {
        self.record(AuthAction::FailureImpression, None);
    }

    /// Scribe [`AuthAction::FailureRetryClick`].
    pub fn retry_click_on_failure_screen(&self) {
        self.record(AuthAction::FailureRetryClick, None);
    }

    /// Scribe [`AuthAction::FailureDismissClick`].
    pub fn dismiss_click_on_failure_screen(&self) {
        self.record(AuthAction::FailureDismissClick, None);
    }
}

/// Compares the listener allocations, ignoring vtable pointers.
fn same_listener(a: &Arc<dyn EventLogger>, b: &Arc<dyn EventLogger>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Builder for [`EventCollector`].
pub struct EventCollectorBuilder<S> {
    sink: S,
    listeners: Vec<Arc<dyn EventLogger>>,
    config: CollectorConfig,
}

impl<S> EventCollectorBuilder<S> {
    /// Builder with default settings and no listeners.
    pub fn new(sink: S) -> Self {
        Self { sink, listeners: Vec::new(), config: CollectorConfig::default() }
    }

    /// Register a listener at construction. Duplicates are dropped on build.
    pub fn with_listener(mut self, listener: Arc<dyn EventLogger>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Set the reaction to listener errors.
    pub fn failure_policy(mut self, policy: ListenerFailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Replace all settings at once.
    pub fn config(mut self, config: CollectorConfig) -> Self {
        self.config = config;
        self
    }
}

impl<S: ScribeClient> EventCollectorBuilder<S> {
    /// Build the collector, registering initial listeners in order.
    pub fn build(self) -> EventCollector<S> {
        let collector = EventCollector::with_config(self.sink, self.config);
        for listener in self.listeners {
            collector.add_listener(listener);
        }
        collector
    }
}
