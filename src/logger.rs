//! Pluggable milestone listeners.
//!
//! An [`EventLogger`] hears only business-level milestones (login began,
//! phone number submitted, ...), never raw clicks. Every method has a no-op
//! default so implementations override just the milestones they care about.
//!
//! ```rust
//! use authscribe::{EventDetails, EventLogger, LoggerError};
//!
//! #[derive(Debug)]
//! struct Funnel;
//!
//! impl EventLogger for Funnel {
//!     fn login_begin(&self, details: &EventDetails) -> Result<(), LoggerError> {
//!         println!("flow started at {:?}", details.auth_start_time());
//!         Ok(())
//!     }
//! }
//! ```

use crate::action::Milestone;
use crate::details::EventDetails;
use crate::error::LoggerError;

/// Listener for auth-flow milestones.
pub trait EventLogger: Send + Sync + std::fmt::Debug {
    /// The flow's first screen was shown.
    fn login_begin(&self, _details: &EventDetails) -> Result<(), LoggerError> {
        Ok(())
    }

    /// The user finished authenticating.
    fn login_success(&self) -> Result<(), LoggerError> {
        Ok(())
    }

    /// The phone number screen was shown.
    fn phone_number_impression(&self, _details: &EventDetails) -> Result<(), LoggerError> {
        Ok(())
    }

    /// A phone number was submitted.
    fn phone_number_submit(&self, _details: &EventDetails) -> Result<(), LoggerError> {
        Ok(())
    }

    /// The submitted phone number was accepted.
    fn phone_number_success(&self, _details: &EventDetails) -> Result<(), LoggerError> {
        Ok(())
    }

    /// A returning user's login code was verified.
    fn login_code_success(&self, _details: &EventDetails) -> Result<(), LoggerError> {
        Ok(())
    }

    /// A new account was created.
    fn signup_success(&self, _details: &EventDetails) -> Result<(), LoggerError> {
        Ok(())
    }
}

/// Invoke the callback matching `milestone` on `logger`.
///
/// `details` is ignored by milestones that don't take it. Returns
/// [`LoggerError::Rejected`] if a details-bearing milestone arrives without
/// details.
pub(crate) fn notify(
    logger: &dyn EventLogger,
    milestone: Milestone,
    details: Option<&EventDetails>,
) -> Result<(), LoggerError> {
    let missing =
        || LoggerError::Rejected(format!("{milestone} dispatched without event details"));
    match milestone {
        Milestone::LoginSuccess => logger.login_success(),
        Milestone::LoginBegin => logger.login_begin(details.ok_or_else(missing)?),
        Milestone::PhoneNumberImpression => {
            logger.phone_number_impression(details.ok_or_else(missing)?)
        }
        Milestone::PhoneNumberSubmit => logger.phone_number_submit(details.ok_or_else(missing)?),
        Milestone::PhoneNumberSuccess => logger.phone_number_success(details.ok_or_else(missing)?),
        Milestone::LoginCodeSuccess => logger.login_code_success(details.ok_or_else(missing)?),
        Milestone::SignupSuccess => logger.signup_success(details.ok_or_else(missing)?),
    }
}
