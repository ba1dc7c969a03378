#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # authscribe
//!
//! Analytics event dispatch for multi-screen authentication flows.
//!
//! Screen controllers call one [`EventCollector`] method per lifecycle event
//! (impression, click, success, failure, exception). The collector turns each
//! call into:
//!
//! - exactly one call on a [`ScribeClient`](telemetry::ScribeClient), addressed
//!   by a fixed [`Component`] / [`Element`] taxonomy, and
//! - for business milestones only, a synchronous broadcast to every registered
//!   [`EventLogger`], in registration order.
//!
//! ## Quick Start
//!
//! ```rust
//! use authscribe::telemetry::{MemoryScribe, ScribeEvent};
//! use authscribe::{Component, EventCollector, EventDetails, EventLogger, LoggerError};
//! use std::sync::Arc;
//! use std::time::SystemTime;
//!
//! #[derive(Debug)]
//! struct Funnel;
//!
//! impl EventLogger for Funnel {
//!     fn phone_number_submit(&self, _details: &EventDetails) -> Result<(), LoggerError> {
//!         Ok(())
//!     }
//! }
//!
//! let scribe = MemoryScribe::new();
//! let collector = EventCollector::new(scribe.clone());
//! collector.add_listener(Arc::new(Funnel));
//!
//! let started = SystemTime::now();
//! let details = EventDetails::builder()
//!     .with_auth_start_time(started)
//!     .with_current_time(started)
//!     .build()
//!     .unwrap();
//! collector.phone_screen_impression(&details);
//!
//! assert_eq!(scribe.events(), vec![ScribeEvent::Impression { component: Component::Auth }]);
//! ```

pub mod action;
pub mod clock;
pub mod collector;
pub mod details;
pub mod error;
pub mod logger;
pub mod prelude;
pub mod taxonomy;
pub mod telemetry;

// Re-exports
pub use action::{ActionKind, AuthAction, Milestone};
pub use clock::{Clock, FixedClock, SystemClock};
pub use collector::{CollectorConfig, EventCollector, EventCollectorBuilder, ListenerFailurePolicy};
pub use details::{EventDetails, EventDetailsBuilder};
pub use error::{AuthFlowError, BuildError, LoggerError};
pub use logger::EventLogger;
pub use taxonomy::{Component, Element};
