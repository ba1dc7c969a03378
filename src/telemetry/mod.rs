//! Telemetry sinks for auth-flow events.
//!
//! The collector reports every dispatched action to exactly one
//! [`ScribeClient`], addressed by [`Component`](crate::Component) and, for
//! clicks, [`Element`](crate::Element).
//!
//! # Provided scribes
//!
//! - **`NullScribe`**: discards everything
//! - **`LogScribe`**: `tracing` output
//! - **`MemoryScribe`**: bounded in-memory capture for tests and debugging
//! - **`MulticastScribe`**: fan-out to two scribes
//! - **`ServiceScribe`**: non-blocking hand-off to any `tower::Service<ScribeEvent>`

pub mod events;
pub mod sinks;

pub use events::ScribeEvent;
pub use sinks::{LogScribe, MemoryScribe, MulticastScribe, NullScribe, ScribeClient, ServiceScribe};
