//! Convenient re-exports for common authscribe types.
pub use crate::{
    action::AuthAction,
    collector::{EventCollector, ListenerFailurePolicy},
    details::EventDetails,
    error::{AuthFlowError, LoggerError},
    logger::EventLogger,
    taxonomy::{Component, Element},
    telemetry::{LogScribe, MemoryScribe, ScribeClient, ScribeEvent},
};
