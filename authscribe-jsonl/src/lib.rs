//! JSONL scribe service for `authscribe`. Writes one event per line.
//! Always appends; bring your own path.
//!
//! Pair it with `ServiceScribe` so file I/O stays off the collector's thread:
//!
//! ```rust,no_run
//! use authscribe::telemetry::ServiceScribe;
//! use authscribe::EventCollector;
//! use authscribe_jsonl::JsonlScribe;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let scribe = ServiceScribe::with_capacity(JsonlScribe::new("/var/log/auth-events.jsonl"), 1024);
//! let collector = EventCollector::new(scribe);
//! collector.login_screen_impression();
//! # }
//! ```

use authscribe::telemetry::ScribeEvent;
use serde_json::{json, Map, Value};
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

/// `Service<ScribeEvent>` writing one JSON object per line.
#[derive(Clone, Debug)]
pub struct JsonlScribe {
    path: PathBuf,
}

impl JsonlScribe {
    /// Scribe appending to `path`; the file is created on first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// File the scribe appends to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl tower_service::Service<ScribeEvent> for JsonlScribe {
    type Response = ();
    type Error = io::Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<(), Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: ScribeEvent) -> Self::Future {
        let path = self.path.clone();
        let line = event_to_json(&event).to_string() + "\n";
        tracing::trace!(target: "authscribe::jsonl", kind = event.kind(), "append");
        Box::pin(async move {
            use tokio::io::AsyncWriteExt;
            let mut file =
                tokio::fs::OpenOptions::new().create(true).append(true).open(path).await?;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
            Ok(())
        })
    }
}

/// JSON object for one event: `kind`, `component`, plus `element` for clicks
/// and `error` / `code` for errors.
pub fn event_to_json(event: &ScribeEvent) -> Value {
    let mut object = Map::new();
    object.insert("kind".into(), json!(event.kind()));
    object.insert("component".into(), json!(event.component().as_str()));
    match event {
        ScribeEvent::Click { element, .. } => {
            object.insert("element".into(), json!(element.as_str()));
        }
        ScribeEvent::Error { error, .. } => {
            object.insert("error".into(), json!(error.message()));
            if let Some(code) = error.code() {
                object.insert("code".into(), json!(code));
            }
        }
        ScribeEvent::Impression { .. } | ScribeEvent::Success { .. } | ScribeEvent::Failure { .. } => {}
    }
    Value::Object(object)
}
