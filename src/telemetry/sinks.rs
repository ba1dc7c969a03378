use super::events::ScribeEvent;
use crate::error::AuthFlowError;
use crate::taxonomy::{Component, Element};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// The structured telemetry backend the collector reports to.
///
/// Calls are synchronous and must not block: a sink that talks to the network
/// or disk should hand the call off (see [`ServiceScribe`]).
pub trait ScribeClient: Send + Sync {
    fn impression(&self, component: Component);
    fn click(&self, component: Component, element: Element);
    fn success(&self, component: Component);
    fn failure(&self, component: Component);
    fn error(&self, component: Component, error: &AuthFlowError);
}

impl<S: ScribeClient + ?Sized> ScribeClient for Arc<S> {
    fn impression(&self, component: Component) {
        (**self).impression(component)
    }

    fn click(&self, component: Component, element: Element) {
        (**self).click(component, element)
    }

    fn success(&self, component: Component) {
        (**self).success(component)
    }

    fn failure(&self, component: Component) {
        (**self).failure(component)
    }

    fn error(&self, component: Component, error: &AuthFlowError) {
        (**self).error(component, error)
    }
}

impl<S: ScribeClient + ?Sized> ScribeClient for &S {
    fn impression(&self, component: Component) {
        (**self).impression(component)
    }

    fn click(&self, component: Component, element: Element) {
        (**self).click(component, element)
    }

    fn success(&self, component: Component) {
        (**self).success(component)
    }

    fn failure(&self, component: Component) {
        (**self).failure(component)
    }

    fn error(&self, component: Component, error: &AuthFlowError) {
        (**self).error(component, error)
    }
}

/// A no-op scribe that discards all calls.
#[derive(Clone, Debug, Default)]
pub struct NullScribe;

impl ScribeClient for NullScribe {
    fn impression(&self, _component: Component) {}
    fn click(&self, _component: Component, _element: Element) {}
    fn success(&self, _component: Component) {}
    fn failure(&self, _component: Component) {}
    fn error(&self, _component: Component, _error: &AuthFlowError) {}
}

/// A scribe that logs calls using the `tracing` crate.
///
/// Impressions, clicks, successes and failures are logged at INFO; errors at WARN.
#[derive(Clone, Debug, Default)]
pub struct LogScribe;

impl ScribeClient for LogScribe {
    fn impression(&self, component: Component) {
        info!(target: "authscribe::scribe", component = %component, "impression");
    }

    fn click(&self, component: Component, element: Element) {
        info!(target: "authscribe::scribe", component = %component, element = %element, "click");
    }

    fn success(&self, component: Component) {
        info!(target: "authscribe::scribe", component = %component, "success");
    }

    fn failure(&self, component: Component) {
        info!(target: "authscribe::scribe", component = %component, "failure");
    }

    fn error(&self, component: Component, error: &AuthFlowError) {
        warn!(target: "authscribe::scribe", component = %component, error = %error, "error");
    }
}

/// A scribe that stores calls in memory.
///
/// Useful for testing and debugging. Clones share the same buffer.
///
/// ```rust
/// use authscribe::telemetry::{MemoryScribe, ScribeClient, ScribeEvent};
/// use authscribe::Component;
///
/// let scribe = MemoryScribe::new();
/// scribe.impression(Component::Login);
/// assert_eq!(scribe.events(), vec![ScribeEvent::Impression { component: Component::Login }]);
/// ```
#[derive(Clone, Debug)]
pub struct MemoryScribe {
    events: Arc<Mutex<VecDeque<ScribeEvent>>>,
    capacity: usize,
    evicted: Arc<AtomicU64>,
}

impl MemoryScribe {
    /// Creates a bounded memory scribe (default cap: 10,000).
    /// Oldest events are evicted when capacity is exceeded.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Creates a bounded memory scribe with explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
            evicted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns a snapshot of all events received so far.
    pub fn events(&self) -> Vec<ScribeEvent> {
        self.lock().iter().cloned().collect()
    }

    /// Clears all stored events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of events currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no events are held.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum events kept before the oldest is evicted.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of evicted events.
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ScribeEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: ScribeEvent) {
        let mut guard = self.lock();
        if guard.len() >= self.capacity {
            guard.pop_front();
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }
        guard.push_back(event);
    }
}

impl Default for MemoryScribe {
    fn default() -> Self {
        Self::new()
    }
}

impl ScribeClient for MemoryScribe {
    fn impression(&self, component: Component) {
        self.push(ScribeEvent::Impression { component });
    }

    fn click(&self, component: Component, element: Element) {
        self.push(ScribeEvent::Click { component, element });
    }

    fn success(&self, component: Component) {
        self.push(ScribeEvent::Success { component });
    }

    fn failure(&self, component: Component) {
        self.push(ScribeEvent::Failure { component });
    }

    fn error(&self, component: Component, error: &AuthFlowError) {
        self.push(ScribeEvent::Error { component, error: error.clone() });
    }
}

/// Hands scribe calls to a `tower::Service<ScribeEvent>` running on a worker task.
///
/// The collector's thread never waits on the service: events go through a
/// bounded queue, and events that don't fit are dropped and counted.
/// Must be created inside a Tokio runtime.
#[derive(Clone, Debug)]
pub struct ServiceScribe {
    tx: mpsc::Sender<ScribeEvent>,
    dropped: Arc<AtomicU64>,
}

impl ServiceScribe {
    /// Spawn the worker that drives `service`, with a queue of `capacity` events.
    pub fn with_capacity<S>(service: S, capacity: usize) -> Self
    where
        S: tower_service::Service<ScribeEvent, Response = ()> + Send + 'static,
        S::Error: std::error::Error + Send + 'static,
        S::Future: Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<ScribeEvent>(capacity.max(1));

        tokio::spawn(async move {
            use tower::ServiceExt;
            let mut service = service;
            while let Some(event) = rx.recv().await {
                let kind = event.kind();
                match service.ready().await {
                    Ok(ready) => {
                        if let Err(e) = ready.call(event).await {
                            warn!(target: "authscribe::scribe", kind, error = %e, "scribe service call failed");
                        }
                    }
                    Err(e) => {
                        warn!(target: "authscribe::scribe", kind, error = %e, "scribe service not ready");
                    }
                }
            }
        });

        Self { tx, dropped: Arc::new(AtomicU64::new(0)) }
    }

    /// How many events were dropped because the queue was full or the worker exited.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn push(&self, event: ScribeEvent) {
        if self.tx.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl ScribeClient for ServiceScribe {
    fn impression(&self, component: Component) {
        self.push(ScribeEvent::Impression { component });
    }

    fn click(&self, component: Component, element: Element) {
        self.push(ScribeEvent::Click { component, element });
    }

    fn success(&self, component: Component) {
        self.push(ScribeEvent::Success { component });
    }

    fn failure(&self, component: Component) {
        self.push(ScribeEvent::Failure { component });
    }

    fn error(&self, component: Component, error: &AuthFlowError) {
        self.push(ScribeEvent::Error { component, error: error.clone() });
    }
}

/// Forwards every call to two scribes, `first` then `second`.
///
/// ```rust
/// use authscribe::telemetry::{LogScribe, MemoryScribe, MulticastScribe};
///
/// let memory = MemoryScribe::new();
/// let combined = MulticastScribe::new(LogScribe, memory.clone());
/// // Both scribes receive all calls
/// ```
#[derive(Clone, Debug)]
pub struct MulticastScribe<A, B> {
    first: A,
    second: B,
}

impl<A, B> MulticastScribe<A, B> {
    /// Fan out to `first`, then `second`.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> ScribeClient for MulticastScribe<A, B>
where
    A: ScribeClient,
    B: ScribeClient,
{
    fn impression(&self, component: Component) {
        self.first.impression(component);
        self.second.impression(component);
    }

    fn click(&self, component: Component, element: Element) {
        self.first.click(component, element);
        self.second.click(component, element);
    }

    fn success(&self, component: Component) {
        self.first.success(component);
        self.second.success(component);
    }

    fn failure(&self, component: Component) {
        self.first.failure(component);
        self.second.failure(component);
    }

    fn error(&self, component: Component, error: &AuthFlowError) {
        self.first.error(component, error);
        self.second.error(component, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;

    #[test]
    fn test_null_scribe() {
        let scribe = NullScribe;
        scribe.impression(Component::Auth);
        scribe.error(Component::Pin, &AuthFlowError::new("ignored"));
    }

    #[test]
    fn test_log_scribe() {
        let scribe = LogScribe;
        scribe.click(Component::Failure, Element::Dismiss);
        scribe.error(Component::Email, &AuthFlowError::new("bad address"));
    }

    #[test]
    fn test_memory_scribe_evicts_oldest() {
        let scribe = MemoryScribe::with_capacity(2);
        assert!(scribe.is_empty());
        assert_eq!(scribe.capacity(), 2);

        scribe.impression(Component::Auth);
        scribe.click(Component::Auth, Element::Submit);
        scribe.success(Component::Auth); // should evict oldest

        assert_eq!(scribe.len(), 2);
        assert_eq!(scribe.evicted(), 1);
        assert_eq!(
            scribe.events(),
            vec![
                ScribeEvent::Click { component: Component::Auth, element: Element::Submit },
                ScribeEvent::Success { component: Component::Auth },
            ]
        );

        scribe.clear();
        assert!(scribe.is_empty());
    }

    #[test]
    fn test_memory_scribe_zero_capacity_is_clamped() {
        let scribe = MemoryScribe::with_capacity(0);
        scribe.failure(Component::Login);
        assert_eq!(scribe.len(), 1);
    }

    #[test]
    fn test_memory_scribe_clones_share_buffer() {
        let scribe = MemoryScribe::new();
        let clone = scribe.clone();
        clone.failure(Component::Signup);
        assert_eq!(scribe.events(), vec![ScribeEvent::Failure { component: Component::Signup }]);
    }

    #[test]
    fn test_multicast_reaches_both() {
        let a = MemoryScribe::new();
        let b = MemoryScribe::new();
        let combined = MulticastScribe::new(a.clone(), b.clone());
        let err = AuthFlowError::with_code("timeout", 32);

        combined.error(Component::Login, &err);
        combined.impression(Component::Contacts);

        let expected = vec![
            ScribeEvent::Error { component: Component::Login, error: err.clone() },
            ScribeEvent::Impression { component: Component::Contacts },
        ];
        assert_eq!(a.events(), expected);
        assert_eq!(b.events(), expected);
    }

    fn report_success<S: ScribeClient>(scribe: S, component: Component) {
        scribe.success(component);
    }

    #[test]
    fn test_arc_and_ref_forward() {
        let memory = MemoryScribe::new();
        let shared: Arc<dyn ScribeClient> = Arc::new(memory.clone());
        report_success(shared, Component::Email);
        report_success(&memory, Component::Pin);
        assert_eq!(memory.len(), 2);
    }

    #[derive(Clone)]
    struct Forward(mpsc::UnboundedSender<ScribeEvent>);

    impl tower::Service<ScribeEvent> for Forward {
        type Response = ();
        type Error = Infallible;
        type Future = Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, event: ScribeEvent) -> Self::Future {
            let _ = self.0.send(event);
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn test_service_scribe_delivers_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scribe = ServiceScribe::with_capacity(Forward(tx), 8);

        scribe.impression(Component::Pin);
        scribe.click(Component::Pin, Element::Submit);

        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(first, Some(ScribeEvent::Impression { component: Component::Pin }));
        assert_eq!(
            second,
            Some(ScribeEvent::Click { component: Component::Pin, element: Element::Submit })
        );
        assert_eq!(scribe.dropped(), 0);
    }
}
