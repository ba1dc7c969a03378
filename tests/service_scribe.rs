use authscribe::telemetry::{ScribeEvent, ServiceScribe};
use authscribe::{AuthFlowError, Component, Element, EventCollector};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn collector_feeds_service_through_worker() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let service = tower::service_fn(move |event: ScribeEvent| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(event);
            Ok::<_, Infallible>(())
        }
    });
    let collector = EventCollector::new(ServiceScribe::with_capacity(service, 16));
    let err = AuthFlowError::with_code("invalid pin", 236);

    collector.pin_screen_impression();
    collector.submit_click_on_pin_screen();
    collector.two_factor_pin_verification_exception(&err);

    let mut received = Vec::new();
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("worker delivered")
            .expect("channel open");
        received.push(event);
    }
    assert_eq!(
        received,
        vec![
            ScribeEvent::Impression { component: Component::Pin },
            ScribeEvent::Click { component: Component::Pin, element: Element::Submit },
            ScribeEvent::Error { component: Component::Pin, error: err },
        ]
    );
    assert_eq!(collector.sink().dropped(), 0);
}

#[tokio::test]
async fn full_queue_drops_and_counts() {
    let service = tower::service_fn(|_event: ScribeEvent| async { Ok::<_, Infallible>(()) });
    let scribe = ServiceScribe::with_capacity(service, 1);

    // The worker can't run until this test yields, so only one event fits.
    let collector = EventCollector::new(scribe.clone());
    collector.email_screen_impression();
    collector.submit_click_on_email_screen();
    collector.submit_email_success();

    assert_eq!(scribe.dropped(), 2);
}

#[tokio::test]
async fn failing_service_does_not_stop_the_worker() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let service = tower::service_fn(move |event: ScribeEvent| {
        let tx = tx.clone();
        async move {
            if event.component() == Component::Failure {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "backend down"));
            }
            let _ = tx.send(event);
            Ok(())
        }
    });
    let collector = EventCollector::new(ServiceScribe::with_capacity(service, 8));

    collector.failure_screen_impression();
    collector.contact_screen_impression();

    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("worker delivered")
        .expect("channel open");
    assert_eq!(event, ScribeEvent::Impression { component: Component::Contacts });
}
