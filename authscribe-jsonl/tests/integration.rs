use authscribe::telemetry::{ScribeEvent, ServiceScribe};
use authscribe::{Component, Element, EventCollector};
use authscribe_jsonl::JsonlScribe;
use std::time::Duration;
use tower_service::Service;

#[tokio::test]
async fn writes_json_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.jsonl");
    let mut scribe = JsonlScribe::new(&path);

    scribe
        .call(ScribeEvent::Click { component: Component::Failure, element: Element::Retry })
        .await
        .unwrap();
    scribe.call(ScribeEvent::Impression { component: Component::Login }).await.unwrap();

    let contents = std::fs::read_to_string(&path).expect("file");
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"retry\""));
    assert!(lines[1].contains("\"login\""));
}

#[tokio::test]
async fn collector_writes_through_service_scribe() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flow.jsonl");
    let collector =
        EventCollector::new(ServiceScribe::with_capacity(JsonlScribe::new(&path), 16));

    collector.signup_screen_impression();
    collector.resend_click_on_signup_screen();

    let mut contents = String::new();
    for _ in 0..100 {
        contents = std::fs::read_to_string(&path).unwrap_or_default();
        if contents.lines().count() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "contents: {contents}");
    assert!(lines[0].contains("\"impression\""));
    assert!(lines[1].contains("\"resend\""));
}
