#![allow(clippy::unwrap_used)]
// Snapshot-resolved actions.

mod support;

use std::collections::HashMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use stagehand_api::{Action, Endpoint, MessageToken, TimerOperation};
use stagehand_core::{Bridge, Controls};
use support::{FakeRemote, config, item, seed_static, status_line};

fn bridge(remote: &Arc<FakeRemote>) -> Bridge<FakeRemote> {
    Bridge::with_remote(Arc::clone(remote), config(), None)
}

fn controls(bridge: &Bridge<FakeRemote>) -> &Controls<FakeRemote> {
    bridge.controls()
}

// ── Looks ───────────────────────────────────────────────────────────

#[tokio::test]
async fn select_look_triggers_by_uuid() {
    let remote = FakeRemote::new();
    let bridge = bridge(&remote);
    bridge.live().handle_line(&status_line(
        "looks",
        &json!([item("look-1", "Worship"), item("look-2", "Sermon")]),
    ));

    assert!(controls(&bridge).select_look("Sermon").await.unwrap());
    assert_eq!(remote.executed(), vec![Action::TriggerLook("look-2".into())]);
}

#[tokio::test]
async fn unknown_look_is_a_logged_no_op() {
    let remote = FakeRemote::new();
    let bridge = bridge(&remote);

    assert!(!controls(&bridge).select_look("Missing").await.unwrap());
    assert!(remote.executed().is_empty());
}

#[tokio::test]
async fn concurrent_look_selections_both_complete() {
    let remote = FakeRemote::new();
    let bridge = bridge(&remote);
    bridge.live().handle_line(&status_line(
        "looks",
        &json!([item("look-1", "Worship"), item("look-2", "Sermon")]),
    ));

    let c = controls(&bridge);
    let (a, b) = tokio::join!(c.select_look("Worship"), c.select_look("Sermon"));
    assert!(a.unwrap() && b.unwrap());
    assert_eq!(
        remote.executed(),
        vec![
            Action::TriggerLook("look-1".into()),
            Action::TriggerLook("look-2".into()),
        ]
    );
}

// ── Messages ────────────────────────────────────────────────────────

#[tokio::test]
async fn show_message_resolves_by_name_and_fills_tokens() {
    let remote = FakeRemote::new();
    remote.json(
        Endpoint::Message("msg-1".into()),
        json!({
            "id": { "uuid": "msg-1", "name": "Nursery" },
            "tokens": [
                { "name": "Number", "text": { "text": "000" } },
                { "name": "Room", "text": { "text": "A" } }
            ]
        }),
    );
    let bridge = bridge(&remote);
    bridge
        .live()
        .handle_line(&status_line("messages", &json!([item("msg-1", "Nursery")])));

    let overrides = HashMap::from([("Number".to_owned(), "142".to_owned())]);
    assert!(controls(&bridge).show_message("Nursery", &overrides).await.unwrap());

    assert_eq!(
        remote.executed(),
        vec![Action::TriggerMessage {
            id: "msg-1".into(),
            tokens: vec![MessageToken::new("Number", "142"), MessageToken::new("Room", "A")],
        }]
    );
}

#[tokio::test]
async fn unknown_message_is_a_logged_no_op() {
    let remote = FakeRemote::new();
    let bridge = bridge(&remote);

    assert!(!controls(&bridge).show_message("Nope", &HashMap::new()).await.unwrap());
    assert!(!controls(&bridge).clear_message("Nope").await.unwrap());
    assert!(remote.executed().is_empty());
}

#[tokio::test]
async fn clear_message_by_uuid() {
    let remote = FakeRemote::new();
    let bridge = bridge(&remote);
    bridge
        .live()
        .handle_line(&status_line("messages", &json!([item("msg-1", "Nursery")])));

    assert!(controls(&bridge).clear_message("msg-1").await.unwrap());
    assert_eq!(remote.executed(), vec![Action::ClearMessage("msg-1".into())]);
}

// ── Timers and cache ────────────────────────────────────────────────

#[tokio::test]
async fn timer_resolves_from_static_snapshot() {
    let remote = FakeRemote::new();
    seed_static(&remote);
    let bridge = bridge(&remote);
    assert!(!controls(&bridge).timer("Countdown", TimerOperation::Start).await.unwrap());

    bridge.static_sync().refresh().await.unwrap();
    assert!(controls(&bridge).timer("Countdown", TimerOperation::Start).await.unwrap());
    assert!(controls(&bridge).timer("t-1", TimerOperation::Reset).await.unwrap());

    assert_eq!(
        remote.executed(),
        vec![
            Action::Timer {
                id: "t-1".into(),
                operation: TimerOperation::Start,
            },
            Action::Timer {
                id: "t-1".into(),
                operation: TimerOperation::Reset,
            },
        ]
    );
}

#[tokio::test]
async fn refresh_presentation_cache_refetches_playlists() {
    let remote = FakeRemote::new();
    seed_static(&remote);
    let bridge = bridge(&remote);
    bridge.static_sync().refresh().await.unwrap();

    controls(&bridge).refresh_presentation_cache().await;

    assert_eq!(remote.fetch_count(&Endpoint::PresentationPlaylists), 2);
    assert_eq!(remote.fetch_count(&Endpoint::Version), 2);
}

#[tokio::test]
async fn slide_navigation() {
    let remote = FakeRemote::new();
    let bridge = bridge(&remote);

    controls(&bridge).next_slide().await.unwrap();
    controls(&bridge).previous_slide().await.unwrap();
    assert_eq!(remote.executed(), vec![Action::NextSlide, Action::PreviousSlide]);
}

// ── Bridge ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn connect_fails_when_first_static_refresh_fails() {
    let remote = FakeRemote::new();
    remote.fail(Endpoint::Version);
    let bridge = bridge(&remote);

    assert!(bridge.connect().await.is_err());
    assert!(remote.opens().is_empty());
    assert_eq!(remote.fetch_count(&Endpoint::Messages), 0);
}

#[tokio::test(start_paused = true)]
async fn connect_bootstraps_then_streams() {
    let remote = FakeRemote::new();
    seed_static(&remote);
    remote.json(Endpoint::Messages, json!([item("msg-1", "Nursery")]));
    let bridge = bridge(&remote);

    bridge.connect().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;

    assert_eq!(bridge.live_snapshot().messages.len(), 1);
    assert_eq!(remote.opens().len(), 1);
    assert!(bridge.is_available());

    bridge.shutdown().await;
    bridge.shutdown().await;
    assert!(!bridge.is_available());
}
