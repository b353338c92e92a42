mod utils;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use standin::chat::{ChatPacket, CHAT_TOPIC};
use standin::notify::Notification;
use standin::room::{Room, PARTICIPANT_HEADER};
use standin::session::{AgentState, SessionOptions, ViewUpdates};
use standin::{SessionView, ViewUpdate};
use utils::{next_update, send_json, send_raw, CollectingNotifier, TestSetupBuilder};

fn feed_appended(update: ViewUpdate) -> Option<()> {
    matches!(update, ViewUpdate::FeedAppended { .. }).then_some(())
}

#[tokio::test]
async fn test_knowledge_transfer_flows_from_bridge_to_feed() {
    let setup = TestSetupBuilder::new().build();

    let (status, started) = send_json(&setup.app, "POST", "/rooms/room-123/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["started"], true);

    let view = setup.state.sessions.get("room-123").await.unwrap();
    let mut updates = view.updates().subscribe();

    let packet = json!({
        "type": "knowledgeTransfer",
        "narrative": "Deploys are frozen until Friday",
        "extraData": {"diagram": "graph TD; A-->B", "reference": "runbook.md"},
        "owner": "platform-team",
        "from": "spoofed",
        "ts": 1
    });
    let (status, ack) = send_raw(
        &setup.app,
        "/bridge/rooms/room-123/data",
        &[(PARTICIPANT_HEADER, "agent-1")],
        packet.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ack["delivered"].as_u64().unwrap() >= 1);

    next_update(&mut updates, feed_appended).await;

    let (status, feed) = send_json(&setup.app, "GET", "/rooms/room-123/feed", None).await;
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["type"], "knowledgeTransfer");
    assert_eq!(feed[0]["from"], "agent-1");
    assert_eq!(feed[0]["narrative"], "Deploys are frozen until Friday");
    assert_eq!(feed[0]["extraData"]["diagram"], "graph TD; A-->B");
    assert_eq!(feed[0]["owner"], "platform-team");
    assert!(feed[0]["ts"].as_i64().unwrap() > 1);
}

#[tokio::test]
async fn test_unusable_packets_leave_feed_unchanged() {
    let setup = TestSetupBuilder::new().build();
    let view = setup.start_session().await;
    let mut updates = view.updates().subscribe();

    let uri = "/bridge/rooms/room-123/data";
    send_raw(&setup.app, uri, &[], "not json at all").await;
    send_raw(&setup.app, uri, &[], vec![0xff_u8, 0xfe, 0xfd]).await;
    send_raw(&setup.app, uri, &[], r#"{"type": "agentThought", "text": "hmm"}"#).await;
    send_raw(&setup.app, uri, &[], r#"{"narrative": "no type here"}"#).await;
    send_raw(&setup.app, uri, &[], r#"[1, 2, 3]"#).await;

    // Events are handled in order, so once this one lands the rest were seen
    send_raw(
        &setup.app,
        uri,
        &[],
        r#"{"type": "knowledgeTransfer", "narrative": "marker"}"#,
    )
    .await;
    next_update(&mut updates, feed_appended).await;

    let feed = view.feed().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].narrative, "marker");
}

#[tokio::test]
async fn test_second_presentation_message_replaces_first() {
    let setup = TestSetupBuilder::new().build();
    let view = setup.start_session().await;
    let mut updates = view.updates().subscribe();

    let uri = "/bridge/rooms/room-123/streams/presentation";
    let (status, _) = send_raw(
        &setup.app,
        uri,
        &[],
        r#"{"heading": "Agenda", "bullets": ["Intro", "Roadmap"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    send_raw(&setup.app, uri, &[], r#"{"heading": "Q&A"}"#).await;

    let slide_changed = |update: ViewUpdate| match update {
        ViewUpdate::SlideChanged { slide } => Some(slide),
        _ => None,
    };
    next_update(&mut updates, slide_changed).await;
    let last = next_update(&mut updates, slide_changed).await;
    assert_eq!(last.heading, "Q&A");

    let (_, slide) = send_json(&setup.app, "GET", "/rooms/room-123/slide", None).await;
    assert_eq!(slide, json!({"heading": "Q&A", "bullets": []}));
}

#[tokio::test]
async fn test_chat_sent_over_http_is_published_to_room() {
    let setup = TestSetupBuilder::new().build();
    let room = setup.room().await;
    let mut published = room.subscribe_published();
    setup.start_session().await;

    let (status, message) = send_json(
        &setup.app,
        "POST",
        "/rooms/room-123/chat",
        Some(json!({"message": "What changed since last week?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message["role"], "user");

    let sent = published.recv().await.unwrap();
    assert_eq!(sent.topic.as_deref(), Some(CHAT_TOPIC));
    let packet: ChatPacket = serde_json::from_slice(&sent.payload).unwrap();
    assert_eq!(packet.message, "What changed since last week?");
    assert_eq!(packet.id, message["id"].as_str().unwrap());

    let (_, chat) = send_json(&setup.app, "GET", "/rooms/room-123/chat", None).await;
    assert_eq!(chat.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bridged_transcription_is_merged_into_chat() {
    let setup = TestSetupBuilder::new().build();
    let view = setup.start_session().await;
    let mut updates = view.updates().subscribe();

    let segment = |text: &str, is_final: bool| {
        json!({
            "id": "seg-1",
            "text": text,
            "first_received_time": 1_700_000_000_000_i64,
            "is_final": is_final,
            "role": "assistant"
        })
    };
    let uri = "/bridge/rooms/room-123/transcriptions";
    send_json(&setup.app, "POST", uri, Some(segment("Hello every", false))).await;
    send_json(&setup.app, "POST", uri, Some(segment("Hello everyone.", true))).await;

    let chat_updated = |update: ViewUpdate| match update {
        ViewUpdate::ChatUpdated { message } => Some(message),
        _ => None,
    };
    next_update(&mut updates, chat_updated).await;
    next_update(&mut updates, chat_updated).await;

    let chat = view.chat_messages().await;
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].text, "Hello everyone.");
}

#[tokio::test]
async fn test_snapshot_reports_agent_state_from_bridge() {
    let setup = TestSetupBuilder::new().build();
    setup.start_session().await;

    let (status, _) = send_json(
        &setup.app,
        "PUT",
        "/bridge/rooms/room-123/agent-state",
        Some(json!({"state": "speaking"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, snapshot) = send_json(&setup.app, "GET", "/rooms/room-123/session", None).await;
    assert_eq!(snapshot["agent_state"], "speaking");
    assert_eq!(snapshot["session_started"], true);
    assert_eq!(snapshot["connected"], true);
}

#[tokio::test(start_paused = true)]
async fn test_agent_that_never_joins_ends_session() {
    let setup = TestSetupBuilder::new().build();
    let room = setup.room().await;
    let view = setup.start_session().await;
    let mut updates = view.updates().subscribe();

    tokio::time::advance(Duration::from_secs(20)).await;

    let notification = next_update(&mut updates, |update| match update {
        ViewUpdate::Notification { notification } => Some(notification),
        _ => None,
    })
    .await;
    assert_eq!(
        notification,
        Notification::new("Session ended", "Agent did not join the room.")
    );

    tokio::time::advance(Duration::from_secs(60)).await;
    tokio::task::yield_now().await;
    assert_eq!(room.disconnect_calls(), 1);
    assert!(!room.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_agent_listening_before_deadline_keeps_session() {
    let room = Arc::new(standin::LocalRoom::new("room-123"));
    let notifier = Arc::new(CollectingNotifier::new());
    let view = SessionView::mount(
        room.clone(),
        SessionOptions::default(),
        ViewUpdates::new(),
        notifier.clone(),
    );
    assert!(view.start_session().await);

    tokio::time::advance(Duration::from_secs(19)).await;
    room.set_agent_state(AgentState::Listening);
    tokio::time::advance(Duration::from_secs(30)).await;
    tokio::task::yield_now().await;

    assert!(notifier.notifications().is_empty());
    assert_eq!(room.disconnect_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_before_deadline_suppresses_timeout() {
    let setup = TestSetupBuilder::new().build();
    let room = setup.room().await;
    setup.start_session().await;

    tokio::time::advance(Duration::from_secs(10)).await;
    let (status, _) = send_json(&setup.app, "DELETE", "/rooms/room-123/session", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    tokio::time::advance(Duration::from_secs(30)).await;
    tokio::task::yield_now().await;

    assert_eq!(room.disconnect_calls(), 0);
    assert!(room.registered_topics().is_empty());
    let (status, _) = send_json(&setup.app, "GET", "/rooms/room-123/feed", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_config_and_backend_errors() {
    let setup = TestSetupBuilder::new().build();

    let (status, config) = send_json(&setup.app, "GET", "/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(config["startButtonText"], "Join call");

    let (status, error) = send_json(&setup.app, "GET", "/meetings/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error["error"].is_string());
}
