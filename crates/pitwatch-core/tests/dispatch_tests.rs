//! Feed scenarios driven through encoded frames.
//!
//! Each test builds wire frames with `Event::encode`, pushes them through
//! `Dispatcher::handle_datagram`, and checks the resulting store state.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pitwatch_core::{Dispatcher, PollTrigger, ServerSnapshot, ServerState, SessionType};
use pitwatch_protocol::{
    ConnectionClosed, DecodeError, Event, EventKind, LapCompleted, NewConnection, NewSession,
    SessionInfo, SlotInfo,
};

fn setup() -> (Dispatcher, PollTrigger) {
    let trigger = PollTrigger::new();
    let dispatcher = Dispatcher::new(Arc::new(ServerState::new()), trigger.clone());
    (dispatcher, trigger)
}

fn connect(slot: u8, name: &str) -> Event {
    Event::NewConnection(NewConnection {
        driver_name: name.to_owned(),
        driver_guid: format!("guid-{name}"),
        slot,
        model_id: 5,
        skin_id: 0,
    })
}

fn close(slot: u8, name: &str) -> Event {
    Event::ConnectionClosed(ConnectionClosed {
        driver_name: name.to_owned(),
        slot,
    })
}

fn slot_info(slot: u8, connected: bool, model: &str, name: &str) -> Event {
    Event::SlotInfo(SlotInfo {
        slot,
        connected,
        model: model.to_owned(),
        skin: "00_default".to_owned(),
        driver_name: name.to_owned(),
        driver_guid: format!("guid-{name}"),
    })
}

async fn feed(dispatcher: &Dispatcher, event: &Event) {
    dispatcher.handle_datagram(&event.encode()).await.unwrap();
}

#[tokio::test]
async fn connect_then_close_keeps_driver_name() {
    let (d, _) = setup();
    let frame = Event::NewConnection(NewConnection {
        driver_name: "Alice".to_owned(),
        driver_guid: "g1".to_owned(),
        slot: 3,
        model_id: 5,
        skin_id: 0,
    });

    feed(&d, &frame).await;
    feed(&d, &close(3, "Alice")).await;

    let state = d.state();
    assert_eq!(state.roster.connected_count().await, 0);
    let alice = state.roster.get(3).await.unwrap();
    assert!(!alice.connected);
    assert_eq!(alice.driver_name, "Alice");
    assert_eq!(alice.driver_guid, "g1");

    let counters = state.counters.snapshot();
    assert_eq!(counters.connections, 1);
    assert_eq!(counters.disconnections, 1);
}

#[tokio::test]
async fn short_lap_frame_is_rejected_without_counting() {
    let (d, _) = setup();
    // Tag plus 5 of the 9 required payload bytes.
    let datagram = [9_u8, 3, 0x40, 0x46, 0x01, 0x00];

    let err = d.handle_datagram(&datagram).await.unwrap_err();

    assert_eq!(
        err,
        DecodeError::Insufficient {
            kind: EventKind::LapCompleted,
            need: 9,
            got: 5,
        }
    );
    assert_eq!(d.state().counters.snapshot().laps, 0);
}

#[tokio::test]
async fn every_prefix_of_a_connection_frame_applies_nothing() {
    let (d, _) = setup();
    let frame = connect(4, "Bob").encode();

    for len in 0..frame.len() {
        assert!(d.handle_datagram(frame.get(..len).unwrap()).await.is_err());
    }

    assert_eq!(d.state().counters.snapshot().connections, 0);
    assert!(d.state().roster.get(4).await.is_none());
}

#[tokio::test]
async fn counters_match_processed_events() {
    let (d, _) = setup();
    let events = [
        connect(0, "A"),
        connect(1, "B"),
        close(0, "A"),
        connect(0, "A"),
        close(5, "ghost"),
        Event::LapCompleted(LapCompleted {
            slot: 1,
            lap_time_ms: 90_000,
            cuts: 0,
        }),
    ];
    for event in &events {
        feed(&d, event).await;
    }

    let counters = d.state().counters.snapshot();
    assert_eq!(counters.connections, 3);
    assert_eq!(counters.disconnections, 2);
    assert_eq!(counters.laps, 1);
    assert_eq!(d.state().roster.connected_count().await, 2);
}

#[tokio::test]
async fn slot_info_replaces_and_close_keeps_model() {
    let (d, _) = setup();
    feed(&d, &slot_info(2, true, "ks_ferrari_488_gt3", "Carol")).await;
    feed(&d, &connect(2, "Carol")).await;
    feed(&d, &close(2, "Carol")).await;

    let carol = d.state().roster.get(2).await.unwrap();
    assert!(!carol.connected);
    assert_eq!(carol.model, "ks_ferrari_488_gt3");
    assert_eq!(carol.skin, "00_default");

    feed(&d, &slot_info(2, false, "", "")).await;
    let replaced = d.state().roster.get(2).await.unwrap();
    assert!(replaced.model.is_empty());
    assert!(replaced.driver_name.is_empty());
}

#[tokio::test]
async fn lap_notice_uses_roster_name() {
    let (d, _) = setup();
    feed(&d, &connect(6, "Erin")).await;

    let lap = Event::LapCompleted(LapCompleted {
        slot: 6,
        lap_time_ms: 83_456,
        cuts: 1,
    });
    let notice = d.handle_datagram(&lap.encode()).await.unwrap().unwrap();
    assert_eq!(notice.to_string(), "LAP COMPLETED: Erin - 01:23.456 [1 cuts]");

    let anonymous = Event::LapCompleted(LapCompleted {
        slot: 40,
        lap_time_ms: 61_000,
        cuts: 0,
    });
    let notice = d.handle_datagram(&anonymous.encode()).await.unwrap().unwrap();
    assert_eq!(notice.to_string(), "LAP COMPLETED: Slot #40 - 01:01.000");
}

#[tokio::test]
async fn connect_notice_uses_snapshot_capacity() {
    let (d, _) = setup();
    d.state()
        .context
        .store_snapshot(ServerSnapshot {
            max_clients: 24,
            ..ServerSnapshot::default()
        })
        .await;

    let notice = d.handle_datagram(&connect(1, "Finn").encode()).await.unwrap().unwrap();
    assert_eq!(
        notice.to_string(),
        "DRIVER CONNECTED: Finn (Car #1) | Players: 1/24"
    );
}

#[tokio::test]
async fn new_session_updates_context_and_raises_trigger() {
    let (d, trigger) = setup();
    let session = Event::NewSession(NewSession {
        version: 4,
        session_index: 1,
        current_session_index: 1,
        session_count: 3,
        server_name: "Evening Cup".to_owned(),
        track: "ks_nordschleife".to_owned(),
        track_config: "endurance".to_owned(),
    });

    let notice = d.handle_datagram(&session.encode()).await.unwrap().unwrap();

    assert_eq!(
        notice.to_string(),
        "NEW SESSION: Evening Cup on ks_nordschleife (endurance) (session 2/3)"
    );
    let context = d.state().context.session().await;
    assert_eq!(context.server_name, "Evening Cup");
    assert_eq!(context.track, "ks_nordschleife (endurance)");

    tokio::time::timeout(Duration::from_secs(1), trigger.requested())
        .await
        .unwrap();
}

#[tokio::test]
async fn session_info_sets_session_type() {
    let (d, _) = setup();
    let info = Event::SessionInfo(SessionInfo {
        version: 4,
        session_index: 2,
        current_session_index: 2,
        session_count: 3,
        server_name: "Evening Cup".to_owned(),
        session_type: 3,
        duration: 20,
        laps: 0,
        wait_time: 60,
    });

    feed(&d, &info).await;

    let context = d.state().context.session().await;
    assert_eq!(context.server_name, "Evening Cup");
    assert_eq!(context.session_type, Some(SessionType::Race));
}

#[tokio::test]
async fn unknown_kinds_are_dropped_silently() {
    let (d, _) = setup();
    for tag in [2_u8, 6, 8, 13, 255] {
        let notice = d.handle_datagram(&[tag, 1, 2, 3]).await.unwrap();
        assert!(notice.is_none(), "tag {tag}");
    }
    assert!(d.state().roster.participants().await.is_empty());
}
