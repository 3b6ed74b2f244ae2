//! Integration tests for the input → debounce → fan-out pipeline.
//!
//! These tests drive a full `Relay` with in-memory viewer sessions:
//! 1. Bounces are suppressed and spaced edges are delivered in order
//! 2. Every registered viewer receives every event
//! 3. A failing viewer is dropped without affecting the others
//! 4. Registry churn during broadcasts stays consistent

use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::mpsc;

use button_relay::adapters::gpio::SimulatedSource;
use button_relay::adapters::websocket::{ClientSession, Payload, SessionSettings};
use button_relay::application::Relay;
use button_relay::config::PinMapping;
use button_relay::domain::button::{DebounceConfig, Level, RawTransition};
use button_relay::domain::foundation::{ButtonId, ClientId, Timestamp};
use button_relay::ports::ButtonEventPublisher;

// =============================================================================
// Test Infrastructure
// =============================================================================

const BUTTON_1: ButtonId = ButtonId::new(1);
const BUTTON_2: ButtonId = ButtonId::new(2);

fn relay() -> Relay {
    Relay::new(
        DebounceConfig::default(),
        vec![
            PinMapping { pin: 18, button: BUTTON_1 },
            PinMapping { pin: 19, button: BUTTON_2 },
        ],
        SessionSettings::default(),
    )
}

/// Reference instant shared by every edge in this file.
fn base() -> Instant {
    static BASE: OnceLock<Instant> = OnceLock::new();
    *BASE.get_or_init(Instant::now)
}

/// Transition `millis` after the reference point on both clocks.
fn at(button: ButtonId, level: Level, millis: u64) -> RawTransition {
    RawTransition::new(
        button,
        level,
        base() + Duration::from_millis(millis),
        Timestamp::from_unix_millis(1_700_000_000_000 + millis as i64),
    )
}

fn wire_secs(millis: u64) -> f64 {
    Timestamp::from_unix_millis(1_700_000_000_000 + millis as i64).as_unix_secs_f64()
}

fn connect(relay: &Relay, capacity: usize) -> (Arc<ClientSession>, mpsc::Receiver<Payload>) {
    let (session, rx) = ClientSession::new(ClientId::new(), capacity);
    relay.registry().register(Arc::clone(&session));
    (session, rx)
}

fn drain(rx: &mut mpsc::Receiver<Payload>) -> Vec<Value> {
    let mut messages = Vec::new();
    while let Ok(payload) = rx.try_recv() {
        messages.push(serde_json::from_str(&payload).unwrap());
    }
    messages
}

fn edge(relay: &Relay, button: ButtonId, level: Level, millis: u64) -> bool {
    relay
        .input_handler()
        .handle(at(button, level, millis))
        .is_some()
}

fn timestamps(rx: &mut mpsc::Receiver<Payload>) -> Vec<f64> {
    drain(rx)
        .iter()
        .map(|m| m["timestamp"].as_f64().unwrap())
        .collect()
}

// =============================================================================
// Debounce through the pipeline
// =============================================================================

#[test]
fn bounce_within_window_is_delivered_once() {
    let relay = relay();
    let (_session, mut rx) = connect(&relay, 16);

    assert!(edge(&relay, BUTTON_1, Level::High, 0));
    assert!(!edge(&relay, BUTTON_1, Level::Low, 30));

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["event"], "PRESSED");
    assert_eq!(messages[0]["button"], 1);
}

#[test]
fn spaced_edges_are_delivered_in_order() {
    let relay = relay();
    let (_session, mut rx) = connect(&relay, 16);

    edge(&relay, BUTTON_1, Level::High, 0);
    edge(&relay, BUTTON_1, Level::Low, 120);

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["event"], "PRESSED");
    assert_eq!(messages[1]["event"], "RELEASED");
    assert!(messages[0]["timestamp"].as_f64() < messages[1]["timestamp"].as_f64());
}

#[test]
fn buttons_are_debounced_independently() {
    let relay = relay();
    let (_session, mut rx) = connect(&relay, 16);

    edge(&relay, BUTTON_1, Level::High, 0);
    edge(&relay, BUTTON_2, Level::High, 10);
    edge(&relay, BUTTON_1, Level::Low, 20);

    let buttons: Vec<_> = drain(&mut rx).iter().map(|m| m["button"].clone()).collect();
    assert_eq!(buttons, vec![Value::from(1), Value::from(2)]);
}

// =============================================================================
// Fan-out
// =============================================================================

#[test]
fn publish_with_no_viewers_is_a_no_op() {
    let relay = relay();

    assert!(edge(&relay, BUTTON_1, Level::High, 0));
    assert!(relay.registry().is_empty());
}

#[test]
fn every_viewer_receives_identical_payload() {
    let relay = relay();
    let mut receivers: Vec<_> = (0..5).map(|_| connect(&relay, 16)).collect();

    edge(&relay, BUTTON_2, Level::High, 0);

    let payloads: Vec<Payload> = receivers
        .iter_mut()
        .map(|(_, rx)| rx.try_recv().unwrap())
        .collect();
    assert!(payloads.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn departed_viewer_stops_receiving() {
    let relay = relay();
    let (a, mut rx_a) = connect(&relay, 16);
    let (_b, mut rx_b) = connect(&relay, 16);

    edge(&relay, BUTTON_1, Level::High, 0);
    assert_eq!(drain(&mut rx_a).len(), 1);
    assert_eq!(drain(&mut rx_b).len(), 1);

    relay.registry().deregister(&a.id());
    edge(&relay, BUTTON_1, Level::Low, 100);

    assert!(drain(&mut rx_a).is_empty());
    let messages = drain(&mut rx_b);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["event"], "RELEASED");
}

#[test]
fn failing_viewer_is_dropped_and_others_continue() {
    let relay = relay();
    let (healthy, mut rx_healthy) = connect(&relay, 16);
    let (full, _rx_full) = connect(&relay, 1);
    let (gone, rx_gone) = connect(&relay, 16);
    drop(rx_gone);

    edge(&relay, BUTTON_1, Level::High, 0);
    edge(&relay, BUTTON_1, Level::Low, 100);
    edge(&relay, BUTTON_1, Level::High, 200);

    assert_eq!(drain(&mut rx_healthy).len(), 3);
    assert!(relay.registry().contains(&healthy.id()));
    assert!(!relay.registry().contains(&full.id()));
    assert!(!relay.registry().contains(&gone.id()));
    assert!(full.is_closed());
    assert!(gone.is_closed());
}

#[test]
fn each_viewer_sees_events_in_acceptance_order() {
    let relay = relay();
    let mut receivers: Vec<_> = (0..3).map(|_| connect(&relay, 256)).collect();

    for i in 0..100 {
        let level = if i % 2 == 0 { Level::High } else { Level::Low };
        assert!(edge(&relay, BUTTON_1, level, i * 50));
    }

    for (_, rx) in receivers.iter_mut() {
        let seen = timestamps(rx);
        assert_eq!(seen.len(), 100);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn direct_publish_reports_viewer_count() {
    let relay = relay();
    let (_a, _rx_a) = connect(&relay, 4);
    let (_b, _rx_b) = connect(&relay, 4);

    let event = relay
        .input_handler()
        .debouncer()
        .accept(at(BUTTON_2, Level::High, 0))
        .unwrap();

    assert_eq!(relay.broadcaster().publish(&event), 2);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn registry_stays_consistent_under_churn() {
    const DURING: u64 = 200;
    const AFTER: u64 = 10;

    let relay = Arc::new(relay());
    let (stable, mut rx_stable) = connect(&relay, 1024);

    // Churned viewers keep their receivers so late deliveries stay visible.
    let churners: Vec<_> = (0..4)
        .map(|_| {
            let relay = Arc::clone(&relay);
            thread::spawn(move || {
                (0..200)
                    .map(|_| {
                        let (session, rx) = ClientSession::new(ClientId::new(), 1024);
                        relay.registry().register(Arc::clone(&session));
                        thread::yield_now();
                        assert!(relay.registry().deregister(&session.id()).is_some());
                        assert!(session.is_closed());
                        (session, rx)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let publisher = {
        let relay = Arc::clone(&relay);
        thread::spawn(move || {
            for i in 0..DURING {
                assert!(edge(&relay, BUTTON_1, Level::High, i * 50));
            }
        })
    };

    let mut churned = Vec::new();
    for t in churners {
        churned.extend(t.join().unwrap());
    }
    publisher.join().unwrap();

    for i in DURING..DURING + AFTER {
        assert!(edge(&relay, BUTTON_1, Level::High, i * 50));
    }

    let first_after = wire_secs(DURING * 50);
    for (session, rx) in churned.iter_mut() {
        assert!(!relay.registry().contains(&session.id()));
        let seen = timestamps(rx);
        assert!(seen.iter().all(|t| *t < first_after));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    assert_eq!(relay.registry().len(), 1);
    assert!(relay.registry().contains(&stable.id()));
    let seen = timestamps(&mut rx_stable);
    assert_eq!(seen.len(), (DURING + AFTER) as usize);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn simulated_source_reaches_viewers() {
    let relay = relay();
    let source = SimulatedSource::new();
    relay.start_source(&source).await.unwrap();
    let (_session, mut rx) = connect(&relay, 16);

    assert!(source.trigger(BUTTON_2, Level::High));

    let message: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(message["event"], "PRESSED");
    assert_eq!(message["button"], 2);

    relay.shutdown();
    tokio::time::timeout(std::time::Duration::from_secs(1), async {
        while source.is_running() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    assert!(!source.trigger(BUTTON_2, Level::Low));
}
