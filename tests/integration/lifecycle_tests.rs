//! Integration tests for the button → AppService → backend pipeline.
//!
//! Drives whole lifecycle cycles and checks the ordering of status
//! publishes and event-log calls across every transition.

use super::mock_hw::{LogSink, MockBackend, MockBroker, test_config};

use pressmon::app::events::AppEvent;
use pressmon::app::service::AppService;
use pressmon::backend::wire::{self, EventKind};
use pressmon::events::{DowntimeReason, EventSource, LifecycleEvent};
use pressmon::fsm::PressState;

fn booted(backend: &mut MockBackend) -> (AppService, MockBroker, LogSink) {
    let mut app = AppService::new(&test_config());
    let mut sink = LogSink::new();
    app.set_network_address("10.0.0.7");
    app.start(0, backend, &mut sink);
    (app, MockBroker::new(), sink)
}

fn press(
    app: &mut AppService,
    event: LifecycleEvent,
    now_ms: u64,
    backend: &mut MockBackend,
    broker: &mut MockBroker,
    sink: &mut LogSink,
) {
    app.handle_event(event, EventSource::Button, now_ms, backend, broker, sink);
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_logs_in_and_starts_idle() {
    let mut backend = MockBackend::new();
    let (app, _broker, sink) = booted(&mut backend);

    assert_eq!(app.state(), PressState::Idle);
    assert!(app.is_authenticated());
    assert_eq!(backend.paths(), vec![wire::LOGIN_PATH]);
    assert_eq!(backend.calls[0].body["username"], "station");
    assert_eq!(sink.events[0], AppEvent::Started(PressState::Idle));
}

#[test]
fn boot_survives_unreachable_backend() {
    let mut backend = MockBackend::offline();
    let (app, _broker, sink) = booted(&mut backend);

    assert_eq!(app.state(), PressState::Idle);
    assert!(!app.is_authenticated());
    assert!(sink.events.iter().any(|e| matches!(e, AppEvent::LoginFailed(_))));
}

// ── Start without a credential ────────────────────────────────

#[test]
fn start_without_credential_logs_in_then_logs_started() {
    // Boot login fails, then the backend recovers.
    let mut backend = MockBackend::new();
    backend.push(503, "");
    let (mut app, mut broker, mut sink) = booted(&mut backend);
    assert!(!app.is_authenticated());
    backend.clear();

    press(&mut app, LifecycleEvent::StartStopPressed, 1_000, &mut backend, &mut broker, &mut sink);

    assert_eq!(app.state(), PressState::Running);
    assert_eq!(broker.last_state().as_deref(), Some("RUNNING"));
    assert_eq!(broker.published[0]["ip"], "10.0.0.7");
    assert_eq!(broker.published[0]["device_id"], "Press-0001");

    // No credential: refresh is skipped locally, login is the only auth call.
    assert_eq!(backend.paths(), vec![wire::LOGIN_PATH, wire::EVENT_LOG_PATH]);
    let log = &backend.calls[1];
    assert_eq!(log.bearer.as_deref(), Some("token-1"));
    assert_eq!(log.body["event_type"], "STARTED");
    assert!(sink.contains(&AppEvent::EventLogged {
        kind: EventKind::Started,
        log_attempts: 1,
    }));
}

// ── Full cycle ────────────────────────────────────────────────

#[test]
fn full_cycle_orders_side_effects() {
    let mut backend = MockBackend::new();
    let (mut app, mut broker, mut sink) = booted(&mut backend);
    backend.clear();

    press(&mut app, LifecycleEvent::StartStopPressed, 10_000, &mut backend, &mut broker, &mut sink);
    press(&mut app, LifecycleEvent::StartStopPressed, 135_000, &mut backend, &mut broker, &mut sink);

    assert_eq!(app.state(), PressState::WaitingForReason);
    assert_eq!(app.run_record().runtime_secs(), Some(125));

    let stop = &backend.calls[1];
    assert_eq!(stop.body["event_type"], "STOPPED");
    assert_eq!(stop.body["runtime_seconds"], 125);
    assert!(stop.body.get("downtime_reason").is_none());

    press(
        &mut app,
        LifecycleEvent::ReasonSelected(DowntimeReason::ToolChange),
        140_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    assert_eq!(app.state(), PressState::Idle);
    assert_eq!(
        backend.paths(),
        vec![
            wire::EVENT_LOG_PATH,
            wire::EVENT_LOG_PATH,
            wire::ALERT_PATH,
            wire::MESSAGING_PATH,
            wire::EVENT_LOG_PATH,
        ]
    );
    let reason = &backend.calls[4];
    assert_eq!(reason.body["event_type"], "REASON_SELECTED");
    assert_eq!(reason.body["downtime_reason"], "Tool Change");

    assert_eq!(broker.states(), vec!["RUNNING", "WAITING_FOR_REASON", "IDLE"]);
    assert_eq!(app.transition_count(), 3);
}

#[test]
fn idle_status_is_published_after_notifications_and_log() {
    let mut backend = MockBackend::new();
    let (mut app, mut broker, mut sink) = booted(&mut backend);

    press(&mut app, LifecycleEvent::StartStopPressed, 1_000, &mut backend, &mut broker, &mut sink);
    press(&mut app, LifecycleEvent::StartStopPressed, 2_000, &mut backend, &mut broker, &mut sink);
    sink.events.clear();
    press(
        &mut app,
        LifecycleEvent::ReasonSelected(DowntimeReason::QualityIssue),
        3_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    let logged = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::EventLogged { kind: EventKind::ReasonSelected, .. }))
        .unwrap();
    let first_notification = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::Notification { .. }))
        .unwrap();
    assert!(first_notification < logged);
    assert_eq!(broker.last_state().as_deref(), Some("IDLE"));
}

#[test]
fn every_cycle_replaces_the_run_record() {
    let mut backend = MockBackend::new();
    let (mut app, mut broker, mut sink) = booted(&mut backend);

    for cycle in 0..3u64 {
        let base = cycle * 100_000;
        press(&mut app, LifecycleEvent::StartStopPressed, base + 1_000, &mut backend, &mut broker, &mut sink);
        assert_eq!(app.run_record().started_at_ms, Some(base + 1_000));
        assert_eq!(app.run_record().stopped_at_ms, None);
        press(&mut app, LifecycleEvent::StartStopPressed, base + 61_000, &mut backend, &mut broker, &mut sink);
        press(
            &mut app,
            LifecycleEvent::ReasonSelected(DowntimeReason::MaterialIssue),
            base + 62_000,
            &mut backend,
            &mut broker,
            &mut sink,
        );
        assert_eq!(app.state(), PressState::Idle);
        assert_eq!(app.run_record().runtime_secs(), Some(60));
    }
    assert_eq!(app.transition_count(), 9);
}

// ── Invalid events ────────────────────────────────────────────

#[test]
fn reason_press_while_idle_or_running_is_ignored() {
    let mut backend = MockBackend::new();
    let (mut app, mut broker, mut sink) = booted(&mut backend);
    backend.clear();

    let reason = LifecycleEvent::ReasonSelected(DowntimeReason::MaintenanceRequired);
    press(&mut app, reason, 500, &mut backend, &mut broker, &mut sink);
    assert_eq!(app.state(), PressState::Idle);

    press(&mut app, LifecycleEvent::StartStopPressed, 1_000, &mut backend, &mut broker, &mut sink);
    let calls_before = backend.calls.len();
    let publishes_before = broker.published.len();
    press(&mut app, reason, 1_500, &mut backend, &mut broker, &mut sink);

    assert_eq!(app.state(), PressState::Running);
    assert_eq!(backend.calls.len(), calls_before);
    assert_eq!(broker.published.len(), publishes_before);
}

#[test]
fn start_stop_while_waiting_for_reason_is_ignored() {
    let mut backend = MockBackend::new();
    let (mut app, mut broker, mut sink) = booted(&mut backend);

    press(&mut app, LifecycleEvent::StartStopPressed, 1_000, &mut backend, &mut broker, &mut sink);
    press(&mut app, LifecycleEvent::StartStopPressed, 2_000, &mut backend, &mut broker, &mut sink);
    let calls_before = backend.calls.len();

    press(&mut app, LifecycleEvent::StartStopPressed, 3_000, &mut backend, &mut broker, &mut sink);

    assert_eq!(app.state(), PressState::WaitingForReason);
    assert_eq!(backend.calls.len(), calls_before);
}

// ── Offline operation ─────────────────────────────────────────

#[test]
fn lifecycle_advances_with_backend_and_broker_down() {
    let mut backend = MockBackend::offline();
    let (mut app, mut broker, mut sink) = booted(&mut backend);
    broker.connected = false;

    press(&mut app, LifecycleEvent::StartStopPressed, 1_000, &mut backend, &mut broker, &mut sink);
    press(&mut app, LifecycleEvent::StartStopPressed, 2_000, &mut backend, &mut broker, &mut sink);
    press(
        &mut app,
        LifecycleEvent::ReasonSelected(DowntimeReason::ToolChange),
        3_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    assert_eq!(app.state(), PressState::Idle);
    assert!(broker.published.is_empty());
    assert!(sink.contains(&AppEvent::NotificationsSkipped));
    let dropped = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::EventDropped { .. }))
        .count();
    assert_eq!(dropped, 3);
    assert!(sink.events.iter().any(|e| matches!(e, AppEvent::StatusPublishFailed(_))));
}

// ── Heartbeat ─────────────────────────────────────────────────

#[test]
fn heartbeat_reports_current_state_on_schedule() {
    let mut backend = MockBackend::new();
    let (mut app, mut broker, mut sink) = booted(&mut backend);

    assert!(!app.tick_heartbeat(4_999, &mut broker, &mut sink));
    assert!(app.tick_heartbeat(5_000, &mut broker, &mut sink));
    assert_eq!(broker.last_state().as_deref(), Some("IDLE"));

    press(&mut app, LifecycleEvent::StartStopPressed, 6_000, &mut backend, &mut broker, &mut sink);
    assert!(!app.tick_heartbeat(9_999, &mut broker, &mut sink));
    assert!(app.tick_heartbeat(10_000, &mut broker, &mut sink));

    assert_eq!(broker.states(), vec!["IDLE", "RUNNING", "RUNNING"]);
    assert_eq!(broker.published[2]["timestamp"], 10_000);
}
