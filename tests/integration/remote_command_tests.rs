//! Integration tests for the commands channel: payload → mailbox →
//! AppService, including every discard path.

use super::mock_hw::{LogSink, MockBackend, MockBroker, test_config};

use pressmon::app::events::{AppEvent, CommandDiscard};
use pressmon::app::service::AppService;
use pressmon::backend::wire;
use pressmon::error::CommandError;
use pressmon::events::{EventSource, LifecycleEvent};
use pressmon::fsm::PressState;

fn waiting_for_reason() -> (AppService, MockBackend, MockBroker, LogSink) {
    let mut backend = MockBackend::new();
    let mut broker = MockBroker::new();
    let mut sink = LogSink::new();
    let mut app = AppService::new(&test_config());
    app.start(0, &mut backend, &mut sink);
    for now_ms in [1_000, 91_000] {
        app.handle_event(
            LifecycleEvent::StartStopPressed,
            EventSource::Button,
            now_ms,
            &mut backend,
            &mut broker,
            &mut sink,
        );
    }
    assert_eq!(app.state(), PressState::WaitingForReason);
    backend.clear();
    broker.published.clear();
    sink.events.clear();
    (app, backend, broker, sink)
}

#[test]
fn synonym_reason_closes_the_stop_with_canonical_label() {
    let (mut app, mut backend, mut broker, mut sink) = waiting_for_reason();

    let transition = app.handle_remote_command(
        br#"{"command":"select_reason","reason":"Maintenance"}"#,
        95_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    let transition = transition.unwrap();
    assert_eq!(transition.from, PressState::WaitingForReason);
    assert_eq!(transition.to, PressState::Idle);
    assert_eq!(app.state(), PressState::Idle);
    assert!(sink.contains(&AppEvent::StateChanged {
        from: PressState::WaitingForReason,
        to: PressState::Idle,
        source: EventSource::Remote,
    }));

    assert_eq!(
        backend.paths(),
        vec![wire::ALERT_PATH, wire::MESSAGING_PATH, wire::EVENT_LOG_PATH]
    );
    assert_eq!(backend.calls[0].body["data"]["reason"], "Maintenance Required");
    assert_eq!(backend.calls[1].body["data"]["Reason"], "Maintenance Required");
    assert_eq!(backend.calls[2].body["downtime_reason"], "Maintenance Required");
    assert_eq!(broker.states(), vec!["IDLE"]);
}

#[test]
fn command_while_running_is_discarded() {
    let mut backend = MockBackend::new();
    let mut broker = MockBroker::new();
    let mut sink = LogSink::new();
    let mut app = AppService::new(&test_config());
    app.start(0, &mut backend, &mut sink);
    app.handle_event(
        LifecycleEvent::StartStopPressed,
        EventSource::Button,
        1_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );
    backend.clear();
    broker.published.clear();

    let transition = app.handle_remote_command(
        br#"{"command":"select_reason","reason":"Quality Issue"}"#,
        2_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    assert!(transition.is_none());
    assert_eq!(app.state(), PressState::Running);
    assert!(backend.calls.is_empty());
    assert!(broker.published.is_empty());
    assert!(sink.contains(&AppEvent::CommandDiscarded(
        CommandDiscard::NotWaitingForReason(PressState::Running)
    )));
}

#[test]
fn command_while_idle_is_discarded_without_decoding() {
    let mut backend = MockBackend::new();
    let mut broker = MockBroker::new();
    let mut sink = LogSink::new();
    let mut app = AppService::new(&test_config());
    app.start(0, &mut backend, &mut sink);

    app.handle_remote_command(b"garbage", 1_000, &mut backend, &mut broker, &mut sink);

    assert_eq!(app.state(), PressState::Idle);
    assert!(sink.contains(&AppEvent::CommandDiscarded(
        CommandDiscard::NotWaitingForReason(PressState::Idle)
    )));
}

#[test]
fn unknown_reason_keeps_waiting() {
    let (mut app, mut backend, mut broker, mut sink) = waiting_for_reason();

    app.handle_remote_command(
        br#"{"command":"select_reason","reason":"Lunch break"}"#,
        95_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    assert_eq!(app.state(), PressState::WaitingForReason);
    assert!(backend.calls.is_empty());
    assert!(sink.contains(&AppEvent::CommandDiscarded(CommandDiscard::Invalid(
        CommandError::UnknownReason("Lunch break".to_string())
    ))));
}

#[test]
fn short_form_without_a_synonym_keeps_waiting() {
    let (mut app, mut backend, mut broker, mut sink) = waiting_for_reason();

    app.handle_remote_command(
        br#"{"command":"select_reason","reason":"Quality"}"#,
        95_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    assert_eq!(app.state(), PressState::WaitingForReason);
    assert!(sink.contains(&AppEvent::CommandDiscarded(CommandDiscard::Invalid(
        CommandError::UnknownReason("Quality".to_string())
    ))));
}

#[test]
fn unknown_command_and_malformed_json_keep_waiting() {
    let (mut app, mut backend, mut broker, mut sink) = waiting_for_reason();

    app.handle_remote_command(
        br#"{"command":"reboot"}"#,
        95_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );
    app.handle_remote_command(b"{\"command\":", 95_100, &mut backend, &mut broker, &mut sink);

    assert_eq!(app.state(), PressState::WaitingForReason);
    assert!(sink.contains(&AppEvent::CommandDiscarded(CommandDiscard::Invalid(
        CommandError::UnknownCommand("reboot".to_string())
    ))));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::CommandDiscarded(CommandDiscard::Invalid(CommandError::Malformed(_)))
    )));
    assert!(backend.calls.is_empty());
}

#[test]
fn case_and_whitespace_are_normalised() {
    let (mut app, mut backend, mut broker, mut sink) = waiting_for_reason();

    app.handle_remote_command(
        br#"{"command":"select_reason","reason":"  tool change "}"#,
        95_000,
        &mut backend,
        &mut broker,
        &mut sink,
    );

    assert_eq!(app.state(), PressState::Idle);
    let log = backend.calls_to(wire::EVENT_LOG_PATH);
    assert_eq!(log[0].body["downtime_reason"], "Tool Change");
}

#[test]
fn second_command_after_reason_is_discarded() {
    let (mut app, mut backend, mut broker, mut sink) = waiting_for_reason();
    let payload = br#"{"command":"select_reason","reason":"Material Issue"}"#;

    app.handle_remote_command(payload, 95_000, &mut backend, &mut broker, &mut sink);
    let calls = backend.calls.len();
    app.handle_remote_command(payload, 95_050, &mut backend, &mut broker, &mut sink);

    assert_eq!(app.state(), PressState::Idle);
    assert_eq!(backend.calls.len(), calls);
    assert_eq!(app.transition_count(), 3);
}
