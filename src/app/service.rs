//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the press FSM, the run context, the credential
//! manager and the three outbound collaborators.  Every lifecycle
//! transition fans out through port traits injected at call sites, in a
//! fixed order:
//!
//! ```text
//!  Idle → Running            publish status · log STARTED
//!  Running → WaitingForReason publish status · log STOPPED (runtime)
//!  WaitingForReason → Idle    notify(reason) · log REASON_SELECTED · publish status
//! ```
//!
//! Backend failures never escape: the caller only sees emitted
//! [`AppEvent`]s, and control always returns to the polling loop.

use log::{info, warn};

use crate::backend::credentials::CredentialManager;
use crate::backend::notify::{NotificationDispatcher, NotifyChannel, NotifyReport};
use crate::backend::sync::{BackendSyncClient, LogRequest, SyncOutcome};
use crate::backend::wire::EventKind;
use crate::config::StationConfig;
use crate::events::{DowntimeReason, EventSource, LifecycleEvent};
use crate::fsm::context::{FsmContext, RunRecord};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, PressState, Transition};
use crate::status::StatusPublisher;

use super::commands::RemoteCommand;
use super::events::{AppEvent, CommandDiscard};
use super::ports::{EventSink, HttpPort, StatusPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    credentials: CredentialManager,
    sync: BackendSyncClient,
    notifier: NotificationDispatcher,
    status: StatusPublisher,
    /// Station address reported on the status channel.
    ip: String,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: &StationConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), PressState::Idle),
            ctx: FsmContext::new(),
            credentials: CredentialManager::new(
                config.backend_username.clone(),
                config.backend_password.clone(),
            ),
            sync: BackendSyncClient::new(config.device_id.clone(), config.press_number),
            notifier: NotificationDispatcher::new(config.alert_email.clone(), config.press_number),
            status: StatusPublisher::new(
                config.device_id.clone(),
                u64::from(config.status_interval_ms),
            ),
            ip: String::from("0.0.0.0"),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Idle` and try one login so the first event does not have to.
    /// A failed login is not fatal; the retry cascade covers it later.
    pub fn start(&mut self, now_ms: u64, http: &mut impl HttpPort, sink: &mut impl EventSink) {
        self.ctx.now_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());

        if let Err(e) = self.credentials.login(http) {
            warn!("boot login failed: {e}");
            sink.emit(&AppEvent::LoginFailed(e));
        }
    }

    pub fn set_network_address(&mut self, ip: impl Into<String>) {
        self.ip = ip.into();
    }

    // ── Event handling ────────────────────────────────────────

    /// Feed one canonical event through the FSM and run the side effects
    /// of the resulting transition.  Events with no valid edge are
    /// discarded and return `None`.
    pub fn handle_event(
        &mut self,
        event: LifecycleEvent,
        source: EventSource,
        now_ms: u64,
        http: &mut impl HttpPort,
        status: &mut impl StatusPort,
        sink: &mut impl EventSink,
    ) -> Option<Transition> {
        self.ctx.now_ms = now_ms;
        let transition = self.fsm.dispatch(event, &mut self.ctx)?;
        sink.emit(&AppEvent::StateChanged {
            from: transition.from,
            to: transition.to,
            source,
        });

        match transition.to {
            PressState::Running => {
                self.publish_status(now_ms, status, sink);
                self.log(EventKind::Started, None, None, http, sink);
            }
            PressState::WaitingForReason => {
                self.publish_status(now_ms, status, sink);
                let runtime = self.ctx.run.runtime_secs();
                self.log(EventKind::Stopped, None, runtime, http, sink);
            }
            PressState::Idle => {
                let runtime = self.ctx.run.runtime_secs().unwrap_or(0);
                if let Some(reason) = self.ctx.selected_reason {
                    self.notify(reason, runtime, http, sink);
                    self.log(EventKind::ReasonSelected, Some(reason), None, http, sink);
                }
                self.publish_status(now_ms, status, sink);
            }
        }

        Some(transition)
    }

    /// Decode and apply a payload from the commands channel.  Anything
    /// outside `WaitingForReason`, or anything undecodable, is dropped
    /// with a log note.
    pub fn handle_remote_command(
        &mut self,
        payload: &[u8],
        now_ms: u64,
        http: &mut impl HttpPort,
        status: &mut impl StatusPort,
        sink: &mut impl EventSink,
    ) -> Option<Transition> {
        let state = self.fsm.current_state();
        if state != PressState::WaitingForReason {
            info!("remote command ignored in {}", state.label());
            sink.emit(&AppEvent::CommandDiscarded(CommandDiscard::NotWaitingForReason(state)));
            return None;
        }

        match RemoteCommand::decode(payload) {
            Ok(command) => self.handle_event(
                command.into_event(),
                EventSource::Remote,
                now_ms,
                http,
                status,
                sink,
            ),
            Err(e) => {
                warn!("remote command discarded: {e}");
                sink.emit(&AppEvent::CommandDiscarded(CommandDiscard::Invalid(e)));
                None
            }
        }
    }

    // ── Status ────────────────────────────────────────────────

    /// Publish the current state now, outside the heartbeat schedule.
    pub fn publish_status(
        &mut self,
        now_ms: u64,
        status: &mut impl StatusPort,
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = self
            .status
            .publish(self.fsm.current_state(), now_ms, &self.ip, status)
        {
            sink.emit(&AppEvent::StatusPublishFailed(e));
        }
    }

    /// Heartbeat publish if one is due.  Returns `true` when attempted.
    pub fn tick_heartbeat(
        &mut self,
        now_ms: u64,
        status: &mut impl StatusPort,
        sink: &mut impl EventSink,
    ) -> bool {
        match self
            .status
            .heartbeat(self.fsm.current_state(), now_ms, &self.ip, status)
        {
            None => false,
            Some(Ok(())) => true,
            Some(Err(e)) => {
                sink.emit(&AppEvent::StatusPublishFailed(e));
                true
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> PressState {
        self.fsm.current_state()
    }

    pub fn run_record(&self) -> RunRecord {
        self.ctx.run
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.has_credential()
    }

    pub fn transition_count(&self) -> u64 {
        self.fsm.transition_count()
    }

    // ── Internal helpers ──────────────────────────────────────

    fn log(
        &mut self,
        kind: EventKind,
        reason: Option<DowntimeReason>,
        runtime_secs: Option<u64>,
        http: &mut impl HttpPort,
        sink: &mut impl EventSink,
    ) {
        let request = LogRequest {
            kind,
            timestamp_ms: self.ctx.now_ms,
            reason,
            runtime_secs,
        };
        let report = self.sync.log_event(&request, &mut self.credentials, http);
        match report.outcome {
            SyncOutcome::Logged => sink.emit(&AppEvent::EventLogged {
                kind,
                log_attempts: report.log_attempts,
            }),
            SyncOutcome::Dropped(cause) => sink.emit(&AppEvent::EventDropped {
                kind,
                cause,
                log_attempts: report.log_attempts,
            }),
        }
    }

    fn notify(
        &mut self,
        reason: DowntimeReason,
        runtime_secs: u64,
        http: &mut impl HttpPort,
        sink: &mut impl EventSink,
    ) {
        match self
            .notifier
            .notify_stop(reason, runtime_secs, &self.credentials, http)
        {
            NotifyReport::Skipped => sink.emit(&AppEvent::NotificationsSkipped),
            NotifyReport::Dispatched { alert, messaging } => {
                sink.emit(&AppEvent::Notification {
                    channel: NotifyChannel::Alert,
                    outcome: alert,
                });
                sink.emit(&AppEvent::Notification {
                    channel: NotifyChannel::Messaging,
                    outcome: messaging,
                });
            }
        }
    }
}
