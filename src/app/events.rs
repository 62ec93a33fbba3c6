//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They are the diagnostic
//! trail of the station: every transition, every logged or dropped backend
//! event, every notification channel outcome, and every discarded command.

use crate::backend::notify::{ChannelOutcome, NotifyChannel};
use crate::backend::sync::DropCause;
use crate::backend::wire::EventKind;
use crate::error::{AuthError, CommandError, TransportError};
use crate::events::EventSource;
use crate::fsm::PressState;

/// Why an inbound remote command was not acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDiscard {
    /// Commands are only honoured while waiting for a reason.
    NotWaitingForReason(PressState),
    Invalid(CommandError),
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(PressState),

    /// The FSM moved between states.
    StateChanged {
        from: PressState,
        to: PressState,
        source: EventSource,
    },

    /// A lifecycle event reached the backend.
    EventLogged { kind: EventKind, log_attempts: u8 },

    /// The retry cascade was exhausted; the event is lost.
    EventDropped {
        kind: EventKind,
        cause: DropCause,
        log_attempts: u8,
    },

    /// Outcome of one stop-notification channel.
    Notification {
        channel: NotifyChannel,
        outcome: ChannelOutcome,
    },

    /// Stop notifications were not attempted: no credential held.
    NotificationsSkipped,

    /// The boot-time login failed; the retry cascade will try again later.
    LoginFailed(AuthError),

    /// An inbound command was dropped.
    CommandDiscarded(CommandDiscard),

    /// The status report could not be handed to the broker.
    StatusPublishFailed(TransportError),
}
