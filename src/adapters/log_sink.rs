//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).  One line per
//! event, `TAG | key=value`.

use log::{info, warn};

use crate::app::events::{AppEvent, CommandDiscard};
use crate::app::ports::EventSink;
use crate::backend::notify::ChannelOutcome;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state.label());
            }
            AppEvent::StateChanged { from, to, source } => {
                info!("STATE | {} -> {} | source={:?}", from.label(), to.label(), source);
            }
            AppEvent::EventLogged { kind, log_attempts } => {
                info!("SYNC  | {} logged | attempts={}", kind.as_str(), log_attempts);
            }
            AppEvent::EventDropped {
                kind,
                cause,
                log_attempts,
            } => {
                warn!(
                    "SYNC  | {} DROPPED | attempts={} | cause={}",
                    kind.as_str(),
                    log_attempts,
                    cause
                );
            }
            AppEvent::Notification { channel, outcome } => match outcome {
                ChannelOutcome::Sent => info!("NOTIFY| {channel} sent"),
                ChannelOutcome::Rejected(status) => {
                    warn!("NOTIFY| {channel} failed | status={status}");
                }
                ChannelOutcome::Unreachable(e) => warn!("NOTIFY| {channel} failed | {e}"),
            },
            AppEvent::NotificationsSkipped => {
                warn!("NOTIFY| skipped | not authenticated");
            }
            AppEvent::LoginFailed(e) => {
                warn!("AUTH  | login failed | {e}");
            }
            AppEvent::CommandDiscarded(CommandDiscard::NotWaitingForReason(state)) => {
                info!("CMD   | discarded | state={}", state.label());
            }
            AppEvent::CommandDiscarded(CommandDiscard::Invalid(e)) => {
                warn!("CMD   | discarded | {e}");
            }
            AppEvent::StatusPublishFailed(e) => {
                warn!("STATUS| publish failed | {e}");
            }
        }
    }
}
