//! Operator notifications on a completed stop.
//!
//! Two channels, an e-mail alert and a messaging alert, are tried once each
//! and independently.  Outcomes are diagnostic only; nothing is retried.

use core::fmt;

use log::{info, warn};

use super::credentials::CredentialManager;
use super::wire::{self, AlertBody, AlertData, MessagingBody, MessagingData};
use crate::app::ports::HttpPort;
use crate::error::TransportError;
use crate::events::DowntimeReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyChannel {
    Alert,
    Messaging,
}

impl NotifyChannel {
    fn path(self) -> &'static str {
        match self {
            Self::Alert => wire::ALERT_PATH,
            Self::Messaging => wire::MESSAGING_PATH,
        }
    }
}

impl fmt::Display for NotifyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alert => f.write_str("alert"),
            Self::Messaging => f.write_str("messaging"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOutcome {
    Sent,
    Rejected(u16),
    Unreachable(TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyReport {
    /// No credential was held; neither channel was attempted.
    Skipped,
    Dispatched {
        alert: ChannelOutcome,
        messaging: ChannelOutcome,
    },
}

pub struct NotificationDispatcher {
    alert_email: String,
    press_number: u8,
}

impl NotificationDispatcher {
    pub fn new(alert_email: impl Into<String>, press_number: u8) -> Self {
        Self {
            alert_email: alert_email.into(),
            press_number,
        }
    }

    pub fn notify_stop<H: HttpPort>(
        &self,
        reason: DowntimeReason,
        runtime_secs: u64,
        credentials: &CredentialManager,
        http: &mut H,
    ) -> NotifyReport {
        let Some(credential) = credentials.current() else {
            warn!("stop notifications skipped: not authenticated");
            return NotifyReport::Skipped;
        };

        let press = format!("Press {}", self.press_number);
        let title = format!("{press} Stopped - {reason}");
        let (minutes, seconds) = (runtime_secs / 60, runtime_secs % 60);

        let alert_message = format!(
            "{press} has been stopped.\n\nReason: {reason}\nRuntime: {minutes} minutes {seconds} seconds\n"
        );
        let alert = wire::encode(&AlertBody {
            to_email: &self.alert_email,
            alert_title: &title,
            alert_message: &alert_message,
            data: AlertData {
                press_number: self.press_number,
                reason: reason.label(),
                runtime_seconds: runtime_secs,
            },
        });

        let messaging_message = format!("{press} has been stopped.");
        let runtime = format!("{minutes} min {seconds} sec");
        let messaging = wire::encode(&MessagingBody {
            title: &title,
            message: &messaging_message,
            data: MessagingData {
                reason: reason.label(),
                runtime: &runtime,
                press: &press,
            },
        });

        let bearer = credential.bearer();
        NotifyReport::Dispatched {
            alert: send(http, NotifyChannel::Alert, bearer, alert),
            messaging: send(http, NotifyChannel::Messaging, bearer, messaging),
        }
    }
}

fn send<H: HttpPort>(
    http: &mut H,
    channel: NotifyChannel,
    bearer: &str,
    body: Result<Vec<u8>, TransportError>,
) -> ChannelOutcome {
    let outcome = match body.and_then(|body| http.post_json(channel.path(), Some(bearer), &body)) {
        Ok(response) if response.status == 200 => ChannelOutcome::Sent,
        Ok(response) => ChannelOutcome::Rejected(response.status),
        Err(e) => ChannelOutcome::Unreachable(e),
    };
    match outcome {
        ChannelOutcome::Sent => info!("{channel} notification sent"),
        ChannelOutcome::Rejected(status) => warn!("{channel} notification rejected: HTTP {status}"),
        ChannelOutcome::Unreachable(e) => warn!("{channel} notification failed: {e}"),
    }
    outcome
}
