//! Inbound remote commands.
//!
//! Payloads arrive on the commands channel as JSON
//! `{"command": "select_reason", "reason": "<free text>"}`.  Decoding
//! never panics and never aborts the receive path: every failure is a
//! [`CommandError`] that the caller logs and drops.

use serde::Deserialize;

use crate::error::CommandError;
use crate::events::{DowntimeReason, LifecycleEvent};

/// Largest payload accepted from the commands channel.
pub const MAX_COMMAND_LEN: usize = 256;

const SELECT_REASON: &str = "select_reason";

/// Commands the station acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Close the current stop with a downtime reason.
    SelectReason(DowntimeReason),
}

impl RemoteCommand {
    /// Decode a raw payload, normalising the reason to its canonical form.
    pub fn decode(payload: &[u8]) -> Result<Self, CommandError> {
        if payload.len() > MAX_COMMAND_LEN {
            return Err(CommandError::TooLarge(payload.len()));
        }

        #[derive(Deserialize)]
        struct Wire {
            command: String,
            #[serde(default)]
            reason: Option<String>,
        }

        let wire: Wire = serde_json::from_slice(payload)
            .map_err(|e| CommandError::Malformed(e.to_string()))?;

        if wire.command != SELECT_REASON {
            return Err(CommandError::UnknownCommand(wire.command));
        }

        let text = wire.reason.unwrap_or_default();
        DowntimeReason::from_label(&text)
            .map(Self::SelectReason)
            .ok_or(CommandError::UnknownReason(text))
    }

    pub fn into_event(self) -> LifecycleEvent {
        match self {
            Self::SelectReason(reason) => LifecycleEvent::ReasonSelected(reason),
        }
    }
}
