//! Status broadcast: on every transition and on a fixed heartbeat.

use log::{debug, warn};

use crate::app::ports::StatusPort;
use crate::backend::wire::{self, StatusReport};
use crate::error::TransportError;
use crate::fsm::PressState;

pub struct StatusPublisher {
    device_id: String,
    heartbeat_ms: u64,
    last_heartbeat_ms: u64,
}

impl StatusPublisher {
    pub fn new(device_id: impl Into<String>, heartbeat_ms: u64) -> Self {
        Self {
            device_id: device_id.into(),
            heartbeat_ms,
            last_heartbeat_ms: 0,
        }
    }

    /// Serialize and hand one report to the status channel.
    pub fn publish<S: StatusPort>(
        &self,
        state: PressState,
        now_ms: u64,
        ip: &str,
        port: &mut S,
    ) -> Result<(), TransportError> {
        let payload = wire::encode(&StatusReport {
            device_id: &self.device_id,
            press1: state.label(),
            timestamp: now_ms,
            ip,
        })?;
        port.publish_status(&payload).inspect_err(|e| {
            warn!("status publish failed: {e}");
        })?;
        debug!("status published: {}", state.label());
        Ok(())
    }

    pub fn heartbeat_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_heartbeat_ms) >= self.heartbeat_ms
    }

    /// Publish if a heartbeat period has elapsed.  `None` when not due.
    ///
    /// Transition-driven publishes do not reset the heartbeat timer; the
    /// period restarts even when the publish itself fails.
    pub fn heartbeat<S: StatusPort>(
        &mut self,
        state: PressState,
        now_ms: u64,
        ip: &str,
        port: &mut S,
    ) -> Option<Result<(), TransportError>> {
        if !self.heartbeat_due(now_ms) {
            return None;
        }
        self.last_heartbeat_ms = now_ms;
        Some(self.publish(state, now_ms, ip, port))
    }
}
