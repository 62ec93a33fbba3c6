//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (HTTP client, MQTT link, clock, event sink) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches the network
//! directly and every outbound call can be scripted in tests.
//!
//! All outbound calls are blocking from the control loop's point of view.
//! Implementations MUST bound every call with a timeout.

use crate::error::TransportError;

// ───────────────────────────────────────────────────────────────
// HTTP port (domain → backend)
// ───────────────────────────────────────────────────────────────

/// Status code and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking JSON-over-HTTP POST against the backend.
pub trait HttpPort {
    /// POST `body` (already JSON-encoded) to `path`, relative to the
    /// backend base URL.  `bearer` adds an `Authorization: Bearer` header.
    ///
    /// Any HTTP status, including 4xx/5xx, is `Ok`; `Err` means no status
    /// was received at all.
    fn post_json(
        &mut self,
        path: &str,
        bearer: Option<&str>,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Status channel port (domain → pub/sub broker)
// ───────────────────────────────────────────────────────────────

/// Broadcasts a serialized status report on the status channel.
pub trait StatusPort {
    fn publish_status(&mut self, payload: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait ClockPort {
    fn uptime_ms(&self) -> u64;
}
