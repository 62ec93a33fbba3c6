//! Mock network adapters for integration tests.
//!
//! Records every backend call and every status payload so tests can assert
//! on the full outbound history without a network.

use std::collections::VecDeque;

use pressmon::app::events::AppEvent;
use pressmon::app::ports::{EventSink, HttpPort, HttpResponse, StatusPort};
use pressmon::backend::wire;
use pressmon::config::StationConfig;
use pressmon::error::TransportError;

// ── HTTP call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HttpCall {
    pub path: String,
    pub bearer: Option<String>,
    pub body: serde_json::Value,
}

// ── MockBackend ───────────────────────────────────────────────

/// Scripted backend.  Queued replies are consumed in order; once the
/// script is empty the backend behaves like a healthy server.
pub struct MockBackend {
    pub calls: Vec<HttpCall>,
    script: VecDeque<Result<HttpResponse, TransportError>>,
    issued_tokens: u32,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            script: VecDeque::new(),
            issued_tokens: 0,
        }
    }

    /// Backend that answers every request with a transport failure.
    pub fn offline() -> Self {
        let mut backend = Self::new();
        for _ in 0..64 {
            backend.push_err(TransportError::Unreachable);
        }
        backend
    }

    pub fn push(&mut self, status: u16, body: &str) -> &mut Self {
        self.script.push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn push_err(&mut self, err: TransportError) -> &mut Self {
        self.script.push_back(Err(err));
        self
    }

    pub fn paths(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.path.as_str()).collect()
    }

    pub fn calls_to(&self, path: &str) -> Vec<&HttpCall> {
        self.calls.iter().filter(|c| c.path == path).collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn healthy_reply(&mut self, path: &str) -> HttpResponse {
        match path {
            wire::LOGIN_PATH | wire::REFRESH_PATH => {
                self.issued_tokens += 1;
                HttpResponse::new(
                    200,
                    format!(r#"{{"access_token":"token-{}"}}"#, self.issued_tokens),
                )
            }
            wire::EVENT_LOG_PATH => HttpResponse::new(201, "{}"),
            _ => HttpResponse::new(200, "{}"),
        }
    }
}

impl HttpPort for MockBackend {
    fn post_json(
        &mut self,
        path: &str,
        bearer: Option<&str>,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        self.calls.push(HttpCall {
            path: path.to_string(),
            bearer: bearer.map(str::to_string),
            body: serde_json::from_slice(body).unwrap_or(serde_json::Value::Null),
        });
        match self.script.pop_front() {
            Some(reply) => reply,
            None => Ok(self.healthy_reply(path)),
        }
    }
}

// ── MockBroker ────────────────────────────────────────────────

pub struct MockBroker {
    pub published: Vec<serde_json::Value>,
    pub connected: bool,
}

#[allow(dead_code)]
impl MockBroker {
    pub fn new() -> Self {
        Self {
            published: Vec::new(),
            connected: true,
        }
    }

    /// `press1` field of every published report, in order.
    pub fn states(&self) -> Vec<String> {
        self.published
            .iter()
            .map(|p| p["press1"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn last_state(&self) -> Option<String> {
        self.states().pop()
    }
}

impl StatusPort for MockBroker {
    fn publish_status(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::Unreachable);
        }
        self.published.push(
            serde_json::from_slice(payload).map_err(|_| TransportError::Unreachable)?,
        );
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Config ────────────────────────────────────────────────────

pub fn test_config() -> StationConfig {
    StationConfig {
        device_id: "Press-0001".into(),
        press_number: 1,
        backend_username: "station".into(),
        backend_password: "secret".into(),
        alert_email: "ops@example.com".into(),
        status_interval_ms: 5_000,
        ..StationConfig::default()
    }
}
