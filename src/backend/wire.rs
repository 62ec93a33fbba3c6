//! JSON bodies exchanged with the backend and the status broker.
//!
//! Every outbound body is a borrowed serde struct so encoding never copies
//! configuration strings.  Field names are fixed by the backend API.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

// ── Endpoints ─────────────────────────────────────────────────

pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const EVENT_LOG_PATH: &str = "/api/collections/press_events/records";
pub const ALERT_PATH: &str = "/notifications/send-alert";
pub const MESSAGING_PATH: &str = "/notifications/send-telegram-alert";

/// Refresh carries its credential in the header only.
pub const EMPTY_BODY: &[u8] = b"{}";

// ── Encoding ──────────────────────────────────────────────────

/// Serialize an outbound body.  A failure here means the request is never
/// sent, so it surfaces as a transport failure.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, TransportError> {
    serde_json::to_vec(value).map_err(|e| {
        warn!("failed to encode request body: {e}");
        TransportError::Unreachable
    })
}

// ── Auth ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

// ── Event log ─────────────────────────────────────────────────

/// Kind of lifecycle record written to the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Started,
    Stopped,
    ReasonSelected,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "STARTED",
            Self::Stopped => "STOPPED",
            Self::ReasonSelected => "REASON_SELECTED",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    pub device_id: &'a str,
    pub press_number: u8,
    pub event_type: &'static str,
    /// Milliseconds since boot when the transition happened.
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downtime_reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_seconds: Option<u64>,
}

// ── Notifications ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AlertBody<'a> {
    pub to_email: &'a str,
    pub alert_title: &'a str,
    pub alert_message: &'a str,
    pub data: AlertData,
}

#[derive(Debug, Serialize)]
pub struct AlertData {
    pub press_number: u8,
    pub reason: &'static str,
    pub runtime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct MessagingBody<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub data: MessagingData<'a>,
}

#[derive(Debug, Serialize)]
pub struct MessagingData<'a> {
    #[serde(rename = "Reason")]
    pub reason: &'static str,
    #[serde(rename = "Runtime")]
    pub runtime: &'a str,
    #[serde(rename = "Press")]
    pub press: &'a str,
}

// ── Status channel ────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub device_id: &'a str,
    pub press1: &'static str,
    pub timestamp: u64,
    pub ip: &'a str,
}
