//! Error types for the press-monitoring firmware.
//!
//! Each subsystem owns a small `Copy`-where-possible error enum.  The
//! backend errors ([`AuthError`], [`SyncError`]) never escape the retry
//! cascade; [`CommandError`] never escapes the remote-command path.  Only
//! boot-time failures reach `main`, where they are wrapped in `anyhow`.

use core::fmt;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures below HTTP: no status code was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, or the station is offline.
    Unreachable,
    /// The bounded per-call timeout elapsed.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "backend unreachable"),
            Self::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// Credential errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// The backend did not answer with a success status (or did not answer).
    Unreachable,
    /// Success status, but no usable `access_token` in the body.
    MalformedResponse,
    /// Refresh requested before any login succeeded.
    NoPriorLogin,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "auth endpoint unreachable or rejected request"),
            Self::MalformedResponse => write!(f, "auth response missing access_token"),
            Self::NoPriorLogin => write!(f, "no credential to refresh"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TransportError> for AuthError {
    fn from(_: TransportError) -> Self {
        Self::Unreachable
    }
}

// ---------------------------------------------------------------------------
// Event-log errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// HTTP 401: the bearer credential is stale.
    AuthorizationExpired,
    /// Any other non-2xx status.
    Rejected(u16),
    /// No HTTP status at all (network down, timeout).
    Unreachable,
}

impl SyncError {
    /// Only an authorization failure can be fixed by a new credential.
    pub fn is_authorization(self) -> bool {
        matches!(self, Self::AuthorizationExpired)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorizationExpired => write!(f, "authorization expired (401)"),
            Self::Rejected(status) => write!(f, "rejected with HTTP {status}"),
            Self::Unreachable => write!(f, "event log endpoint unreachable"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<TransportError> for SyncError {
    fn from(_: TransportError) -> Self {
        Self::Unreachable
    }
}

// ---------------------------------------------------------------------------
// Remote command errors
// ---------------------------------------------------------------------------

/// Why an inbound command payload was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Not valid JSON, or not the expected object shape.
    Malformed(String),
    /// Valid JSON, but the `command` value is not one we act on.
    UnknownCommand(String),
    /// `select_reason` with a reason outside the canonical set.
    UnknownReason(String),
    /// Payload exceeds the mailbox slot.
    TooLarge(usize),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed payload: {msg}"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command '{cmd}'"),
            Self::UnknownReason(reason) => write!(f, "unknown reason '{reason}'"),
            Self::TooLarge(len) => write!(f, "payload too large ({len} bytes)"),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
