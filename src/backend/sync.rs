//! Event-log client with a bounded credential retry cascade.
//!
//! ```text
//!  Attempt ──401/no token──▶ RefreshAndRetry ──refresh failed──▶ LoginAndRetry ──▶ done
//!     │                            │                                  │
//!     └──2xx / other error──▶ done └──retry answered (any)──▶ done    │
//! ```
//!
//! Each step only moves rightwards, and login is reached only when the
//! refresh itself fails.  One `log_event` call therefore stays within
//! [`MAX_LOG_ATTEMPTS`] event-log calls and [`MAX_CREDENTIAL_OPS`]
//! credential calls.  Nothing is queued: an
//! event that fails the whole cascade is dropped and reported.

use core::fmt;

use log::{debug, info, warn};

use super::credentials::{Credential, CredentialManager};
use super::wire::{self, EventKind, EventRecord};
use crate::app::ports::HttpPort;
use crate::error::{AuthError, SyncError};
use crate::events::DowntimeReason;

/// Event-log calls allowed per lifecycle event.
pub const MAX_LOG_ATTEMPTS: u8 = 3;
/// Refresh/login calls allowed per lifecycle event.
pub const MAX_CREDENTIAL_OPS: u8 = 2;

/// One lifecycle record bound for the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRequest {
    pub kind: EventKind,
    pub timestamp_ms: u64,
    pub reason: Option<DowntimeReason>,
    pub runtime_secs: Option<u64>,
}

/// Why an event never reached the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCause {
    /// The log endpoint failed in a way a new credential cannot fix,
    /// or still answered 401 after a renewed credential.
    Sync(SyncError),
    /// No credential could be obtained for the final retry.
    Auth(AuthError),
}

impl fmt::Display for DropCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(e) => write!(f, "{e}"),
            Self::Auth(e) => write!(f, "no credential: {e}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Logged,
    Dropped(DropCause),
}

/// Result of one cascade, with the calls it spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub log_attempts: u8,
    pub credential_ops: u8,
}

impl SyncReport {
    pub fn is_logged(&self) -> bool {
        self.outcome == SyncOutcome::Logged
    }
}

enum CascadeStep {
    Attempt,
    RefreshAndRetry,
    LoginAndRetry,
    Finished(SyncOutcome),
}

pub struct BackendSyncClient {
    device_id: String,
    press_number: u8,
}

impl BackendSyncClient {
    pub fn new(device_id: impl Into<String>, press_number: u8) -> Self {
        Self {
            device_id: device_id.into(),
            press_number,
        }
    }

    /// Write one lifecycle record, renewing the credential at most twice.
    pub fn log_event<H: HttpPort>(
        &self,
        request: &LogRequest,
        credentials: &mut CredentialManager,
        http: &mut H,
    ) -> SyncReport {
        let mut report = SyncReport {
            outcome: SyncOutcome::Logged,
            log_attempts: 0,
            credential_ops: 0,
        };

        let body = match wire::encode(&EventRecord {
            device_id: &self.device_id,
            press_number: self.press_number,
            event_type: request.kind.as_str(),
            timestamp: request.timestamp_ms,
            downtime_reason: request.reason.map(DowntimeReason::label),
            runtime_seconds: request.runtime_secs,
        }) {
            Ok(body) => body,
            Err(e) => {
                report.outcome = SyncOutcome::Dropped(DropCause::Sync(e.into()));
                return report;
            }
        };

        let kind = request.kind.as_str();
        let mut step = CascadeStep::Attempt;
        loop {
            step = match step {
                CascadeStep::Attempt => match credentials.current() {
                    None => {
                        debug!("{kind}: no credential held, renewing first");
                        CascadeStep::RefreshAndRetry
                    }
                    Some(credential) => {
                        match post_record(http, credential, &body, &mut report) {
                            Ok(()) => CascadeStep::Finished(SyncOutcome::Logged),
                            Err(e) if e.is_authorization() => {
                                info!("{kind}: credential rejected, refreshing");
                                CascadeStep::RefreshAndRetry
                            }
                            Err(e) => CascadeStep::Finished(dropped(DropCause::Sync(e))),
                        }
                    }
                },

                CascadeStep::RefreshAndRetry => {
                    let refreshed = credentials.refresh(http);
                    if !matches!(refreshed, Err(AuthError::NoPriorLogin)) {
                        report.credential_ops += 1;
                    }
                    match refreshed {
                        Ok(credential) => {
                            match post_record(http, credential, &body, &mut report) {
                                Ok(()) => CascadeStep::Finished(SyncOutcome::Logged),
                                // Only a failed refresh escalates to login.
                                Err(e) => CascadeStep::Finished(dropped(DropCause::Sync(e))),
                            }
                        }
                        Err(e) => {
                            debug!("{kind}: refresh unavailable ({e}), logging in");
                            CascadeStep::LoginAndRetry
                        }
                    }
                }

                CascadeStep::LoginAndRetry => {
                    report.credential_ops += 1;
                    match credentials.login(http) {
                        Ok(credential) => {
                            match post_record(http, credential, &body, &mut report) {
                                Ok(()) => CascadeStep::Finished(SyncOutcome::Logged),
                                Err(e) => CascadeStep::Finished(dropped(DropCause::Sync(e))),
                            }
                        }
                        Err(e) => CascadeStep::Finished(dropped(DropCause::Auth(e))),
                    }
                }

                CascadeStep::Finished(outcome) => {
                    report.outcome = outcome;
                    match outcome {
                        SyncOutcome::Logged => {
                            info!("{kind} logged after {} attempt(s)", report.log_attempts)
                        }
                        SyncOutcome::Dropped(cause) => warn!("{kind} dropped: {cause}"),
                    }
                    debug_assert!(report.log_attempts <= MAX_LOG_ATTEMPTS);
                    debug_assert!(report.credential_ops <= MAX_CREDENTIAL_OPS);
                    return report;
                }
            };
        }
    }
}

fn dropped(cause: DropCause) -> SyncOutcome {
    SyncOutcome::Dropped(cause)
}

/// One event-log call.  200 and 201 are both success.
fn post_record<H: HttpPort>(
    http: &mut H,
    credential: &Credential,
    body: &[u8],
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    report.log_attempts += 1;
    let response = http.post_json(wire::EVENT_LOG_PATH, Some(credential.bearer()), body)?;
    match response.status {
        200 | 201 => Ok(()),
        401 => Err(SyncError::AuthorizationExpired),
        status => Err(SyncError::Rejected(status)),
    }
}
