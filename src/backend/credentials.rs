//! Bearer credential lifecycle.
//!
//! At most one credential is held at a time.  A new credential from a
//! successful login or refresh replaces the old one atomically; a failed
//! exchange leaves the previous credential in place.

use core::fmt;

use log::{debug, info, warn};

use super::wire::{self, LoginRequest, TokenResponse};
use crate::app::ports::HttpPort;
use crate::error::AuthError;

/// Opaque bearer token.  `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn bearer(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<redacted, {} bytes>)", self.token.len())
    }
}

pub struct CredentialManager {
    username: String,
    password: String,
    current: Option<Credential>,
}

impl CredentialManager {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Credential> {
        self.current.as_ref()
    }

    pub fn has_credential(&self) -> bool {
        self.current.is_some()
    }

    /// Exchange the fixed device credentials for a fresh bearer token.
    pub fn login<H: HttpPort>(&mut self, http: &mut H) -> Result<&Credential, AuthError> {
        let body = wire::encode(&LoginRequest {
            username: &self.username,
            password: &self.password,
        })?;

        let response = http.post_json(wire::LOGIN_PATH, None, &body).map_err(|e| {
            warn!("login failed: {e}");
            AuthError::from(e)
        })?;
        let token = accept_token(response.status, &response.body, "login")?;

        info!("login succeeded");
        Ok(self.current.insert(Credential { token }))
    }

    /// Trade the current token for a new one.  Fails with
    /// [`AuthError::NoPriorLogin`] without touching the network when no
    /// credential is held.
    pub fn refresh<H: HttpPort>(&mut self, http: &mut H) -> Result<&Credential, AuthError> {
        let Some(current) = self.current.as_ref() else {
            debug!("refresh skipped: no credential held");
            return Err(AuthError::NoPriorLogin);
        };

        let response = http
            .post_json(wire::REFRESH_PATH, Some(current.bearer()), wire::EMPTY_BODY)
            .map_err(|e| {
                warn!("token refresh failed: {e}");
                AuthError::from(e)
            })?;
        let token = accept_token(response.status, &response.body, "refresh")?;

        info!("token refreshed");
        Ok(self.current.insert(Credential { token }))
    }
}

impl fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialManager")
            .field("username", &self.username)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Only an exact 200 with a non-empty `access_token` yields a credential.
fn accept_token(status: u16, body: &[u8], op: &str) -> Result<String, AuthError> {
    if status != 200 {
        warn!("{op} rejected with HTTP {status}");
        return Err(AuthError::Unreachable);
    }
    let parsed: TokenResponse = serde_json::from_slice(body).map_err(|e| {
        warn!("{op} response is not JSON: {e}");
        AuthError::MalformedResponse
    })?;
    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => {
            warn!("{op} response has no access_token");
            Err(AuthError::MalformedResponse)
        }
    }
}
