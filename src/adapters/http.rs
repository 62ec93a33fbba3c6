//! Backend HTTP adapter.
//!
//! Implements [`HttpPort`] against the configured backend base URL.
//!
//! - **`feature = "espidf"`**: one `EspHttpConnection` per request with the
//!   configured timeout, wrapped in the `embedded-svc` blocking client.
//! - **otherwise**: an in-process simulation of a healthy backend, for
//!   host-side runs.

use std::time::Duration;

use log::debug;

use crate::app::ports::{HttpPort, HttpResponse};
#[cfg(not(feature = "espidf"))]
use crate::backend::wire;
use crate::error::TransportError;

/// Largest response body kept; the backend's replies are small JSON objects.
const MAX_RESPONSE_BYTES: usize = 4096;

pub struct BackendHttp {
    base_url: String,
    timeout: Duration,
    /// Simulation: requests served so far.
    #[cfg(not(feature = "espidf"))]
    sim_requests: u32,
}

impl BackendHttp {
    pub fn new(base_url: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_millis(u64::from(timeout_ms)),
            #[cfg(not(feature = "espidf"))]
            sim_requests: 0,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(feature = "espidf")]
    fn platform_post(
        &mut self,
        url: &str,
        bearer: Option<&str>,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        use embedded_svc::http::client::Client;
        use embedded_svc::io::{Read, Write};
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

        let config = Configuration {
            timeout: Some(self.timeout),
            ..Default::default()
        };
        let connection = EspHttpConnection::new(&config).map_err(|e| {
            log::warn!("HTTP: connection setup failed: {e}");
            TransportError::Unreachable
        })?;
        let mut client = Client::wrap(connection);

        let content_length = body.len().to_string();
        let authorization = bearer.map(|token| format!("Bearer {token}"));
        let mut headers: heapless::Vec<(&str, &str), 3> = heapless::Vec::new();
        headers.push(("Content-Type", "application/json")).ok();
        headers.push(("Content-Length", &content_length)).ok();
        if let Some(value) = authorization.as_deref() {
            headers.push(("Authorization", value)).ok();
        }

        let mut request = client.post(url, &headers).map_err(transport_error)?;
        request.write_all(body).map_err(transport_error)?;
        request.flush().map_err(transport_error)?;
        let mut response = request.submit().map_err(transport_error)?;
        let status = response.status();

        let mut received = Vec::new();
        let mut buf = [0u8; 256];
        loop {
            let n = response.read(&mut buf).map_err(transport_error)?;
            if n == 0 || received.len() + n > MAX_RESPONSE_BYTES {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }

        Ok(HttpResponse::new(status, received))
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_post(
        &mut self,
        url: &str,
        _bearer: Option<&str>,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        self.sim_requests = self.sim_requests.wrapping_add(1);
        debug!(
            "HTTP(sim): POST {url} ({} bytes, timeout {:?})",
            body.len(),
            self.timeout
        );

        let path = url.strip_prefix(self.base_url.as_str()).unwrap_or(url);
        let response = match path {
            wire::LOGIN_PATH | wire::REFRESH_PATH => HttpResponse::new(
                200,
                format!(r#"{{"access_token":"sim-token-{}"}}"#, self.sim_requests),
            ),
            wire::EVENT_LOG_PATH => HttpResponse::new(201, r#"{"id":"sim"}"#),
            wire::ALERT_PATH | wire::MESSAGING_PATH => HttpResponse::new(200, "{}"),
            _ => HttpResponse::new(404, "{}"),
        };
        debug_assert!(response.body.len() <= MAX_RESPONSE_BYTES);
        Ok(response)
    }
}

#[cfg(feature = "espidf")]
fn transport_error(e: esp_idf_svc::io::EspIOError) -> TransportError {
    if e.0.code() == esp_idf_sys::ESP_ERR_HTTP_EAGAIN as esp_idf_sys::esp_err_t {
        log::warn!("HTTP: request timed out");
        TransportError::Timeout
    } else {
        log::warn!("HTTP: transport error: {e}");
        TransportError::Unreachable
    }
}

impl HttpPort for BackendHttp {
    fn post_json(
        &mut self,
        path: &str,
        bearer: Option<&str>,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        let url = self.url(path);
        let response = self.platform_post(&url, bearer, body)?;
        debug!("HTTP: POST {path} -> {}", response.status);
        Ok(response)
    }
}
