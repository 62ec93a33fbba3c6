//! Station configuration parameters
//!
//! All tunable parameters for the press-monitoring station.
//! Secrets and endpoints can be overridden at build time through
//! `PRESSMON_*` environment variables; nothing is persisted on the device.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for the per-request HTTP timeout.
pub const MAX_HTTP_TIMEOUT_MS: u32 = 60_000;

/// Core station configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    // --- WiFi ---
    pub wifi_ssid: String,
    pub wifi_password: String,

    // --- Backend ---
    /// Base URL of the backend, without trailing slash.
    pub backend_url: String,
    /// Fixed device credentials exchanged for a bearer token at login.
    pub backend_username: String,
    pub backend_password: String,
    /// Recipient of stop alerts on the e-mail channel.
    pub alert_email: String,

    // --- MQTT ---
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub status_topic: String,
    pub command_topic: String,

    // --- Identity ---
    pub device_id: String,
    pub press_number: u8,

    // --- Timing ---
    /// Debounce window shared by all buttons (milliseconds)
    pub debounce_ms: u32,
    /// LED blink half-period (milliseconds)
    pub blink_interval_ms: u32,
    /// Heartbeat status publish period (milliseconds)
    pub status_interval_ms: u32,
    /// Bound on every outbound HTTP call (milliseconds)
    pub http_timeout_ms: u32,
    /// Main loop sleep between polling cycles (milliseconds)
    pub poll_interval_ms: u32,
}

fn env_or(value: Option<&'static str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            // WiFi
            wifi_ssid: env_or(option_env!("PRESSMON_WIFI_SSID"), ""),
            wifi_password: env_or(option_env!("PRESSMON_WIFI_PASSWORD"), ""),

            // Backend
            backend_url: env_or(option_env!("PRESSMON_BACKEND_URL"), "http://192.168.0.52:8000"),
            backend_username: env_or(option_env!("PRESSMON_BACKEND_USER"), "press-station"),
            backend_password: env_or(option_env!("PRESSMON_BACKEND_PASSWORD"), ""),
            alert_email: env_or(option_env!("PRESSMON_ALERT_EMAIL"), "maintenance@example.com"),

            // MQTT
            mqtt_host: env_or(option_env!("PRESSMON_MQTT_HOST"), "192.168.0.52"),
            mqtt_port: 1883,
            status_topic: "alphabase/presses/status".to_string(),
            command_topic: "alphabase/presses/commands".to_string(),

            // Identity
            device_id: env_or(option_env!("PRESSMON_DEVICE_ID"), "Press-Simulator-01"),
            press_number: 1,

            // Timing
            debounce_ms: 50,
            blink_interval_ms: 500,
            status_interval_ms: 5_000,
            http_timeout_ms: 10_000,
            poll_interval_ms: 10,
        }
    }
}

impl StationConfig {
    /// Reject values that would leave the station unable to operate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed("backend_url must be http(s)"));
        }
        if url.ends_with('/') {
            return Err(ConfigError::ValidationFailed("backend_url must not end with '/'"));
        }
        if self.device_id.is_empty() {
            return Err(ConfigError::ValidationFailed("device_id is empty"));
        }
        if self.mqtt_host.is_empty() || self.mqtt_port == 0 {
            return Err(ConfigError::ValidationFailed("mqtt broker address is incomplete"));
        }
        if self.debounce_ms == 0 || self.blink_interval_ms == 0 || self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("timing periods must be non-zero"));
        }
        if self.http_timeout_ms == 0 || self.http_timeout_ms > MAX_HTTP_TIMEOUT_MS {
            return Err(ConfigError::ValidationFailed("http_timeout_ms must be 1..=60000"));
        }
        if self.status_interval_ms <= self.poll_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "status_interval_ms must exceed poll_interval_ms",
            ));
        }
        Ok(())
    }

    /// Broker URL in the form the ESP-IDF MQTT client expects.
    pub fn mqtt_url(&self) -> String {
        format!("mqtt://{}:{}", self.mqtt_host, self.mqtt_port)
    }
}
