//! WiFi station-mode adapter.
//!
//! Brings the station onto the plant network and keeps it there.  The
//! address it obtains is reported on the status channel.
//!
//! ## cfg gating
//!
//! - **`feature = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **otherwise**: simulation stub for host-side tests.
//!
//! ## Reconnection policy
//!
//! After a lost link the adapter retries from [`WifiStation::poll`] with
//! an exponential backoff (2 s → 4 s → 8 s … capped at 60 s).  Polling
//! never blocks longer than a single connect attempt.

use core::fmt;
use log::{info, warn};

#[cfg(feature = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    DriverInit,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::DriverInit => write!(f, "WiFi driver initialisation failed"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl std::error::Error for ConnectivityError {}

const INITIAL_BACKOFF_MS: u64 = 2_000;
const MAX_BACKOFF_MS: u64 = 60_000;

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Validated network credentials.
#[derive(Clone)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        if ssid.is_empty() || !is_printable_ascii(ssid) {
            return Err(ConnectivityError::InvalidSsid);
        }
        if !password.is_empty() && password.len() < 8 {
            return Err(ConnectivityError::InvalidPassword);
        }
        Ok(Self {
            ssid: ssid.try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: password
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .finish_non_exhaustive()
    }
}

// ───────────────────────────────────────────────────────────────
// Station
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32, retry_at_ms: u64 },
}

pub struct WifiStation {
    #[cfg(feature = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: number of upcoming connect attempts that fail.
    #[cfg(not(feature = "espidf"))]
    sim_failures: u32,
    ssid: heapless::String<32>,
    state: WifiState,
    backoff_ms: u64,
    ip: String,
}

impl WifiStation {
    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Last address obtained from DHCP, `0.0.0.0` before the first connect.
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// One blocking connect attempt.  On success the address is refreshed.
    pub fn connect(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi: connecting to '{}'", self.ssid);
        match self.platform_connect() {
            Ok(ip) => {
                self.ip = ip;
                self.state = WifiState::Connected;
                self.backoff_ms = INITIAL_BACKOFF_MS;
                info!("WiFi: connected, ip={}", self.ip);
                Ok(())
            }
            Err(e) => {
                warn!("WiFi: connection failed: {e}");
                Err(e)
            }
        }
    }

    /// Watch the link and retry with backoff after a drop.
    /// Returns `true` on the cycle the link comes back.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.state {
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting {
                        attempt: 0,
                        retry_at_ms: now_ms,
                    };
                }
                false
            }
            WifiState::Reconnecting {
                attempt,
                retry_at_ms,
            } if now_ms >= retry_at_ms => {
                info!("WiFi: reconnect attempt {attempt} (backoff {} ms)", self.backoff_ms);
                if self.connect().is_ok() {
                    return true;
                }
                self.state = WifiState::Reconnecting {
                    attempt: attempt + 1,
                    retry_at_ms: now_ms + self.backoff_ms,
                };
                self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
                false
            }
            WifiState::Reconnecting { .. } | WifiState::Disconnected => false,
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    /// Configure and start the driver.  Does not connect.
    #[cfg(feature = "espidf")]
    pub fn start(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        credentials: &WifiCredentials,
    ) -> Result<Self, ConnectivityError> {
        let driver_err = |e: esp_idf_sys::EspError| {
            warn!("WiFi: driver error {e}");
            ConnectivityError::DriverInit
        };

        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(driver_err)?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop).map_err(driver_err)?;
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: credentials.ssid.clone(),
            password: credentials.password.clone(),
            auth_method: if credentials.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        }))
        .map_err(driver_err)?;
        wifi.start().map_err(driver_err)?;

        Ok(Self {
            wifi,
            ssid: credentials.ssid.clone(),
            state: WifiState::Disconnected,
            backoff_ms: INITIAL_BACKOFF_MS,
            ip: String::from("0.0.0.0"),
        })
    }

    #[cfg(not(feature = "espidf"))]
    pub fn start(credentials: &WifiCredentials) -> Result<Self, ConnectivityError> {
        Ok(Self {
            sim_failures: 0,
            ssid: credentials.ssid.clone(),
            state: WifiState::Disconnected,
            backoff_ms: INITIAL_BACKOFF_MS,
            ip: String::from("0.0.0.0"),
        })
    }

    #[cfg(feature = "espidf")]
    fn platform_connect(&mut self) -> Result<String, ConnectivityError> {
        self.wifi.connect().map_err(|e| {
            warn!("WiFi: connect error {e}");
            ConnectivityError::ConnectionFailed
        })?;
        self.wifi.wait_netif_up().map_err(|e| {
            warn!("WiFi: netif error {e}");
            ConnectivityError::ConnectionFailed
        })?;
        let ip_info = self
            .wifi
            .wifi()
            .sta_netif()
            .get_ip_info()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        Ok(ip_info.ip.to_string())
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_connect(&mut self) -> Result<String, ConnectivityError> {
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            return Err(ConnectivityError::ConnectionFailed);
        }
        info!("WiFi(sim): associated with '{}'", self.ssid);
        Ok(String::from("127.0.0.1"))
    }

    #[cfg(feature = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim_failures == 0
    }

    /// Simulation: drop the link and fail the next `n` connect attempts.
    #[cfg(not(feature = "espidf"))]
    pub fn sim_drop_link(&mut self, failing_attempts: u32) {
        self.sim_failures = failing_attempts.max(1);
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
