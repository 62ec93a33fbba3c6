//! MQTT link: status publishing and the inbound command mailbox.
//!
//! The ESP-IDF MQTT client delivers events on its own task.  Inbound
//! commands cross into the control loop through a single-slot
//! `embassy-sync` channel; connection state crosses through an atomic.
//!
//! ```text
//! ┌──────────────┐  CommandPayload  ┌──────────────┐
//! │ MQTT task    │────────────────▶│ Control loop │
//! │ (callback)   │  (1 slot)        │ (sync)       │
//! └──────────────┘                  └──────────────┘
//! ```
//!
//! A command arriving while the slot is still occupied is dropped.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::app::commands::MAX_COMMAND_LEN;
use crate::app::ports::StatusPort;
use crate::config::StationConfig;
use crate::error::TransportError;

#[cfg(feature = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

/// One raw command payload.
pub type CommandPayload = heapless::Vec<u8, MAX_COMMAND_LEN>;

/// Inbound command mailbox: MQTT task → control loop.
static COMMAND_MAILBOX: Channel<CriticalSectionRawMutex, CommandPayload, 1> = Channel::new();

/// Broker session state, written by the MQTT task.
static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Hand a received payload to the control loop.  Returns `false` when the
/// payload was dropped (oversized, or the slot is occupied).
pub fn deliver_command(data: &[u8]) -> bool {
    let Ok(payload) = CommandPayload::from_slice(data) else {
        warn!("MQTT: command of {} bytes exceeds {MAX_COMMAND_LEN}, dropped", data.len());
        return false;
    };
    if COMMAND_MAILBOX.try_send(payload).is_err() {
        warn!("MQTT: command mailbox occupied, dropped");
        return false;
    }
    true
}

/// Take the pending command, if any.  Never blocks.
pub fn take_command() -> Option<CommandPayload> {
    COMMAND_MAILBOX.try_receive().ok()
}

/// Drop a pending command without acting on it.  Called on entry into
/// `WaitingForReason`, so a command sent while the press was still running
/// is not honoured a cycle later.  Returns `true` if one was discarded.
pub fn discard_pending_command() -> bool {
    let stale = take_command().is_some();
    if stale {
        info!("MQTT: command received before the stop was discarded");
    }
    stale
}

fn set_connected(up: bool) {
    if CONNECTED.swap(up, Ordering::AcqRel) != up {
        if up {
            info!("MQTT: connected");
        } else {
            warn!("MQTT: disconnected");
        }
    }
}

pub struct MqttLink {
    #[cfg(feature = "espidf")]
    client: EspMqttClient<'static>,
    /// Simulation: every published payload.
    #[cfg(not(feature = "espidf"))]
    pub published: Vec<Vec<u8>>,
    status_topic: String,
    command_topic: String,
    subscribed: bool,
}

impl MqttLink {
    pub fn is_connected(&self) -> bool {
        CONNECTED.load(Ordering::Acquire)
    }

    /// Subscribe after every (re)connection.  Returns `true` on the cycle
    /// the subscription is made, so the caller can publish an initial
    /// status.
    pub fn poll_connection(&mut self) -> bool {
        if !self.is_connected() {
            self.subscribed = false;
            return false;
        }
        if self.subscribed {
            return false;
        }
        match self.platform_subscribe() {
            Ok(()) => {
                info!("MQTT: subscribed to {}", self.command_topic);
                self.subscribed = true;
                true
            }
            Err(e) => {
                warn!("MQTT: subscribe failed: {e}");
                false
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(feature = "espidf")]
    pub fn connect(config: &StationConfig) -> Result<Self, esp_idf_sys::EspError> {
        let url = config.mqtt_url();
        let conf = MqttClientConfiguration {
            client_id: Some(config.device_id.as_str()),
            ..Default::default()
        };

        let client = EspMqttClient::new_cb(&url, &conf, |event| match event.payload() {
            EventPayload::Connected(_) => set_connected(true),
            EventPayload::Disconnected => set_connected(false),
            EventPayload::Received { data, .. } => {
                deliver_command(data);
            }
            EventPayload::Error(e) => warn!("MQTT: client error {e:?}"),
            _ => {}
        })?;
        info!("MQTT: client started for {url}");

        Ok(Self {
            client,
            status_topic: config.status_topic.clone(),
            command_topic: config.command_topic.clone(),
            subscribed: false,
        })
    }

    /// Simulation: the broker is reachable immediately.
    #[cfg(not(feature = "espidf"))]
    pub fn connect(config: &StationConfig) -> Result<Self, TransportError> {
        set_connected(true);
        Ok(Self {
            published: Vec::new(),
            status_topic: config.status_topic.clone(),
            command_topic: config.command_topic.clone(),
            subscribed: false,
        })
    }

    #[cfg(feature = "espidf")]
    fn platform_subscribe(&mut self) -> Result<(), TransportError> {
        self.client
            .subscribe(&self.command_topic, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|_| TransportError::Unreachable)
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_subscribe(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    #[cfg(feature = "espidf")]
    fn platform_publish(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.client
            .enqueue(&self.status_topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|_| TransportError::Unreachable)
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_publish(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        log::debug!("MQTT(sim): {} <- {} bytes", self.status_topic, payload.len());
        self.published.push(payload.to_vec());
        Ok(())
    }
}

impl StatusPort for MqttLink {
    fn publish_status(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Unreachable);
        }
        self.platform_publish(payload)
    }
}
