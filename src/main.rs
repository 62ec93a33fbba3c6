//! Press-monitoring station firmware: main entry point.
//!
//! Hexagonal architecture with a single cooperative polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  BackendHttp    MqttLink       LogEventSink   MonotonicClock   │
//! │  (HttpPort)     (StatusPort)   (EventSink)    (ClockPort)      │
//! │  WifiStation    ButtonBank     StatusLeds                      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FSM · Credentials · Sync cascade · Notify · Status    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Result, anyhow};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use pressmon::adapters::device_id;
use pressmon::adapters::http::BackendHttp;
use pressmon::adapters::log_sink::LogEventSink;
use pressmon::adapters::mqtt::{self, MqttLink};
use pressmon::adapters::time::MonotonicClock;
use pressmon::adapters::wifi::{WifiCredentials, WifiStation};
use pressmon::app::ports::ClockPort;
use pressmon::app::service::AppService;
use pressmon::config::StationConfig;
use pressmon::drivers::button::ButtonBank;
use pressmon::drivers::status_led::StatusLeds;
use pressmon::events::EventSource;
use pressmon::fsm::PressState;
use pressmon::pins;

/// Delay between blocking Wi-Fi attempts at boot.
const BOOT_WIFI_RETRY: Duration = Duration::from_millis(500);

fn input_pin(gpio: i32) -> Result<PinDriver<'static, AnyIOPin, Input>> {
    // SAFETY: every GPIO in `pins` is claimed exactly once, and the
    // `Peripherals` pin fields are never used.
    let mut driver = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

fn output_pin(gpio: i32) -> Result<PinDriver<'static, AnyOutputPin, Output>> {
    // SAFETY: see `input_pin`.
    Ok(PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PressMon v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = StationConfig::default();
    config.device_id = device_id::resolve_device_id(&config.device_id, &device_id::read_mac());
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {e}"))?;
    info!("Device ID: {} (press {})", config.device_id, config.press_number);

    // ── 3. Network bring-up (blocking) ────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let credentials = WifiCredentials::new(&config.wifi_ssid, &config.wifi_password)?;
    let mut wifi = WifiStation::start(peripherals.modem, sysloop, nvs, &credentials)?;
    while let Err(e) = wifi.connect() {
        warn!("Boot: WiFi not up yet ({e}), retrying");
        std::thread::sleep(BOOT_WIFI_RETRY);
    }

    // ── 4. Adapters ───────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut http = BackendHttp::new(config.backend_url.clone(), config.http_timeout_ms);
    let mut sink = LogEventSink::new();

    let mut buttons = ButtonBank::new(
        input_pin(pins::START_STOP_BUTTON_GPIO)?,
        input_pin(pins::MAINTENANCE_BUTTON_GPIO)?,
        input_pin(pins::QUALITY_BUTTON_GPIO)?,
        input_pin(pins::MATERIAL_BUTTON_GPIO)?,
        input_pin(pins::TOOL_CHANGE_BUTTON_GPIO)?,
        u64::from(config.debounce_ms),
    );
    let mut leds = StatusLeds::new(
        output_pin(pins::RED_LED_GPIO)?,
        output_pin(pins::GREEN_LED_GPIO)?,
        u64::from(config.blink_interval_ms),
    );

    // ── 5. Application service ────────────────────────────────
    let mut app = AppService::new(&config);
    app.set_network_address(wifi.ip());
    app.start(clock.uptime_ms(), &mut http, &mut sink);

    let mut mqtt = MqttLink::connect(&config)?;

    info!("System ready. Entering polling loop.");

    // ── 6. Polling loop ───────────────────────────────────────
    let poll_interval = Duration::from_millis(u64::from(config.poll_interval_ms));
    loop {
        let now_ms = clock.uptime_ms();

        if wifi.poll(now_ms) {
            app.set_network_address(wifi.ip());
        }
        if mqtt.poll_connection() {
            app.publish_status(now_ms, &mut mqtt, &mut sink);
        }

        // At most one event per cycle; buttons take precedence.
        if let Some(event) = buttons.poll(now_ms, app.state()) {
            let transition =
                app.handle_event(event, EventSource::Button, now_ms, &mut http, &mut mqtt, &mut sink);
            // A command queued while running is stale once the press stops.
            if transition.is_some_and(|t| t.to == PressState::WaitingForReason) {
                mqtt::discard_pending_command();
            }
        } else if let Some(payload) = mqtt::take_command() {
            app.handle_remote_command(&payload, now_ms, &mut http, &mut mqtt, &mut sink);
        }

        // Backend calls above may have blocked; re-read the clock.
        let now_ms = clock.uptime_ms();
        app.tick_heartbeat(now_ms, &mut mqtt, &mut sink);
        leds.update(app.state(), now_ms);

        std::thread::sleep(poll_interval);
    }
}
