//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements  | Connects to                    |
//! |-------------|-------------|--------------------------------|
//! | `http`      | HttpPort    | Backend REST API               |
//! | `mqtt`      | StatusPort  | MQTT broker (status, commands) |
//! | `log_sink`  | EventSink   | Serial log output              |
//! | `time`      | ClockPort   | ESP32 system timer             |
//! | `wifi`      |:           | ESP-IDF WiFi STA               |
//! | `device_id` |:           | eFuse factory MAC              |

pub mod device_id;
pub mod http;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
