//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to              |
//! |------------|---------------|--------------------------|
//! | `log_sink` | EventSink     | Serial log output        |
//! | `osc`      | EventEncoder  | OSC 1.0 wire format      |
//! | `time`     | ClockPort     | ESP32 system timer       |
//! | `udp`      | SessionPort   | lwIP / std UDP socket    |
//! | `wifi`     | NetworkPort   | ESP-IDF WiFi STA         |

pub mod log_sink;
pub mod osc;
pub mod time;
pub mod udp;
pub mod wifi;
