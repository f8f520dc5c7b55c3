//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                  |
//! |------------|-------------------|------------------------------|
//! | `fs_store` | FileStore         | SPIFFS via ESP-IDF VFS       |
//! | `gpio`     | InputPin          | ESP32 GPIO (5 sensor inputs) |
//! | `http`     | SinkTransport     | ESP-IDF HTTPS client         |
//! | `log_sink` | EventSink         | Serial log output            |
//! | `nvs`      | ConfigPort        | NVS / in-memory store        |
//! | `time`     | ClockPort         | SNTP + ESP32 system timer    |
//! | `wifi`     | ConnectivityPort  | ESP-IDF WiFi STA             |

pub mod fs_store;
pub mod gpio;
pub mod http;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
