//! Adapters: concrete implementations of the controller's ports.
//!
//! | Adapter      | Implements  | Connects to                       |
//! |--------------|-------------|-----------------------------------|
//! | `stdio`      | Transport   | stdin reader thread + stdout      |
//! | `delay`      | Delay       | `async-io-mini` timer reactor     |
//! | `log_sink`   | PixelSink   | log output (host simulator)       |
//! | `ws2812_rmt` | PixelSink   | ESP32 RMT peripheral (`espidf`)   |
//! | `logger`     | log::Log    | stderr (host simulator)           |
//! | `time`       | (clock)     | ESP32 system timer / `Instant`    |

pub mod delay;
pub mod log_sink;
pub mod logger;
pub mod stdio;
pub mod time;
#[cfg(feature = "espidf")]
pub mod ws2812_rmt;
