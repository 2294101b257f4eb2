//! Queues between the console and the cooperative loop.
//!
//! ```text
//! ┌──────────────┐ InputChunk ┌──────────────┐  ConsoleLine ┌──────────┐
//! │ stdin thread │──────────▶│ serve loop    │◀─────────────│ commands │
//! │ (blocking)   │ INPUT_CH.  │ (executor)    │   Console    │ (tasks)  │
//! └──────────────┘            └──────────────┘               └──────────┘
//! ```
//!
//! `INPUT_CHANNEL` is a static shared across threads, so it uses the
//! critical-section mutex. The console queue never leaves the executor
//! thread and uses `NoopRawMutex`.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::channel::Channel;
use heapless::{String, Vec};
use log::warn;

/// Largest slice of input handed over per message.
pub const INPUT_CHUNK: usize = 64;

/// Raw input bytes as read from the console.
pub type InputChunk = Vec<u8, INPUT_CHUNK>;

const INPUT_DEPTH: usize = 8;

/// Queue type between a blocking reader and the serve loop.
pub type InputChannel = Channel<CriticalSectionRawMutex, InputChunk, INPUT_DEPTH>;

/// Console reader thread → serve loop.
pub static INPUT_CHANNEL: InputChannel = Channel::new();

/// Longest console line; longer text is cut at a char boundary.
pub const LINE_CAPACITY: usize = 96;

pub type ConsoleLine = String<LINE_CAPACITY>;

const CONSOLE_DEPTH: usize = 32;

/// Text output produced by commands, drained onto the transport by the
/// controller between dispatches.
pub struct Console {
    queue: Channel<NoopRawMutex, ConsoleLine, CONSOLE_DEPTH>,
}

impl Console {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
        }
    }

    /// Queue one line, waiting for room if the queue is full.
    pub async fn line(&self, text: &str) {
        self.queue.send(truncate(text)).await;
    }

    /// Queue one line without waiting. Returns `false` if it was dropped.
    pub fn try_line(&self, text: &str) -> bool {
        if self.queue.try_send(truncate(text)).is_err() {
            warn!("console queue full, line dropped");
            return false;
        }
        true
    }

    /// Hand every queued line to `f`, oldest first.
    pub fn drain(&self, mut f: impl FnMut(&str)) {
        while let Ok(line) = self.queue.try_receive() {
            f(&line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(text: &str) -> ConsoleLine {
    let mut line = ConsoleLine::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}
