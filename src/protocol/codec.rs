//! `$`-delimited line framer and reply encoding.
//!
//! Wire format:
//! ```text
//!   ... junk ...  $ name , field , field ... \n      (or \r, \r\n, \n\r)
//!                 └────────── one frame ──────────┘
//! ```
//!
//! The parser accumulates incoming bytes into a buffer and yields complete
//! frames. This handles partial reads gracefully: a single
//! `Transport::read` call may return part of a frame, a whole frame, or a
//! frame preceded by noise.
//!
//! At most one frame is surfaced per [`FrameParser::feed`] call. Bytes of
//! the chunk that follow the first completed frame are dropped, matching
//! the device's historical one-line-per-read behaviour.

use heapless::Vec;
use log::{debug, warn};

use crate::error::ParseError;

use super::tokenizer::{self, CommandLine};

/// Start-of-frame marker.
pub const START_MARKER: u8 = b'$';

/// Maximum frame size including `$` and the trailing `\n`.
pub const MAX_FRAME_SIZE: usize = 256;

/// Parser state machine.
enum ParserState {
    /// No `$` seen since the last completion or discard.
    Idle,
    /// Collecting bytes after a `$`.
    Capturing,
}

/// Streaming frame parser.
pub struct FrameParser {
    state: ParserState,
    buf: Vec<u8, MAX_FRAME_SIZE>,
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            buf: Vec::new(),
        }
    }

    /// Feed bytes into the parser.
    ///
    /// Returns `Some(&[u8])` when a complete frame (`$...\n`) is available.
    /// The returned slice is valid until the next call to `feed`.
    pub fn feed(&mut self, data: &[u8]) -> Option<&[u8]> {
        for &byte in data {
            match self.state {
                ParserState::Idle => {
                    // Anything outside `$...\n` is ignored, including stray
                    // terminators from `\r\n` / `\n\r` pairs.
                    if byte == START_MARKER {
                        self.open();
                    }
                }

                ParserState::Capturing => match byte {
                    START_MARKER => {
                        if self.buf.len() > 1 {
                            debug!("frame restarted, dropped {} bytes", self.buf.len());
                        }
                        self.open();
                    }
                    b'\n' | b'\r' => {
                        // Capacity was reserved for the terminator in `push`.
                        let _ = self.buf.push(b'\n');
                        self.state = ParserState::Idle;
                        return Some(self.buf.as_slice());
                    }
                    _ => self.push(byte),
                },
            }
        }

        None // No complete frame yet.
    }

    /// Feed bytes and tokenize the frame, if one completed.
    ///
    /// `None` means "nothing to parse yet"; `Some(Err(_))` means a frame was
    /// assembled but was not well formed.
    pub fn process_input(&mut self, data: &[u8]) -> Option<Result<CommandLine, ParseError>> {
        self.feed(data).map(tokenizer::parse)
    }

    /// True while a frame is open (a `$` was seen and no terminator yet).
    pub fn is_capturing(&self) -> bool {
        matches!(self.state, ParserState::Capturing)
    }

    /// Reset parser state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.state = ParserState::Idle;
        self.buf.clear();
    }

    fn open(&mut self) {
        self.buf.clear();
        let _ = self.buf.push(START_MARKER);
        self.state = ParserState::Capturing;
    }

    fn push(&mut self, byte: u8) {
        // Keep one slot free for the terminator.
        if self.buf.len() + 1 >= MAX_FRAME_SIZE {
            warn!("frame exceeds {} bytes, discarding", MAX_FRAME_SIZE);
            self.reset();
            return;
        }
        let _ = self.buf.push(byte);
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

// ── Replies ───────────────────────────────────────────────────

/// Status token sent after every dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Err,
}

impl Reply {
    /// Token without line ending.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ok => "$OK",
            Self::Err => "$ERR",
        }
    }

    /// Encoded bytes as written to the transport.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Ok => b"$OK\r\n",
            Self::Err => b"$ERR\r\n",
        }
    }
}
