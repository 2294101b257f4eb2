//! Unified error types for the LED strip controller.
//!
//! A single `Error` enum that every subsystem can convert into. Nothing in
//! the dispatch path is fatal: these values are logged and dropped by the
//! caller, never allowed to end the run loop. All variants are `Copy` so
//! they can be passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An assembled line was not a well-formed `$...\n` frame.
    Parse(ParseError),
    /// A command or config field was missing or not a number.
    Arg(ArgError),
    /// Configuration is invalid.
    Config(&'static str),
    /// The command table has no room for another name.
    RegistryFull,
    /// A pixel sink failed to push a frame out.
    Sink(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Arg(e) => write!(f, "argument: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::RegistryFull => write!(f, "command registry full"),
            Self::Sink(msg) => write!(f, "pixel sink: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Frame parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Line is empty or does not begin with `$`.
    MissingStart,
    /// Line does not end with `\n`.
    MissingTerminator,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "missing '$' start marker"),
            Self::MissingTerminator => write!(f, "missing newline terminator"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Argument errors
// ---------------------------------------------------------------------------

/// Field-level errors. The `usize` is the field index in the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgError {
    /// The line has fewer fields than the command needs.
    Missing(usize),
    /// The field is present but is not a valid number for its slot.
    Invalid(usize),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(idx) => write!(f, "field {idx} missing"),
            Self::Invalid(idx) => write!(f, "field {idx} invalid"),
        }
    }
}

impl From<ArgError> for Error {
    fn from(e: ArgError) -> Self {
        Self::Arg(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
