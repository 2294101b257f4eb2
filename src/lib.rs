//! LED strip controller library.
//!
//! Everything the device and the host simulator share: framing, dispatch,
//! strip arbitration and the pattern commands. ESP-IDF-only pieces live in
//! [`adapters`] behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod patterns;
pub mod protocol;
pub mod scheduler;
pub mod strip;

pub use controller::Controller;
pub use error::{Error, Result};
