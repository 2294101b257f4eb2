//! Pixel sink port: whatever shifts a pixel buffer out to real LEDs.
//!
//! The WS2812 signal is timing-critical, but from here it is one call.
//! Adapters: RMT driver on the device, a log line on the host, a recorder in
//! tests.

use crate::error::Result;

pub trait PixelSink {
    /// Push the whole buffer to the strip.
    fn show(&mut self, pixels: &[u32]) -> Result<()>;
}

/// Sink that drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PixelSink for NullSink {
    fn show(&mut self, _pixels: &[u32]) -> Result<()> {
        Ok(())
    }
}
