//! Log-based pixel sink.
//!
//! Stands in for the LED hardware in the host simulator: every `show` is
//! one debug line, and a one-line summary at info level when the lit set
//! changes.

use log::{debug, info};

use crate::error::Result;
use crate::strip::{ColorOrder, PixelSink};

/// Adapter that logs every frame pushed to strip `index`.
pub struct LogPixelSink {
    index: usize,
    order: ColorOrder,
    frames: u64,
    lit: usize,
}

impl LogPixelSink {
    pub fn new(index: usize, order: ColorOrder) -> Self {
        Self {
            index,
            order,
            frames: 0,
            lit: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl PixelSink for LogPixelSink {
    fn show(&mut self, pixels: &[u32]) -> Result<()> {
        self.frames += 1;
        let lit = pixels.iter().filter(|&&p| p != 0).count();
        if lit != self.lit {
            info!("STRIP{} | frame {} | {}/{} lit", self.index, self.frames, lit, pixels.len());
            self.lit = lit;
        }
        if log::log_enabled!(log::Level::Debug) {
            let head: Vec<(u8, u8, u8)> = pixels.iter().take(8).map(|&p| self.order.unpack(p)).collect();
            debug!("STRIP{} | frame {} | head {:?}", self.index, self.frames, head);
        }
        Ok(())
    }
}
