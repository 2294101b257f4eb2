//! WS2812 pixel sink on the ESP32 RMT peripheral.
//!
//! Each pixel is 24 bits, most significant first, already in the strip's
//! wire order (see [`ColorOrder`](crate::strip::ColorOrder)). A `0` bit is
//! 350 ns high / 800 ns low, a `1` bit 700 ns high / 600 ns low; the RMT
//! idles low afterwards, which doubles as the latch.

use core::time::Duration;

use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::rmt::config::TransmitConfig;
use esp_idf_hal::rmt::{PinState, Pulse, RmtChannel, TxRmtDriver, VariableLengthSignal};
use log::{info, warn};

use crate::error::{Error, Result};
use crate::strip::PixelSink;

const BITS_PER_PIXEL: usize = 24;

pub struct Ws2812RmtSink<'d> {
    tx: TxRmtDriver<'d>,
    zero: [Pulse; 2],
    one: [Pulse; 2],
}

impl<'d> Ws2812RmtSink<'d> {
    pub fn new<C: RmtChannel>(
        channel: impl Peripheral<P = C> + 'd,
        pin: impl Peripheral<P = impl OutputPin> + 'd,
    ) -> anyhow::Result<Self> {
        let config = TransmitConfig::new().clock_divider(1);
        let tx = TxRmtDriver::new(channel, pin, &config)?;
        let ticks_hz = tx.counter_clock()?;
        let pulse = |state, ns| Pulse::new_with_duration(ticks_hz, state, &Duration::from_nanos(ns));

        let zero = [pulse(PinState::High, 350)?, pulse(PinState::Low, 800)?];
        let one = [pulse(PinState::High, 700)?, pulse(PinState::Low, 600)?];
        info!("WS2812: RMT driver ready ({} Hz)", ticks_hz.0);
        Ok(Self { tx, zero, one })
    }

    fn encode(&self, pixels: &[u32]) -> Option<VariableLengthSignal> {
        let mut signal = VariableLengthSignal::with_capacity(pixels.len() * BITS_PER_PIXEL * 2);
        for &p in pixels {
            for bit in (0..BITS_PER_PIXEL).rev() {
                let pulses = if p >> bit & 1 == 1 { &self.one } else { &self.zero };
                signal.push(pulses).ok()?;
            }
        }
        Some(signal)
    }
}

impl PixelSink for Ws2812RmtSink<'_> {
    fn show(&mut self, pixels: &[u32]) -> Result<()> {
        let signal = self.encode(pixels).ok_or(Error::Sink("rmt signal encode failed"))?;
        self.tx.start_blocking(&signal).map_err(|e| {
            warn!("WS2812: transmit failed: {}", e);
            Error::Sink("rmt transmit failed")
        })
    }
}
