//! LedStrip firmware: device entry point.
//!
//! ```text
//!  USB CDC ─▶ stdin thread ─▶ INPUT_CHANNEL ─┐
//!                                            ▼
//!            ┌──────────── LocalExecutor (main thread) ────────────┐
//!            │  serve loop ─▶ Scheduler ─▶ command tasks ─▶ strips │
//!            └─────────────────────────────────────────────────────┘
//!                                            │
//!                                 RMT ch0/ch1 ─▶ WS2812 strips
//! ```
#![deny(unused_must_use)]

use std::rc::Rc;

use anyhow::{Context, Result};
use esp_idf_hal::gpio::AnyOutputPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::rmt::RMT;
use log::info;

use ledstrip::adapters::delay::ReactorDelay;
use ledstrip::adapters::stdio::StdioTransport;
use ledstrip::adapters::time::Uptime;
use ledstrip::adapters::ws2812_rmt::Ws2812RmtSink;
use ledstrip::config::ControllerConfig;
use ledstrip::scheduler::Executor;
use ledstrip::strip::PixelSink;
use ledstrip::Controller;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("LedStrip v{}", env!("CARGO_PKG_VERSION"));

    let uptime = Uptime::new();
    let cfg = ControllerConfig::default();
    cfg.validate()?;

    // ── 2. Strips ─────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sinks = rmt_sinks(&cfg, peripherals.rmt)?;

    // ── 3. Console + controller ───────────────────────────────
    let transport = StdioTransport::spawn()?;
    let executor = Rc::new(Executor::new());
    let controller = Controller::from_config(
        &cfg,
        transport,
        sinks,
        Rc::clone(&executor),
        Rc::new(ReactorDelay),
        uptime.seed(),
    )?;
    controller.spawn(cfg.poll_interval_ms);

    // ── 4. Run forever ────────────────────────────────────────
    info!("Ready after {} ms", uptime.millis());
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}

/// One RMT-driven sink per configured strip.
fn rmt_sinks(cfg: &ControllerConfig, rmt: RMT) -> Result<Vec<Box<dyn PixelSink>>> {
    let mut ch0 = Some(rmt.channel0);
    let mut ch1 = Some(rmt.channel1);
    let mut sinks: Vec<Box<dyn PixelSink>> = Vec::with_capacity(cfg.strips.len());

    for (i, strip) in cfg.strips.iter().enumerate() {
        // SAFETY: every configured pin drives exactly one strip and nothing
        // else in the firmware claims it.
        let pin = unsafe { AnyOutputPin::new(i32::from(strip.pin)) };
        let sink: Box<dyn PixelSink> = match i {
            0 => Box::new(Ws2812RmtSink::new(ch0.take().context("RMT channel 0 taken")?, pin)?),
            1 => Box::new(Ws2812RmtSink::new(ch1.take().context("RMT channel 1 taken")?, pin)?),
            _ => anyhow::bail!("no RMT channel left for strip {}", i),
        };
        info!("Strip {}: GPIO{}, {} pixels, {:?}", i, strip.pin, strip.num_pixels, strip.order);
        sinks.push(sink);
    }
    Ok(sinks)
}
