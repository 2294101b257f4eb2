//! Random sparkle patterns. Both loop until stopped and blank the strip on
//! the way out.
//!
//! `random` is configurable:
//! `config,<name>,<dark-threshold>,<max-intensity>,<num-pixels>,<delay_ms>`
//!
//! - dark-threshold: the top 7 bits of each draw are compared against it;
//!   below means the run is dark. 77 is the default.
//! - max-intensity: per-channel AND mask, 127 by default. 255 lifts the cap.
//! - num-pixels: longest run lit per step (at least 1), default 5.
//! - delay_ms: step period, default 100.
//!
//! `randomog` has no settings: fixed colour probabilities, 100 ms period.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use futures_lite::future::BoxedLocal;
use log::{info, warn};

use crate::command::{args, Command, ExecContext, StopFlag};
use crate::error::ArgError;
use crate::protocol::tokenizer::CommandLine;
use crate::strip::{LedStrip, StripGuard};

use super::begin;
use super::rng::XorShift32;

/// Channel masks a lit run is restricted to.
const CHOOSER: [u32; 7] = [
    0x00_00FF, 0x00_FF00, 0x00_FFFF, 0xFF_0000, 0xFF_00FF, 0xFF_FF00, 0xFF_FFFF,
];

const OG_PERIOD_MS: u32 = 100;
const OG_MAX_RUN: u32 = 5;

fn replicate(channel: u32) -> u32 {
    channel << 16 | channel << 8 | channel
}

// ───────────────────────────────────────────────────────────────
// random
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomConfig {
    pub dark_threshold: u32,
    pub max_intensity: u32,
    pub max_pixels: u32,
    pub delay_ms: u32,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 77,
            max_intensity: 0x7F_7F7F,
            max_pixels: 5,
            delay_ms: 100,
        }
    }
}

impl RandomConfig {
    fn from_fields(fields: &[String]) -> Result<Self, ArgError> {
        args::exact_count(fields, 2, 4)?;
        let threshold: i64 = args::field(fields, 2)?;
        let intensity: i64 = args::field(fields, 3)?;
        let max_pixels: u32 = args::field(fields, 4)?;
        Ok(Self {
            dark_threshold: (threshold & 0xFF) as u32,
            max_intensity: replicate((intensity & 0xFF) as u32),
            max_pixels: max_pixels.max(1),
            delay_ms: args::field(fields, 5)?,
        })
    }
}

pub struct Random {
    strip: Rc<LedStrip>,
    stop: StopFlag,
    cfg: Cell<RandomConfig>,
    rng: RefCell<XorShift32>,
}

impl Random {
    pub fn new(strip: Rc<LedStrip>, seed: u32) -> Self {
        Self {
            strip,
            stop: StopFlag::new(),
            cfg: Cell::new(RandomConfig::default()),
            rng: RefCell::new(XorShift32::new(seed)),
        }
    }

    pub fn settings(&self) -> RandomConfig {
        self.cfg.get()
    }

    fn step(&self, strip: &mut StripGuard<'_>, cfg: &RandomConfig) {
        let mut rng = self.rng.borrow_mut();

        let draw = rng.below(0x7FFF_FFFF);
        let color = if draw >> 24 < cfg.dark_threshold {
            0
        } else {
            draw & CHOOSER[rng.index(CHOOSER.len())] & cfg.max_intensity
        };

        let len = strip.len();
        let run = (rng.between(1, cfg.max_pixels) as usize).min(len);
        let start = rng.index(len - run);
        strip.fill_range(start, run, color);
    }
}

impl Command for Random {
    fn help(&self) -> &'static str {
        "show random colors"
    }

    fn config_help(&self) -> &'static str {
        "dark-threshold(0-255),max-intensity(0-255),num-pixels,delay_ms"
    }

    fn config(&self, fields: &[String]) {
        match RandomConfig::from_fields(fields) {
            Ok(cfg) => {
                info!("random: {:?}", cfg);
                self.cfg.set(cfg);
            }
            Err(e) => warn!("random: config ignored ({})", e),
        }
    }

    fn run(self: Rc<Self>, ctx: ExecContext, _fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let me: Rc<dyn Command> = self.clone();
            let Some(mut strip) = begin(&self.strip, me).await else {
                return;
            };

            while !self.stop.is_requested() {
                // Settings may change between steps.
                let cfg = self.cfg.get();
                self.step(&mut strip, &cfg);
                strip.show();
                ctx.sleep_ms(cfg.delay_ms).await;
            }

            strip.clear();
            self.stop.arm();
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

// ───────────────────────────────────────────────────────────────
// randomog
// ───────────────────────────────────────────────────────────────

pub struct RandomOg {
    strip: Rc<LedStrip>,
    stop: StopFlag,
    rng: RefCell<XorShift32>,
}

impl RandomOg {
    pub fn new(strip: Rc<LedStrip>, seed: u32) -> Self {
        Self {
            strip,
            stop: StopFlag::new(),
            rng: RefCell::new(XorShift32::new(seed)),
        }
    }

    fn step(&self, strip: &mut StripGuard<'_>) {
        let mut rng = self.rng.borrow_mut();
        let order = strip.order();

        let chooser = rng.between(0, 100);
        let start = rng.index(strip.len());
        let run = rng.between(1, OG_MAX_RUN) as usize + 1;
        let r = order.pack(rng.between(20, 255) as u8, 0, 0);
        let g = order.pack(0, rng.between(20, 255) as u8, 0);
        let b = order.pack(0, 0, rng.between(20, 255) as u8);

        let color = match chooser {
            0..30 => 0,
            30..35 | 60..70 => g,
            35..40 => r,
            40..45 => b,
            45..50 => g | r,
            50..55 => g | b,
            55..60 => r | b,
            _ => r | g | b,
        };

        let run = run.min(strip.len() - start);
        strip.fill_range(start, run, color);
    }
}

impl Command for RandomOg {
    fn help(&self) -> &'static str {
        "bill's original pattern2"
    }

    fn run(self: Rc<Self>, ctx: ExecContext, _fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let me: Rc<dyn Command> = self.clone();
            let Some(mut strip) = begin(&self.strip, me).await else {
                return;
            };

            while !self.stop.is_requested() {
                if !strip.is_empty() {
                    self.step(&mut strip);
                }
                strip.show();
                ctx.sleep_ms(OG_PERIOD_MS).await;
            }

            strip.clear();
            self.stop.arm();
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}
