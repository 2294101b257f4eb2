//! Bar-graph meter with a per-channel colour ramp.
//!
//! `meter,<pct>` lights the first `pct`% of the configured run, rounding to
//! the nearest dot, and blanks the rest of the run. One-shot.
//!
//! Config: `config,<name>,start,stop,r0,rN,g0,gN,b0,bN`. `stop` is
//! inclusive and may be below `start`, in which case the meter grows
//! downwards. Each channel ramps from its `*0` value at `start` towards its
//! `*N` value.

use core::cell::Cell;
use core::ops::Range;
use std::rc::Rc;

use futures_lite::future::BoxedLocal;
use log::{info, warn};

use crate::command::{args, Command, ExecContext, StopFlag};
use crate::error::ArgError;
use crate::protocol::tokenizer::CommandLine;
use crate::strip::pixel::ramp;
use crate::strip::{LedStrip, StripGuard};

use super::{begin, put, span_fits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterConfig {
    pub start: i32,
    pub stop: i32,
    pub red: (i32, i32),
    pub green: (i32, i32),
    pub blue: (i32, i32),
    /// Dots in the run; zero until configured.
    pub numdots: i64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            start: 0,
            stop: 0,
            red: (0, 15),
            green: (0, 15),
            blue: (0, 15),
            numdots: 0,
        }
    }
}

impl MeterConfig {
    fn from_fields(fields: &[String]) -> Result<Self, ArgError> {
        let [start, stop, r0, rn, g0, gn, b0, bn] = args::fields::<i32, 8>(fields, 2)?;
        Ok(Self {
            start,
            stop,
            red: (r0, rn),
            green: (g0, gn),
            blue: (b0, bn),
            numdots: (i64::from(stop) - i64::from(start)).abs() + 1,
        })
    }

    fn stride(&self) -> i64 {
        if self.stop > self.start { 1 } else { -1 }
    }

    /// Dots lit for `pct`, rounded to nearest and clamped to the run.
    pub fn lit(&self, pct: i32) -> i64 {
        let pct = i64::from(pct.clamp(0, 100));
        (self.numdots * pct + 50).div_euclid(100)
    }

    /// Run positions that land on a strip of `len` pixels.
    fn on_strip(&self, len: usize) -> Range<i64> {
        let len = i64::try_from(len).unwrap_or(i64::MAX);
        let base = i64::from(self.start);
        let (lo, hi) = if self.stride() > 0 {
            (-base, len.saturating_sub(base))
        } else {
            (base.saturating_sub(len) + 1, base + 1)
        };
        lo.max(0)..hi.min(self.numdots)
    }
}

pub struct Meter {
    strip: Rc<LedStrip>,
    stop: StopFlag,
    cfg: Cell<MeterConfig>,
}

impl Meter {
    pub fn new(strip: Rc<LedStrip>) -> Self {
        Self {
            strip,
            stop: StopFlag::new(),
            cfg: Cell::new(MeterConfig::default()),
        }
    }

    pub fn settings(&self) -> MeterConfig {
        self.cfg.get()
    }
}

fn render(strip: &mut StripGuard<'_>, cfg: &MeterConfig, pct: i32) {
    let order = strip.order();
    let lit = cfg.lit(pct);
    let stride = cfg.stride();
    let base = i64::from(cfg.start);

    for idx in cfg.on_strip(strip.len()) {
        let color = if idx < lit {
            order.pack(
                ramp(cfg.red.0, cfg.red.1, idx, cfg.numdots),
                ramp(cfg.green.0, cfg.green.1, idx, cfg.numdots),
                ramp(cfg.blue.0, cfg.blue.1, idx, cfg.numdots),
            )
        } else {
            0
        };
        put(strip, base + idx * stride, color);
    }
}

impl Command for Meter {
    fn help(&self) -> &'static str {
        "meter,<pct 0-100>"
    }

    fn config_help(&self) -> &'static str {
        "start,stop,r0,rN,g0,gN,b0,bN"
    }

    fn config(&self, fields: &[String]) {
        match MeterConfig::from_fields(fields) {
            Ok(cfg) => {
                info!("meter: {} dots from {} to {}", cfg.numdots, cfg.start, cfg.stop);
                if !span_fits(self.strip.len(), cfg.start, cfg.stop) {
                    warn!(
                        "meter: run {}..={} reaches past strip {} ({} pixels)",
                        cfg.start,
                        cfg.stop,
                        self.strip.index(),
                        self.strip.len()
                    );
                }
                self.cfg.set(cfg);
            }
            Err(e) => warn!("meter: config ignored ({})", e),
        }
    }

    fn run(self: Rc<Self>, _ctx: ExecContext, fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let pct: i32 = match args::field(&fields, 1) {
                Ok(p) => p,
                Err(e) => {
                    warn!("meter: {}", e);
                    return;
                }
            };

            let me: Rc<dyn Command> = self.clone();
            let Some(mut strip) = begin(&self.strip, me).await else {
                return;
            };

            render(&mut strip, &self.cfg.get(), pct);
            strip.show();
            self.stop.arm();
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}
