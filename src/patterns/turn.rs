//! Turn-signal chaser.
//!
//! Each step paints one pixel and moves on from `start` towards `stop`
//! (inclusive, either direction). Past `stop` the chaser wraps to `start`
//! and flips between painting the colour and painting black, so the strip
//! alternately fills and empties. The cursor survives between runs; config
//! resets it.
//!
//! Config: `config,<name>,start,stop,r,g,b,delay_ms`.

use core::cell::Cell;
use std::rc::Rc;

use futures_lite::future::BoxedLocal;
use log::{info, warn};

use crate::command::{args, Command, ExecContext, StopFlag};
use crate::error::ArgError;
use crate::protocol::tokenizer::CommandLine;
use crate::strip::LedStrip;

use super::{begin, put, span_fits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnConfig {
    pub start: i32,
    pub stop: i32,
    pub rgb: [u8; 3],
    pub delay_ms: u32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            start: 0,
            stop: 30,
            rgb: [64, 0, 0],
            delay_ms: 0,
        }
    }
}

impl TurnConfig {
    fn from_fields(fields: &[String]) -> Result<Self, ArgError> {
        Ok(Self {
            start: args::field(fields, 2)?,
            stop: args::field(fields, 3)?,
            rgb: args::fields(fields, 4)?,
            delay_ms: args::field(fields, 7)?,
        })
    }

    fn stride(&self) -> i32 {
        if self.stop >= self.start { 1 } else { -1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    pix: i32,
    on: bool,
}

impl Cursor {
    fn at(cfg: &TurnConfig) -> Self {
        Self {
            pix: cfg.start,
            on: true,
        }
    }

    /// Step once; wraps and toggles after passing `stop`.
    fn advance(self, cfg: &TurnConfig) -> Self {
        let stride = cfg.stride();
        // Stepping off the end of `i32` counts as passing `stop`.
        match self.pix.checked_add(stride) {
            Some(pix) if (stride > 0 && pix <= cfg.stop) || (stride < 0 && pix >= cfg.stop) => {
                Self { pix, on: self.on }
            }
            _ => Self {
                pix: cfg.start,
                on: !self.on,
            },
        }
    }
}

pub struct Turn {
    strip: Rc<LedStrip>,
    stop: StopFlag,
    cfg: Cell<TurnConfig>,
    cursor: Cell<Cursor>,
}

impl Turn {
    pub fn new(strip: Rc<LedStrip>) -> Self {
        Self::with_config(strip, TurnConfig::default())
    }

    pub fn with_config(strip: Rc<LedStrip>, cfg: TurnConfig) -> Self {
        Self {
            strip,
            stop: StopFlag::new(),
            cursor: Cell::new(Cursor::at(&cfg)),
            cfg: Cell::new(cfg),
        }
    }

    pub fn settings(&self) -> TurnConfig {
        self.cfg.get()
    }
}

impl Command for Turn {
    fn help(&self) -> &'static str {
        "turn signal chaser"
    }

    fn config_help(&self) -> &'static str {
        "start,stop,r,g,b,delay_ms"
    }

    fn config(&self, fields: &[String]) {
        match TurnConfig::from_fields(fields) {
            Ok(cfg) => {
                info!("turn: {}..={} every {} ms", cfg.start, cfg.stop, cfg.delay_ms);
                if !span_fits(self.strip.len(), cfg.start, cfg.stop) {
                    warn!(
                        "turn: {}..={} reaches past strip {} ({} pixels)",
                        cfg.start,
                        cfg.stop,
                        self.strip.index(),
                        self.strip.len()
                    );
                }
                self.cfg.set(cfg);
                self.cursor.set(Cursor::at(&cfg));
            }
            Err(e) => warn!("turn: config ignored ({})", e),
        }
    }

    fn run(self: Rc<Self>, ctx: ExecContext, _fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let me: Rc<dyn Command> = self.clone();
            let Some(mut strip) = begin(&self.strip, me).await else {
                return;
            };

            while !self.stop.is_requested() {
                let cfg = self.cfg.get();
                let cursor = self.cursor.get();

                let [r, g, b] = cfg.rgb;
                let color = if cursor.on { strip.order().pack(r, g, b) } else { 0 };
                put(&mut strip, i64::from(cursor.pix), color);
                self.cursor.set(cursor.advance(&cfg));

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
