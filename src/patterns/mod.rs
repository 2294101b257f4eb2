//! LED pattern commands and the table that builds them by kind.
//!
//! | Kind       | Command line                     | Runs            |
//! |------------|----------------------------------|-----------------|
//! | `meter`    | `meter,<pct>`                    | one-shot        |
//! | `range`    | `range,<start>,<n>,<r>,<g>,<b>`  | one-shot        |
//! | `random`   | `random`                         | until stopped   |
//! | `randomog` | `randomog`                       | until stopped   |
//! | `turn`     | `turn`                           | until stopped   |
//!
//! Every pattern takes its strip through `begin` and releases it by
//! dropping the guard. A stop that arrives while a pattern is still waiting
//! for the strip cancels that run. Looping patterns check their stop flag
//! before each step and blank the strip when they finish. Every run leaves
//! its stop flag cleared on the way out.

pub mod meter;
pub mod random;
pub mod range;
pub mod rng;
pub mod turn;


use core::cell::Cell;
use core::str::FromStr;
use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::strip::{LedStrip, StripGuard};

pub use meter::Meter;
pub use random::{Random, RandomOg};
pub use range::Range;
pub use turn::Turn;

use rng::XorShift32;

/// The pattern implementations that can be instantiated by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Meter,
    Range,
    Random,
    RandomOg,
    Turn,
}

impl PatternKind {
    pub const ALL: [Self; 5] = [Self::Meter, Self::Range, Self::Random, Self::RandomOg, Self::Turn];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Meter => "meter",
            Self::Range => "range",
            Self::Random => "random",
            Self::RandomOg => "randomog",
            Self::Turn => "turn",
        }
    }

    /// Class-style alias accepted by `add` (`LedMeter`, `LedTurn`, ...).
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Meter => "LedMeter",
            Self::Range => "LedRange",
            Self::Random => "LedRandom",
            Self::RandomOg => "LedRandomOG",
            Self::Turn => "LedTurn",
        }
    }
}

impl FromStr for PatternKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s || k.alias() == s)
            .ok_or(Error::Config("unknown pattern kind"))
    }
}

impl core::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds pattern instances bound to a strip.
///
/// This is the only place kinds are mapped to types; both the start-up
/// command table and the `add` built-in go through it.
pub struct PatternFactory {
    strips: Vec<Rc<LedStrip>>,
    seeds: Cell<XorShift32>,
}

impl PatternFactory {
    pub fn new(strips: Vec<Rc<LedStrip>>, seed: u32) -> Self {
        Self {
            strips,
            seeds: Cell::new(XorShift32::new(seed)),
        }
    }

    pub fn strips(&self) -> &[Rc<LedStrip>] {
        &self.strips
    }

    pub fn build(&self, kind: PatternKind, strip: usize) -> Result<Rc<dyn Command>> {
        let led = self
            .strips
            .get(strip)
            .cloned()
            .ok_or(Error::Config("unknown strip"))?;

        let cmd: Rc<dyn Command> = match kind {
            PatternKind::Meter => Rc::new(Meter::new(led)),
            PatternKind::Range => Rc::new(Range::new(led)),
            PatternKind::Random => Rc::new(Random::new(led, self.next_seed())),
            PatternKind::RandomOg => Rc::new(RandomOg::new(led, self.next_seed())),
            PatternKind::Turn => Rc::new(Turn::new(led)),
        };
        Ok(cmd)
    }

    fn next_seed(&self) -> u32 {
        let mut rng = self.seeds.get();
        let seed = rng.next_u32();
        self.seeds.set(rng);
        seed
    }
}

/// Take `strip` for `cmd`, or `None` if `cmd` was stopped while waiting.
///
/// A request left over from before this run is dropped first. When the run
/// is cancelled the flag is cleared again before the strip is released.
pub(crate) async fn begin(strip: &LedStrip, cmd: Rc<dyn Command>) -> Option<StripGuard<'_>> {
    cmd.stop_flag().arm();
    let guard = strip.acquire(Rc::clone(&cmd)).await;
    if cmd.stop_flag().is_requested() {
        debug!("strip {}: stopped before start", strip.index());
        cmd.stop_flag().arm();
        return None;
    }
    Some(guard)
}

/// Whether every position from `start` to `stop` inclusive is on a strip
/// of `len` pixels.
pub(crate) fn span_fits(len: usize, start: i32, stop: i32) -> bool {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    [start, stop]
        .into_iter()
        .all(|p| (0..len).contains(&i64::from(p)))
}

/// Bounds-checked write for signed pixel positions.
pub(crate) fn put(strip: &mut StripGuard<'_>, idx: i64, color: u32) {
    match usize::try_from(idx) {
        Ok(i) => {
            strip.set(i, color);
        }
        Err(_) => debug!("pixel {} out of range", idx),
    }
}
