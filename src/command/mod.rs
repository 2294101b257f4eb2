//! The command contract and what a running command gets to work with.
//!
//! ```text
//!   Scheduler ──run()──▶ Command ──acquire()──▶ LedStrip ──show()──▶ PixelSink
//!                          │
//!                          └── ExecContext { registry, console, delay }
//! ```
//!
//! Commands are cooperative: a body only gives up the CPU at an `.await`.
//! Any body that loops must await the [`Delay`] port once per iteration and
//! check its [`StopFlag`] at the loop boundary.

pub mod args;
pub mod builtins;
pub mod registry;

use core::cell::Cell;
use std::rc::Rc;

use futures_lite::future::BoxedLocal;

use crate::protocol::channels::Console;
use crate::protocol::tokenizer::CommandLine;

pub use registry::{CommandRecord, CommandRegistry};

// ───────────────────────────────────────────────────────────────
// Command
// ───────────────────────────────────────────────────────────────

/// A named unit of behaviour: a pattern or a console utility.
///
/// Instances live in the [`CommandRegistry`] behind `Rc` for as long as
/// they are registered. `run` takes its own `Rc` so the returned future can
/// outlive the dispatch call and so the instance can name itself as the
/// owner of a strip.
pub trait Command {
    /// One-line description for `help`.
    fn help(&self) -> &'static str;

    /// One-line description of the config fields for `help,config`.
    fn config_help(&self) -> &'static str {
        "no configs"
    }

    /// Apply persistent settings from a `config,<name>,...` line.
    ///
    /// `fields` is the whole line, `fields[0] == "config"`. Malformed input
    /// leaves the settings as they were.
    fn config(&self, _fields: &[String]) {}

    /// Start one execution. The future is spawned as its own task.
    fn run(self: Rc<Self>, ctx: ExecContext, fields: CommandLine) -> BoxedLocal<()>;

    fn stop_flag(&self) -> &StopFlag;

    /// Ask a running execution to finish at its next loop boundary.
    /// Safe to call at any time, any number of times.
    fn stop(&self) {
        self.stop_flag().request();
    }
}

// ───────────────────────────────────────────────────────────────
// Stop flag
// ───────────────────────────────────────────────────────────────

/// Cooperative cancellation flag. Setting it never interrupts anything.
#[derive(Debug, Default)]
pub struct StopFlag(Cell<bool>);

impl StopFlag {
    pub const fn new() -> Self {
        Self(Cell::new(false))
    }

    pub fn request(&self) {
        self.0.set(true);
    }

    pub fn is_requested(&self) -> bool {
        self.0.get()
    }

    /// Drop any pending request. Patterns call this before they wait for
    /// a strip and again as they finish.
    pub fn arm(&self) {
        self.0.set(false);
    }
}

// ───────────────────────────────────────────────────────────────
// Delay port
// ───────────────────────────────────────────────────────────────

/// Suspend the calling task for a while.
///
/// `delay_ms(0)` still yields once, so a loop with no configured delay
/// lets other tasks and the serve loop run.
pub trait Delay {
    fn delay_ms(&self, ms: u32) -> BoxedLocal<()>;
}

// ───────────────────────────────────────────────────────────────
// Execution context
// ───────────────────────────────────────────────────────────────

/// Handles shared by every running command. Cheap to clone.
#[derive(Clone)]
pub struct ExecContext {
    pub registry: Rc<CommandRegistry>,
    pub console: Rc<Console>,
    pub delay: Rc<dyn Delay>,
}

impl ExecContext {
    pub fn new(registry: Rc<CommandRegistry>, console: Rc<Console>, delay: Rc<dyn Delay>) -> Self {
        Self {
            registry,
            console,
            delay,
        }
    }

    /// Yield via the delay port.
    pub async fn sleep_ms(&self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }
}
