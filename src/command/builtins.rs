//! Console utility commands that every controller carries.
//!
//! | Command                             | Effect                                  |
//! |-------------------------------------|-----------------------------------------|
//! | `help` / `help,config`              | list commands / their config fields     |
//! | `config,<name>,<args..>`            | forward the line to `name`'s `config`   |
//! | `stop,<name>`                       | raise `name`'s stop flag                |
//! | `freemem`                           | print free heap bytes                   |
//! | `add,<name>,<kind>[,<strip>]`       | register a new pattern instance         |
//! | `strips`                            | show strip sizes and current owners     |
//!
//! None of these fail visibly: bad input is logged and ignored, and the
//! dispatcher has already replied `$OK` by the time they run.

use std::rc::Rc;

use futures_lite::future::BoxedLocal;
use log::{info, warn};

use crate::error::{ArgError, Error, Result};
use crate::patterns::{PatternFactory, PatternKind};
use crate::protocol::tokenizer::CommandLine;

use super::{args, Command, CommandRegistry, ExecContext, StopFlag};

/// Register every built-in into `registry`.
pub fn install(registry: &CommandRegistry, factory: &Rc<PatternFactory>) -> Result<()> {
    registry.register("help", Rc::new(Help::default()))?;
    registry.register("config", Rc::new(Config::default()))?;
    registry.register("stop", Rc::new(Stop::default()))?;
    registry.register("freemem", Rc::new(FreeMem::default()))?;
    registry.register("add", Rc::new(Add::new(Rc::clone(factory))))?;
    registry.register("strips", Rc::new(Strips::new(Rc::clone(factory))))?;
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// help
// ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Help {
    stop: StopFlag,
}

impl Command for Help {
    fn help(&self) -> &'static str {
        "show list of commands"
    }

    fn run(self: Rc<Self>, ctx: ExecContext, fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let configs = fields.len() == 2 && fields[1] == "config";
            let title = if configs { "Configs" } else { "Commands" };

            ctx.console.line("").await;
            ctx.console.line(title).await;
            ctx.console.line(&"-".repeat(title.len())).await;
            for (name, record) in ctx.registry.records() {
                let text = if configs { record.config_help } else { record.help };
                ctx.console.line(&format!("{name:<8} : {text}")).await;
            }
            ctx.console.line("").await;
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

// ───────────────────────────────────────────────────────────────
// config
// ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Config {
    stop: StopFlag,
}

impl Command for Config {
    fn help(&self) -> &'static str {
        "config,<cmdname>,parm1,parm2,..."
    }

    fn run(self: Rc<Self>, ctx: ExecContext, fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            if fields.len() < 3 {
                warn!("config: nothing to apply");
                return;
            }
            match ctx.registry.lookup(&fields[1]) {
                Some(target) => target.config(&fields),
                None => warn!("config: no command '{}'", fields[1]),
            }
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

// ───────────────────────────────────────────────────────────────
// stop
// ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Stop {
    stop: StopFlag,
}

impl Command for Stop {
    fn help(&self) -> &'static str {
        "stop,<cmdname>"
    }

    fn run(self: Rc<Self>, ctx: ExecContext, fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let Some(name) = fields.get(1) else {
                return;
            };
            match ctx.registry.lookup(name) {
                Some(target) => {
                    info!("stop requested for '{}'", name);
                    target.stop();
                }
                None => warn!("stop: no command '{}'", name),
            }
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

// ───────────────────────────────────────────────────────────────
// freemem
// ───────────────────────────────────────────────────────────────

/// Free heap in bytes, where the platform reports it.
#[cfg(feature = "espidf")]
pub fn free_heap() -> Option<u32> {
    // SAFETY: reads allocator statistics only.
    Some(unsafe { esp_idf_svc::sys::esp_get_free_heap_size() })
}

#[cfg(not(feature = "espidf"))]
pub fn free_heap() -> Option<u32> {
    None
}

#[derive(Default)]
pub struct FreeMem {
    stop: StopFlag,
}

impl Command for FreeMem {
    fn help(&self) -> &'static str {
        "show free memory"
    }

    fn run(self: Rc<Self>, ctx: ExecContext, _fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let text = match free_heap() {
                Some(bytes) => format!("free mem: {bytes}"),
                None => "free mem: unknown".to_owned(),
            };
            ctx.console.line(&text).await;
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

// ───────────────────────────────────────────────────────────────
// add
// ───────────────────────────────────────────────────────────────

pub struct Add {
    factory: Rc<PatternFactory>,
    stop: StopFlag,
}

impl Add {
    pub fn new(factory: Rc<PatternFactory>) -> Self {
        Self {
            factory,
            stop: StopFlag::new(),
        }
    }

    fn apply(&self, registry: &CommandRegistry, fields: &[String]) -> Result<()> {
        let name = fields
            .get(1)
            .filter(|n| !n.is_empty())
            .ok_or(Error::Arg(ArgError::Missing(1)))?;
        let kind: PatternKind = fields.get(2).ok_or(Error::Arg(ArgError::Missing(2)))?.parse()?;
        let strip = args::field_or(fields, 3, 0usize)?;

        let cmd = self.factory.build(kind, strip)?;
        registry.register(name, cmd)?;
        info!("added '{}' as {} on strip {}", name, kind, strip);
        Ok(())
    }
}

impl Command for Add {
    fn help(&self) -> &'static str {
        "add new command (add,newname,kind[,strip])"
    }

    fn run(self: Rc<Self>, ctx: ExecContext, fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            if let Err(e) = self.apply(&ctx.registry, &fields) {
                warn!("add: {}", e);
            }
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

// ───────────────────────────────────────────────────────────────
// strips
// ───────────────────────────────────────────────────────────────

pub struct Strips {
    factory: Rc<PatternFactory>,
    stop: StopFlag,
}

impl Strips {
    pub fn new(factory: Rc<PatternFactory>) -> Self {
        Self {
            factory,
            stop: StopFlag::new(),
        }
    }
}

impl Command for Strips {
    fn help(&self) -> &'static str {
        "show LED strip resources"
    }

    fn run(self: Rc<Self>, ctx: ExecContext, _fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            for strip in self.factory.strips() {
                let user = strip
                    .owner()
                    .map(|o| ctx.registry.name_of(&o).unwrap_or_else(|| "?".into()));
                let text = format!(
                    "{}: {} pixels, {:?}, lock: {}, user: {}",
                    strip.index(),
                    strip.len(),
                    strip.order(),
                    strip.is_locked(),
                    user.as_deref().unwrap_or("-"),
                );
                ctx.console.line(&text).await;
            }
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}
