//! Top-level context: owns everything the console loop touches.
//!
//! ```text
//!  ┌──────────────────────────── Controller ───────────────────────────┐
//!  │  Transport ─▶ FrameParser ─▶ tokenizer ─▶ Scheduler ─▶ $OK/$ERR   │
//!  │      ▲                                       │                    │
//!  │      └──────────── Console (help, strips) ◀──┘ (spawned tasks)    │
//!  └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Built once at start-up from a [`ControllerConfig`]; nothing in here is
//! global. The serve loop is itself a task on the same executor as the
//! commands and yields once per iteration.

use std::rc::Rc;

use log::{debug, info, warn};

use crate::command::{builtins, CommandRegistry, Delay, ExecContext};
use crate::config::ControllerConfig;
use crate::error::{Error, Result};
use crate::patterns::PatternFactory;
use crate::protocol::channels::Console;
use crate::protocol::codec::{FrameParser, Reply};
use crate::protocol::tokenizer::CommandLine;
use crate::protocol::transport::Transport;
use crate::scheduler::{Executor, Scheduler};
use crate::strip::{LedStrip, PixelSink};

/// Bytes read from the transport per poll.
pub const READ_CHUNK: usize = 64;

const LINE_END: &[u8] = b"\r\n";

pub struct Controller<T: Transport> {
    transport: T,
    parser: FrameParser,
    scheduler: Scheduler,
    strips: Vec<Rc<LedStrip>>,
    echo: bool,
}

impl<T: Transport> Controller<T> {
    /// Wire up strips, registry, built-ins and the configured patterns.
    ///
    /// `sinks` must hold one sink per configured strip, in order. `seed` is
    /// used when the config does not pin one.
    pub fn from_config(
        cfg: &ControllerConfig,
        transport: T,
        sinks: Vec<Box<dyn PixelSink>>,
        executor: Rc<Executor>,
        delay: Rc<dyn Delay>,
        seed: u32,
    ) -> Result<Self> {
        cfg.validate()?;
        if sinks.len() != cfg.strips.len() {
            return Err(Error::Config("need exactly one sink per strip"));
        }

        let strips: Vec<Rc<LedStrip>> = cfg
            .strips
            .iter()
            .zip(sinks)
            .enumerate()
            .map(|(i, (s, sink))| Rc::new(LedStrip::new(i, usize::from(s.num_pixels), s.order, sink)))
            .collect();
        let factory = Rc::new(PatternFactory::new(strips.clone(), cfg.rng_seed.unwrap_or(seed)));

        let registry = Rc::new(CommandRegistry::new());
        builtins::install(&registry, &factory)?;
        for spec in &cfg.commands {
            registry.register(&spec.name, factory.build(spec.kind, spec.strip)?)?;
        }

        let ctx = ExecContext::new(registry, Rc::new(Console::new()), delay);
        let scheduler = Scheduler::new(executor, ctx);

        info!(
            "Controller: {} strips, {} commands",
            strips.len(),
            scheduler.registry().len()
        );

        Ok(Self {
            transport,
            parser: FrameParser::new(),
            scheduler,
            strips,
            echo: cfg.echo_input,
        })
    }

    /// Read one chunk and dispatch the frame it completes, if any.
    ///
    /// Returns the reply sent, or `None` if no complete frame was seen.
    pub fn poll_once(&mut self) -> Option<Reply> {
        let mut buf = [0u8; READ_CHUNK];
        let n = match self.transport.read(&mut buf) {
            Ok(0) => return None,
            Ok(n) => n,
            Err(e) => {
                warn!("Controller: read failed: {:?}", e);
                return None;
            }
        };
        let input = &buf[..n];

        if self.echo {
            self.write(input);
        }

        match self.parser.process_input(input)? {
            Ok(fields) => Some(self.submit(fields)),
            Err(e) => {
                debug!("Controller: dropped frame ({})", e);
                None
            }
        }
    }

    /// Dispatch a tokenized line and send the reply.
    pub fn submit(&mut self, fields: CommandLine) -> Reply {
        let reply = self.scheduler.setup(fields);
        self.write(reply.as_bytes());
        reply
    }

    /// Write queued console lines to the transport.
    pub fn flush(&mut self) {
        let console = Rc::clone(&self.scheduler.context().console);
        console.drain(|line| {
            self.write(line.as_bytes());
            self.write(LINE_END);
        });
        if let Err(e) = self.transport.flush() {
            warn!("Controller: flush failed: {:?}", e);
        }
    }

    /// Poll, flush, yield; forever.
    pub async fn serve(mut self, poll_ms: u32) {
        let delay = Rc::clone(&self.scheduler.context().delay);
        info!("Controller: serving, poll every {} ms", poll_ms);
        loop {
            self.poll_once();
            self.flush();
            delay.delay_ms(poll_ms).await;
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn registry(&self) -> &Rc<CommandRegistry> {
        self.scheduler.registry()
    }

    pub fn strips(&self) -> &[Rc<LedStrip>] {
        &self.strips
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn write(&mut self, data: &[u8]) {
        if let Err(e) = self.transport.write_all(data) {
            warn!("Controller: write failed: {:?}", e);
        }
    }
}

impl<T: Transport + 'static> Controller<T> {
    /// Move the serve loop onto the executor.
    pub fn spawn(self, poll_ms: u32) {
        let executor = Rc::clone(self.scheduler.executor());
        executor.spawn(self.serve(poll_ms)).detach();
    }
}
