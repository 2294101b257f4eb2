//! Mock console and strips for integration tests.
//!
//! `ScriptedTransport` hands out queued input one chunk per read and keeps
//! every byte written; `RecordingSink` keeps every frame shown. Both share
//! their logs through `Rc` so tests can inspect them after the controller
//! has taken ownership.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures_lite::future::{self, BoxedLocal};

use ledstrip::command::Delay;
use ledstrip::config::ControllerConfig;
use ledstrip::protocol::codec::Reply;
use ledstrip::protocol::transport::Transport;
use ledstrip::scheduler::Executor;
use ledstrip::strip::PixelSink;
use ledstrip::Controller;

pub type Log<T> = Rc<RefCell<Vec<T>>>;

// ── Transport ─────────────────────────────────────────────────

#[derive(Default)]
pub struct ScriptedTransport {
    input: VecDeque<Vec<u8>>,
    output: Log<u8>,
}

impl ScriptedTransport {
    pub fn push(&mut self, chunk: &[u8]) {
        self.input.push_back(chunk.to_vec());
    }
}

impl Transport for ScriptedTransport {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let Some(chunk) = self.input.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.output.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

// ── Strips ────────────────────────────────────────────────────

pub struct RecordingSink(pub Log<Vec<u32>>);

impl PixelSink for RecordingSink {
    fn show(&mut self, pixels: &[u32]) -> ledstrip::Result<()> {
        self.0.borrow_mut().push(pixels.to_vec());
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Yields once per call instead of sleeping.
#[derive(Default)]
pub struct YieldDelay(pub Log<u32>);

impl Delay for YieldDelay {
    fn delay_ms(&self, ms: u32) -> BoxedLocal<()> {
        self.0.borrow_mut().push(ms);
        Box::pin(future::yield_now())
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A controller wired to mocks, plus handles on everything it writes.
pub struct Rig {
    pub executor: Rc<Executor>,
    pub controller: Controller<ScriptedTransport>,
    output: Log<u8>,
    frames: Vec<Log<Vec<u32>>>,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(cfg: &ControllerConfig) -> Self {
        let transport = ScriptedTransport::default();
        let output = Rc::clone(&transport.output);

        let frames: Vec<Log<Vec<u32>>> = cfg.strips.iter().map(|_| Log::default()).collect();
        let sinks: Vec<Box<dyn PixelSink>> = frames
            .iter()
            .map(|f| Box::new(RecordingSink(Rc::clone(f))) as Box<dyn PixelSink>)
            .collect();

        let executor = Rc::new(Executor::new());
        let controller = Controller::from_config(
            cfg,
            transport,
            sinks,
            Rc::clone(&executor),
            Rc::new(YieldDelay::default()),
            7,
        )
        .expect("valid config");

        Self {
            executor,
            controller,
            output,
            frames,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&ControllerConfig::default())
    }

    /// Deliver one chunk and poll it through the parser.
    pub fn send(&mut self, chunk: &[u8]) -> Option<Reply> {
        self.controller.transport_mut().push(chunk);
        self.controller.poll_once()
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output.borrow()).into_owned()
    }

    pub fn frames(&self, strip: usize) -> usize {
        self.frames[strip].borrow().len()
    }

    pub fn last_frame(&self, strip: usize) -> Vec<u32> {
        self.frames[strip].borrow().last().cloned().unwrap_or_default()
    }

    pub fn live(&self) -> usize {
        self.controller.scheduler().live_tasks()
    }

    /// Hand the controller to its own serve task; returns what tests still
    /// need to watch it.
    pub fn serve(self, poll_ms: u32) -> (Rc<Executor>, Log<u8>) {
        let output = Rc::clone(&self.output);
        self.controller.spawn(poll_ms);
        (self.executor, output)
    }

    /// Give spawned tasks up to `n` polls.
    pub fn tick(&self, n: usize) -> usize {
        tick(&self.executor, n)
    }

    pub fn owner_name(&self, strip: usize) -> Option<String> {
        let owner = self.controller.strips()[strip].owner()?;
        self.controller.registry().name_of(&owner)
    }
}

/// Poll up to `n` ready tasks on `executor`. Returns how many were polled;
/// fewer than `n` means every task is parked or finished.
pub fn tick(executor: &Executor, n: usize) -> usize {
    let mut ran = 0;
    while ran < n && executor.try_tick() {
        ran += 1;
    }
    ran
}
