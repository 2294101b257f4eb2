//! Strip arbitration under the executor: cooperative takeover between tasks.

use std::cell::Cell;
use std::rc::Rc;

use futures_lite::future::BoxedLocal;

use ledstrip::command::{Command, CommandRegistry, ExecContext, StopFlag};
use ledstrip::patterns::range::Range;
use ledstrip::patterns::turn::Turn;
use ledstrip::protocol::channels::Console;
use ledstrip::protocol::tokenizer::CommandLine;
use ledstrip::scheduler::Executor;
use ledstrip::strip::{ColorOrder, LedStrip};

use crate::mock_hw::{tick, Log, RecordingSink, YieldDelay};

/// Holds the strip, painting its marker, until asked to stop.
struct Hold {
    strip: Rc<LedStrip>,
    marker: u32,
    stop: StopFlag,
    held: Cell<bool>,
}

impl Hold {
    fn new(strip: &Rc<LedStrip>, marker: u32) -> Rc<Self> {
        Rc::new(Self {
            strip: Rc::clone(strip),
            marker,
            stop: StopFlag::new(),
            held: Cell::new(false),
        })
    }
}

impl Command for Hold {
    fn help(&self) -> &'static str {
        "hold"
    }

    fn run(self: Rc<Self>, ctx: ExecContext, _fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let me: Rc<dyn Command> = self.clone();
            let mut strip = self.strip.acquire(me).await;
            self.stop.arm();
            self.held.set(true);
            while !self.stop.is_requested() {
                strip.fill(self.marker);
                strip.show();
                ctx.sleep_ms(0).await;
            }
            self.held.set(false);
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

fn setup(len: usize) -> (Rc<Executor>, ExecContext, Rc<LedStrip>, Log<Vec<u32>>) {
    let frames = Log::default();
    let strip = Rc::new(LedStrip::new(
        0,
        len,
        ColorOrder::Grb,
        Box::new(RecordingSink(Rc::clone(&frames))),
    ));
    let ctx = ExecContext::new(
        Rc::new(CommandRegistry::new()),
        Rc::new(Console::new()),
        Rc::new(YieldDelay::default()),
    );
    (Rc::new(Executor::new()), ctx, strip, frames)
}

fn as_dyn<C: Command + 'static>(cmd: &Rc<C>) -> Rc<dyn Command> {
    Rc::clone(cmd) as Rc<dyn Command>
}

#[test]
fn second_holder_takes_over() {
    let (ex, ctx, strip, frames) = setup(3);
    let a = Hold::new(&strip, 0xA);
    let b = Hold::new(&strip, 0xB);

    ex.spawn(Rc::clone(&a).run(ctx.clone(), Vec::new())).detach();
    tick(&ex, 3);
    assert!(a.held.get());
    assert!(strip.is_owned_by(&as_dyn(&a)));

    ex.spawn(Rc::clone(&b).run(ctx.clone(), Vec::new())).detach();
    tick(&ex, 6);

    // (a) the first holder was told to stop, (b) it let go,
    // (c) the second is now the only owner.
    assert!(a.stop.is_requested());
    assert!(!a.held.get());
    assert!(b.held.get());
    assert!(strip.is_owned_by(&as_dyn(&b)));
    assert!(!strip.is_owned_by(&as_dyn(&a)));
    assert_eq!(frames.borrow().last().map(Vec::as_slice), Some(&[0xB, 0xB, 0xB][..]));

    b.stop();
    tick(&ex, 3);
    assert!(!strip.is_locked());
    assert!(!ex.try_tick());
}

#[test]
fn one_shot_waits_for_looping_owner() {
    let (ex, ctx, strip, frames) = setup(4);
    let turn = Rc::new(Turn::new(Rc::clone(&strip)));
    let range = Rc::new(Range::new(Rc::clone(&strip)));

    ex.spawn(Rc::clone(&turn).run(ctx.clone(), Vec::new())).detach();
    tick(&ex, 3);
    assert!(strip.is_owned_by(&as_dyn(&turn)));

    let fields: CommandLine = ["range", "0", "2", "0", "0", "7"].map(String::from).to_vec();
    let fill = ex.spawn(Rc::clone(&range).run(ctx.clone(), fields));
    tick(&ex, 20);

    assert!(fill.is_finished());
    assert!(!turn.stop_flag().is_requested(), "turn leaves its flag clear");
    assert!(!strip.is_locked());
    assert_eq!(frames.borrow().last().map(Vec::as_slice), Some(&[7, 7, 0, 0][..]));
}

#[test]
fn waiter_stopped_before_handover_never_draws() {
    let (ex, ctx, strip, frames) = setup(2);
    let a = Hold::new(&strip, 1);
    let range = Rc::new(Range::new(Rc::clone(&strip)));

    ex.spawn(Rc::clone(&a).run(ctx.clone(), Vec::new())).detach();
    tick(&ex, 2);

    let fields: CommandLine = ["range", "0", "2", "0", "0", "9"].map(String::from).to_vec();
    let fill = ex.spawn(Rc::clone(&range).run(ctx.clone(), fields));
    tick(&ex, 2);
    assert!(a.stop.is_requested());
    range.stop();
    tick(&ex, 10);

    assert!(fill.is_finished());
    assert!(!strip.is_locked());
    assert!(!range.stop_flag().is_requested());
    assert_eq!(frames.borrow().last().map(Vec::as_slice), Some(&[1, 1][..]));
}

#[test]
fn snapshot_only_when_free() {
    let (ex, ctx, strip, _frames) = setup(2);
    let a = Hold::new(&strip, 1);

    assert_eq!(strip.snapshot(), Some(vec![0, 0]));
    ex.spawn(Rc::clone(&a).run(ctx.clone(), Vec::new())).detach();
    tick(&ex, 3);
    assert_eq!(strip.snapshot(), None);
    a.stop();
    tick(&ex, 3);
    assert_eq!(strip.snapshot(), Some(vec![1, 1]));
}
