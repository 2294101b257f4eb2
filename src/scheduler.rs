//! Command dispatcher: one detached task per accepted command line.
//!
//! ```text
//!   CommandLine ──▶ setup() ──lookup──▶ CommandRegistry
//!                     │  hit                  │ miss
//!                     ▼                       ▼
//!        executor.spawn(cmd.run(..))      Reply::Err
//!                     │                 (nothing else changes)
//!                     ▼
//!                 Reply::Ok
//! ```
//!
//! Any number of commands may be in flight. Commands that draw serialise
//! themselves on their strip; the scheduler never cancels anything. The
//! only early exit for a running task is its own stop flag.

use core::cell::Cell;
use std::rc::Rc;

use edge_executor::LocalExecutor;
use log::{info, warn};

use crate::command::{CommandRegistry, ExecContext};
use crate::protocol::codec::Reply;
use crate::protocol::tokenizer::CommandLine;

/// Single-threaded executor that runs the serve loop and every command.
pub type Executor = LocalExecutor<'static>;

/// Decrements the live-task count when a task finishes or is dropped.
struct LiveTask(Rc<Cell<usize>>);

impl LiveTask {
    fn enter(count: &Rc<Cell<usize>>) -> Self {
        count.set(count.get() + 1);
        Self(Rc::clone(count))
    }
}

impl Drop for LiveTask {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

pub struct Scheduler {
    executor: Rc<Executor>,
    ctx: ExecContext,
    live: Rc<Cell<usize>>,
}

impl Scheduler {
    pub fn new(executor: Rc<Executor>, ctx: ExecContext) -> Self {
        Self {
            executor,
            ctx,
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Dispatch one command line.
    ///
    /// On a hit the command body is spawned and will first run at the
    /// executor's next turn; this call never waits for it.
    pub fn setup(&self, fields: CommandLine) -> Reply {
        let Some(name) = fields.first() else {
            return Reply::Err;
        };
        let Some(handler) = self.ctx.registry.lookup(name) else {
            warn!("Scheduler: unknown command '{}'", name);
            return Reply::Err;
        };

        info!("Scheduler: starting '{}' ({} args)", name, fields.len() - 1);
        let live = LiveTask::enter(&self.live);
        let body = handler.run(self.ctx.clone(), fields);
        self.executor
            .spawn(async move {
                let _live = live;
                body.await;
            })
            .detach();

        Reply::Ok
    }

    /// Command tasks spawned and not yet finished.
    pub fn live_tasks(&self) -> usize {
        self.live.get()
    }

    pub fn registry(&self) -> &Rc<CommandRegistry> {
        &self.ctx.registry
    }

    pub fn context(&self) -> &ExecContext {
        &self.ctx
    }

    pub fn executor(&self) -> &Rc<Executor> {
        &self.executor
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
