//! Timer-backed [`Delay`] for the executor thread.
//!
//! `async-io-mini` drives its timers from the same thread that polls the
//! future, so this works under `futures_lite::future::block_on` on both the
//! device and the host.

use core::time::Duration;

use async_io_mini::Timer;
use futures_lite::future::{self, BoxedLocal};

use crate::command::Delay;

#[derive(Debug, Default, Clone, Copy)]
pub struct ReactorDelay;

impl Delay for ReactorDelay {
    fn delay_ms(&self, ms: u32) -> BoxedLocal<()> {
        if ms == 0 {
            return Box::pin(future::yield_now());
        }
        Box::pin(async move {
            Timer::after(Duration::from_millis(u64::from(ms))).await;
        })
    }
}
