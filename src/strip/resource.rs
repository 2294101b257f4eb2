//! `LedStrip`: the shared pixel buffer and its sink, behind a takeover lock.
//!
//! ```text
//!            acquire(B)                    guard dropped
//!   Free ───────────────▶ Held(B)   ─────────────────────▶ Free
//!                           │
//!                           │ acquire(C): B.stop(), wait for B's guard
//!                           ▼
//!                         Held(C)
//! ```
//!
//! Takeover is by convention only. `acquire` asks the current owner to stop
//! and then waits for the mutex; there is no timeout and no forced eviction.
//! An owner that never checks its stop flag keeps the strip forever.
//!
//! Release happens when the [`StripGuard`] is dropped, which covers every
//! exit path of the owning task (normal return, stop, early `return` on bad
//! arguments).

use core::cell::RefCell;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use log::{debug, warn};

use crate::command::Command;

use super::pixel::ColorOrder;
use super::sink::PixelSink;

/// Who holds the strip right now.
pub enum Ownership {
    Free,
    Held(Rc<dyn Command>),
}

struct StripState {
    pixels: Vec<u32>,
    sink: Box<dyn PixelSink>,
}

/// One physical LED strip.
pub struct LedStrip {
    index: usize,
    order: ColorOrder,
    len: usize,
    state: Mutex<NoopRawMutex, StripState>,
    ownership: RefCell<Ownership>,
}

impl LedStrip {
    pub fn new(index: usize, num_pixels: usize, order: ColorOrder, sink: Box<dyn PixelSink>) -> Self {
        Self {
            index,
            order,
            len: num_pixels,
            state: Mutex::new(StripState {
                pixels: vec![0; num_pixels],
                sink,
            }),
            ownership: RefCell::new(Ownership::Free),
        }
    }

    /// Take the strip for `requester`, stopping the current owner first.
    ///
    /// Suspends until the previous guard is dropped. Waiters are not served
    /// in any particular order.
    pub async fn acquire(&self, requester: Rc<dyn Command>) -> StripGuard<'_> {
        if let Some(owner) = self.owner() {
            debug!("strip {}: asking current owner to stop", self.index);
            owner.stop();
        }

        let state = self.state.lock().await;
        *self.ownership.borrow_mut() = Ownership::Held(requester);
        debug!("strip {}: acquired", self.index);

        StripGuard { strip: self, state }
    }

    pub fn is_locked(&self) -> bool {
        matches!(*self.ownership.borrow(), Ownership::Held(_))
    }

    pub fn owner(&self) -> Option<Rc<dyn Command>> {
        match &*self.ownership.borrow() {
            Ownership::Held(owner) => Some(Rc::clone(owner)),
            Ownership::Free => None,
        }
    }

    pub fn is_owned_by(&self, cmd: &Rc<dyn Command>) -> bool {
        match &*self.ownership.borrow() {
            Ownership::Held(owner) => Rc::ptr_eq(owner, cmd),
            Ownership::Free => false,
        }
    }

    /// Copy of the buffer, or `None` while someone holds the strip.
    pub fn snapshot(&self) -> Option<Vec<u32>> {
        self.state.try_lock().ok().map(|s| s.pixels.clone())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn order(&self) -> ColorOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Exclusive access to a strip's buffer and sink. Dropping it releases the
/// strip.
pub struct StripGuard<'a> {
    strip: &'a LedStrip,
    state: MutexGuard<'a, NoopRawMutex, StripState>,
}

impl StripGuard<'_> {
    pub fn len(&self) -> usize {
        self.state.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.pixels.is_empty()
    }

    pub fn order(&self) -> ColorOrder {
        self.strip.order
    }

    pub fn pixels(&self) -> &[u32] {
        &self.state.pixels
    }

    pub fn get(&self, idx: usize) -> Option<u32> {
        self.state.pixels.get(idx).copied()
    }

    /// Write one pixel. Out-of-range indices are skipped.
    pub fn set(&mut self, idx: usize, color: u32) -> bool {
        let strip = self.strip.index;
        match self.state.pixels.get_mut(idx) {
            Some(px) => {
                *px = color;
                true
            }
            None => {
                debug!("strip {}: pixel {} out of range", strip, idx);
                false
            }
        }
    }

    /// Write `count` pixels from `start`, stopping at the end of the strip.
    /// Returns how many were written.
    pub fn fill_range(&mut self, start: usize, count: usize, color: u32) -> usize {
        let len = self.len();
        let end = start.saturating_add(count);
        if end > len {
            warn!(
                "strip {}: range {}..{} clipped to {} pixels",
                self.strip.index, start, end, len
            );
        }
        let end = end.min(len);
        if start >= end {
            return 0;
        }
        self.state.pixels[start..end].fill(color);
        end - start
    }

    pub fn fill(&mut self, color: u32) {
        self.state.pixels.fill(color);
    }

    /// Push the buffer to the sink. Failures are logged, not returned.
    pub fn show(&mut self) {
        let state = &mut *self.state;
        if let Err(e) = state.sink.show(&state.pixels) {
            warn!("strip {}: {}", self.strip.index, e);
        }
    }

    /// Blank every pixel and show.
    pub fn clear(&mut self) {
        self.fill(0);
        self.show();
    }

    /// Give the strip back. Same as dropping the guard.
    pub fn release(self) {}
}

impl Drop for StripGuard<'_> {
    fn drop(&mut self) {
        // Ownership is cleared before the mutex guard field unlocks.
        *self.strip.ownership.borrow_mut() = Ownership::Free;
        debug!("strip {}: released", self.strip.index);
    }
}
