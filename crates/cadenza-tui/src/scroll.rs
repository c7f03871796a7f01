//! Scroll handling hook
//!
//! Batches scroll input so that any number of wheel or key events arriving
//! within one frame window mutate the scroll offset exactly once, at the
//! next flush. Also tracks whether the user is actively scrolling so the
//! renderer can switch to a cheaper presentation while movement is ongoing;
//! the flag clears after a configurable quiet window.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;
use std::time::Instant;

use tracing::debug;

use cadenza_core::config::ScrollConfig;
use cadenza_core::FrameBatcher;

#[derive(Debug, Default)]
struct ScrollState {
    offset: u16,
    max_offset: u16,
    /// Deltas accumulated since the last flush
    pending_delta: i32,
    active: bool,
    last_event: Option<Instant>,
    clear_queued: bool,
}

/// Scroll hook applying batched deltas through a [`FrameBatcher`]
///
/// Deltas recorded between two ticks are summed and applied in a single
/// batched write. Once recorded, a delta cannot be withdrawn; it is applied
/// at the next flush. Clones share state.
#[derive(Clone)]
pub struct ScrollHook {
    batcher: FrameBatcher,
    state: Rc<RefCell<ScrollState>>,
    config: ScrollConfig,
}

impl ScrollHook {
    pub fn new(batcher: FrameBatcher, config: ScrollConfig) -> Self {
        Self {
            batcher,
            state: Rc::new(RefCell::new(ScrollState::default())),
            config,
        }
    }

    /// Record wheel steps (positive = down), scaled by the configured
    /// lines-per-step.
    pub fn on_wheel(&self, steps: i32) {
        self.on_delta(steps * self.config.lines as i32);
    }

    /// Record a raw line delta, applied at the next flush together with
    /// every other delta from the same frame window.
    pub fn on_delta(&self, delta: i32) {
        if delta == 0 {
            return;
        }

        let first = {
            let mut state = self.state.borrow_mut();
            state.last_event = Some(Instant::now());
            let first = state.pending_delta == 0;
            state.pending_delta += delta;
            first
        };

        if first {
            let state = Rc::clone(&self.state);
            self.batcher.write(move || {
                let mut state = state.borrow_mut();
                let delta = mem::take(&mut state.pending_delta);
                let max = state.max_offset as i32;
                state.offset = (state.offset as i32 + delta).clamp(0, max) as u16;
                state.active = true;
                Ok(())
            });
        }
    }

    /// Update the scrollable bound from the current layout, clamping the
    /// offset if the content shrank.
    pub fn set_max_offset(&self, max_offset: u16) {
        let mut state = self.state.borrow_mut();
        state.max_offset = max_offset;
        if state.offset > max_offset {
            state.offset = max_offset;
        }
    }

    /// Advance activity bookkeeping; call once per tick.
    pub fn tick(&self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&self, now: Instant) {
        let quiet = {
            let state = self.state.borrow();
            state.active
                && !state.clear_queued
                && state
                    .last_event
                    .is_some_and(|last| now.duration_since(last) >= self.config.quiet_window())
        };

        if quiet {
            self.state.borrow_mut().clear_queued = true;
            let state = Rc::clone(&self.state);
            self.batcher.write(move || {
                let mut state = state.borrow_mut();
                state.clear_queued = false;
                // Events that arrived after the clear was queued re-activate
                // in the same flush, since their write runs later.
                state.active = false;
                debug!("scroll activity ended");
                Ok(())
            });
        }
    }

    /// Current scroll offset in lines.
    pub fn offset(&self) -> u16 {
        self.state.borrow().offset
    }

    /// True while scroll input is arriving (cleared after the quiet window).
    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }
}
