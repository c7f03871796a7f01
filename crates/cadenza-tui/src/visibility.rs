//! Viewport visibility hook
//!
//! Answers "how much of this region is on screen" for widgets that want to
//! defer work until they are (nearly) visible. Sampling happens inside a
//! batched read so it shares a flush with every other measurement of the
//! same frame and never interleaves with writes.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::layout::Rect;

use cadenza_core::FrameBatcher;

/// Options controlling when a region counts as visible
#[derive(Debug, Clone, Copy)]
pub struct VisibilityOptions {
    /// Fraction of the region that must intersect the viewport, in [0, 1].
    /// Zero means any overlap at all counts.
    pub threshold: f64,
    /// Extra cells added around the viewport before intersecting, so
    /// regions just off screen can count as visible (for prefetching).
    pub margin: u16,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            margin: 0,
        }
    }
}

impl VisibilityOptions {
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn margin(mut self, margin: u16) -> Self {
        self.margin = margin;
        self
    }
}

/// Fraction of `region` covered by `viewport`, in [0, 1].
///
/// An empty region has fraction 0.
pub fn visible_fraction(region: Rect, viewport: Rect) -> f64 {
    let area = region.area();
    if area == 0 {
        return 0.0;
    }
    let overlap = region.intersection(viewport).area();
    overlap as f64 / area as f64
}

/// Grow the viewport by `margin` cells on every side, saturating at the
/// coordinate space edges.
fn expand(viewport: Rect, margin: u16) -> Rect {
    let x = viewport.x.saturating_sub(margin);
    let y = viewport.y.saturating_sub(margin);
    let right = viewport.right().saturating_add(margin);
    let bottom = viewport.bottom().saturating_add(margin);
    Rect::new(x, y, right - x, bottom - y)
}

#[derive(Debug, Default)]
struct TrackerState {
    region: Rect,
    viewport: Rect,
    fraction: f64,
    visible: bool,
    sample_queued: bool,
}

/// Samples a region's visibility inside a batched read
///
/// Call [`observe`](Self::observe) with the region's current layout each
/// draw; repeated calls within one frame window keep only the latest
/// geometry and produce a single sample at the next flush. Clones share
/// state.
#[derive(Clone)]
pub struct VisibilityTracker {
    batcher: FrameBatcher,
    options: VisibilityOptions,
    state: Rc<RefCell<TrackerState>>,
}

impl VisibilityTracker {
    pub fn new(batcher: FrameBatcher, options: VisibilityOptions) -> Self {
        Self {
            batcher,
            options,
            state: Rc::new(RefCell::new(TrackerState::default())),
        }
    }

    /// Queue a visibility sample of `region` against `viewport` for the
    /// next flush.
    pub fn observe(&self, region: Rect, viewport: Rect) {
        let queue = {
            let mut state = self.state.borrow_mut();
            state.region = region;
            state.viewport = viewport;
            let queue = !state.sample_queued;
            state.sample_queued = true;
            queue
        };

        if queue {
            let state = Rc::clone(&self.state);
            let options = self.options;
            self.batcher.read(move || {
                let mut state = state.borrow_mut();
                state.sample_queued = false;
                let fraction =
                    visible_fraction(state.region, expand(state.viewport, options.margin));
                state.fraction = fraction;
                state.visible = fraction > 0.0 && fraction >= options.threshold;
                Ok(())
            });
        }
    }

    /// Result of the most recent sample.
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Visible fraction from the most recent sample, in [0, 1].
    pub fn fraction(&self) -> f64 {
        self.state.borrow().fraction
    }
}
