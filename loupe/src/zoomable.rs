// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};
use loupe_gesture::GestureTracker;
use loupe_zoom::{ElementId, ZoomDebugInfo, ZoomOptions, ZoomSnapshot, ZoomState};

/// One element with interactive zoom enabled.
///
/// Pairs a [`GestureTracker`] with a [`ZoomState`]: the host forwards raw
/// touch events and the measured frame, and reads back the snapshot plus
/// the opacity to apply to the in-place content. A `Zoomable` is fully
/// functional on its own; mounting it on a [`ZoomSurface`](crate::ZoomSurface)
/// is only needed for the overlay to actually render.
#[derive(Clone, Debug)]
pub struct Zoomable {
    tracker: GestureTracker,
    state: ZoomState,
}

impl Zoomable {
    /// Enables interactive zoom for the given element.
    #[must_use]
    pub fn new(element: ElementId) -> Self {
        Self::with_options(element, ZoomOptions::default())
    }

    /// Enables interactive zoom with explicit timing options.
    #[must_use]
    pub fn with_options(element: ElementId, options: ZoomOptions) -> Self {
        Self {
            tracker: GestureTracker::new(),
            state: ZoomState::with_options(element, options),
        }
    }

    /// The element this decorator wraps.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.state.element()
    }

    /// Records the element's rest frame from the host's layout pass.
    pub fn set_frame(&mut self, frame: Rect) {
        self.state.set_frame(frame);
    }

    /// Forwards a touch landing on the element.
    pub fn on_touch_down(&mut self, touch: u64, pos: Point, t: f64) {
        if let Some(sample) = self.tracker.on_down(touch, pos, t) {
            self.state.apply(&sample);
        }
    }

    /// Forwards a touch moving on the element.
    pub fn on_touch_move(&mut self, touch: u64, pos: Point, t: f64) {
        if let Some(sample) = self.tracker.on_move(touch, pos, t) {
            self.state.apply(&sample);
        }
    }

    /// Forwards a touch lifting off the element.
    pub fn on_touch_up(&mut self, touch: u64, t: f64) {
        if let Some(sample) = self.tracker.on_up(touch, t) {
            self.state.apply(&sample);
        }
    }

    /// Forwards a host-side gesture cancellation.
    pub fn on_touch_cancel(&mut self, t: f64) {
        if let Some(sample) = self.tracker.on_cancel(t) {
            self.state.apply(&sample);
        }
    }

    /// Advances animations and timing by `dt` seconds. Returns `true` if
    /// the snapshot (or the content opacity) changed.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.state.tick(dt)
    }

    /// The element's current broadcastable state.
    #[must_use]
    pub fn snapshot(&self) -> ZoomSnapshot {
        self.state.snapshot()
    }

    /// Opacity the host should apply to the in-place content.
    #[must_use]
    pub fn content_opacity(&self) -> f64 {
        self.state.content_opacity()
    }

    /// Normalized position of the current gesture centroid inside the
    /// element's frame, with a neutral midpoint fallback for degenerate
    /// frames or an idle tracker.
    #[must_use]
    pub fn pinch_anchor(&self) -> Point {
        self.tracker.anchor_in(self.state.snapshot().frame)
    }

    /// Returns the element to rest, discarding gesture and animation state.
    pub fn reset(&mut self) {
        self.tracker = GestureTracker::new();
        self.state.reset();
    }

    /// Snapshot of the underlying state machine for inspection.
    #[must_use]
    pub fn debug_info(&self) -> ZoomDebugInfo {
        self.state.debug_info()
    }
}
