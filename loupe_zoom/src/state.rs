// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Vec2};
use loupe_gesture::GestureSample;
use loupe_motion::{SettleDetector, Spring};

use crate::snapshot::{ContentRef, ElementId, ZoomSnapshot};

/// Tunable timing for a [`ZoomState`].
#[derive(Clone, Copy, Debug)]
pub struct ZoomOptions {
    /// How long after `is_zoomed` clears the in-place content stays hidden,
    /// in seconds. Gives the overlay's fade-out time to finish so the
    /// original never flashes underneath it.
    pub reveal_delay: f64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self { reveal_delay: 0.1 }
    }
}

/// Phase of the zoom lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomPhase {
    /// Scale 1, offset zero, nothing zoomed.
    Rest,
    /// Gesture live; transform tracks the fingers with no easing.
    Pinching,
    /// Gesture ended; transform springs back toward rest.
    Returning,
    /// Scale has numerically reached rest; the settle is recorded but its
    /// delivery is deferred one tick, so `is_zoomed` is still raised.
    ZoomedSettling,
}

/// Per-element zoom/pan state machine.
///
/// Owns the element's scale and offset springs, measured rest frame,
/// pinching flag, and the debounced `is_zoomed` flag. Gesture samples are
/// folded in through [`apply`](Self::apply); the host advances time through
/// [`tick`](Self::tick) once per update pass and reads the result back as a
/// [`ZoomSnapshot`].
///
/// Entry and exit are deliberately asymmetric: `is_zoomed` rises in the
/// same tick the pinch starts (entry must feel instantaneous) but only
/// clears once the return-to-rest scale animation has settled and the
/// settle has been delivered (exit is debounced, so the overlay never
/// disappears mid-flight).
#[derive(Clone, Debug)]
pub struct ZoomState {
    element: ElementId,
    options: ZoomOptions,
    phase: ZoomPhase,
    scale: Spring,
    offset_x: Spring,
    offset_y: Spring,
    settle: SettleDetector,
    frame: Rect,
    is_zoomed: bool,
    content: Option<ContentRef>,
    next_serial: u64,
    /// Pending reveal debounce, counted down by `tick`. Not cancellable:
    /// a fire that lands while zoom has re-engaged is dropped, not applied.
    reveal_remaining: Option<f64>,
    content_opacity: f64,
    dirty: bool,
}

impl ZoomState {
    /// Creates a state machine at rest for the given element.
    #[must_use]
    pub fn new(element: ElementId) -> Self {
        Self::with_options(element, ZoomOptions::default())
    }

    /// Creates a state machine at rest with explicit options.
    #[must_use]
    pub fn with_options(element: ElementId, options: ZoomOptions) -> Self {
        Self {
            element,
            options,
            phase: ZoomPhase::Rest,
            scale: Spring::new(1.0),
            offset_x: Spring::new(0.0),
            offset_y: Spring::new(0.0),
            settle: SettleDetector::new(1.0),
            frame: Rect::ZERO,
            is_zoomed: false,
            content: None,
            next_serial: 0,
            reveal_remaining: None,
            content_opacity: 1.0,
            dirty: false,
        }
    }

    /// The element this state belongs to.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ZoomPhase {
        self.phase
    }

    /// Records the element's rest frame, measured by the host's layout pass.
    pub fn set_frame(&mut self, frame: Rect) {
        if self.frame != frame {
            self.frame = frame;
            self.dirty = true;
        }
    }

    /// Opacity the host should apply to the in-place (non-overlay) content.
    ///
    /// Drops to 0 in the same tick zoom engages; returns to 1 only after
    /// the configured reveal delay has elapsed with zoom disengaged.
    #[must_use]
    pub fn content_opacity(&self) -> f64 {
        self.content_opacity
    }

    /// Folds one gesture sample into the machine.
    pub fn apply(&mut self, sample: &GestureSample) {
        if sample.pinching {
            if !self.is_zoomed {
                // Fast path: entry is raised immediately and the in-place
                // content hides in the same tick.
                self.is_zoomed = true;
                self.content = Some(ContentRef::new(self.element, self.next_serial));
                self.next_serial += 1;
                self.content_opacity = 0.0;
            }
            if self.phase != ZoomPhase::Pinching {
                self.phase = ZoomPhase::Pinching;
                // A settle recorded by an interrupted return must not fire.
                self.settle.rearm(1.0);
            }
            self.scale.jump_to(sample.scale.max(1.0));
            // Pan honors the sample only from a full two-touch state; a
            // touch-count dip freezes the offset at its last value.
            if sample.touch_count == 2 && sample.scale > 1.0 {
                self.offset_x.jump_to(sample.translation.x);
                self.offset_y.jump_to(sample.translation.y);
            }
            self.dirty = true;
        } else if self.phase == ZoomPhase::Pinching {
            self.phase = ZoomPhase::Returning;
            self.scale
                .set_target_with_velocity(1.0, sample.scale_velocity);
            self.offset_x.set_target(0.0);
            self.offset_y.set_target(0.0);
            self.settle.rearm(1.0);
            self.dirty = true;
        }
    }

    /// Advances the machine by `dt` seconds. Returns `true` if anything a
    /// snapshot carries (or the content opacity) changed.
    pub fn tick(&mut self, dt: f64) -> bool {
        let mut changed = core::mem::take(&mut self.dirty);

        // Reveal debounce first: it was started on an earlier tick. A fire
        // that lands while zoom has re-engaged is dropped.
        if let Some(remaining) = self.reveal_remaining {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.reveal_remaining = None;
                if !self.is_zoomed && self.content_opacity != 1.0 {
                    self.content_opacity = 1.0;
                    changed = true;
                }
            } else {
                self.reveal_remaining = Some(remaining);
            }
        }

        // Deliver a settle recorded on a previous tick: the actual exit.
        if self.phase == ZoomPhase::ZoomedSettling && self.settle.take_completion() {
            self.phase = ZoomPhase::Rest;
            self.is_zoomed = false;
            self.content = None;
            self.scale.jump_to(1.0);
            self.offset_x.jump_to(0.0);
            self.offset_y.jump_to(0.0);
            self.reveal_remaining = Some(self.options.reveal_delay);
            changed = true;
        }

        if self.phase == ZoomPhase::Returning {
            let before = (
                self.scale.value(),
                self.offset_x.value(),
                self.offset_y.value(),
            );
            self.scale.tick(dt);
            self.offset_x.tick(dt);
            self.offset_y.tick(dt);
            if (
                self.scale.value(),
                self.offset_x.value(),
                self.offset_y.value(),
            ) != before
            {
                changed = true;
            }

            self.settle.observe(self.scale.value());
            if self.settle.is_pending() {
                self.phase = ZoomPhase::ZoomedSettling;
                // Scale is back at rest; the offset must not outlive it.
                self.offset_x.jump_to(0.0);
                self.offset_y.jump_to(0.0);
                changed = true;
            }
        }

        changed
    }

    /// Derives the broadcast payload for the current state.
    ///
    /// A velocity-seeded return spring may transiently dip below rest scale;
    /// the snapshot clamps it (and zeroes the offset alongside), so consumers
    /// never observe a scale below 1 or an offset without zoom.
    #[must_use]
    pub fn snapshot(&self) -> ZoomSnapshot {
        let scale = self.scale.value().max(1.0);
        let offset = if scale > 1.0 {
            Vec2::new(self.offset_x.value(), self.offset_y.value())
        } else {
            Vec2::ZERO
        };
        ZoomSnapshot {
            offset,
            scale,
            frame: self.frame,
            is_zoomed: self.is_zoomed,
            is_pinching: self.phase == ZoomPhase::Pinching,
            content: self.content,
        }
    }

    /// Returns the machine to rest, discarding any in-flight animation and
    /// pending timing. Used when the element unmounts.
    pub fn reset(&mut self) {
        self.phase = ZoomPhase::Rest;
        self.scale.jump_to(1.0);
        self.offset_x.jump_to(0.0);
        self.offset_y.jump_to(0.0);
        self.settle.rearm(1.0);
        self.is_zoomed = false;
        self.content = None;
        self.reveal_remaining = None;
        self.content_opacity = 1.0;
        self.dirty = true;
    }

    /// Snapshot of internal state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ZoomDebugInfo {
        ZoomDebugInfo {
            phase: self.phase,
            scale: self.scale.value(),
            offset: Vec2::new(self.offset_x.value(), self.offset_y.value()),
            frame: self.frame,
            is_zoomed: self.is_zoomed,
            content: self.content,
            content_opacity: self.content_opacity,
            reveal_remaining: self.reveal_remaining,
        }
    }
}

/// Debug snapshot of a [`ZoomState`].
#[derive(Clone, Copy, Debug)]
pub struct ZoomDebugInfo {
    /// Current lifecycle phase.
    pub phase: ZoomPhase,
    /// Current interpolated scale.
    pub scale: f64,
    /// Current interpolated offset.
    pub offset: Vec2,
    /// Measured rest frame.
    pub frame: Rect,
    /// Debounced zoom flag.
    pub is_zoomed: bool,
    /// Live content ref, if zoomed.
    pub content: Option<ContentRef>,
    /// Opacity of the in-place content.
    pub content_opacity: f64,
    /// Remaining reveal delay, if a reveal is pending.
    pub reveal_remaining: Option<f64>,
}
