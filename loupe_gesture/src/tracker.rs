// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::sample::{GesturePhase, GestureSample};

/// Spans below this are treated as degenerate (coincident touches).
const MIN_SPAN: f64 = 1e-6;

/// Tracks a two-finger pinch/pan gesture from raw touch events.
///
/// Event entry points take a host-supplied timestamp in seconds; timestamps
/// only need to be monotonic within one gesture and are used to derive the
/// scale velocity reported on each sample.
///
/// A touch count dip (one finger lifting mid-gesture) does not end the
/// gesture: the scale freezes at its last value, the sample translation goes
/// to zero, and when a second finger lands again the tracker re-anchors so
/// both scale and translation resume from their frozen values without a jump.
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    touches: SmallVec<[(u64, Point); 2]>,
    active: bool,
    /// Unclamped span ratio since gesture start; frozen while only one
    /// touch remains down.
    ratio: f64,
    start_span: f64,
    /// Centroid anchor for translation; `None` while frozen.
    start_centroid: Option<Point>,
    /// Translation accumulated before the most recent re-anchor.
    carried: Vec2,
    /// Latest translation computed from a full two-touch state.
    translation: Vec2,
    last_scale: f64,
    last_time: Option<f64>,
    scale_velocity: f64,
}

impl GestureTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of touches currently tracked.
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// A touch landed. Returns a sample if this changed an active gesture
    /// (or started one). Touches beyond the second are ignored.
    pub fn on_down(&mut self, id: u64, pos: Point, t: f64) -> Option<GestureSample> {
        if self.touches.iter().any(|(tid, _)| *tid == id) {
            return self.on_move(id, pos, t);
        }
        if self.touches.len() >= 2 {
            return None;
        }
        self.touches.push((id, pos));
        if self.touches.len() < 2 {
            return None;
        }

        if self.active {
            // Second finger returned mid-gesture: re-anchor so scale and
            // translation resume from their frozen values.
            let span = self.span();
            self.start_span = if self.ratio > MIN_SPAN {
                span / self.ratio
            } else {
                span
            };
            self.carried = self.translation;
            self.start_centroid = Some(self.centroid());
            Some(self.emit(GesturePhase::Changed, t))
        } else {
            self.active = true;
            self.ratio = 1.0;
            self.start_span = self.span();
            self.start_centroid = Some(self.centroid());
            self.carried = Vec2::ZERO;
            self.translation = Vec2::ZERO;
            self.last_scale = 1.0;
            self.last_time = Some(t);
            self.scale_velocity = 0.0;
            Some(self.emit(GesturePhase::Began, t))
        }
    }

    /// A tracked touch moved. Returns a sample while a gesture is active.
    pub fn on_move(&mut self, id: u64, pos: Point, t: f64) -> Option<GestureSample> {
        let entry = self.touches.iter_mut().find(|(tid, _)| *tid == id)?;
        entry.1 = pos;
        if !self.active {
            return None;
        }

        if self.touches.len() == 2 {
            let span = self.span();
            self.ratio = if self.start_span > MIN_SPAN {
                span / self.start_span
            } else {
                1.0
            };
            if let Some(anchor) = self.start_centroid {
                self.translation = self.carried + (self.centroid() - anchor);
            }
        }
        Some(self.emit(GesturePhase::Changed, t))
    }

    /// A touch lifted. Ends the gesture when the last touch is gone;
    /// freezes it when one of two touches lifts.
    pub fn on_up(&mut self, id: u64, t: f64) -> Option<GestureSample> {
        let index = self.touches.iter().position(|(tid, _)| *tid == id)?;
        self.touches.remove(index);
        if !self.active {
            return None;
        }

        if self.touches.is_empty() {
            let sample = self.end_sample(GesturePhase::Ended, self.scale_velocity);
            self.reset();
            Some(sample)
        } else {
            // Freeze: scale holds, translation stops updating.
            self.carried = self.translation;
            self.start_centroid = None;
            Some(self.emit(GesturePhase::Changed, t))
        }
    }

    /// The host cancelled the gesture; all tracked state is discarded.
    pub fn on_cancel(&mut self, _t: f64) -> Option<GestureSample> {
        self.touches.clear();
        if !self.active {
            return None;
        }
        let sample = self.end_sample(GesturePhase::Cancelled, 0.0);
        self.reset();
        Some(sample)
    }

    /// Normalized position of the gesture centroid inside `region`, each
    /// axis in `0..=1`.
    ///
    /// Falls back to the midpoint `(0.5, 0.5)` when the region has no area
    /// or no touches are down, so callers can use the result as a scale
    /// anchor without checking for division by zero themselves.
    #[must_use]
    pub fn anchor_in(&self, region: Rect) -> Point {
        let width = region.width();
        let height = region.height();
        if width <= 0.0 || height <= 0.0 || self.touches.is_empty() {
            return Point::new(0.5, 0.5);
        }
        let c = self.centroid();
        Point::new(
            ((c.x - region.x0) / width).clamp(0.0, 1.0),
            ((c.y - region.y0) / height).clamp(0.0, 1.0),
        )
    }

    fn span(&self) -> f64 {
        match self.touches.as_slice() {
            [(_, a), (_, b)] => a.distance(*b),
            _ => 0.0,
        }
    }

    fn centroid(&self) -> Point {
        match self.touches.as_slice() {
            [(_, a), (_, b)] => a.midpoint(*b),
            [(_, a)] => *a,
            _ => Point::ZERO,
        }
    }

    fn emit(&mut self, phase: GesturePhase, t: f64) -> GestureSample {
        let pinching = self.ratio > 1.0;
        let scale = if pinching { self.ratio } else { 1.0 };

        // Velocity is differentiated only over full two-touch updates so a
        // touch-count dip right before release cannot zero it out.
        if phase == GesturePhase::Changed && self.touches.len() == 2 {
            if let Some(last) = self.last_time {
                let dt = t - last;
                if dt > 0.0 {
                    self.scale_velocity = (scale - self.last_scale) / dt;
                }
            }
            self.last_scale = scale;
            self.last_time = Some(t);
        }

        let translation = if self.touches.len() == 2 && scale > 1.0 {
            self.translation
        } else {
            Vec2::ZERO
        };

        GestureSample {
            scale,
            translation,
            touch_count: self.touches.len(),
            phase,
            pinching,
            scale_velocity: self.scale_velocity,
        }
    }

    fn end_sample(&self, phase: GesturePhase, velocity: f64) -> GestureSample {
        GestureSample {
            scale: 1.0,
            translation: Vec2::ZERO,
            touch_count: 0,
            phase,
            pinching: false,
            scale_velocity: velocity,
        }
    }

    fn reset(&mut self) {
        self.active = false;
        self.ratio = 1.0;
        self.start_span = 0.0;
        self.start_centroid = None;
        self.carried = Vec2::ZERO;
        self.translation = Vec2::ZERO;
        self.last_scale = 1.0;
        self.last_time = None;
        self.scale_velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};

    use super::{GesturePhase, GestureTracker};

    fn pinch_pair(tracker: &mut GestureTracker) {
        assert!(tracker.on_down(1, Point::new(0.0, 0.0), 0.0).is_none());
        let began = tracker.on_down(2, Point::new(100.0, 0.0), 0.01).unwrap();
        assert_eq!(began.phase, GesturePhase::Began);
        assert_eq!(began.scale, 1.0);
        assert!(!began.pinching);
    }

    #[test]
    fn single_touch_is_not_a_gesture() {
        let mut tracker = GestureTracker::new();
        assert!(tracker.on_down(1, Point::new(10.0, 10.0), 0.0).is_none());
        assert!(tracker.on_move(1, Point::new(50.0, 50.0), 0.1).is_none());
        assert!(tracker.on_up(1, 0.2).is_none());
    }

    #[test]
    fn spreading_reports_live_scale() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);

        let sample = tracker.on_move(2, Point::new(200.0, 0.0), 0.02).unwrap();
        assert!(sample.pinching);
        assert_eq!(sample.scale, 2.0);
        assert_eq!(sample.touch_count, 2);
    }

    #[test]
    fn pinch_in_never_reports_below_one() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);

        let sample = tracker.on_move(2, Point::new(40.0, 0.0), 0.02).unwrap();
        assert!(!sample.pinching);
        assert_eq!(sample.scale, 1.0);
    }

    #[test]
    fn translation_zero_at_rest_scale() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);

        // Both fingers drag right by 10 without ever spreading past the
        // starting span: scale stays at 1, so the pan must be suppressed.
        let a = tracker.on_move(1, Point::new(10.0, 0.0), 0.02).unwrap();
        let b = tracker.on_move(2, Point::new(110.0, 0.0), 0.03).unwrap();
        assert_eq!(a.scale, 1.0);
        assert_eq!(b.scale, 1.0);
        assert_eq!(a.translation, Vec2::ZERO);
        assert_eq!(b.translation, Vec2::ZERO);
    }

    #[test]
    fn pan_tracks_centroid_while_zoomed() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);

        // Spread to scale 2 (centroid moves from (50,0) to (100,0)).
        let s = tracker.on_move(2, Point::new(200.0, 0.0), 0.02).unwrap();
        assert_eq!(s.translation, Vec2::new(50.0, 0.0));

        // Drag both fingers down by 20.
        tracker.on_move(1, Point::new(0.0, 20.0), 0.03).unwrap();
        let s = tracker.on_move(2, Point::new(200.0, 20.0), 0.04).unwrap();
        assert_eq!(s.translation, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn touch_dip_freezes_scale_and_translation() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);
        tracker.on_move(2, Point::new(200.0, 0.0), 0.02).unwrap();

        // One finger lifts: gesture continues, frozen.
        let frozen = tracker.on_up(1, 0.03).unwrap();
        assert_eq!(frozen.phase, GesturePhase::Changed);
        assert_eq!(frozen.touch_count, 1);
        assert!(frozen.pinching);
        assert_eq!(frozen.scale, 2.0);
        assert_eq!(frozen.translation, Vec2::ZERO);

        // Moving the remaining finger does not change the scale.
        let still = tracker.on_move(2, Point::new(300.0, 40.0), 0.04).unwrap();
        assert_eq!(still.scale, 2.0);
        assert_eq!(still.translation, Vec2::ZERO);
    }

    #[test]
    fn recovery_resumes_without_jump() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);
        // Scale 2, centroid translation (50, 0).
        tracker.on_move(2, Point::new(200.0, 0.0), 0.02).unwrap();
        tracker.on_up(1, 0.03).unwrap();

        // A new second finger lands: frozen values carry over.
        let resumed = tracker.on_down(3, Point::new(100.0, 0.0), 0.05).unwrap();
        assert_eq!(resumed.touch_count, 2);
        assert_eq!(resumed.scale, 2.0);
        assert_eq!(resumed.translation, Vec2::new(50.0, 0.0));

        // Dragging both by (10, 0) extends the carried translation.
        tracker.on_move(2, Point::new(210.0, 0.0), 0.06).unwrap();
        let s = tracker.on_move(3, Point::new(110.0, 0.0), 0.07).unwrap();
        assert_eq!(s.translation, Vec2::new(60.0, 0.0));
        assert_eq!(s.scale, 2.0);
    }

    #[test]
    fn release_collapses_to_one() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);
        tracker.on_move(2, Point::new(200.0, 0.0), 0.02).unwrap();

        tracker.on_up(1, 0.03).unwrap();
        let ended = tracker.on_up(2, 0.04).unwrap();
        assert_eq!(ended.phase, GesturePhase::Ended);
        assert_eq!(ended.scale, 1.0);
        assert!(!ended.pinching);
        assert_eq!(ended.translation, Vec2::ZERO);
        assert!(!tracker.is_active());
    }

    #[test]
    fn release_carries_last_scale_velocity() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);

        // Span grows 100 -> 150 over 0.1s: velocity 5.0 per second.
        let s = tracker.on_move(2, Point::new(150.0, 0.0), 0.11).unwrap();
        assert!((s.scale_velocity - 5.0).abs() < 1e-9);

        tracker.on_up(1, 0.12).unwrap();
        let ended = tracker.on_up(2, 0.13).unwrap();
        assert!((ended.scale_velocity - 5.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_touches_stay_neutral() {
        let mut tracker = GestureTracker::new();
        tracker.on_down(1, Point::new(5.0, 5.0), 0.0);
        let began = tracker.on_down(2, Point::new(5.0, 5.0), 0.01).unwrap();
        assert_eq!(began.scale, 1.0);

        let s = tracker.on_move(2, Point::new(80.0, 5.0), 0.02).unwrap();
        assert!(s.scale.is_finite());
        assert_eq!(s.scale, 1.0);
    }

    #[test]
    fn third_finger_is_ignored() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);
        assert!(tracker.on_down(3, Point::new(50.0, 50.0), 0.02).is_none());
        assert_eq!(tracker.touch_count(), 2);
    }

    #[test]
    fn cancel_discards_everything() {
        let mut tracker = GestureTracker::new();
        pinch_pair(&mut tracker);
        tracker.on_move(2, Point::new(200.0, 0.0), 0.02).unwrap();

        let cancelled = tracker.on_cancel(0.03).unwrap();
        assert_eq!(cancelled.phase, GesturePhase::Cancelled);
        assert_eq!(cancelled.scale, 1.0);
        assert!(!tracker.is_active());
        assert_eq!(tracker.touch_count(), 0);
    }

    #[test]
    fn anchor_normalizes_into_region() {
        let mut tracker = GestureTracker::new();
        tracker.on_down(1, Point::new(50.0, 50.0), 0.0);
        tracker.on_down(2, Point::new(150.0, 50.0), 0.01);

        let region = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(tracker.anchor_in(region), Point::new(0.5, 0.5));

        let shifted = Rect::new(100.0, 0.0, 300.0, 100.0);
        assert_eq!(tracker.anchor_in(shifted), Point::new(0.0, 0.5));
    }

    #[test]
    fn anchor_guards_zero_size_region() {
        let mut tracker = GestureTracker::new();
        tracker.on_down(1, Point::new(50.0, 50.0), 0.0);
        tracker.on_down(2, Point::new(150.0, 50.0), 0.01);

        let empty = Rect::new(10.0, 10.0, 10.0, 40.0);
        let anchor = tracker.anchor_in(empty);
        assert_eq!(anchor, Point::new(0.5, 0.5));
    }

    #[test]
    fn scale_never_drops_below_one() {
        let mut tracker = GestureTracker::new();
        tracker.on_down(1, Point::new(0.0, 0.0), 0.0);
        tracker.on_down(2, Point::new(100.0, 0.0), 0.01);
        let motions = [
            Point::new(130.0, 0.0),
            Point::new(60.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(180.0, 0.0),
            Point::new(100.0, 0.0),
        ];
        for (i, p) in motions.iter().enumerate() {
            let s = tracker.on_move(2, *p, 0.02 + i as f64 * 0.01).unwrap();
            assert!(s.scale >= 1.0, "scale dipped below rest: {}", s.scale);
        }
        let s = tracker.on_up(1, 0.1).unwrap();
        assert!(s.scale >= 1.0, "scale dipped below rest: {}", s.scale);
        let s = tracker.on_up(2, 0.11).unwrap();
        assert_eq!(s.scale, 1.0);
    }
}
