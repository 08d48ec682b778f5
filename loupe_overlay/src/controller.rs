// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Rect, Vec2};
use loupe_motion::{SettleDetector, Spring};
use loupe_zoom::{ContentRef, ZoomSnapshot};

use crate::placement::{OverlayDelta, OverlayPlacement, backdrop_opacity};

/// Tunable presentation parameters for an [`OverlayController`].
#[derive(Clone, Copy, Debug)]
pub struct OverlayOptions {
    /// Backdrop dim cap. The dim opacity is
    /// `clamp((scale - 1) * dim, 0, dim)`.
    pub backdrop_dim: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self { backdrop_dim: 0.5 }
    }
}

/// Single top-level subscriber turning zoom snapshots into a drawable
/// overlay.
///
/// Feed every polled snapshot through [`apply`](Self::apply), advance time
/// once per update pass with [`tick`](Self::tick), and read the result back
/// through [`placement`](Self::placement) and the backdrop accessors. While
/// no clone is mounted, `placement` returns `None` and the host draws
/// nothing.
#[derive(Clone, Debug)]
pub struct OverlayController {
    viewport: Rect,
    options: OverlayOptions,
    /// Live clone: content identity plus the rest frame it was measured at.
    mounted: Option<(ContentRef, Rect)>,
    scale: Spring,
    offset_x: Spring,
    offset_y: Spring,
    opacity: Spring,
    backdrop: Spring,
    fade: SettleDetector,
    pinching: bool,
    zoomed: bool,
}

impl OverlayController {
    /// Creates a controller rendering into the given viewport.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        Self::with_options(viewport, OverlayOptions::default())
    }

    /// Creates a controller with explicit presentation options.
    #[must_use]
    pub fn with_options(viewport: Rect, options: OverlayOptions) -> Self {
        Self {
            viewport,
            options,
            mounted: None,
            scale: Spring::new(1.0),
            offset_x: Spring::new(0.0),
            offset_y: Spring::new(0.0),
            opacity: Spring::new(0.0),
            backdrop: Spring::new(0.0),
            fade: SettleDetector::new(0.0),
            pinching: false,
            zoomed: false,
        }
    }

    /// Injects the host viewport bounds (window resize, safe-area change).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Current viewport bounds.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Folds one broadcast snapshot into the overlay, returning which
    /// aspects of the rendition it invalidated.
    pub fn apply(&mut self, snap: &ZoomSnapshot) -> OverlayDelta {
        let mut delta = OverlayDelta::empty();

        match (self.mounted, snap.content) {
            (None, Some(content)) => {
                self.mounted = Some((content, snap.frame));
                // A fresh clone fades in from fully transparent.
                self.opacity.jump_to(0.0);
                delta |= OverlayDelta::CONTENT;
            }
            (Some((content, frame)), Some(new_content)) => {
                if content != new_content {
                    self.mounted = Some((new_content, snap.frame));
                    delta |= OverlayDelta::CONTENT;
                } else if frame != snap.frame {
                    self.mounted = Some((content, snap.frame));
                    delta |= OverlayDelta::TRANSFORM;
                }
            }
            _ => {}
        }

        if self.zoomed != snap.is_zoomed {
            self.zoomed = snap.is_zoomed;
            delta |= OverlayDelta::VISIBILITY;
            if !self.zoomed {
                // Arm the release: fires once the fade-out settles.
                self.fade.rearm(0.0);
            }
        }
        self.opacity
            .set_target(if self.zoomed { 1.0 } else { 0.0 });

        self.pinching = snap.is_pinching;
        let offset_changed =
            self.offset_x.target() != snap.offset.x || self.offset_y.target() != snap.offset.y;
        if self.scale.target() != snap.scale || offset_changed {
            delta |= OverlayDelta::TRANSFORM;
        }
        if self.pinching {
            // Glued to the fingers: no easing while the gesture is live.
            self.scale.jump_to(snap.scale);
            self.offset_x.jump_to(snap.offset.x);
            self.offset_y.jump_to(snap.offset.y);
        } else {
            self.scale.set_target(snap.scale);
            self.offset_x.set_target(snap.offset.x);
            self.offset_y.set_target(snap.offset.y);
        }

        let dim = backdrop_opacity(snap.scale, self.options.backdrop_dim);
        if self.backdrop.target() != dim {
            // The backdrop always eases, even mid-pinch.
            self.backdrop.set_target(dim);
            delta |= OverlayDelta::BACKDROP;
        }

        delta
    }

    /// Advances the overlay's springs by `dt` seconds and runs the clone
    /// release once a completed fade-out is delivered. Returns `true` if
    /// the rendition changed.
    pub fn tick(&mut self, dt: f64) -> bool {
        let mut changed = false;

        // Deliver a fade-out completion recorded on a previous tick.
        if self.fade.take_completion() && !self.zoomed && self.mounted.take().is_some() {
            changed = true;
        }

        let before = (
            self.scale.value(),
            self.offset_x.value(),
            self.offset_y.value(),
            self.opacity.value(),
            self.backdrop.value(),
        );
        self.scale.tick(dt);
        self.offset_x.tick(dt);
        self.offset_y.tick(dt);
        self.opacity.tick(dt);
        self.backdrop.tick(dt);
        if (
            self.scale.value(),
            self.offset_x.value(),
            self.offset_y.value(),
            self.opacity.value(),
            self.backdrop.value(),
        ) != before
        {
            changed = true;
        }

        // The release is keyed on the crossfade itself, not on the zoom
        // flag alone: the clone survives until it is invisible.
        if self.mounted.is_some() && !self.zoomed {
            self.fade.observe(self.opacity.value());
        }

        changed
    }

    /// The clone to draw this frame, or `None` while nothing is mounted.
    #[must_use]
    pub fn placement(&self) -> Option<OverlayPlacement> {
        let (content, frame) = self.mounted?;
        let center = frame.center().to_vec2();
        let offset = Vec2::new(self.offset_x.value(), self.offset_y.value());
        let transform = Affine::translate(offset + center)
            * Affine::scale(self.scale.value())
            * Affine::translate(-center);
        Some(OverlayPlacement {
            content,
            frame,
            transform,
            opacity: self.opacity.value().clamp(0.0, 1.0),
            hit_testable: false,
        })
    }

    /// Current backdrop dim opacity, eased.
    #[must_use]
    pub fn backdrop_alpha(&self) -> f64 {
        self.backdrop.value().clamp(0.0, 1.0)
    }

    /// The backdrop as a drawable color (black at the current dim alpha).
    #[must_use]
    pub fn backdrop_color(&self) -> peniko::Color {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "alpha is clamped to [0, 1]; f32 covers it"
        )]
        let alpha = self.backdrop_alpha() as f32;
        peniko::Color::BLACK.with_alpha(alpha)
    }

    /// The rect the backdrop should cover: the injected viewport.
    #[must_use]
    pub fn backdrop_rect(&self) -> Rect {
        self.viewport
    }

    /// Snapshot of internal state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> OverlayDebugInfo {
        OverlayDebugInfo {
            viewport: self.viewport,
            content: self.mounted.map(|(content, _)| content),
            zoomed: self.zoomed,
            pinching: self.pinching,
            scale: self.scale.value(),
            offset: Vec2::new(self.offset_x.value(), self.offset_y.value()),
            clone_opacity: self.opacity.value(),
            backdrop_alpha: self.backdrop.value(),
        }
    }
}

/// Debug snapshot of an [`OverlayController`].
#[derive(Clone, Copy, Debug)]
pub struct OverlayDebugInfo {
    /// Injected viewport bounds.
    pub viewport: Rect,
    /// Content of the mounted clone, if any.
    pub content: Option<ContentRef>,
    /// Latest zoom flag seen.
    pub zoomed: bool,
    /// Latest pinch flag seen.
    pub pinching: bool,
    /// Current (possibly eased) scale.
    pub scale: f64,
    /// Current (possibly eased) offset.
    pub offset: Vec2,
    /// Current crossfade opacity.
    pub clone_opacity: f64,
    /// Current backdrop dim.
    pub backdrop_alpha: f64,
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};
    use loupe_zoom::{ContentRef, ElementId, ZoomSnapshot};

    use super::{OverlayController, OverlayDelta};

    const DT: f64 = 1.0 / 60.0;
    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);
    const FRAME: Rect = Rect::new(100.0, 100.0, 300.0, 300.0);

    fn zoomed_snap(serial: u64, scale: f64, offset: Vec2, pinching: bool) -> ZoomSnapshot {
        ZoomSnapshot {
            offset,
            scale,
            frame: FRAME,
            is_zoomed: true,
            is_pinching: pinching,
            content: Some(ContentRef::new(ElementId::new(1), serial)),
        }
    }

    #[test]
    fn renders_nothing_until_content_arrives() {
        let mut overlay = OverlayController::new(VIEWPORT);
        assert!(overlay.placement().is_none());

        // A rest snapshot (no content) mounts nothing.
        overlay.apply(&ZoomSnapshot::rest(FRAME));
        assert!(overlay.placement().is_none());
    }

    #[test]
    fn mounts_and_places_the_clone() {
        let mut overlay = OverlayController::new(VIEWPORT);
        let delta = overlay.apply(&zoomed_snap(0, 2.0, Vec2::new(10.0, 5.0), true));
        assert!(delta.contains(OverlayDelta::CONTENT));

        let placement = overlay.placement().unwrap();
        assert_eq!(placement.frame, FRAME);
        assert!(!placement.hit_testable);

        // Scale about the frame center, then offset: the center lands at
        // center + offset, a corner scales away from it.
        let center = Point::new(200.0, 200.0);
        assert_eq!(placement.transform * center, Point::new(210.0, 205.0));
        assert_eq!(
            placement.transform * Point::new(100.0, 100.0),
            Point::new(10.0, 5.0)
        );
    }

    #[test]
    fn pinch_updates_are_instantaneous() {
        let mut overlay = OverlayController::new(VIEWPORT);
        overlay.apply(&zoomed_snap(0, 1.5, Vec2::ZERO, true));
        overlay.apply(&zoomed_snap(0, 2.5, Vec2::new(40.0, 0.0), true));

        // No tick needed: the transform already mirrors the fingers.
        let placement = overlay.placement().unwrap();
        let center = Point::new(200.0, 200.0);
        assert_eq!(placement.transform * center, Point::new(240.0, 200.0));
    }

    #[test]
    fn post_pinch_updates_ease() {
        let mut overlay = OverlayController::new(VIEWPORT);
        overlay.apply(&zoomed_snap(0, 2.0, Vec2::ZERO, true));

        // The gesture ended; the zoom side now reports an eased scale of
        // 1.4, no longer pinching.
        overlay.apply(&zoomed_snap(0, 1.4, Vec2::ZERO, false));
        let immediate = overlay.debug_info().scale;
        assert_eq!(immediate, 2.0, "eased update must not jump");

        overlay.tick(DT);
        let after = overlay.debug_info().scale;
        assert!(after < 2.0 && after > 1.0);
    }

    #[test]
    fn same_snapshot_invalidates_nothing() {
        let mut overlay = OverlayController::new(VIEWPORT);
        let snap = zoomed_snap(0, 2.0, Vec2::ZERO, true);
        overlay.apply(&snap);
        let delta = overlay.apply(&snap);
        assert_eq!(delta, OverlayDelta::empty());
    }

    #[test]
    fn new_content_ref_rebuilds_the_clone() {
        let mut overlay = OverlayController::new(VIEWPORT);
        overlay.apply(&zoomed_snap(0, 2.0, Vec2::ZERO, true));
        let delta = overlay.apply(&zoomed_snap(1, 2.0, Vec2::ZERO, true));
        assert!(delta.contains(OverlayDelta::CONTENT));
    }

    #[test]
    fn clone_survives_until_the_fade_settles() {
        let mut overlay = OverlayController::new(VIEWPORT);
        overlay.apply(&zoomed_snap(0, 2.0, Vec2::ZERO, true));
        // Let the fade-in make some progress.
        for _ in 0..10 {
            overlay.tick(DT);
        }
        assert!(overlay.placement().unwrap().opacity > 0.0);

        // Zoom exit: content gone, flag cleared, scale back at rest.
        let delta = overlay.apply(&ZoomSnapshot::rest(FRAME));
        assert!(delta.contains(OverlayDelta::VISIBILITY));
        assert!(
            overlay.placement().is_some(),
            "clone released before the crossfade finished"
        );

        // The clone must outlive the moment opacity reaches zero by at
        // least one tick (deferred delivery), then release.
        let mut faded_tick = None;
        for n in 0..600 {
            overlay.tick(DT);
            if overlay.placement().is_none() {
                let faded = faded_tick.expect("released before the fade settled");
                assert!(n > faded, "release was not deferred past the settle tick");
                return;
            }
            if faded_tick.is_none() && overlay.placement().unwrap().opacity == 0.0 {
                faded_tick = Some(n);
            }
        }
        panic!("clone was never released");
    }

    #[test]
    fn reengaging_mid_fade_keeps_the_clone() {
        let mut overlay = OverlayController::new(VIEWPORT);
        overlay.apply(&zoomed_snap(0, 2.0, Vec2::ZERO, true));
        for _ in 0..10 {
            overlay.tick(DT);
        }
        overlay.apply(&ZoomSnapshot::rest(FRAME));
        for _ in 0..3 {
            overlay.tick(DT);
        }

        // Zoom re-engages while the fade-out is in flight.
        overlay.apply(&zoomed_snap(0, 1.5, Vec2::ZERO, true));
        for _ in 0..60 {
            overlay.tick(DT);
        }
        assert!(overlay.placement().is_some());
        assert!(overlay.placement().unwrap().opacity > 0.5);
    }

    #[test]
    fn backdrop_follows_the_scale_eased() {
        let mut overlay = OverlayController::new(VIEWPORT);
        assert_eq!(overlay.backdrop_alpha(), 0.0);

        let delta = overlay.apply(&zoomed_snap(0, 2.0, Vec2::ZERO, true));
        assert!(delta.contains(OverlayDelta::BACKDROP));
        // Eased: not there yet, but moving.
        assert_eq!(overlay.backdrop_alpha(), 0.0);
        for _ in 0..120 {
            overlay.tick(DT);
        }
        assert_eq!(overlay.backdrop_alpha(), 0.5);
    }

    #[test]
    fn backdrop_color_carries_the_alpha() {
        let mut overlay = OverlayController::new(VIEWPORT);
        overlay.apply(&zoomed_snap(0, 2.0, Vec2::ZERO, true));
        for _ in 0..120 {
            overlay.tick(DT);
        }
        let color = overlay.backdrop_color();
        assert!((color.components[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn viewport_is_injected_not_ambient() {
        let mut overlay = OverlayController::new(VIEWPORT);
        assert_eq!(overlay.backdrop_rect(), VIEWPORT);

        let resized = Rect::new(0.0, 0.0, 1024.0, 768.0);
        overlay.set_viewport(resized);
        assert_eq!(overlay.backdrop_rect(), resized);
    }
}
