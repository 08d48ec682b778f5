// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Rect};
use loupe_zoom::ContentRef;

bitflags::bitflags! {
    /// Which aspects of the rendered overlay a snapshot invalidated.
    ///
    /// Returned by [`OverlayController::apply`](crate::OverlayController::apply)
    /// so hosts can redraw selectively instead of repainting everything on
    /// every gesture tick.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OverlayDelta: u8 {
        /// The clone must be (re)built: a new content ref arrived.
        const CONTENT    = 0b0000_0001;
        /// Position, scale, or measured frame changed.
        const TRANSFORM  = 0b0000_0010;
        /// The crossfade state changed.
        const VISIBILITY = 0b0000_0100;
        /// The backdrop dim target changed.
        const BACKDROP   = 0b0000_1000;
    }
}

/// Everything a host needs to draw the detached clone for one frame.
#[derive(Clone, Copy, Debug)]
pub struct OverlayPlacement {
    /// Identity of the content to clone.
    pub content: ContentRef,
    /// The clone's rest frame, in global coordinates. The clone is laid out
    /// at this rect and transformed from there.
    pub frame: Rect,
    /// Maps the rest frame onto its on-screen placement: a uniform scale
    /// about the frame center followed by the pan offset.
    pub transform: Affine,
    /// Crossfade opacity of the clone, in `0..=1`.
    pub opacity: f64,
    /// Always `false`: the clone is presentation only and must not take
    /// part in hit testing.
    pub hit_testable: bool,
}

/// Backdrop dim opacity for a given zoom scale.
///
/// Follows `clamp((scale - 1) * dim, 0, dim)`: no dim at rest scale, rising
/// with the zoom and capped at `dim`.
///
/// ```rust
/// use loupe_overlay::backdrop_opacity;
///
/// assert_eq!(backdrop_opacity(1.0, 0.5), 0.0);
/// assert_eq!(backdrop_opacity(1.5, 0.5), 0.25);
/// assert_eq!(backdrop_opacity(10.0, 0.5), 0.5);
/// ```
#[must_use]
pub fn backdrop_opacity(scale: f64, dim: f64) -> f64 {
    ((scale - 1.0) * dim).clamp(0.0, dim.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::backdrop_opacity;

    #[test]
    fn backdrop_follows_scale_and_caps() {
        assert_eq!(backdrop_opacity(1.0, 0.5), 0.0);
        assert!((backdrop_opacity(1.2, 0.5) - 0.1).abs() < 1e-12);
        assert_eq!(backdrop_opacity(2.0, 0.5), 0.5);
        assert_eq!(backdrop_opacity(10.0, 0.5), 0.5);
    }

    #[test]
    fn backdrop_never_goes_negative() {
        // Scales below rest cannot occur upstream, but the formula itself
        // must still be well behaved.
        assert_eq!(backdrop_opacity(0.5, 0.5), 0.0);
    }

    #[test]
    fn backdrop_honors_custom_cap() {
        assert_eq!(backdrop_opacity(1.5, 0.8), 0.4);
        assert_eq!(backdrop_opacity(5.0, 0.8), 0.8);
        assert_eq!(backdrop_opacity(2.0, 0.0), 0.0);
    }
}
