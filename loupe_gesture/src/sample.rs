// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;

/// Lifecycle phase of a two-finger gesture, as seen by one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// The second touch just landed; the gesture is starting at scale 1.
    Began,
    /// The gesture is in progress and its state changed.
    Changed,
    /// The last touch lifted; scale has collapsed back to 1.
    Ended,
    /// The host cancelled the gesture; all state is discarded.
    Cancelled,
}

/// One observation of an in-flight two-finger gesture.
///
/// Samples are produced continuously while a gesture is active and are not
/// persisted anywhere; consumers fold them into their own state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    /// Span ratio relative to gesture start. Always `>= 1`: pinch-in below
    /// the starting span and gesture release both report exactly 1.
    pub scale: f64,
    /// Centroid translation since gesture start. Zero unless exactly two
    /// touches are down and `scale > 1`.
    pub translation: Vec2,
    /// Number of touches currently tracked (0, 1, or 2).
    pub touch_count: usize,
    /// Phase of the gesture this sample was observed in.
    pub phase: GesturePhase,
    /// `true` while the gesture is active and the span ratio exceeds 1.
    pub pinching: bool,
    /// Rate of change of `scale`, in units per second. On an `Ended` sample
    /// this is the release velocity (the last rate observed before the
    /// fingers lifted); zero when it cannot be computed.
    pub scale_velocity: f64,
}
