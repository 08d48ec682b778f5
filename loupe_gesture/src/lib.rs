// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Gesture: headless two-finger pinch and pan recognition.
//!
//! [`GestureTracker`] consumes raw touch events (with host-supplied
//! timestamps) and emits a continuous stream of [`GestureSample`]s carrying
//! the gesture's scale factor, translation, touch count, and phase. It does
//! no rendering and owns no platform input hookup; hosts forward whatever
//! touch stream they have.
//!
//! Recognition rules:
//!
//! - A gesture begins when a second touch lands and ends when the last touch
//!   lifts (or the host cancels).
//! - Pinch: while the gesture is in its began/changed phases *and* the span
//!   ratio since gesture start exceeds 1, samples report `pinching = true`
//!   and the live scale. In every other case the reported scale is exactly 1;
//!   release always collapses the scale, with no inertial decay in this
//!   layer.
//! - Pan: samples carry the centroid translation since gesture start only
//!   while exactly two touches are down and the scale exceeds 1; otherwise
//!   the sample's translation is zero.
//! - Pinch and pan are recognized simultaneously; a single sample carries
//!   both, because users pinch and drag in one continuous motion.
//!
//! Degenerate input never produces non-finite math: a zero starting span
//! (coincident touches) yields a neutral scale of 1, and
//! [`GestureTracker::anchor_in`] falls back to the region midpoint when the
//! region has no area.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use loupe_gesture::GestureTracker;
//!
//! let mut tracker = GestureTracker::new();
//!
//! // First finger down: no gesture yet.
//! assert!(tracker.on_down(1, Point::new(0.0, 0.0), 0.0).is_none());
//!
//! // Second finger down: the gesture begins at scale 1.
//! let began = tracker.on_down(2, Point::new(100.0, 0.0), 0.01).unwrap();
//! assert_eq!(began.scale, 1.0);
//! assert!(!began.pinching);
//!
//! // Spreading the fingers doubles the span: scale 2, pinching.
//! let sample = tracker.on_move(2, Point::new(200.0, 0.0), 0.02).unwrap();
//! assert_eq!(sample.scale, 2.0);
//! assert!(sample.pinching);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod sample;
mod tracker;

pub use sample::{GesturePhase, GestureSample};
pub use tracker::GestureTracker;
