// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Zoom: the per-element pinch-zoom state machine.
//!
//! [`ZoomState`] folds the gesture sample stream from `loupe_gesture` into
//! one element's zoom lifecycle: scale, pan offset, the measured rest frame,
//! and the visibility flags the overlay keys on. Its central concern is
//! *timing*: zoom entry is instantaneous, zoom exit is debounced behind the
//! return animation's settlement, and the in-place content's reveal is held
//! back a little longer still, so the user never sees the undersized
//! original flash underneath the overlay.
//!
//! The machine has four phases:
//!
//! - `Rest`: scale 1, offset zero, nothing zoomed.
//! - `Pinching`: the gesture is live. Scale and offset track the fingers
//!   1:1 with no easing, and `is_zoomed` is raised in the same tick the
//!   pinch starts.
//! - `Returning`: the gesture ended. Scale and offset spring back toward
//!   rest, seeded with the release velocity; `is_zoomed` stays raised.
//! - `ZoomedSettling`: the scale has numerically reached 1 and the settle
//!   has been recorded, but its delivery is deferred one tick (see
//!   `loupe_motion`), so `is_zoomed` is still raised for this one tick.
//!   Delivery drops the machine back to `Rest`, clears `is_zoomed`, and
//!   starts the reveal delay.
//!
//! Every change is exported as a [`ZoomSnapshot`], the sole payload that
//! crosses the broadcast boundary to the overlay layer. Snapshots carry a
//! [`ContentRef`] while zoomed; a fresh one is minted each time `is_zoomed`
//! rises, so overlay hosts rebuild their visual clone only on actual
//! (re)entry, never on a transform tick.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Vec2};
//! use loupe_gesture::{GesturePhase, GestureSample};
//! use loupe_zoom::{ElementId, ZoomState};
//!
//! let mut zoom = ZoomState::new(ElementId::new(1));
//! zoom.set_frame(Rect::new(100.0, 100.0, 300.0, 300.0));
//!
//! // A pinch sample arrives: zoom entry is immediate.
//! zoom.apply(&GestureSample {
//!     scale: 1.5,
//!     translation: Vec2::ZERO,
//!     touch_count: 2,
//!     phase: GesturePhase::Changed,
//!     pinching: true,
//!     scale_velocity: 0.0,
//! });
//! let snap = zoom.snapshot();
//! assert!(snap.is_zoomed);
//! assert_eq!(snap.scale, 1.5);
//! assert!(snap.content.is_some());
//! ```

#![no_std]

mod snapshot;
mod state;

pub use snapshot::{ContentRef, ElementId, ZoomSnapshot};
pub use state::{ZoomDebugInfo, ZoomOptions, ZoomPhase, ZoomState};
