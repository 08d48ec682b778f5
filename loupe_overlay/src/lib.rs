// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Overlay: the detached full-screen rendition of a zoomed element.
//!
//! [`OverlayController`] is the single subscriber at the top of the
//! broadcast pipeline. It consumes `ZoomSnapshot`s and maintains everything
//! a host needs to draw the detached clone: an [`OverlayPlacement`] (which
//! content to clone, where, at what scale and opacity) and a dimming
//! backdrop whose strength follows the zoom scale.
//!
//! The controller carries its own easing rules, separate from the zoom
//! state machine that feeds it:
//!
//! - While the snapshot reports an active pinch, transform updates are
//!   applied instantaneously so the clone stays glued to the fingers.
//! - Once the pinch ends, transform updates ease through the controller's
//!   own springs.
//! - The clone's opacity crossfades with the snapshot's zoom flag, and the
//!   clone is released only after the flag has cleared *and* the fade-out
//!   has settled, one tick deferred, so the overlay never vanishes
//!   mid-flight.
//!
//! Placement is computed end to end from the element's measured frame; the
//! host injects viewport bounds explicitly via
//! [`OverlayController::set_viewport`], and nothing here consults an
//! ambient display singleton, so the controller is fully testable headless.
//!
//! The clone and the backdrop are presentation only: hosts should exclude
//! both from hit testing, as [`OverlayPlacement::hit_testable`] records.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Vec2};
//! use loupe_overlay::OverlayController;
//! use loupe_zoom::{ContentRef, ElementId, ZoomSnapshot};
//!
//! let mut overlay = OverlayController::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//!
//! // Nothing to draw until a zoomed snapshot arrives.
//! assert!(overlay.placement().is_none());
//!
//! let snap = ZoomSnapshot {
//!     offset: Vec2::ZERO,
//!     scale: 2.0,
//!     frame: Rect::new(100.0, 100.0, 300.0, 300.0),
//!     is_zoomed: true,
//!     is_pinching: true,
//!     content: Some(ContentRef::new(ElementId::new(1), 0)),
//! };
//! overlay.apply(&snap);
//!
//! let placement = overlay.placement().unwrap();
//! // The frame center stays put under the scale-about-center transform.
//! assert_eq!(placement.transform * Point::new(200.0, 200.0), Point::new(200.0, 200.0));
//! ```

#![no_std]

mod controller;
mod placement;

pub use controller::{OverlayController, OverlayDebugInfo, OverlayOptions};
pub use placement::{OverlayDelta, OverlayPlacement, backdrop_opacity};
