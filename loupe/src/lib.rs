// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe: interactive pinch-zoom for any visual element.
//!
//! This crate is the retained layer over the Loupe kernels. It exposes the
//! two operations a host application wires in:
//!
//! - [`Zoomable`]: the decorator. Wrap any element's touch input and layout
//!   frame in one of these and it gains pinch-zoom and two-finger pan
//!   beyond its layout bounds.
//! - [`ZoomSurface`]: the container. Create exactly one at the root of the
//!   visual tree; it owns the broadcast slot and the overlay controller,
//!   and runs the synchronous update pass that carries each zoomed
//!   element's state up to the single full-screen overlay.
//!
//! The two sides never hold references to each other. A [`Zoomable`] deep
//! in the tree publishes `ZoomSnapshot`s into the surface's single-slot
//! channel; the surface polls the slot once per pass and drives the
//! overlay from whatever it finds there. Omitting the surface degrades
//! silently: a standalone [`Zoomable`] still tracks its gesture state, it
//! just never produces a visible overlay.
//!
//! Everything runs on the host's single update thread. Within one call to
//! [`ZoomSurface::update`], the full sequence
//! gesture → state → snapshot → broadcast → overlay is applied, so the
//! hidden original and the overlay clone can never tear against each other
//! across a frame.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use loupe::{ElementId, ZoomSurface};
//!
//! let photo = ElementId::new(1);
//! let mut surface = ZoomSurface::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! surface.mount(photo);
//! surface.set_frame(photo, Rect::new(100.0, 100.0, 300.0, 300.0));
//!
//! // Two fingers land and spread.
//! surface.touch_down(photo, 1, Point::new(150.0, 200.0), 0.00);
//! surface.touch_down(photo, 2, Point::new(250.0, 200.0), 0.01);
//! surface.touch_move(photo, 2, Point::new(350.0, 200.0), 0.02);
//!
//! // One update pass later the overlay is live.
//! surface.update(1.0 / 60.0);
//! assert!(surface.overlay().placement().is_some());
//! ```

#![no_std]

mod surface;
mod zoomable;

pub use surface::ZoomSurface;
pub use zoomable::Zoomable;

pub use loupe_channel::Slot;
pub use loupe_gesture::{GesturePhase, GestureSample, GestureTracker};
pub use loupe_motion::{SettleDetector, Spring};
pub use loupe_overlay::{
    OverlayController, OverlayDelta, OverlayOptions, OverlayPlacement, backdrop_opacity,
};
pub use loupe_zoom::{
    ContentRef, ElementId, ZoomOptions, ZoomPhase, ZoomSnapshot, ZoomState,
};
