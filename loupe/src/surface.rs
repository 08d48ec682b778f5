// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use loupe_channel::Slot;
use loupe_overlay::{OverlayController, OverlayOptions};
use loupe_zoom::{ElementId, ZoomOptions, ZoomSnapshot};

use crate::zoomable::Zoomable;

/// The root container hosting the overlay for a tree of zoomable elements.
///
/// Create exactly one per visual tree. The surface owns the broadcast
/// [`Slot`] and the [`OverlayController`] (store lifecycle belongs to the
/// container, never to a global), keeps a registry of mounted elements,
/// and runs the synchronous update pass: tick every element, publish
/// changed snapshots, poll the slot, drive the overlay. Everything a frame
/// needs is applied before [`update`](Self::update) returns.
///
/// Touch events for unmounted elements are ignored; like every degenerate
/// condition in this layer, it degrades silently.
#[derive(Clone, Debug)]
pub struct ZoomSurface {
    elements: HashMap<ElementId, Zoomable>,
    channel: Slot<ZoomSnapshot>,
    overlay: OverlayController,
}

impl ZoomSurface {
    /// Creates a surface rendering its overlay into `viewport`.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        Self::with_options(viewport, OverlayOptions::default())
    }

    /// Creates a surface with explicit overlay presentation options.
    #[must_use]
    pub fn with_options(viewport: Rect, options: OverlayOptions) -> Self {
        Self {
            elements: HashMap::new(),
            channel: Slot::new(),
            overlay: OverlayController::with_options(viewport, options),
        }
    }

    /// Injects new viewport bounds (window resize, safe-area change).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.overlay.set_viewport(viewport);
    }

    /// Enables interactive zoom for `element`. Remounting an element
    /// replaces its state with a fresh one at rest.
    pub fn mount(&mut self, element: ElementId) {
        self.elements.insert(element, Zoomable::new(element));
    }

    /// Like [`mount`](Self::mount), with explicit timing options.
    pub fn mount_with_options(&mut self, element: ElementId, options: ZoomOptions) {
        self.elements
            .insert(element, Zoomable::with_options(element, options));
    }

    /// Disables interactive zoom for `element`, resetting it to rest.
    ///
    /// If the unmounted element owns the snapshot live on the channel, its
    /// rest snapshot is published so the overlay fades out instead of
    /// holding a stale clone.
    pub fn unmount(&mut self, element: ElementId) {
        let Some(mut zoomable) = self.elements.remove(&element) else {
            return;
        };
        let owns_live = self
            .channel
            .latest()
            .and_then(|snap| snap.content)
            .is_some_and(|content| content.element() == element);
        if owns_live {
            zoomable.reset();
            self.channel.publish(zoomable.snapshot());
        }
    }

    /// Returns `true` if `element` is currently mounted.
    #[must_use]
    pub fn is_mounted(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    /// Borrows a mounted element's decorator.
    #[must_use]
    pub fn element(&self, element: ElementId) -> Option<&Zoomable> {
        self.elements.get(&element)
    }

    /// Mutably borrows a mounted element's decorator.
    #[must_use]
    pub fn element_mut(&mut self, element: ElementId) -> Option<&mut Zoomable> {
        self.elements.get_mut(&element)
    }

    /// Records a mounted element's rest frame from the layout pass.
    pub fn set_frame(&mut self, element: ElementId, frame: Rect) {
        if let Some(zoomable) = self.elements.get_mut(&element) {
            zoomable.set_frame(frame);
        }
    }

    /// Routes a touch landing on a mounted element.
    pub fn touch_down(&mut self, element: ElementId, touch: u64, pos: Point, t: f64) {
        if let Some(zoomable) = self.elements.get_mut(&element) {
            zoomable.on_touch_down(touch, pos, t);
        }
    }

    /// Routes a touch moving on a mounted element.
    pub fn touch_move(&mut self, element: ElementId, touch: u64, pos: Point, t: f64) {
        if let Some(zoomable) = self.elements.get_mut(&element) {
            zoomable.on_touch_move(touch, pos, t);
        }
    }

    /// Routes a touch lifting off a mounted element.
    pub fn touch_up(&mut self, element: ElementId, touch: u64, t: f64) {
        if let Some(zoomable) = self.elements.get_mut(&element) {
            zoomable.on_touch_up(touch, t);
        }
    }

    /// Routes a gesture cancellation to a mounted element.
    pub fn touch_cancel(&mut self, element: ElementId, t: f64) {
        if let Some(zoomable) = self.elements.get_mut(&element) {
            zoomable.on_touch_cancel(t);
        }
    }

    /// Opacity the host should apply to an element's in-place content.
    /// Unmounted elements are fully visible.
    #[must_use]
    pub fn content_opacity(&self, element: ElementId) -> f64 {
        self.elements
            .get(&element)
            .map_or(1.0, Zoomable::content_opacity)
    }

    /// Runs one synchronous update pass of `dt` seconds.
    ///
    /// Ticks every element, publishes every changed snapshot (last write
    /// wins when several elements changed), polls the slot, applies the
    /// result to the overlay, and advances the overlay's own motion.
    /// Returns `true` if anything visible changed.
    pub fn update(&mut self, dt: f64) -> bool {
        let mut changed = false;
        for zoomable in self.elements.values_mut() {
            if zoomable.tick(dt) {
                self.channel.publish(zoomable.snapshot());
                changed = true;
            }
        }
        if let Some(snap) = self.channel.poll() {
            self.overlay.apply(snap);
        }
        changed |= self.overlay.tick(dt);
        changed
    }

    /// The overlay controller, for rendering the clone and backdrop.
    #[must_use]
    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    /// The broadcast slot, for inspection.
    #[must_use]
    pub fn channel(&self) -> &Slot<ZoomSnapshot> {
        &self.channel
    }
}
