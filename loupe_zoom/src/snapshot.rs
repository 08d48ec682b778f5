// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Vec2};

/// Host-assigned identity of a zoomable element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Creates an element id from a host-chosen value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Opaque identity for the visual content an overlay must clone.
///
/// Compared by identity only, never deep-compared. A fresh serial is minted
/// each time an element's `is_zoomed` flag rises, so two zoom sessions of
/// the same element never share a ref, and the serial is scoped by element
/// so two different elements never alias either. Overlay hosts rebuild
/// their clone exactly when the ref changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContentRef {
    element: ElementId,
    serial: u64,
}

impl ContentRef {
    /// Creates a content ref. Hosts normally never construct one; refs are
    /// minted by the zoom state machine on zoom entry.
    #[must_use]
    pub const fn new(element: ElementId, serial: u64) -> Self {
        Self { element, serial }
    }

    /// The element this content belongs to.
    #[must_use]
    pub const fn element(self) -> ElementId {
        self.element
    }

    /// Monotonic serial within the element, bumped on every zoom entry.
    #[must_use]
    pub const fn serial(self) -> u64 {
        self.serial
    }
}

/// One element's complete zoom state, as broadcast to the overlay layer.
///
/// Snapshots are derived on demand and never stored independently; the
/// broadcast slot holds at most the latest one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSnapshot {
    /// Pan offset in global coordinates. Zero whenever `scale` is 1.
    pub offset: Vec2,
    /// Zoom scale. Never below 1.
    pub scale: f64,
    /// The element's measured rest frame, in global coordinates.
    pub frame: Rect,
    /// Raised from the first pinch tick until the return animation has
    /// settled and the settle has been delivered.
    pub is_zoomed: bool,
    /// `true` only while the gesture is live (transform updates must not
    /// be eased).
    pub is_pinching: bool,
    /// Identity of the content the overlay should clone. `Some` exactly
    /// while `is_zoomed` is raised.
    pub content: Option<ContentRef>,
}

impl ZoomSnapshot {
    /// A snapshot of an element at rest inside `frame`.
    #[must_use]
    pub const fn rest(frame: Rect) -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            frame,
            is_zoomed: false,
            is_pinching: false,
            content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::{ContentRef, ElementId, ZoomSnapshot};

    #[test]
    fn refs_compare_by_identity() {
        let a = ContentRef::new(ElementId::new(1), 0);
        let b = ContentRef::new(ElementId::new(1), 1);
        let c = ContentRef::new(ElementId::new(2), 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ContentRef::new(ElementId::new(1), 0));
    }

    #[test]
    fn rest_snapshot_is_inert() {
        let snap = ZoomSnapshot::rest(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(snap.scale, 1.0);
        assert!(!snap.is_zoomed);
        assert!(snap.content.is_none());
    }
}
