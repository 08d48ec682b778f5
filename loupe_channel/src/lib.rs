// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Channel: a single-slot, last-write-wins broadcast slot.
//!
//! [`Slot`] carries one value from any number of publishers to exactly one
//! subscriber, with no direct relationship between the two sides. It is the
//! mechanism that lets a deeply nested element hand its state to a top-level
//! renderer: publishers overwrite the slot during the host's update pass, and
//! the subscriber polls it once per pass, before the next render.
//!
//! The merge policy among concurrent publishers is last-write-wins and
//! nothing else: no ordering, no priority. When two sources publish within
//! the same pass, the later write is the one the subscriber sees; the earlier
//! write is dropped. [`Slot::publish`] reports the drop so hosts can observe
//! it, but it is not an error.
//!
//! The slot is a plain value. Ownership of its lifecycle belongs to whichever
//! container creates it; there is no global instance.
//!
//! ## Minimal example
//!
//! ```rust
//! use loupe_channel::Slot;
//!
//! let mut slot: Slot<u32> = Slot::new();
//!
//! // Two sources publish during the same update pass.
//! slot.publish(1);
//! let clobbered = slot.publish(2);
//! assert!(clobbered); // the write of 1 was never seen
//!
//! // The single subscriber polls once per pass and sees the latest write.
//! assert_eq!(slot.poll(), Some(&2));
//!
//! // Nothing new until the next publish.
//! assert_eq!(slot.poll(), None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

/// A single-slot broadcast: many publishers, one subscriber, last write wins.
///
/// Delivery is synchronous with the host's update pass. A publish is visible
/// to the subscriber on its next [`poll`](Slot::poll); the host is expected
/// to poll after all publishers have run and before rendering.
#[derive(Clone, Debug)]
pub struct Slot<T> {
    value: Option<T>,
    writes: u64,
    seen: u64,
}

impl<T> Slot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: None,
            writes: 0,
            seen: 0,
        }
    }

    /// Publishes a value, unconditionally replacing the current one.
    ///
    /// Returns `true` if this write replaced a value the subscriber had not
    /// yet polled. That is the observable face of the last-write-wins merge
    /// policy when several sources publish in one pass; it is not an error.
    pub fn publish(&mut self, value: T) -> bool {
        let clobbered = self.writes > self.seen;
        self.value = Some(value);
        self.writes += 1;
        clobbered
    }

    /// Returns the latest published value without consuming it.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the latest value if it has not been polled yet.
    ///
    /// Each write is observed at most once; polling again without an
    /// intervening publish returns `None`.
    pub fn poll(&mut self) -> Option<&T> {
        if self.writes > self.seen {
            self.seen = self.writes;
            self.value.as_ref()
        } else {
            None
        }
    }

    /// Returns `true` if a write is waiting to be polled.
    #[must_use]
    pub fn has_unseen(&self) -> bool {
        self.writes > self.seen
    }

    /// Empties the slot and discards any unpolled write.
    pub fn clear(&mut self) {
        self.value = None;
        self.seen = self.writes;
    }

    /// Total number of publishes over the slot's lifetime.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}
