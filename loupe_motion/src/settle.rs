// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot settle detection for an animated scalar.
//!
//! ## Usage
//!
//! 1) Arm the detector with the animation's target value.
//! 2) From inside every interpolation tick, call
//!    [`SettleDetector::observe`] with the current interpolated value.
//! 3) At the *start* of each tick, call
//!    [`SettleDetector::take_completion`]; it returns `true` exactly once
//!    per settle, one tick after the value reached the target.
//! 4) Assigning a new target with [`SettleDetector::rearm`] arms a fresh
//!    completion event.
//!
//! Splitting the settle instant (recorded by `observe`) from its delivery
//! (returned by `take_completion`) keeps completion handling out of the
//! interpolation call stack entirely: whatever the host does in response can
//! freely mutate the animated state, because the interpolation that produced
//! the settle has already finished.

/// Fires a completion exactly once when an observed scalar settles on its
/// target, delivered one tick after the settle is observed.
#[derive(Clone, Copy, Debug)]
pub struct SettleDetector {
    target: f64,
    pending: bool,
    fired: bool,
}

impl SettleDetector {
    /// Creates a detector armed for `target`.
    #[must_use]
    pub fn new(target: f64) -> Self {
        Self {
            target,
            pending: false,
            fired: false,
        }
    }

    /// The value the observed scalar must reach.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns `true` while the detector can still record a completion.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        !self.fired
    }

    /// Returns `true` if a settle has been observed but not yet delivered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records a settle if `current` is numerically equal to the target.
    ///
    /// Safe to call from inside the interpolation tick: this never invokes
    /// anything, it only records. Repeated observations of a settled value
    /// do not queue additional completions.
    pub fn observe(&mut self, current: f64) {
        if !self.fired && !self.pending && current == self.target {
            self.pending = true;
        }
    }

    /// Delivers a recorded completion, exactly once per arming.
    ///
    /// Hosts call this at the start of a tick, before any interpolation
    /// runs, so delivery is always one tick after the observation.
    pub fn take_completion(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            self.fired = true;
            true
        } else {
            false
        }
    }

    /// Re-arms the detector for a new target, discarding any pending or
    /// already-fired completion state.
    pub fn rearm(&mut self, target: f64) {
        self.target = target;
        self.pending = false;
        self.fired = false;
    }
}
