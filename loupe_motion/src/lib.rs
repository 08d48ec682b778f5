// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Motion: animated scalar and settle-detection primitives.
//!
//! This crate provides the two motion building blocks the zoom pipeline is
//! sequenced with:
//!
//! - [`Spring`]: a damped-spring animated scalar driven by explicit
//!   `tick(dt)` calls from the host. It supports both eased motion toward a
//!   target and instantaneous jumps for gesture-tracking phases, and it snaps
//!   exactly onto its target once within a settle tolerance so that
//!   "numerically settled" is a well-defined, testable instant.
//! - [`SettleDetector`]: observes an animated scalar from inside the
//!   interpolation tick and records, but never delivers, a completion when
//!   the value reaches its target. Delivery happens through
//!   [`take_completion`](SettleDetector::take_completion), which the host
//!   calls at the start of the *next* tick. That one-tick deferral keeps the
//!   completion outside the interpolation call stack, so a completion handler
//!   can never mutate state the interpolation is still reading.
//!
//! Neither type owns a clock or a task queue; the host's update loop is the
//! scheduler.
//!
//! ## Minimal example
//!
//! ```rust
//! use loupe_motion::{Spring, SettleDetector};
//!
//! let mut spring = Spring::new(2.0);
//! let mut settle = SettleDetector::new(1.0);
//! spring.set_target(1.0);
//!
//! let dt = 1.0 / 60.0;
//! let mut done = false;
//! for _ in 0..600 {
//!     // Start of tick: deliver any completion recorded on a previous tick.
//!     if settle.take_completion() {
//!         done = true;
//!         break;
//!     }
//!     spring.tick(dt);
//!     settle.observe(spring.value());
//! }
//! assert!(done);
//! assert_eq!(spring.value(), 1.0);
//! ```
//!
//! This crate is `no_std`.

#![cfg_attr(not(feature = "std"), no_std)]

mod settle;
mod spring;

pub use settle::SettleDetector;
pub use spring::Spring;
