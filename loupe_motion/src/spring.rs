// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damped-spring animated scalar.

/// `f64::ceil` shim: the inherent method requires `std`, so forward to `libm`
/// in `no_std` builds that opt into the `libm` feature.
#[cfg(feature = "std")]
#[inline]
fn ceil(x: f64) -> f64 {
    x.ceil()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
#[inline]
fn ceil(x: f64) -> f64 {
    libm::ceil(x)
}

/// Default spring stiffness, tuned for a snappy return-to-rest.
const DEFAULT_STIFFNESS: f64 = 170.0;

/// Default damping. Together with [`DEFAULT_STIFFNESS`] this is close to
/// critically damped, so the value approaches its target without ringing.
const DEFAULT_DAMPING: f64 = 26.0;

/// Position tolerance under which the spring snaps onto its target.
const SETTLE_EPSILON: f64 = 1e-3;

/// Velocity tolerance under which the spring snaps onto its target.
const SETTLE_VELOCITY_EPSILON: f64 = 1e-2;

/// Integration substep ceiling, in seconds. Large host ticks are split so
/// the integrator stays stable.
const MAX_SUBSTEP: f64 = 0.004;

/// A damped-spring animated scalar driven by explicit host ticks.
///
/// The spring has two modes of motion:
///
/// - Eased: [`set_target`](Self::set_target) retargets the spring and
///   subsequent [`tick`](Self::tick) calls move the value toward it.
/// - Instantaneous: [`jump_to`](Self::jump_to) moves value and target
///   together with no easing, for phases that must track an input 1:1.
///
/// Once the value is within a small tolerance of the target (and nearly at
/// rest), it snaps *exactly* onto the target and the velocity zeroes. From
/// that point [`is_settled`](Self::is_settled) is true and `value() ==
/// target()` holds as a plain float comparison, which is what settle
/// detection keys on.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    value: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
}

impl Spring {
    /// Creates a spring at rest at `value`, with default stiffness/damping.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
        }
    }

    /// Creates a spring at rest at `value` with explicit stiffness/damping.
    ///
    /// Non-positive parameters are replaced by the defaults.
    #[must_use]
    pub fn with_params(value: f64, stiffness: f64, damping: f64) -> Self {
        let mut spring = Self::new(value);
        if stiffness > 0.0 {
            spring.stiffness = stiffness;
        }
        if damping > 0.0 {
            spring.damping = damping;
        }
        spring
    }

    /// Current interpolated value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity, in value units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns `true` once the value sits exactly on the target, at rest.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Retargets the spring; motion eases from the current value.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Retargets the spring and seeds it with an initial velocity.
    ///
    /// Used to carry a gesture's release velocity into the return motion.
    pub fn set_target_with_velocity(&mut self, target: f64, velocity: f64) {
        self.target = target;
        self.velocity = velocity;
    }

    /// Moves value and target together with no easing.
    pub fn jump_to(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Advances the spring by `dt` seconds and returns the new value.
    ///
    /// Non-positive `dt` leaves the spring untouched. The integration runs
    /// in bounded substeps, so a single large host tick cannot destabilize
    /// the motion.
    pub fn tick(&mut self, dt: f64) -> f64 {
        if dt <= 0.0 || self.is_settled() {
            return self.value;
        }

        let steps = ceil(dt / MAX_SUBSTEP).clamp(1.0, 4096.0);
        let h = dt / steps;
        #[expect(clippy::cast_possible_truncation, reason = "steps is clamped to [1, 4096]")]
        let mut remaining = steps as u32;
        while remaining > 0 {
            let accel = self.stiffness * (self.target - self.value) - self.damping * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= 1;
        }

        if (self.value - self.target).abs() < SETTLE_EPSILON
            && self.velocity.abs() < SETTLE_VELOCITY_EPSILON
        {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::Spring;

    const DT: f64 = 1.0 / 60.0;

    fn run_until_settled(spring: &mut Spring, max_ticks: u32) -> u32 {
        for n in 0..max_ticks {
            if spring.is_settled() {
                return n;
            }
            spring.tick(DT);
        }
        max_ticks
    }

    #[test]
    fn new_spring_is_settled() {
        let spring = Spring::new(1.0);
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 1.0);
        assert_eq!(spring.target(), 1.0);
    }

    #[test]
    fn converges_and_snaps_exactly() {
        let mut spring = Spring::new(2.0);
        spring.set_target(1.0);
        assert!(!spring.is_settled());

        let ticks = run_until_settled(&mut spring, 600);
        assert!(ticks < 600, "spring failed to settle");
        assert_eq!(spring.value(), 1.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn moves_toward_target_monotonically_enough() {
        let mut spring = Spring::new(0.0);
        spring.set_target(10.0);

        let before = spring.value();
        spring.tick(DT);
        assert!(spring.value() > before);
    }

    #[test]
    fn jump_bypasses_easing() {
        let mut spring = Spring::new(1.0);
        spring.jump_to(3.5);
        assert_eq!(spring.value(), 3.5);
        assert_eq!(spring.target(), 3.5);
        assert!(spring.is_settled());
    }

    #[test]
    fn retarget_unsettles() {
        let mut spring = Spring::new(1.0);
        run_until_settled(&mut spring, 10);
        spring.set_target(2.0);
        assert!(!spring.is_settled());
        run_until_settled(&mut spring, 600);
        assert_eq!(spring.value(), 2.0);
    }

    #[test]
    fn seeded_velocity_moves_the_value_immediately() {
        let mut spring = Spring::new(2.0);
        spring.set_target_with_velocity(1.0, -5.0);
        spring.tick(DT);
        assert!(spring.value() < 2.0);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut spring = Spring::new(2.0);
        spring.set_target(1.0);
        let v = spring.tick(0.0);
        assert_eq!(v, 2.0);
    }

    #[test]
    fn large_tick_stays_stable() {
        let mut spring = Spring::new(2.0);
        spring.set_target(1.0);
        // A whole second in one tick: must not diverge past the start value.
        spring.tick(1.0);
        assert!(spring.value().is_finite());
        assert!(spring.value() <= 2.0 + 1e-6);
        run_until_settled(&mut spring, 600);
        assert_eq!(spring.value(), 1.0);
    }
}
