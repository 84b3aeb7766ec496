// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damped spring parameters and integration.

/// Largest integration step. Frames longer than this are sub-stepped so stiff
/// springs stay stable at low frame rates.
const MAX_SUBSTEP_SECS: f64 = 1.0 / 240.0;

/// Upper bound on the time advanced in one frame. A host that stalls for
/// seconds resumes the animation instead of teleporting or exploding.
pub(crate) const MAX_FRAME_SECS: f64 = 0.25;

/// Physical parameters of a damped spring.
///
/// Units are those of the animated value (typically density-independent
/// pixels) and seconds. `damping` is the viscous coefficient `c` in
/// `m·a = −k·x − c·v`, not a ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Spring constant `k`.
    pub stiffness: f64,
    /// Viscous damping coefficient `c`.
    pub damping: f64,
    /// Mass `m`.
    pub mass: f64,
    /// The spring is at rest once `|value − target|` is at most this.
    pub rest_displacement: f64,
    /// The spring is at rest once `|velocity|` is at most this (units/s).
    pub rest_speed: f64,
}

impl SpringConfig {
    /// Sheet entry: a lightly bouncy spring (`bounciness: 4, speed: 12` on
    /// the React Native animation driver).
    pub const SHEET: Self = Self::new(340.0, 30.0);

    /// Sheet snap-back after a cancelled drag on screens that use the driver
    /// defaults (`bounciness: 8`): visibly bouncier than [`SHEET`](Self::SHEET).
    pub const SNAP_BACK: Self = Self::new(340.0, 20.0);

    /// Tab-bar highlight: `damping: 15, stiffness: 200`.
    pub const TAB_INDICATOR: Self = Self::new(200.0, 15.0);

    /// Creates a unit-mass spring with default rest thresholds.
    #[must_use]
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
            rest_displacement: 0.01,
            rest_speed: 2.0,
        }
    }

    /// Returns a copy with the given mass.
    #[must_use]
    pub const fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Returns a copy with the given rest thresholds.
    #[must_use]
    pub const fn with_rest(mut self, displacement: f64, speed: f64) -> Self {
        self.rest_displacement = displacement;
        self.rest_speed = speed;
        self
    }

    /// Whether a spring at `value` moving at `velocity` counts as settled on
    /// `target`.
    #[must_use]
    pub fn is_at_rest(&self, value: f64, velocity: f64, target: f64) -> bool {
        (value - target).abs() <= self.rest_displacement && velocity.abs() <= self.rest_speed
    }

    /// Advances `(value, velocity)` toward `target` by `dt` seconds.
    ///
    /// Uses semi-implicit Euler in sub-steps of at most 1/240 s. Degenerate
    /// parameters (non-positive stiffness or mass) snap to the target.
    /// Returns `true` once the spring is at rest; the caller should then pin
    /// the value to the target.
    pub fn step(&self, value: &mut f64, velocity: &mut f64, target: f64, dt: f64) -> bool {
        if !(self.stiffness > 0.0 && self.mass > 0.0) {
            *value = target;
            *velocity = 0.0;
            return true;
        }

        let mut remaining = dt.clamp(0.0, MAX_FRAME_SECS);
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP_SECS);
            let displacement = *value - target;
            let accel = (-self.stiffness * displacement - self.damping * *velocity) / self.mass;
            *velocity += accel * h;
            *value += *velocity * h;
            remaining -= h;
        }

        self.is_at_rest(*value, *velocity, target)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::SHEET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(config: &SpringConfig, from: f64, target: f64, frames: usize) -> (f64, f64, bool) {
        let mut value = from;
        let mut velocity = 0.0;
        let mut rested = false;
        for _ in 0..frames {
            rested = config.step(&mut value, &mut velocity, target, 1.0 / 60.0);
            if rested {
                break;
            }
        }
        (value, velocity, rested)
    }

    #[test]
    fn sheet_spring_settles_within_two_seconds() {
        let (value, _, rested) = run(&SpringConfig::SHEET, 800.0, 0.0, 120);
        assert!(rested, "sheet spring still moving after 2s");
        assert!(value.abs() <= 0.01, "settled at {value}");
    }

    #[test]
    fn tab_indicator_overshoots_but_settles() {
        let config = SpringConfig::TAB_INDICATOR;
        let mut value = 100.0;
        let mut velocity = 0.0;
        let mut peak = value;
        let mut frames = 0;
        while !config.step(&mut value, &mut velocity, 180.0, 1.0 / 60.0) {
            peak = peak.max(value);
            frames += 1;
            assert!(frames < 300, "indicator spring did not settle");
        }
        assert!(peak > 180.0, "damping 15 / stiffness 200 is underdamped");
        assert!(peak < 200.0, "overshoot too large: {peak}");
    }

    #[test]
    fn long_frame_is_clamped_and_stable() {
        let config = SpringConfig::SHEET;
        let mut value = 800.0;
        let mut velocity = 0.0;
        config.step(&mut value, &mut velocity, 0.0, 10.0);
        assert!(value.is_finite() && velocity.is_finite(), "integrator blew up");
        assert!(value.abs() < 800.0, "no progress after a stalled frame");
    }

    #[test]
    fn degenerate_spring_snaps() {
        let config = SpringConfig::new(0.0, 10.0);
        let mut value = 5.0;
        let mut velocity = 3.0;
        assert!(config.step(&mut value, &mut velocity, 42.0, 0.016));
        assert_eq!(value, 42.0);
        assert_eq!(velocity, 0.0);
    }

    #[test]
    fn zero_dt_reports_rest_only_when_resting() {
        let config = SpringConfig::TAB_INDICATOR;
        let mut value = 10.0;
        let mut velocity = 0.0;
        assert!(!config.step(&mut value, &mut velocity, 20.0, 0.0));
        assert!(config.step(&mut value, &mut velocity, 10.0, 0.0));
    }
}
