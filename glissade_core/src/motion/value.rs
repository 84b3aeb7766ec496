// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scalar driven by at most one animation at a time.

use super::spring::{MAX_FRAME_SECS, SpringConfig};
use super::tween::{Easing, Tween};
use crate::time::{Duration, HostTime, Timebase};

/// What is currently moving an [`AnimatedValue`].
#[derive(Clone, Copy, Debug, PartialEq)]
enum Driver {
    Idle,
    Spring { config: SpringConfig, target: f64 },
    Tween(Tween),
}

/// Result of [`AnimatedValue::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Progress {
    /// Nothing was animating.
    Idle,
    /// An animation is still in flight.
    Running,
    /// The animation completed on this call. Reported exactly once per
    /// animation; later calls return [`Idle`](Self::Idle).
    Settled,
}

/// A scalar with a current value, a current velocity, and an optional
/// animation driving it.
///
/// Starting a new animation never resets the value: springs continue from the
/// current value and velocity, tweens start from the current value. This makes
/// retargeting smooth when a host re-issues `open`/`close`/`select` before the
/// previous animation settles.
#[derive(Clone, Copy, Debug)]
pub struct AnimatedValue {
    value: f64,
    velocity: f64,
    driver: Driver,
    last: HostTime,
    timebase: Timebase,
}

impl AnimatedValue {
    /// Creates a resting value.
    #[must_use]
    pub const fn new(value: f64, timebase: Timebase) -> Self {
        Self {
            value,
            velocity: 0.0,
            driver: Driver::Idle,
            last: HostTime(0),
            timebase,
        }
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity in units per second.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Where the value is headed: the animation target, or the current value
    /// when idle.
    #[must_use]
    pub const fn target(&self) -> f64 {
        match self.driver {
            Driver::Idle => self.value,
            Driver::Spring { target, .. } => target,
            Driver::Tween(tween) => tween.to,
        }
    }

    /// Timebase used to interpret timestamps.
    #[must_use]
    pub const fn timebase(&self) -> Timebase {
        self.timebase
    }

    /// Whether an animation is in flight.
    #[inline]
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        !matches!(self.driver, Driver::Idle)
    }

    /// Jumps to `value`, cancelling any animation and zeroing velocity.
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.velocity = 0.0;
        self.driver = Driver::Idle;
    }

    /// Springs toward `target` from the current value and velocity.
    pub fn spring_to(&mut self, target: f64, config: SpringConfig, now: HostTime) {
        self.driver = Driver::Spring { config, target };
        self.last = now;
    }

    /// Tweens from the current value to `target` over `duration`.
    pub fn tween_to(&mut self, target: f64, duration: Duration, easing: Easing, now: HostTime) {
        self.driver = Driver::Tween(Tween {
            from: self.value,
            to: target,
            start: now,
            duration,
            easing,
        });
        self.last = now;
    }

    /// Advances the animation to `now`.
    ///
    /// Timestamps older than the previous call are treated as "no time has
    /// passed".
    pub fn advance(&mut self, now: HostTime) -> Progress {
        let dt = now
            .saturating_duration_since(self.last)
            .as_secs_f64(self.timebase)
            .min(MAX_FRAME_SECS);
        if now > self.last {
            self.last = now;
        }

        match self.driver {
            Driver::Idle => Progress::Idle,
            Driver::Spring { config, target } => {
                if config.step(&mut self.value, &mut self.velocity, target, dt) {
                    self.set(target);
                    Progress::Settled
                } else {
                    Progress::Running
                }
            }
            Driver::Tween(tween) => {
                if tween.is_finished(now) {
                    self.set(tween.to);
                    return Progress::Settled;
                }
                let next = tween.sample(now);
                if dt > 0.0 {
                    self.velocity = (next - self.value) / dt;
                }
                self.value = next;
                Progress::Running
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: u64 = 16_666_667;

    #[test]
    fn spring_settles_once() {
        let mut v = AnimatedValue::new(0.0, Timebase::NANOS);
        v.spring_to(100.0, SpringConfig::TAB_INDICATOR, HostTime(0));

        let mut settled = 0;
        let mut t = 0;
        for _ in 0..600 {
            t += FRAME;
            if v.advance(HostTime(t)) == Progress::Settled {
                settled += 1;
            }
        }
        assert_eq!(settled, 1, "settled must be reported exactly once");
        assert_eq!(v.value(), 100.0);
        assert!(!v.is_animating());
    }

    #[test]
    fn retarget_keeps_value_and_velocity() {
        let mut v = AnimatedValue::new(0.0, Timebase::NANOS);
        v.spring_to(100.0, SpringConfig::TAB_INDICATOR, HostTime(0));
        v.advance(HostTime(5 * FRAME));
        let (value, velocity) = (v.value(), v.velocity());
        assert!(value > 0.0 && velocity > 0.0, "spring should be moving");

        v.spring_to(-50.0, SpringConfig::TAB_INDICATOR, HostTime(5 * FRAME));
        assert_eq!(v.value(), value, "retarget must not jump");
        assert_eq!(v.velocity(), velocity, "retarget must keep momentum");
        assert_eq!(v.target(), -50.0);
    }

    #[test]
    fn tween_reaches_target_at_duration() {
        let mut v = AnimatedValue::new(0.0, Timebase::MILLIS);
        v.tween_to(800.0, Duration(250), Easing::EaseOutCubic, HostTime(1_000));
        assert_eq!(v.advance(HostTime(1_100)), Progress::Running);
        assert!(v.value() > 0.0 && v.value() < 800.0);
        assert!(v.velocity() > 0.0);
        assert_eq!(v.advance(HostTime(1_250)), Progress::Settled);
        assert_eq!(v.value(), 800.0);
        assert_eq!(v.advance(HostTime(1_300)), Progress::Idle);
    }

    #[test]
    fn set_cancels_animation() {
        let mut v = AnimatedValue::new(0.0, Timebase::NANOS);
        v.tween_to(1.0, Duration(FRAME * 10), Easing::Linear, HostTime(0));
        v.set(0.5);
        assert!(!v.is_animating());
        assert_eq!(v.advance(HostTime(FRAME)), Progress::Idle);
        assert_eq!(v.value(), 0.5);
    }

    #[test]
    fn stale_timestamp_does_not_rewind() {
        let mut v = AnimatedValue::new(0.0, Timebase::NANOS);
        v.spring_to(100.0, SpringConfig::SHEET, HostTime(10 * FRAME));
        v.advance(HostTime(12 * FRAME));
        let value = v.value();
        v.advance(HostTime(11 * FRAME));
        assert_eq!(v.value(), value, "older frame must not move the value");
    }
}
