// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-duration animations.

use crate::time::{Duration, HostTime};

/// Timing curve for a [`Tween`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Cubic ease-out: fast start, smooth deceleration. Used for sheet exits.
    #[default]
    EaseOutCubic,
    /// Quadratic ease-in-out. Used for opacity fades.
    EaseInOutQuad,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv / 2.0
                }
            }
        }
    }
}

/// Interpolates from one value to another over a fixed span of host time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Value at `start`.
    pub from: f64,
    /// Value at `start + duration`.
    pub to: f64,
    /// When the tween began.
    pub start: HostTime,
    /// Total length.
    pub duration: Duration,
    /// Timing curve.
    pub easing: Easing,
}

impl Tween {
    /// Linear progress in `[0, 1]` at `now`. A zero-length tween is complete
    /// immediately.
    #[must_use]
    pub fn progress(&self, now: HostTime) -> f64 {
        if self.duration.ticks() == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.ticks() as f64 / self.duration.ticks() as f64).min(1.0)
    }

    /// Value at `now`.
    #[must_use]
    pub fn sample(&self, now: HostTime) -> f64 {
        let eased = self.easing.apply(self.progress(now));
        self.from + (self.to - self.from) * eased
    }

    /// Whether the tween has run its full duration at `now`.
    #[must_use]
    pub fn is_finished(&self, now: HostTime) -> bool {
        self.progress(now) >= 1.0
    }
}
