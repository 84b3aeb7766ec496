// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag samples and the dismiss decision.
//!
//! A drag arrives as a stream of [`DragSample`]s at the platform's touch
//! sampling rate, then a single release carrying the final delta. The overlay
//! controller only tracks the finger while samples arrive; the branch between
//! commit-dismiss and snap-back happens once, at release, through
//! [`DismissPolicy::decide`].

use crate::time::{HostTime, Timebase};

/// Baseline distance (density-independent pixels) a sheet must be dragged
/// before release to count as dismissed.
pub const COMMIT_THRESHOLD: f64 = 150.0;

/// Samples older than this at release time do not contribute to the release
/// velocity: the finger stopped before lifting.
const VELOCITY_HORIZON_SECS: f64 = 0.1;

/// One point of a continuous drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSample {
    /// Cumulative vertical translation since the gesture began. Positive is
    /// downward.
    pub delta_y: f64,
    /// When the sample was taken.
    pub timestamp: HostTime,
}

impl DragSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(delta_y: f64, timestamp: HostTime) -> Self {
        Self { delta_y, timestamp }
    }
}

/// Outcome of releasing a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DismissDecision {
    /// The drag travelled far (or fast) enough; the overlay closes.
    Commit,
    /// The overlay snaps back to its resting position.
    Cancel,
}

/// Rule that turns a released drag into a [`DismissDecision`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DismissPolicy {
    /// Commit iff the release distance exceeds `threshold`. Release velocity
    /// is ignored, so a short fast flick snaps back.
    Distance {
        /// Minimum distance, exclusive.
        threshold: f64,
    },
    /// Commit iff the release distance exceeds `threshold` **or** the release
    /// velocity in the dismiss direction exceeds `min_velocity`.
    DistanceOrVelocity {
        /// Minimum distance, exclusive.
        threshold: f64,
        /// Minimum release speed in units per second, exclusive.
        min_velocity: f64,
    },
}

impl DismissPolicy {
    /// Distance-only rule at [`COMMIT_THRESHOLD`].
    pub const BASELINE: Self = Self::Distance {
        threshold: COMMIT_THRESHOLD,
    };

    /// Distance rule at [`COMMIT_THRESHOLD`] that also accepts flicks faster
    /// than 1000 units/s.
    pub const FLICK: Self = Self::DistanceOrVelocity {
        threshold: COMMIT_THRESHOLD,
        min_velocity: 1_000.0,
    };

    /// The distance threshold of this rule.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        match *self {
            Self::Distance { threshold } | Self::DistanceOrVelocity { threshold, .. } => threshold,
        }
    }

    /// Decides a release at `distance` travelling at `velocity` (both in the
    /// dismiss direction).
    #[must_use]
    pub fn decide(&self, distance: f64, velocity: f64) -> DismissDecision {
        let commit = match *self {
            Self::Distance { threshold } => distance > threshold,
            Self::DistanceOrVelocity {
                threshold,
                min_velocity,
            } => distance > threshold || velocity > min_velocity,
        };
        if commit {
            DismissDecision::Commit
        } else {
            DismissDecision::Cancel
        }
    }
}

impl Default for DismissPolicy {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Estimates release velocity from the accepted samples of one drag.
#[derive(Clone, Copy, Debug)]
pub struct DragTracker {
    timebase: Timebase,
    prev: Option<DragSample>,
    last: Option<DragSample>,
}

impl DragTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            prev: None,
            last: None,
        }
    }

    /// Forgets the current drag.
    pub fn reset(&mut self) {
        self.prev = None;
        self.last = None;
    }

    /// Records a sample. `delta_y` is expected in the dismiss direction.
    ///
    /// Samples sharing a timestamp with the previous one replace it, so
    /// coalesced input does not produce infinite velocities.
    pub fn record(&mut self, sample: DragSample) {
        match self.last {
            Some(last) if sample.timestamp <= last.timestamp => self.last = Some(sample),
            _ => {
                self.prev = self.last;
                self.last = Some(sample);
            }
        }
    }

    /// Whether any sample has been recorded since the last reset.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Velocity at release time `now`, in units per second.
    ///
    /// Zero when fewer than two samples were recorded or when the last sample
    /// is older than 100 ms.
    #[must_use]
    pub fn release_velocity(&self, now: HostTime) -> f64 {
        let (Some(prev), Some(last)) = (self.prev, self.last) else {
            return 0.0;
        };
        let idle = now
            .saturating_duration_since(last.timestamp)
            .as_secs_f64(self.timebase);
        if idle > VELOCITY_HORIZON_SECS {
            return 0.0;
        }
        let dt = last
            .timestamp
            .saturating_duration_since(prev.timestamp)
            .as_secs_f64(self.timebase);
        if dt > 0.0 {
            (last.delta_y - prev.delta_y) / dt
        } else {
            0.0
        }
    }
}
