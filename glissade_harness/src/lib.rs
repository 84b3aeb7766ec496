// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop and motion probes for exercising controllers.
//!
//! [`FrameClock`] stands in for a platform display link: it hands out frame
//! timestamps at a nominal refresh rate, optionally perturbed by
//! [`PathologyToggles`]. Perturbations come from a seeded xorshift generator,
//! so every run of a scenario sees the same frame times.
//!
//! [`run_until_settled`] drives a [`Presentation`] frame by frame until it
//! stops animating, feeding each visual to a [`Presenter`] such as
//! [`MotionProbe`], which records the value track for later assertions.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use glissade_core::indicator::IndicatorVisual;
use glissade_core::overlay::OverlayVisual;
use glissade_core::presentation::{Presentation, Presenter, drive};
use glissade_core::time::{HostTime, Timebase};

/// Nominal 60 Hz frame interval in nanoseconds.
pub const FRAME_60HZ: u64 = 16_666_667;

/// Refresh intervals cycled through when
/// [`vary_refresh`](PathologyToggles::vary_refresh) is on: 60, 90, 120, and
/// 30 Hz.
const REFRESH_CYCLE: [u64; 4] = [FRAME_60HZ, 11_111_111, 8_333_333, 33_333_333];

/// Frames spent at each refresh rate before switching.
const REFRESH_SWITCH_FRAMES: u64 = 30;

/// Runtime pathology toggles for stress tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathologyToggles {
    /// Each frame interval is perturbed by up to ±25%.
    pub timer_jitter: bool,
    /// The refresh rate switches between 60, 90, 120, and 30 Hz.
    pub vary_refresh: bool,
    /// Roughly one frame in eight is dropped, stretching the next interval by
    /// one to three frames.
    pub dropped_frames: bool,
}

impl PathologyToggles {
    /// Every pathology enabled.
    pub const ALL: Self = Self {
        timer_jitter: true,
        vary_refresh: true,
        dropped_frames: true,
    };
}

/// Deterministic source of frame timestamps, in nanoseconds.
#[derive(Clone, Debug)]
pub struct FrameClock {
    now: u64,
    interval: u64,
    frame_index: u64,
    toggles: PathologyToggles,
    rng: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FRAME_60HZ)
    }
}

impl FrameClock {
    /// Creates a clock at time 0 ticking every `interval` nanoseconds.
    #[must_use]
    pub const fn new(interval: u64) -> Self {
        Self {
            now: 0,
            interval,
            frame_index: 0,
            toggles: PathologyToggles {
                timer_jitter: false,
                vary_refresh: false,
                dropped_frames: false,
            },
            rng: 0x9e37_79b9_7f4a_7c15,
        }
    }

    /// Enables the given pathologies.
    #[must_use]
    pub const fn with_toggles(mut self, toggles: PathologyToggles) -> Self {
        self.toggles = toggles;
        self
    }

    /// Reseeds the pathology generator. A zero seed is replaced by a fixed
    /// non-zero constant.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.rng = if seed == 0 { 0x2545_f491_4f6c_dd1d } else { seed };
        self
    }

    /// Timebase of the timestamps this clock produces.
    #[must_use]
    pub const fn timebase(&self) -> Timebase {
        Timebase::NANOS
    }

    /// The current frame time.
    #[must_use]
    pub const fn now(&self) -> HostTime {
        HostTime(self.now)
    }

    /// A time `nanos` after the current frame, for input that arrives between
    /// frames.
    #[must_use]
    pub const fn between(&self, nanos: u64) -> HostTime {
        HostTime(self.now.saturating_add(nanos))
    }

    /// Number of frames produced so far.
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advances to the next frame and returns its timestamp.
    pub fn tick(&mut self) -> HostTime {
        let mut interval = if self.toggles.vary_refresh {
            let cycle = (self.frame_index / REFRESH_SWITCH_FRAMES) % REFRESH_CYCLE.len() as u64;
            REFRESH_CYCLE[usize::try_from(cycle).unwrap_or(0)]
        } else {
            self.interval
        };
        if self.toggles.timer_jitter {
            let spread = interval / 2;
            interval = interval - interval / 4 + self.next_random() % (spread + 1);
        }
        if self.toggles.dropped_frames && self.next_random().is_multiple_of(8) {
            interval += interval * (1 + self.next_random() % 3);
        }
        self.now = self.now.saturating_add(interval.max(1));
        self.frame_index += 1;
        HostTime(self.now)
    }

    fn next_random(&mut self) -> u64 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng = x;
        x
    }
}

/// Result of [`run_until_settled`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettleReport<N> {
    /// Frames advanced.
    pub frames: u32,
    /// Notices returned along the way, in order.
    pub notices: Vec<N>,
    /// Whether the presentation stopped animating within the frame budget.
    pub settled: bool,
}

/// Advances `presentation` one [`FrameClock`] frame at a time until it stops
/// animating or `max_frames` elapse, presenting every frame to `presenter`.
pub fn run_until_settled<P, R>(
    presentation: &mut P,
    presenter: &mut R,
    clock: &mut FrameClock,
    max_frames: u32,
) -> SettleReport<P::Notice>
where
    P: Presentation + ?Sized,
    R: Presenter<P::Visual> + ?Sized,
{
    let mut report = SettleReport {
        frames: 0,
        notices: Vec::new(),
        settled: !presentation.is_animating(),
    };
    while !report.settled && report.frames < max_frames {
        let now = clock.tick();
        report.notices.extend(drive(presentation, presenter, now));
        report.frames += 1;
        report.settled = !presentation.is_animating();
    }
    report
}

/// A [`Presenter`] that records the animated value of every frame it is
/// shown: the sheet offset for overlays, the highlight position for
/// indicators.
#[derive(Clone, Debug, Default)]
pub struct MotionProbe {
    values: Vec<f64>,
    opacities: Vec<f64>,
}

impl MotionProbe {
    /// Creates an empty probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded value, oldest first.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Every recorded opacity (backdrop or highlight), oldest first.
    #[must_use]
    pub fn opacities(&self) -> &[f64] {
        &self.opacities
    }

    /// The most recent value.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Smallest recorded value.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest recorded value.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Whether every recorded value and opacity is finite.
    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.values
            .iter()
            .chain(&self.opacities)
            .all(|v| v.is_finite())
    }

    /// Forgets everything recorded.
    pub fn clear(&mut self) {
        self.values.clear();
        self.opacities.clear();
    }

    /// Returns an ASCII sparkline of the recorded values over `[min, max]`.
    #[must_use]
    pub fn sparkline_ascii(&self, min: f64, max: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let span = if max > min { max - min } else { 1.0 };
        self.values
            .iter()
            .map(|&v| {
                let t = (v.clamp(min, max) - min) / span;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "index is clamped to ASCII level count"
                )]
                let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
                LEVELS[level.min(LEVELS.len() - 1)] as char
            })
            .collect()
    }
}

impl Presenter<OverlayVisual> for MotionProbe {
    fn present(&mut self, visual: &OverlayVisual) {
        self.values.push(visual.offset);
        self.opacities.push(visual.backdrop_opacity);
    }
}

impl Presenter<IndicatorVisual> for MotionProbe {
    fn present(&mut self, visual: &IndicatorVisual) {
        self.values.push(visual.position);
        self.opacities.push(visual.opacity);
    }
}
