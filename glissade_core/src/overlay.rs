// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet-style overlay lifecycle, animation, and drag-to-dismiss.
//!
//! An [`OverlayController`] is a four-state machine:
//!
//! ```text
//!            open()                 spring settles
//!   Closed ─────────► Opening ─────────────────────► Open
//!     ▲                  │                            │  ▲
//!     │                  │ close()          close()   │  │ drag released
//!     │                  ▼                            ▼  │ below threshold
//!     └──────────────── Closing ◄──────────────────── ┘──┘ (snap back)
//!       tween completes          drag released past threshold
//! ```
//!
//! The sheet's offset is measured toward its anchoring [`Edge`]: 0 is fully
//! visible, `extent` is fully offscreen. While `Open`, drag samples move the
//! offset 1:1 with the finger; the commit-or-cancel branch is taken once, at
//! release.
//!
//! Every call that is invalid in the current state is a silent no-op, since
//! gesture callbacks are not strictly ordered with state transitions. Such
//! calls return `false` (or `None`) and are reported to the trace sink as
//! [`IgnoredEvent`]s.

use alloc::boxed::Box;
use core::fmt;
use core::time::Duration;

use kurbo::Affine;

use crate::gesture::{DismissDecision, DismissPolicy, DragSample, DragTracker};
use crate::id::PresentationId;
use crate::motion::{AnimatedValue, Easing, Progress, SpringConfig};
use crate::presentation::{Edge, Presentation};
use crate::time::{HostTime, Timebase};
use crate::trace::{
    Channel, DragReleaseEvent, IgnoredEvent, Operation, SettledEvent, TraceSink, Tracer,
    TransitionEvent,
};

/// Lifecycle state of an overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverlayState {
    /// Unmounted.
    #[default]
    Closed,
    /// Mounted; entry spring in flight.
    Opening,
    /// Mounted and at rest (or tracking a drag, or snapping back).
    Open,
    /// Mounted; exit animation in flight. Unmounts when it completes.
    Closing,
}

impl OverlayState {
    /// Whether the overlay's subtree is mounted in this state.
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether this state owns an in-flight enter/exit animation.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

/// Why an overlay was asked to close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The dimmed backdrop behind the sheet was tapped.
    Backdrop,
    /// The sheet's explicit close affordance was pressed.
    CloseButton,
    /// A drag was released past the commit threshold.
    DragCommit,
    /// The platform asked the modal to close (hardware back, escape).
    BackRequest,
    /// The host closed the sheet itself, e.g. after a menu choice.
    #[default]
    Programmatic,
}

/// Notices returned from [`OverlayController::advance`] when an enter or exit
/// animation completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// The entry animation settled; the sheet is fully visible.
    Opened,
    /// The exit animation completed and the subtree was unmounted.
    Closed(CloseReason),
}

/// Per-usage-site overlay parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Offset at which the sheet is fully offscreen (the viewport height for
    /// a full-height travel). Must be finite and positive.
    pub extent: f64,
    /// Edge the sheet is anchored to.
    pub edge: Edge,
    /// Release rule for drag-to-dismiss.
    pub dismiss_policy: DismissPolicy,
    /// Spring used by `open`.
    pub open_spring: SpringConfig,
    /// Spring used when a drag is released below the threshold.
    pub snap_back_spring: SpringConfig,
    /// Length of the exit animation.
    pub close_duration: Duration,
    /// Curve of the exit animation.
    pub close_easing: Easing,
}

impl OverlayConfig {
    /// Exit animation length shared by every sheet in the app.
    pub const CLOSE_DURATION: Duration = Duration::from_millis(250);

    /// The quick-action launcher sheet: gentle spring both for entry and
    /// snap-back.
    #[must_use]
    pub const fn quick_action(extent: f64) -> Self {
        Self {
            extent,
            edge: Edge::Bottom,
            dismiss_policy: DismissPolicy::BASELINE,
            open_spring: SpringConfig::SHEET,
            snap_back_spring: SpringConfig::SHEET,
            close_duration: Self::CLOSE_DURATION,
            close_easing: Easing::EaseOutCubic,
        }
    }

    /// A list-filter sheet: gentle entry, bouncier snap-back.
    #[must_use]
    pub const fn filter_sheet(extent: f64) -> Self {
        Self {
            snap_back_spring: SpringConfig::SNAP_BACK,
            ..Self::quick_action(extent)
        }
    }

    /// Returns a copy with the given dismiss rule.
    #[must_use]
    pub const fn with_dismiss_policy(mut self, policy: DismissPolicy) -> Self {
        self.dismiss_policy = policy;
        self
    }

    /// Returns a copy anchored to `edge`.
    #[must_use]
    pub const fn with_edge(mut self, edge: Edge) -> Self {
        self.edge = edge;
        self
    }
}

/// What the render layer paints for an overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayVisual {
    /// Offset toward the anchoring edge; 0 is fully visible.
    pub offset: f64,
    /// Opacity of the dimmed backdrop, fading with the sheet's travel.
    pub backdrop_opacity: f64,
    /// Whether the subtree should be mounted at all.
    pub mounted: bool,
}

impl OverlayVisual {
    /// Screen-space translation of the sheet.
    #[must_use]
    pub fn transform(&self, edge: Edge) -> Affine {
        edge.translation(self.offset)
    }
}

/// Owns one sheet's lifecycle and drag handling.
///
/// Instantiate one per usage site; controllers never share state.
pub struct OverlayController {
    id: PresentationId,
    config: OverlayConfig,
    timebase: Timebase,
    state: OverlayState,
    offset: AnimatedValue,
    drag: DragTracker,
    close_reason: CloseReason,
    sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("offset", &self.offset.value())
            .field("dragging", &self.drag.is_active())
            .finish_non_exhaustive()
    }
}

impl OverlayController {
    /// Creates a closed overlay. Timestamps passed to this controller are
    /// interpreted with `timebase`.
    ///
    /// A non-finite or non-positive `config.extent` leaves the sheet unsized
    /// (extent 0) until [`set_extent`](Self::set_extent) supplies a real one.
    #[must_use]
    pub fn new(mut config: OverlayConfig, timebase: Timebase) -> Self {
        if !(config.extent.is_finite() && config.extent > 0.0) {
            config.extent = 0.0;
        }
        Self {
            id: PresentationId::default(),
            config,
            timebase,
            state: OverlayState::Closed,
            offset: AnimatedValue::new(config.extent, timebase),
            drag: DragTracker::new(timebase),
            close_reason: CloseReason::Programmatic,
            sink: None,
        }
    }

    /// Sets the id reported in trace events.
    #[must_use]
    pub fn with_id(mut self, id: PresentationId) -> Self {
        self.id = id;
        self
    }

    /// Attaches a trace sink.
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replaces (or removes) the trace sink.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.sink = sink;
    }

    /// The id reported in trace events.
    #[must_use]
    pub const fn id(&self) -> PresentationId {
        self.id
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> OverlayState {
        self.state
    }

    /// Whether the subtree is mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }

    /// Whether a drag is being tracked.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    // -- Lifecycle --

    /// Mounts the sheet offscreen and springs it into view.
    ///
    /// Valid only while `Closed`; returns `false` otherwise.
    pub fn open(&mut self, now: HostTime) -> bool {
        if self.state != OverlayState::Closed {
            self.ignore(Operation::Open, now);
            return false;
        }
        self.offset.set(self.config.extent);
        self.offset.spring_to(0.0, self.config.open_spring, now);
        self.transition(OverlayState::Opening, None, now);
        true
    }

    /// Closes for [`CloseReason::Programmatic`]. See [`dismiss`](Self::dismiss).
    pub fn close(&mut self, now: HostTime) -> bool {
        self.dismiss(CloseReason::Programmatic, now)
    }

    /// Closes because the backdrop was tapped.
    pub fn backdrop_tapped(&mut self, now: HostTime) -> bool {
        self.dismiss(CloseReason::Backdrop, now)
    }

    /// Closes because the close affordance was pressed.
    pub fn close_button_pressed(&mut self, now: HostTime) -> bool {
        self.dismiss(CloseReason::CloseButton, now)
    }

    /// Closes because the platform requested it (hardware back).
    pub fn back_requested(&mut self, now: HostTime) -> bool {
        self.dismiss(CloseReason::BackRequest, now)
    }

    /// Starts the exit animation from wherever the sheet currently is.
    ///
    /// Valid from `Open` and `Opening` (the entry spring is superseded).
    /// While `Closing` or `Closed` this is a no-op, so the exit animation is
    /// never restarted and [`Lifecycle::Closed`] is reported once.
    pub fn dismiss(&mut self, reason: CloseReason, now: HostTime) -> bool {
        if !matches!(self.state, OverlayState::Open | OverlayState::Opening) {
            self.ignore(Operation::Dismiss, now);
            return false;
        }
        self.drag.reset();
        let duration = self.timebase.duration_to_ticks(self.config.close_duration);
        self.offset
            .tween_to(self.config.extent, duration, self.config.close_easing, now);
        self.close_reason = reason;
        self.transition(OverlayState::Closing, Some(reason), now);
        true
    }

    // -- Drag --

    /// Tracks the finger. Valid only while `Open`.
    ///
    /// Samples that would pull the sheet past its resting position are
    /// ignored. Otherwise the offset is set directly to the sample's distance,
    /// cancelling any snap-back in flight. No decision is taken here.
    pub fn on_drag_sample(&mut self, sample: DragSample) -> bool {
        if self.state != OverlayState::Open {
            self.ignore(Operation::DragSample, sample.timestamp);
            return false;
        }
        let distance = self.config.edge.dismiss_distance(sample.delta_y);
        if distance.is_nan() || distance < 0.0 {
            return false;
        }
        self.offset.set(distance);
        self.drag.record(DragSample::new(distance, sample.timestamp));
        true
    }

    /// Releases the drag and takes the commit-or-cancel branch.
    ///
    /// Valid only while `Open`; returns `None` otherwise. On
    /// [`DismissDecision::Commit`] the sheet starts closing with
    /// [`CloseReason::DragCommit`]; on [`DismissDecision::Cancel`] it springs
    /// back to 0 and stays `Open`.
    pub fn on_drag_end(&mut self, final_delta_y: f64, now: HostTime) -> Option<DismissDecision> {
        if self.state != OverlayState::Open {
            self.ignore(Operation::DragEnd, now);
            return None;
        }
        let distance = self.config.edge.dismiss_distance(final_delta_y);
        let velocity = self.drag.release_velocity(now);
        let decision = self.config.dismiss_policy.decide(distance, velocity);
        self.drag.reset();

        let e = DragReleaseEvent {
            id: self.id,
            at: now,
            distance,
            velocity,
            decision,
        };
        self.tracer().drag_release(&e);

        match decision {
            DismissDecision::Commit => {
                self.dismiss(CloseReason::DragCommit, now);
            }
            DismissDecision::Cancel => {
                self.offset.spring_to(0.0, self.config.snap_back_spring, now);
            }
        }
        Some(decision)
    }

    // -- Geometry --

    /// Updates the offscreen extent after a viewport change.
    ///
    /// Takes effect for subsequent animations; a closed sheet is re-parked at
    /// the new extent. Non-finite or non-positive extents are ignored.
    pub fn set_extent(&mut self, extent: f64, now: HostTime) -> bool {
        if !(extent.is_finite() && extent > 0.0) {
            self.ignore(Operation::Resize, now);
            return false;
        }
        self.config.extent = extent;
        if self.state == OverlayState::Closed {
            self.offset.set(extent);
        }
        true
    }

    /// The latest interpolated visual.
    #[must_use]
    pub fn visual(&self) -> OverlayVisual {
        let mounted = self.state.is_mounted();
        let offset = self.offset.value();
        let backdrop_opacity = if !mounted {
            0.0
        } else if self.config.extent > 0.0 {
            1.0 - (offset / self.config.extent).clamp(0.0, 1.0)
        } else {
            1.0
        };
        OverlayVisual {
            offset,
            backdrop_opacity,
            mounted,
        }
    }

    // -- Frame --

    /// Advances the offset animation to `now` and completes transient states.
    pub fn advance(&mut self, now: HostTime) -> Option<Lifecycle> {
        let progress = self.offset.advance(now);

        #[cfg(feature = "trace-rich")]
        if self.state.is_mounted() {
            let e = crate::trace::SampleEvent {
                id: self.id,
                at: now,
                channel: Channel::SheetOffset,
                value: self.offset.value(),
                velocity: self.offset.velocity(),
            };
            self.tracer().sample(&e);
        }

        if progress != Progress::Settled {
            return None;
        }

        let e = SettledEvent {
            id: self.id,
            at: now,
            channel: Channel::SheetOffset,
            value: self.offset.value(),
        };
        self.tracer().settled(&e);

        match self.state {
            OverlayState::Opening => {
                self.transition(OverlayState::Open, None, now);
                Some(Lifecycle::Opened)
            }
            OverlayState::Closing => {
                let reason = self.close_reason;
                self.offset.set(self.config.extent);
                self.transition(OverlayState::Closed, Some(reason), now);
                Some(Lifecycle::Closed(reason))
            }
            OverlayState::Open | OverlayState::Closed => None,
        }
    }

    // -- Internals --

    fn tracer(&mut self) -> Tracer<'_> {
        match &mut self.sink {
            Some(sink) => Tracer::new(sink.as_mut()),
            None => Tracer::none(),
        }
    }

    fn transition(&mut self, to: OverlayState, reason: Option<CloseReason>, at: HostTime) {
        let e = TransitionEvent {
            id: self.id,
            at,
            from: self.state,
            to,
            reason,
        };
        self.state = to;
        self.tracer().transition(&e);
    }

    fn ignore(&mut self, operation: Operation, at: HostTime) {
        let e = IgnoredEvent {
            id: self.id,
            at,
            operation,
            state: Some(self.state),
        };
        self.tracer().ignored(&e);
    }
}

impl Presentation for OverlayController {
    type Visual = OverlayVisual;
    type Notice = Lifecycle;

    fn advance(&mut self, now: HostTime) -> Option<Lifecycle> {
        Self::advance(self, now)
    }

    fn visual(&self) -> OverlayVisual {
        Self::visual(self)
    }

    fn is_animating(&self) -> bool {
        self.offset.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// 60 Hz in nanoseconds.
    const FRAME: u64 = 16_666_667;
    const EXTENT: f64 = 800.0;

    fn sheet() -> OverlayController {
        OverlayController::new(OverlayConfig::quick_action(EXTENT), Timebase::NANOS)
    }

    /// Advances frame by frame from `*t` until `done` or 10 s elapse,
    /// collecting notices.
    fn run(
        c: &mut OverlayController,
        t: &mut u64,
        mut done: impl FnMut(&OverlayController) -> bool,
    ) -> Vec<Lifecycle> {
        let mut notices = Vec::new();
        for _ in 0..600 {
            *t += FRAME;
            notices.extend(c.advance(HostTime(*t)));
            if done(c) {
                break;
            }
        }
        notices
    }

    fn opened() -> (OverlayController, u64) {
        let mut c = sheet();
        let mut t = 0;
        assert!(c.open(HostTime(t)), "open from Closed");
        let notices = run(&mut c, &mut t, |c| c.state() == OverlayState::Open);
        assert_eq!(notices, &[Lifecycle::Opened], "entry spring completes");
        (c, t)
    }

    #[test]
    fn open_mounts_offscreen_and_springs_in() {
        let mut c = sheet();
        assert!(!c.is_mounted());
        c.open(HostTime(0));
        assert_eq!(c.state(), OverlayState::Opening);
        let v = c.visual();
        assert!(v.mounted);
        assert_eq!(v.offset, EXTENT, "mounted at the fully offscreen position");
        assert_eq!(v.backdrop_opacity, 0.0);

        let mut t = 0;
        let notices = run(&mut c, &mut t, |c| c.state() == OverlayState::Open);
        assert_eq!(notices, &[Lifecycle::Opened]);
        assert_eq!(c.visual().offset, 0.0);
        assert_eq!(c.visual().backdrop_opacity, 1.0);
        assert!(!c.is_animating());
    }

    #[test]
    fn open_is_only_valid_when_closed() {
        let (mut c, t) = opened();
        assert!(!c.open(HostTime(t)), "open while Open");
        assert_eq!(c.state(), OverlayState::Open);
    }

    #[test]
    fn close_runs_fixed_duration_then_unmounts() {
        let (mut c, mut t) = opened();
        assert!(c.close(HostTime(t)));
        assert_eq!(c.state(), OverlayState::Closing);
        assert!(c.is_mounted(), "unmount waits for the exit animation");

        // 250 ms at 60 Hz is 15 frames; the 16th lands past the end.
        let notices = run(&mut c, &mut t, |c| c.state() == OverlayState::Closed);
        assert_eq!(notices, &[Lifecycle::Closed(CloseReason::Programmatic)]);
        assert!(!c.visual().mounted);
        assert_eq!(c.visual().offset, EXTENT);
    }

    #[test]
    fn close_while_closing_does_not_restart() {
        let (mut c, mut t) = opened();
        c.backdrop_tapped(HostTime(t));
        t += 5 * FRAME;
        c.advance(HostTime(t));
        let mid = c.visual().offset;

        assert!(!c.close(HostTime(t)), "second close is ignored");
        assert_eq!(c.visual().offset, mid);

        let notices = run(&mut c, &mut t, |c| c.state() == OverlayState::Closed);
        assert_eq!(notices, &[Lifecycle::Closed(CloseReason::Backdrop)]);
        let after = run(&mut c, &mut t, |_| false);
        assert!(after.is_empty(), "no further notices once closed");
    }

    #[test]
    fn close_supersedes_opening_from_current_offset() {
        let mut c = sheet();
        let mut t = 0;
        c.open(HostTime(t));
        t += 4 * FRAME;
        c.advance(HostTime(t));
        let partial = c.visual().offset;
        assert!(partial < EXTENT && partial > 0.0);

        c.close_button_pressed(HostTime(t));
        t += FRAME;
        c.advance(HostTime(t));
        assert!(
            c.visual().offset >= partial,
            "exit animation starts where the entry spring was"
        );
        let notices = run(&mut c, &mut t, |c| c.state() == OverlayState::Closed);
        assert_eq!(
            notices,
            &[Lifecycle::Closed(CloseReason::CloseButton)],
            "no Opened notice for a superseded entry"
        );
    }

    #[test]
    fn drag_tracks_finger_one_to_one() {
        let (mut c, t) = opened();
        assert!(c.on_drag_sample(DragSample::new(42.0, HostTime(t + 1))));
        assert_eq!(c.visual().offset, 42.0);
        assert!(c.on_drag_sample(DragSample::new(90.0, HostTime(t + 2))));
        assert_eq!(c.visual().offset, 90.0);
        assert!(c.is_dragging());
    }

    #[test]
    fn upward_drag_is_ignored() {
        let (mut c, t) = opened();
        c.on_drag_sample(DragSample::new(30.0, HostTime(t + 1)));
        assert!(!c.on_drag_sample(DragSample::new(-12.0, HostTime(t + 2))));
        assert_eq!(c.visual().offset, 30.0);
        assert!(!c.on_drag_sample(DragSample::new(f64::NAN, HostTime(t + 3))));
        assert_eq!(c.visual().offset, 30.0);
    }

    #[test]
    fn drag_past_threshold_commits() {
        let (mut c, mut t) = opened();
        for (i, dy) in [40.0, 120.0, 200.0].into_iter().enumerate() {
            c.on_drag_sample(DragSample::new(dy, HostTime(t + (i as u64 + 1) * FRAME)));
        }
        t += 4 * FRAME;
        assert_eq!(
            c.on_drag_end(200.0, HostTime(t)),
            Some(DismissDecision::Commit)
        );
        assert_eq!(c.state(), OverlayState::Closing);
        assert!(!c.is_dragging());
        let notices = run(&mut c, &mut t, |c| c.state() == OverlayState::Closed);
        assert_eq!(notices, &[Lifecycle::Closed(CloseReason::DragCommit)]);
    }

    #[test]
    fn drag_below_threshold_snaps_back() {
        let (mut c, mut t) = opened();
        c.on_drag_sample(DragSample::new(60.0, HostTime(t + FRAME)));
        t += 2 * FRAME;
        assert_eq!(c.on_drag_end(60.0, HostTime(t)), Some(DismissDecision::Cancel));
        assert_eq!(c.state(), OverlayState::Open);

        let notices = run(&mut c, &mut t, |c| !c.is_animating());
        assert!(notices.is_empty(), "snap-back emits no lifecycle notice");
        assert_eq!(c.state(), OverlayState::Open);
        assert_eq!(c.visual().offset, 0.0);
    }

    #[test]
    fn exactly_threshold_cancels() {
        let (mut c, t) = opened();
        c.on_drag_sample(DragSample::new(150.0, HostTime(t + 1)));
        assert_eq!(
            c.on_drag_end(150.0, HostTime(t + 2)),
            Some(DismissDecision::Cancel)
        );
    }

    #[test]
    fn flick_policy_commits_short_fast_drag() {
        let config = OverlayConfig::quick_action(EXTENT).with_dismiss_policy(DismissPolicy::FLICK);
        let mut c = OverlayController::new(config, Timebase::MILLIS);
        let mut t = 0_u64;
        c.open(HostTime(t));
        while c.state() != OverlayState::Open {
            t += 16;
            c.advance(HostTime(t));
        }
        c.on_drag_sample(DragSample::new(10.0, HostTime(t + 10)));
        c.on_drag_sample(DragSample::new(50.0, HostTime(t + 20)));
        assert_eq!(
            c.on_drag_end(50.0, HostTime(t + 22)),
            Some(DismissDecision::Commit),
            "40px in 10ms is a flick"
        );
    }

    #[test]
    fn gesture_calls_outside_open_are_noops() {
        let mut c = sheet();
        assert!(!c.on_drag_sample(DragSample::new(10.0, HostTime(0))));
        assert_eq!(c.on_drag_end(500.0, HostTime(0)), None);
        assert!(!c.close(HostTime(0)));
        assert_eq!(c.state(), OverlayState::Closed);

        c.open(HostTime(0));
        assert!(!c.on_drag_sample(DragSample::new(10.0, HostTime(1))), "Opening");
        assert_eq!(c.on_drag_end(500.0, HostTime(1)), None);
        assert_eq!(c.state(), OverlayState::Opening);
    }

    #[test]
    fn top_edge_dismisses_upward() {
        let config = OverlayConfig::filter_sheet(EXTENT).with_edge(Edge::Top);
        let mut c = OverlayController::new(config, Timebase::NANOS);
        let mut t = 0;
        c.open(HostTime(t));
        run(&mut c, &mut t, |c| c.state() == OverlayState::Open);

        assert!(!c.on_drag_sample(DragSample::new(30.0, HostTime(t + 1))));
        assert!(c.on_drag_sample(DragSample::new(-180.0, HostTime(t + 2))));
        assert_eq!(c.visual().offset, 180.0);
        assert_eq!(
            c.visual().transform(Edge::Top).translation(),
            kurbo::Vec2::new(0.0, -180.0)
        );
        assert_eq!(
            c.on_drag_end(-180.0, HostTime(t + 3)),
            Some(DismissDecision::Commit)
        );
    }

    #[test]
    fn resize_reparks_closed_sheet() {
        let mut c = sheet();
        assert!(c.set_extent(600.0, HostTime(0)));
        assert_eq!(c.visual().offset, 600.0);
        assert!(!c.set_extent(-1.0, HostTime(0)));
        c.open(HostTime(0));
        assert_eq!(c.visual().offset, 600.0);
    }

    #[test]
    fn construction_rejects_the_extents_resize_rejects() {
        for bad in [0.0, -120.0, f64::NAN, f64::INFINITY] {
            let mut c =
                OverlayController::new(OverlayConfig::quick_action(bad), Timebase::NANOS);
            assert_eq!(c.config().extent, 0.0, "{bad} leaves the sheet unsized");
            assert_eq!(c.visual().offset, 0.0);
            assert!(!c.set_extent(bad, HostTime(0)), "resize rejects {bad} too");
            assert!(c.set_extent(600.0, HostTime(0)));
            assert_eq!(c.visual().offset, 600.0, "re-parked once sized");
        }
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_reports_transitions_and_ignored_calls() {
        use alloc::rc::Rc;
        use core::cell::RefCell;

        #[derive(Default)]
        struct Log {
            transitions: Vec<(OverlayState, OverlayState)>,
            ignored: Vec<Operation>,
            releases: Vec<DismissDecision>,
        }
        impl TraceSink for Log {
            fn on_transition(&mut self, e: &TransitionEvent) {
                self.transitions.push((e.from, e.to));
            }
            fn on_ignored(&mut self, e: &IgnoredEvent) {
                self.ignored.push(e.operation);
            }
            fn on_drag_release(&mut self, e: &DragReleaseEvent) {
                self.releases.push(e.decision);
            }
        }

        let log = Rc::new(RefCell::new(Log::default()));
        let mut c = sheet()
            .with_id(PresentationId(7))
            .with_trace_sink(Box::new(Rc::clone(&log)));
        let mut t = 0;
        c.on_drag_end(10.0, HostTime(t));
        c.open(HostTime(t));
        run(&mut c, &mut t, |c| c.state() == OverlayState::Open);
        c.on_drag_sample(DragSample::new(200.0, HostTime(t + 1)));
        c.on_drag_end(200.0, HostTime(t + 2));
        c.close(HostTime(t + 3));
        run(&mut c, &mut t, |c| c.state() == OverlayState::Closed);

        let log = log.borrow();
        assert_eq!(
            log.transitions,
            &[
                (OverlayState::Closed, OverlayState::Opening),
                (OverlayState::Opening, OverlayState::Open),
                (OverlayState::Open, OverlayState::Closing),
                (OverlayState::Closing, OverlayState::Closed),
            ]
        );
        assert_eq!(log.ignored, &[Operation::DragEnd, Operation::Dismiss]);
        assert_eq!(log.releases, &[DismissDecision::Commit]);
    }
}
