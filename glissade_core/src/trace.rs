// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for controllers.
//!
//! This module provides a [`TraceSink`] trait with one method per event that
//! controllers report: overlay state transitions, drag releases, indicator
//! retargets, animations coming to rest, and calls ignored because they
//! arrived in the wrong state. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! Controllers own an optional boxed sink and emit through [`Tracer`]. When
//! the `trace` feature is **off**, every `Tracer` method compiles to nothing.
//! When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! A sink wrapped in `Rc<RefCell<_>>` is itself a sink, so one recorder can
//! be shared by every controller on the UI thread.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates per-frame [`SampleEvent`]s for
//!   every animated channel.

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::gesture::DismissDecision;
use crate::id::PresentationId;
use crate::indicator::IndicatorTarget;
use crate::overlay::{CloseReason, OverlayState};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A public controller operation, as named in [`IgnoredEvent`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Overlay `open`.
    Open,
    /// Overlay `close` / `dismiss` and its shorthands.
    Dismiss,
    /// Overlay drag sample.
    DragSample,
    /// Overlay drag release.
    DragEnd,
    /// Overlay extent change.
    Resize,
    /// Indicator `select`.
    Select,
    /// Indicator `report_measurement` / `report_layout`.
    Measurement,
}

/// An animated property of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Overlay offset toward its edge.
    SheetOffset,
    /// Indicator position along the row axis.
    IndicatorPosition,
    /// Indicator opacity.
    IndicatorOpacity,
}

/// Which input caused an indicator target to be re-derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetargetCause {
    /// The selected index changed (or was re-declared).
    Select,
    /// A measurement arrived for the selected index.
    Measurement,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// An overlay changed state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionEvent {
    /// Emitting controller.
    pub id: PresentationId,
    /// When the transition happened.
    pub at: HostTime,
    /// State before.
    pub from: OverlayState,
    /// State after.
    pub to: OverlayState,
    /// Close reason, for transitions into and out of `Closing`.
    pub reason: Option<CloseReason>,
}

/// A drag was released and decided.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragReleaseEvent {
    /// Emitting controller.
    pub id: PresentationId,
    /// Release time.
    pub at: HostTime,
    /// Release distance in the dismiss direction.
    pub distance: f64,
    /// Estimated release velocity in the dismiss direction (units/s).
    pub velocity: f64,
    /// The decision taken.
    pub decision: DismissDecision,
}

/// An indicator target was re-derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetargetEvent {
    /// Emitting controller.
    pub id: PresentationId,
    /// When the input arrived.
    pub at: HostTime,
    /// Selected index at the time.
    pub selected: usize,
    /// The derived target.
    pub target: IndicatorTarget,
    /// What triggered the derivation.
    pub cause: RetargetCause,
}

/// An animation came to rest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettledEvent {
    /// Emitting controller.
    pub id: PresentationId,
    /// Frame time at which it settled.
    pub at: HostTime,
    /// Which property settled.
    pub channel: Channel,
    /// Final value.
    pub value: f64,
}

/// A call was ignored because it is not valid in the current state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IgnoredEvent {
    /// Emitting controller.
    pub id: PresentationId,
    /// When the call arrived.
    pub at: HostTime,
    /// The ignored operation.
    pub operation: Operation,
    /// Overlay state at the time, for overlay operations.
    pub state: Option<OverlayState>,
}

/// Per-frame value of one animated channel (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleEvent {
    /// Emitting controller.
    pub id: PresentationId,
    /// Frame time.
    pub at: HostTime,
    /// Which property.
    pub channel: Channel,
    /// Value after advancing.
    pub value: f64,
    /// Velocity after advancing (units/s).
    pub velocity: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from controllers.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an overlay changes state.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a drag is released.
    fn on_drag_release(&mut self, e: &DragReleaseEvent) {
        _ = e;
    }

    /// Called when an indicator target is re-derived.
    fn on_retarget(&mut self, e: &RetargetEvent) {
        _ = e;
    }

    /// Called when an animation comes to rest.
    fn on_settled(&mut self, e: &SettledEvent) {
        _ = e;
    }

    /// Called when a call is ignored as invalid in the current state.
    fn on_ignored(&mut self, e: &IgnoredEvent) {
        _ = e;
    }

    /// Called once per frame per animated channel (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_sample(&mut self, e: &SampleEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Shared sinks
// ---------------------------------------------------------------------------

/// Forwards to the shared sink. Events arriving while the sink is already
/// borrowed are dropped.
impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_transition(e);
        }
    }

    fn on_drag_release(&mut self, e: &DragReleaseEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_drag_release(e);
        }
    }

    fn on_retarget(&mut self, e: &RetargetEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_retarget(e);
        }
    }

    fn on_settled(&mut self, e: &SettledEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_settled(e);
        }
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_ignored(e);
        }
    }

    #[cfg(feature = "trace-rich")]
    fn on_sample(&mut self, e: &SampleEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_sample(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DragReleaseEvent`].
    #[inline]
    pub fn drag_release(&mut self, e: &DragReleaseEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_drag_release(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RetargetEvent`].
    #[inline]
    pub fn retarget(&mut self, e: &RetargetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_retarget(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SettledEvent`].
    #[inline]
    pub fn settled(&mut self, e: &SettledEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_settled(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`IgnoredEvent`].
    #[inline]
    pub fn ignored(&mut self, e: &IgnoredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_ignored(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SampleEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn sample(&mut self, e: &SampleEvent) {
        if let Some(s) = &mut self.sink {
            s.on_sample(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
