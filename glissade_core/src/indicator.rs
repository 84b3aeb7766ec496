// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection highlight for a row of variable-width items.
//!
//! The row's layout is not known up front: each item reports its own geometry
//! once the host has laid it out, in any order and possibly after the user has
//! already selected it. [`IndicatorTracker`] keeps those reports in a
//! [`TabLayout`] and re-derives the [`IndicatorTarget`] whenever either input
//! changes:
//!
//! ```text
//!   select(i) ──────────┐
//!                       ├──► target() ──► spring position / fade opacity
//!   report_measurement ─┘
//! ```
//!
//! Nothing derived is cached, so `select` followed by a measurement converges
//! to the same place as the reverse order. An index that has not been measured
//! never resolves to position 0; the highlight keeps its position and opacity
//! until the measurement arrives. A highlight hidden by an action slot stays
//! hidden, and one never placed stays invisible.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt;
use core::time::Duration;

use kurbo::{Affine, Rect};

use crate::id::PresentationId;
use crate::motion::{AnimatedValue, Easing, Progress, SpringConfig};
use crate::presentation::{Axis, Presentation};
use crate::time::{HostTime, Timebase};
use crate::trace::{
    Channel, IgnoredEvent, Operation, RetargetCause, RetargetEvent, SettledEvent, TraceSink,
    Tracer,
};

/// Where an item's highlight should sit, indexed by item.
///
/// Entries are written out of order and overwritten, never removed. Once every
/// item has reported, the mapping is total.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabLayout {
    offsets: Vec<Option<f64>>,
}

impl TabLayout {
    /// Creates an empty layout for `len` items.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            offsets: vec![None; len],
        }
    }

    /// Number of items in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the row has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offset of `index`, if it has been measured.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.offsets.get(index).copied().flatten()
    }

    /// Stores the offset of `index`, overwriting any earlier report.
    ///
    /// Returns `false` if `index` is outside the row.
    pub fn insert(&mut self, index: usize, offset: f64) -> bool {
        match self.offsets.get_mut(index) {
            Some(slot) => {
                *slot = Some(offset);
                true
            }
            None => false,
        }
    }

    /// How many items have reported.
    #[must_use]
    pub fn measured_count(&self) -> usize {
        self.offsets.iter().flatten().count()
    }

    /// Whether every item has reported.
    #[must_use]
    pub fn is_total(&self) -> bool {
        self.offsets.iter().all(Option::is_some)
    }

    /// Measured `(index, offset)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.map(|o| (i, o)))
    }
}

/// Where the highlight is headed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IndicatorTarget {
    /// The selected item shows no highlight.
    Hidden,
    /// The selected item has not reported its geometry yet. The highlight is
    /// left as it is.
    Unmeasured,
    /// Offset of the selected item along the row axis.
    Offset(f64),
}

/// Tracker parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorConfig {
    /// Size of the highlight along the row axis.
    pub indicator_width: f64,
    /// Direction of the row.
    pub axis: Axis,
    /// Spring driving the highlight position.
    pub spring: SpringConfig,
    /// Length of opacity fades.
    pub fade_duration: Duration,
    /// Curve of opacity fades.
    pub fade_easing: Easing,
}

impl IndicatorConfig {
    /// The bottom tab bar's underline.
    #[must_use]
    pub const fn tab_bar() -> Self {
        Self {
            indicator_width: 45.0,
            axis: Axis::Horizontal,
            spring: SpringConfig::TAB_INDICATOR,
            fade_duration: Duration::from_millis(300),
            fade_easing: Easing::EaseInOutQuad,
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self::tab_bar()
    }
}

/// What the render layer paints for the highlight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorVisual {
    /// Offset along the row axis.
    pub position: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl IndicatorVisual {
    /// Row-local translation of the highlight.
    #[must_use]
    pub fn transform(&self, axis: Axis) -> Affine {
        axis.translation(self.position)
    }
}

/// Owns the highlight of one row.
pub struct IndicatorTracker {
    id: PresentationId,
    config: IndicatorConfig,
    layout: TabLayout,
    action_slots: Vec<usize>,
    selected: usize,
    position: AnimatedValue,
    opacity: AnimatedValue,
    placed: bool,
    sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for IndicatorTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicatorTracker")
            .field("id", &self.id)
            .field("selected", &self.selected)
            .field("measured", &self.layout.measured_count())
            .field("position", &self.position.value())
            .field("opacity", &self.opacity.value())
            .finish_non_exhaustive()
    }
}

impl IndicatorTracker {
    /// Creates a tracker for a row of `tab_count` items with item 0 selected.
    ///
    /// The highlight is invisible until the selected item is measured.
    #[must_use]
    pub fn new(config: IndicatorConfig, tab_count: usize, timebase: Timebase) -> Self {
        Self {
            id: PresentationId::default(),
            config,
            layout: TabLayout::new(tab_count),
            action_slots: Vec::new(),
            selected: 0,
            position: AnimatedValue::new(0.0, timebase),
            opacity: AnimatedValue::new(0.0, timebase),
            placed: false,
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

    /// Marks `index` as an action slot that never shows the highlight.
    #[must_use]
    pub fn with_action_slot(mut self, index: usize) -> Self {
        if !self.action_slots.contains(&index) {
            self.action_slots.push(index);
        }
        self
    }

    /// Marks `index` as an action slot after construction, hiding the
    /// highlight if it is currently selected.
    pub fn set_action_slot(&mut self, index: usize, now: HostTime) {
        if self.action_slots.contains(&index) {
            return;
        }
        self.action_slots.push(index);
        if index == self.selected {
            self.retarget(RetargetCause::Select, now);
        }
    }

    /// The id reported in trace events.
    #[must_use]
    pub const fn id(&self) -> PresentationId {
        self.id
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Measurements received so far.
    #[must_use]
    pub const fn layout(&self) -> &TabLayout {
        &self.layout
    }

    /// The selected index.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Whether `index` is an action slot.
    #[must_use]
    pub fn is_action_slot(&self, index: usize) -> bool {
        self.action_slots.contains(&index)
    }

    /// Derives the target from the current selection and layout.
    #[must_use]
    pub fn target(&self) -> IndicatorTarget {
        if self.is_action_slot(self.selected) {
            return IndicatorTarget::Hidden;
        }
        match self.layout.get(self.selected) {
            Some(offset) => IndicatorTarget::Offset(offset),
            None => IndicatorTarget::Unmeasured,
        }
    }

    /// Selects `index`. Re-selecting the current index re-derives the target.
    ///
    /// Returns `false` if `index` is outside the row.
    pub fn select(&mut self, index: usize, now: HostTime) -> bool {
        if index >= self.layout.len() {
            self.ignore(Operation::Select, now);
            return false;
        }
        self.selected = index;
        self.retarget(RetargetCause::Select, now);
        true
    }

    /// Records where the highlight should sit for `index`.
    ///
    /// Later reports overwrite earlier ones. Only a report for the selected
    /// index moves the highlight. Returns `false` for an index outside the row
    /// or a non-finite offset.
    pub fn report_measurement(&mut self, index: usize, offset: f64, now: HostTime) -> bool {
        if !offset.is_finite() || !self.layout.insert(index, offset) {
            self.ignore(Operation::Measurement, now);
            return false;
        }
        if index == self.selected {
            self.retarget(RetargetCause::Measurement, now);
        }
        true
    }

    /// Records an item's laid-out frame, centering the highlight under it.
    pub fn report_layout(&mut self, index: usize, frame: Rect, now: HostTime) -> bool {
        let (start, len) = self.config.axis.span(frame);
        let offset = start + len / 2.0 - self.config.indicator_width / 2.0;
        self.report_measurement(index, offset, now)
    }

    /// The latest interpolated visual.
    #[must_use]
    pub fn visual(&self) -> IndicatorVisual {
        IndicatorVisual {
            position: self.position.value(),
            opacity: self.opacity.value(),
        }
    }

    /// Advances position and opacity to `now`.
    pub fn advance(&mut self, now: HostTime) -> Option<Infallible> {
        let position = self.position.advance(now);
        let opacity = self.opacity.advance(now);

        #[cfg(feature = "trace-rich")]
        for (channel, value) in [
            (Channel::IndicatorPosition, self.position),
            (Channel::IndicatorOpacity, self.opacity),
        ] {
            if value.is_animating() {
                let e = crate::trace::SampleEvent {
                    id: self.id,
                    at: now,
                    channel,
                    value: value.value(),
                    velocity: value.velocity(),
                };
                self.tracer().sample(&e);
            }
        }

        if position == Progress::Settled {
            self.settled(Channel::IndicatorPosition, self.position.value(), now);
        }
        if opacity == Progress::Settled {
            self.settled(Channel::IndicatorOpacity, self.opacity.value(), now);
        }
        None
    }

    fn retarget(&mut self, cause: RetargetCause, now: HostTime) {
        let target = self.target();
        let e = RetargetEvent {
            id: self.id,
            at: now,
            selected: self.selected,
            target,
            cause,
        };
        self.tracer().retarget(&e);

        match target {
            IndicatorTarget::Hidden => self.fade(0.0, now),
            // Position and opacity hold until the measurement arrives.
            IndicatorTarget::Unmeasured => {}
            IndicatorTarget::Offset(offset) => {
                if !self.placed {
                    // First placement: appear in place rather than sliding in
                    // from the row origin.
                    self.position.set(offset);
                    self.placed = true;
                } else if self.position.target() != offset {
                    self.position.spring_to(offset, self.config.spring, now);
                }
                self.fade(1.0, now);
            }
        }
    }

    fn fade(&mut self, to: f64, now: HostTime) {
        if self.opacity.target() == to {
            return;
        }
        let duration = self.timebase().duration_to_ticks(self.config.fade_duration);
        self.opacity.tween_to(to, duration, self.config.fade_easing, now);
    }

    fn timebase(&self) -> Timebase {
        self.position.timebase()
    }

    fn tracer(&mut self) -> Tracer<'_> {
        match &mut self.sink {
            Some(sink) => Tracer::new(sink.as_mut()),
            None => Tracer::none(),
        }
    }

    fn settled(&mut self, channel: Channel, value: f64, at: HostTime) {
        let e = SettledEvent {
            id: self.id,
            at,
            channel,
            value,
        };
        self.tracer().settled(&e);
    }

    fn ignore(&mut self, operation: Operation, at: HostTime) {
        let e = IgnoredEvent {
            id: self.id,
            at,
            operation,
            state: None,
        };
        self.tracer().ignored(&e);
    }
}

impl Presentation for IndicatorTracker {
    type Visual = IndicatorVisual;
    type Notice = Infallible;

    fn advance(&mut self, now: HostTime) -> Option<Infallible> {
        Self::advance(self, now)
    }

    fn visual(&self) -> IndicatorVisual {
        Self::visual(self)
    }

    fn is_animating(&self) -> bool {
        self.position.is_animating() || self.opacity.is_animating()
    }
}
