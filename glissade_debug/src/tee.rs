// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out to two sinks.

use glissade_core::trace::{
    DragReleaseEvent, IgnoredEvent, RetargetEvent, SampleEvent, SettledEvent, TraceSink,
    TransitionEvent,
};

/// A [`TraceSink`] that forwards every event to `first`, then `second`.
///
/// Nest `Tee`s to reach more than two sinks.
#[derive(Clone, Debug, Default)]
pub struct Tee<A, B> {
    /// Receives each event first.
    pub first: A,
    /// Receives each event second.
    pub second: B,
}

impl<A, B> Tee<A, B> {
    /// Creates a fan-out sink.
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the tee back into its sinks.
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.first.on_transition(e);
        self.second.on_transition(e);
    }

    fn on_drag_release(&mut self, e: &DragReleaseEvent) {
        self.first.on_drag_release(e);
        self.second.on_drag_release(e);
    }

    fn on_retarget(&mut self, e: &RetargetEvent) {
        self.first.on_retarget(e);
        self.second.on_retarget(e);
    }

    fn on_settled(&mut self, e: &SettledEvent) {
        self.first.on_settled(e);
        self.second.on_settled(e);
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        self.first.on_ignored(e);
        self.second.on_ignored(e);
    }

    fn on_sample(&mut self, e: &SampleEvent) {
        self.first.on_sample(e);
        self.second.on_sample(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pretty::PrettyPrintSink;
    use crate::recorder::{RecorderSink, decode};
    use glissade_core::id::PresentationId;
    use glissade_core::overlay::OverlayState;
    use glissade_core::time::{HostTime, Timebase};

    #[test]
    fn both_sinks_see_each_event() {
        let mut tee = Tee::new(
            RecorderSink::new(),
            PrettyPrintSink::with_writer(Vec::new(), Timebase::NANOS),
        );
        tee.on_transition(&TransitionEvent {
            id: PresentationId(1),
            at: HostTime(0),
            from: OverlayState::Closed,
            to: OverlayState::Opening,
            reason: None,
        });
        let (rec, pretty) = tee.into_inner();
        assert_eq!(decode(rec.as_bytes()).count(), 1);
        let text = String::from_utf8(pretty.into_inner()).unwrap();
        assert!(text.contains("Closed -> Opening"), "got: {text}");
    }
}
