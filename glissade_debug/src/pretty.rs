// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use glissade_core::indicator::IndicatorTarget;
use glissade_core::time::{HostTime, Timebase};
use glissade_core::trace::{
    DragReleaseEvent, IgnoredEvent, RetargetEvent, SampleEvent, SettledEvent, TraceSink,
    TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    samples: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("samples", &self.samples)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::new(Box::new(std::io::stderr()), timebase)
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self::with_writer(writer, timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Per-frame samples are skipped unless enabled with
    /// [`with_samples`](Self::with_samples).
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            samples: false,
        }
    }

    /// Also prints one line per animated channel per frame.
    #[must_use]
    pub fn with_samples(mut self, samples: bool) -> Self {
        self.samples = samples;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ms(&self, t: HostTime) -> f64 {
        t.to_nanos(self.timebase) as f64 / 1_000_000.0
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        let at = self.ms(e.at);
        let _ = match e.reason {
            Some(reason) => writeln!(
                self.writer,
                "[{at:>9.3}ms] {:?} {:?} -> {:?} reason={reason:?}",
                e.id, e.from, e.to,
            ),
            None => writeln!(
                self.writer,
                "[{at:>9.3}ms] {:?} {:?} -> {:?}",
                e.id, e.from, e.to,
            ),
        };
    }

    fn on_drag_release(&mut self, e: &DragReleaseEvent) {
        let _ = writeln!(
            self.writer,
            "[{:>9.3}ms] {:?} release distance={:.1} velocity={:.0}/s -> {:?}",
            self.ms(e.at),
            e.id,
            e.distance,
            e.velocity,
            e.decision,
        );
    }

    fn on_retarget(&mut self, e: &RetargetEvent) {
        let at = self.ms(e.at);
        let _ = match e.target {
            IndicatorTarget::Offset(offset) => writeln!(
                self.writer,
                "[{at:>9.3}ms] {:?} retarget selected={} -> {offset:.1} ({:?})",
                e.id, e.selected, e.cause,
            ),
            target => writeln!(
                self.writer,
                "[{at:>9.3}ms] {:?} retarget selected={} -> {target:?} ({:?})",
                e.id, e.selected, e.cause,
            ),
        };
    }

    fn on_settled(&mut self, e: &SettledEvent) {
        let _ = writeln!(
            self.writer,
            "[{:>9.3}ms] {:?} settled {:?}={:.2}",
            self.ms(e.at),
            e.id,
            e.channel,
            e.value,
        );
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        let at = self.ms(e.at);
        let _ = match e.state {
            Some(state) => writeln!(
                self.writer,
                "[{at:>9.3}ms] {:?} ignored {:?} while {state:?}",
                e.id, e.operation,
            ),
            None => writeln!(
                self.writer,
                "[{at:>9.3}ms] {:?} ignored {:?}",
                e.id, e.operation,
            ),
        };
    }

    fn on_sample(&mut self, e: &SampleEvent) {
        if !self.samples {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[{:>9.3}ms] {:?} {:?}={:.2} v={:.1}",
            self.ms(e.at),
            e.id,
            e.channel,
            e.value,
            e.velocity,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glissade_core::id::PresentationId;
    use glissade_core::overlay::{CloseReason, OverlayState};
    use glissade_core::trace::{Channel, Operation};

    fn sink() -> PrettyPrintSink<Vec<u8>> {
        PrettyPrintSink::with_writer(Vec::new(), Timebase::NANOS)
    }

    fn text(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn transition_line() {
        let mut sink = sink();
        sink.on_transition(&TransitionEvent {
            id: PresentationId(2),
            at: HostTime(16_000_000),
            from: OverlayState::Open,
            to: OverlayState::Closing,
            reason: Some(CloseReason::Backdrop),
        });
        let output = text(sink);
        assert!(output.contains("16.000ms"), "got: {output}");
        assert!(output.contains("Open -> Closing"), "got: {output}");
        assert!(output.contains("reason=Backdrop"), "got: {output}");
    }

    #[test]
    fn ignored_line_names_operation_and_state() {
        let mut sink = sink();
        sink.on_ignored(&IgnoredEvent {
            id: PresentationId(0),
            at: HostTime(0),
            operation: Operation::DragEnd,
            state: Some(OverlayState::Closed),
        });
        let output = text(sink);
        assert!(output.contains("ignored DragEnd while Closed"), "got: {output}");
    }

    #[test]
    fn samples_are_opt_in() {
        let sample = SampleEvent {
            id: PresentationId(0),
            at: HostTime(0),
            channel: Channel::SheetOffset,
            value: 12.0,
            velocity: -300.0,
        };
        let mut quiet = sink();
        quiet.on_sample(&sample);
        assert!(text(quiet).is_empty(), "samples are off by default");

        let mut loud = sink().with_samples(true);
        loud.on_sample(&sample);
        let output = text(loud);
        assert!(output.contains("SheetOffset=12.00"), "got: {output}");
    }
}
