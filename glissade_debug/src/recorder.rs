// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, one tag byte followed by the
//! event's fields. [`decode`] reads them back as an iterator of
//! [`RecordedEvent`], stopping at the first truncated or unknown record.

use glissade_core::gesture::DismissDecision;
use glissade_core::id::PresentationId;
use glissade_core::indicator::IndicatorTarget;
use glissade_core::overlay::{CloseReason, OverlayState};
use glissade_core::time::HostTime;
use glissade_core::trace::{
    Channel, DragReleaseEvent, IgnoredEvent, Operation, RetargetCause, RetargetEvent,
    SampleEvent, SettledEvent, TraceSink, TransitionEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TRANSITION: u8 = 1;
const TAG_DRAG_RELEASE: u8 = 2;
const TAG_RETARGET: u8 = 3;
const TAG_SETTLED: u8 = 4;
const TAG_IGNORED: u8 = 5;
const TAG_SAMPLE: u8 = 6;

// ---------------------------------------------------------------------------
// Field codes
// ---------------------------------------------------------------------------

fn state_code(s: OverlayState) -> u8 {
    match s {
        OverlayState::Closed => 0,
        OverlayState::Opening => 1,
        OverlayState::Open => 2,
        OverlayState::Closing => 3,
    }
}

fn state_from(code: u8) -> Option<OverlayState> {
    Some(match code {
        0 => OverlayState::Closed,
        1 => OverlayState::Opening,
        2 => OverlayState::Open,
        3 => OverlayState::Closing,
        _ => return None,
    })
}

fn reason_code(r: CloseReason) -> u8 {
    match r {
        CloseReason::Backdrop => 1,
        CloseReason::CloseButton => 2,
        CloseReason::DragCommit => 3,
        CloseReason::BackRequest => 4,
        CloseReason::Programmatic => 5,
    }
}

fn reason_from(code: u8) -> Option<CloseReason> {
    Some(match code {
        1 => CloseReason::Backdrop,
        2 => CloseReason::CloseButton,
        3 => CloseReason::DragCommit,
        4 => CloseReason::BackRequest,
        5 => CloseReason::Programmatic,
        _ => return None,
    })
}

fn channel_code(c: Channel) -> u8 {
    match c {
        Channel::SheetOffset => 0,
        Channel::IndicatorPosition => 1,
        Channel::IndicatorOpacity => 2,
    }
}

fn channel_from(code: u8) -> Option<Channel> {
    Some(match code {
        0 => Channel::SheetOffset,
        1 => Channel::IndicatorPosition,
        2 => Channel::IndicatorOpacity,
        _ => return None,
    })
}

fn operation_code(op: Operation) -> u8 {
    match op {
        Operation::Open => 0,
        Operation::Dismiss => 1,
        Operation::DragSample => 2,
        Operation::DragEnd => 3,
        Operation::Resize => 4,
        Operation::Select => 5,
        Operation::Measurement => 6,
    }
}

fn operation_from(code: u8) -> Option<Operation> {
    Some(match code {
        0 => Operation::Open,
        1 => Operation::Dismiss,
        2 => Operation::DragSample,
        3 => Operation::DragEnd,
        4 => Operation::Resize,
        5 => Operation::Select,
        6 => Operation::Measurement,
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_header(&mut self, tag: u8, id: PresentationId, at: HostTime) {
        self.write_u8(tag);
        self.write_u32(id.0);
        self.write_u64(at.ticks());
    }
}

impl TraceSink for RecorderSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_header(TAG_TRANSITION, e.id, e.at);
        self.write_u8(state_code(e.from));
        self.write_u8(state_code(e.to));
        self.write_u8(e.reason.map_or(0, reason_code));
    }

    fn on_drag_release(&mut self, e: &DragReleaseEvent) {
        self.write_header(TAG_DRAG_RELEASE, e.id, e.at);
        self.write_f64(e.distance);
        self.write_f64(e.velocity);
        self.write_u8(match e.decision {
            DismissDecision::Cancel => 0,
            DismissDecision::Commit => 1,
        });
    }

    fn on_retarget(&mut self, e: &RetargetEvent) {
        self.write_header(TAG_RETARGET, e.id, e.at);
        self.write_u64(e.selected as u64);
        let (kind, offset) = match e.target {
            IndicatorTarget::Hidden => (0, 0.0),
            IndicatorTarget::Unmeasured => (1, 0.0),
            IndicatorTarget::Offset(offset) => (2, offset),
        };
        self.write_u8(kind);
        self.write_f64(offset);
        self.write_u8(match e.cause {
            RetargetCause::Select => 0,
            RetargetCause::Measurement => 1,
        });
    }

    fn on_settled(&mut self, e: &SettledEvent) {
        self.write_header(TAG_SETTLED, e.id, e.at);
        self.write_u8(channel_code(e.channel));
        self.write_f64(e.value);
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        self.write_header(TAG_IGNORED, e.id, e.at);
        self.write_u8(operation_code(e.operation));
        self.write_u8(e.state.map_or(0, |s| state_code(s) + 1));
    }

    fn on_sample(&mut self, e: &SampleEvent) {
        self.write_header(TAG_SAMPLE, e.id, e.at);
        self.write_u8(channel_code(e.channel));
        self.write_f64(e.value);
        self.write_f64(e.velocity);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`DragReleaseEvent`].
    DragRelease(DragReleaseEvent),
    /// A [`RetargetEvent`].
    Retarget(RetargetEvent),
    /// A [`SettledEvent`].
    Settled(SettledEvent),
    /// An [`IgnoredEvent`].
    Ignored(IgnoredEvent),
    /// A [`SampleEvent`].
    Sample(SampleEvent),
}

impl RecordedEvent {
    /// Emitting controller.
    #[must_use]
    pub fn id(&self) -> PresentationId {
        match self {
            Self::Transition(e) => e.id,
            Self::DragRelease(e) => e.id,
            Self::Retarget(e) => e.id,
            Self::Settled(e) => e.id,
            Self::Ignored(e) => e.id,
            Self::Sample(e) => e.id,
        }
    }

    /// When the event happened.
    #[must_use]
    pub fn at(&self) -> HostTime {
        match self {
            Self::Transition(e) => e.at,
            Self::DragRelease(e) => e.at,
            Self::Retarget(e) => e.at,
            Self::Settled(e) => e.at,
            Self::Ignored(e) => e.at,
            Self::Sample(e) => e.at,
        }
    }

    /// Replays this event into `sink`.
    pub fn replay(&self, sink: &mut dyn TraceSink) {
        match self {
            Self::Transition(e) => sink.on_transition(e),
            Self::DragRelease(e) => sink.on_drag_release(e),
            Self::Retarget(e) => sink.on_retarget(e),
            Self::Settled(e) => sink.on_settled(e),
            Self::Ignored(e) => sink.on_ignored(e),
            Self::Sample(e) => sink.on_sample(e),
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_header(&mut self) -> Option<(PresentationId, HostTime)> {
        Some((PresentationId(self.read_u32()?), HostTime(self.read_u64()?)))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        let (id, at) = self.read_header()?;
        let from = state_from(self.read_u8()?)?;
        let to = state_from(self.read_u8()?)?;
        let reason = match self.read_u8()? {
            0 => None,
            code => Some(reason_from(code)?),
        };
        Some(RecordedEvent::Transition(TransitionEvent {
            id,
            at,
            from,
            to,
            reason,
        }))
    }

    fn decode_drag_release(&mut self) -> Option<RecordedEvent> {
        let (id, at) = self.read_header()?;
        Some(RecordedEvent::DragRelease(DragReleaseEvent {
            id,
            at,
            distance: self.read_f64()?,
            velocity: self.read_f64()?,
            decision: match self.read_u8()? {
                0 => DismissDecision::Cancel,
                1 => DismissDecision::Commit,
                _ => return None,
            },
        }))
    }

    fn decode_retarget(&mut self) -> Option<RecordedEvent> {
        let (id, at) = self.read_header()?;
        let selected = usize::try_from(self.read_u64()?).ok()?;
        let kind = self.read_u8()?;
        let offset = self.read_f64()?;
        let target = match kind {
            0 => IndicatorTarget::Hidden,
            1 => IndicatorTarget::Unmeasured,
            2 => IndicatorTarget::Offset(offset),
            _ => return None,
        };
        let cause = match self.read_u8()? {
            0 => RetargetCause::Select,
            1 => RetargetCause::Measurement,
            _ => return None,
        };
        Some(RecordedEvent::Retarget(RetargetEvent {
            id,
            at,
            selected,
            target,
            cause,
        }))
    }

    fn decode_settled(&mut self) -> Option<RecordedEvent> {
        let (id, at) = self.read_header()?;
        Some(RecordedEvent::Settled(SettledEvent {
            id,
            at,
            channel: channel_from(self.read_u8()?)?,
            value: self.read_f64()?,
        }))
    }

    fn decode_ignored(&mut self) -> Option<RecordedEvent> {
        let (id, at) = self.read_header()?;
        let operation = operation_from(self.read_u8()?)?;
        let state = match self.read_u8()? {
            0 => None,
            code => Some(state_from(code - 1)?),
        };
        Some(RecordedEvent::Ignored(IgnoredEvent {
            id,
            at,
            operation,
            state,
        }))
    }

    fn decode_sample(&mut self) -> Option<RecordedEvent> {
        let (id, at) = self.read_header()?;
        Some(RecordedEvent::Sample(SampleEvent {
            id,
            at,
            channel: channel_from(self.read_u8()?)?,
            value: self.read_f64()?,
            velocity: self.read_f64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TRANSITION => self.decode_transition(),
            TAG_DRAG_RELEASE => self.decode_drag_release(),
            TAG_RETARGET => self.decode_retarget(),
            TAG_SETTLED => self.decode_settled(),
            TAG_IGNORED => self.decode_ignored(),
            TAG_SAMPLE => self.decode_sample(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glissade_core::gesture::DragSample;
    use glissade_core::indicator::{IndicatorConfig, IndicatorTracker};
    use glissade_core::overlay::{OverlayConfig, OverlayController};
    use glissade_core::time::Timebase;

    use super::*;

    const FRAME: u64 = 16_666_667;

    /// Records an open → drag 200 → release session.
    fn record_dismiss_session() -> Vec<u8> {
        let rec = Rc::new(RefCell::new(RecorderSink::new()));
        let mut sheet = OverlayController::new(OverlayConfig::quick_action(800.0), Timebase::NANOS)
            .with_id(PresentationId(1))
            .with_trace_sink(Box::new(Rc::clone(&rec)));

        let mut t = 0;
        sheet.open(HostTime(t));
        while sheet.state() != OverlayState::Open {
            t += FRAME;
            sheet.advance(HostTime(t));
        }
        sheet.on_drag_sample(DragSample::new(200.0, HostTime(t + 1)));
        sheet.on_drag_end(200.0, HostTime(t + 2));
        sheet.close(HostTime(t + 3));
        while sheet.state() != OverlayState::Closed {
            t += FRAME;
            sheet.advance(HostTime(t));
        }
        drop(sheet);
        Rc::try_unwrap(rec)
            .expect("sheet dropped its handle")
            .into_inner()
            .into_bytes()
    }

    #[test]
    fn session_decodes_in_order() {
        let bytes = record_dismiss_session();
        let events: Vec<_> = decode(&bytes)
            .filter(|e| !matches!(e, RecordedEvent::Sample(_)))
            .collect();

        let transitions: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Transition(t) => Some((t.to, t.reason)),
                _ => None,
            })
            .collect();
        assert_eq!(
            transitions,
            &[
                (OverlayState::Opening, None),
                (OverlayState::Open, None),
                (OverlayState::Closing, Some(CloseReason::DragCommit)),
                (OverlayState::Closed, Some(CloseReason::DragCommit)),
            ]
        );

        let release = events.iter().find_map(|e| match e {
            RecordedEvent::DragRelease(r) => Some(*r),
            _ => None,
        });
        let release = release.expect("drag release recorded");
        assert_eq!(release.distance, 200.0);
        assert_eq!(release.decision, DismissDecision::Commit);

        let ignored: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Ignored(i) => Some((i.operation, i.state)),
                _ => None,
            })
            .collect();
        assert_eq!(
            ignored,
            &[(Operation::Dismiss, Some(OverlayState::Closing))],
            "close while closing is recorded as ignored"
        );
        assert!(events.iter().all(|e| e.id() == PresentationId(1)));
    }

    #[test]
    fn timestamps_are_monotonic() {
        let bytes = record_dismiss_session();
        let times: Vec<_> = decode(&bytes).map(|e| e.at()).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]), "{times:?}");
    }

    #[test]
    fn indicator_events_decode() {
        let rec = Rc::new(RefCell::new(RecorderSink::new()));
        let mut tabs = IndicatorTracker::new(IndicatorConfig::tab_bar(), 3, Timebase::NANOS)
            .with_action_slot(2)
            .with_id(PresentationId(9))
            .with_trace_sink(Box::new(Rc::clone(&rec)));
        tabs.report_measurement(1, 77.5, HostTime(5));
        tabs.select(1, HostTime(6));
        tabs.select(2, HostTime(7));
        tabs.select(7, HostTime(8));

        let events: Vec<_> = decode(rec.borrow().as_bytes()).collect();
        assert_eq!(events.len(), 3, "{events:?}");
        match events[0] {
            RecordedEvent::Retarget(e) => {
                assert_eq!(e.selected, 1);
                assert_eq!(e.target, IndicatorTarget::Offset(77.5));
                assert_eq!(e.cause, RetargetCause::Select);
            }
            other => panic!("expected Retarget, got {other:?}"),
        }
        match events[1] {
            RecordedEvent::Retarget(e) => {
                assert_eq!(e.selected, 2);
                assert_eq!(e.target, IndicatorTarget::Hidden);
            }
            other => panic!("expected Retarget, got {other:?}"),
        }
        match events[2] {
            RecordedEvent::Ignored(e) => {
                assert_eq!(e.id, PresentationId(9));
                assert_eq!(e.operation, Operation::Select);
                assert_eq!(e.state, None);
            }
            other => panic!("expected Ignored, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let bytes = record_dismiss_session();
        let full = decode(&bytes).count();
        let cut = decode(&bytes[..bytes.len() - 1]).count();
        assert_eq!(cut, full - 1, "only the partial record is lost");
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_settled(&SettledEvent {
            id: PresentationId(0),
            at: HostTime(1),
            channel: Channel::IndicatorOpacity,
            value: 1.0,
        });
        let mut bytes = rec.into_bytes();
        bytes.push(0xff);
        bytes.extend_from_slice(&[0; 32]);
        assert_eq!(decode(&bytes).count(), 1);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty(), "no bytes, no events");
    }

    #[test]
    fn replay_feeds_another_sink() {
        let bytes = record_dismiss_session();
        let mut copy = RecorderSink::new();
        for event in decode(&bytes) {
            event.replay(&mut copy);
        }
        assert_eq!(copy.as_bytes(), bytes.as_slice());
    }
}
