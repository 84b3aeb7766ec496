// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Each controller gets its own track (`tid` is the controller's
//! [`PresentationId`](glissade_core::id::PresentationId)). `Opening` and
//! `Closing` become duration slices, per-frame samples become counters, and
//! everything else is an instant event.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use glissade_core::indicator::IndicatorTarget;
use glissade_core::overlay::OverlayState;
use glissade_core::time::{HostTime, Timebase};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        let ts = to_us(recorded.at(), timebase);
        let tid = recorded.id().0;
        match recorded {
            RecordedEvent::Transition(e) => {
                if e.from.is_transient() {
                    events.push(json!({
                        "ph": "E",
                        "name": format!("{:?}", e.from),
                        "cat": "Overlay",
                        "ts": ts,
                        "pid": 0,
                        "tid": tid,
                    }));
                }
                if e.to.is_transient() {
                    events.push(json!({
                        "ph": "B",
                        "name": format!("{:?}", e.to),
                        "cat": "Overlay",
                        "ts": ts,
                        "pid": 0,
                        "tid": tid,
                        "args": {
                            "reason": e.reason.map(|r| format!("{r:?}")),
                        }
                    }));
                }
                if matches!(e.to, OverlayState::Open | OverlayState::Closed) {
                    events.push(json!({
                        "ph": "i",
                        "name": format!("{:?}", e.to),
                        "cat": "Overlay",
                        "ts": ts,
                        "pid": 0,
                        "tid": tid,
                        "s": "t",
                        "args": {
                            "from": format!("{:?}", e.from),
                            "reason": e.reason.map(|r| format!("{r:?}")),
                        }
                    }));
                }
            }
            RecordedEvent::DragRelease(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "DragRelease",
                    "cat": "Gesture",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "distance": e.distance,
                        "velocity": e.velocity,
                        "decision": format!("{:?}", e.decision),
                    }
                }));
            }
            RecordedEvent::Retarget(e) => {
                let target = match e.target {
                    IndicatorTarget::Offset(offset) => json!(offset),
                    other => json!(format!("{other:?}")),
                };
                events.push(json!({
                    "ph": "i",
                    "name": "Retarget",
                    "cat": "Indicator",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "selected": e.selected,
                        "target": target,
                        "cause": format!("{:?}", e.cause),
                    }
                }));
            }
            RecordedEvent::Settled(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Settled",
                    "cat": "Motion",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "channel": format!("{:?}", e.channel),
                        "value": e.value,
                    }
                }));
            }
            RecordedEvent::Ignored(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Ignored",
                    "cat": "Misuse",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "operation": format!("{:?}", e.operation),
                        "state": e.state.map(|s| format!("{s:?}")),
                    }
                }));
            }
            RecordedEvent::Sample(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": format!("{:?}#{}", e.channel, tid),
                    "cat": "Motion",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "args": {
                        "value": e.value,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_us(t: HostTime, timebase: Timebase) -> f64 {
    t.to_nanos(timebase) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::recorder::RecorderSink;
    use glissade_core::gesture::DragSample;
    use glissade_core::id::PresentationId;
    use glissade_core::overlay::{OverlayConfig, OverlayController};
    use glissade_core::trace::{IgnoredEvent, Operation, TraceSink};

    fn exported(bytes: &[u8]) -> Vec<Value> {
        let mut out = Vec::new();
        export(bytes, Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn overlay_session_has_balanced_slices() {
        let rec = Rc::new(RefCell::new(RecorderSink::new()));
        let mut sheet = OverlayController::new(OverlayConfig::filter_sheet(600.0), Timebase::NANOS)
            .with_id(PresentationId(4))
            .with_trace_sink(Box::new(Rc::clone(&rec)));

        let frame = 16_666_667;
        let mut t = 0;
        sheet.open(HostTime(t));
        while sheet.state() != OverlayState::Open {
            t += frame;
            sheet.advance(HostTime(t));
        }
        sheet.on_drag_sample(DragSample::new(60.0, HostTime(t + 1)));
        sheet.on_drag_end(60.0, HostTime(t + 2));
        sheet.backdrop_tapped(HostTime(t + 3));
        while sheet.state() != OverlayState::Closed {
            t += frame;
            sheet.advance(HostTime(t));
        }

        let parsed = exported(rec.borrow().as_bytes());
        let phases = |ph: &str| parsed.iter().filter(|e| e["ph"] == ph).count();
        assert_eq!(phases("B"), 2, "Opening and Closing slices");
        assert_eq!(phases("B"), phases("E"), "every slice is closed");
        assert!(phases("C") > 0, "per-frame counters");
        assert!(parsed.iter().all(|e| e["tid"] == 4), "one track per controller");

        let release = parsed
            .iter()
            .find(|e| e["name"] == "DragRelease")
            .expect("release exported");
        assert_eq!(release["args"]["decision"], "Cancel");

        let closed = parsed
            .iter()
            .find(|e| e["ph"] == "i" && e["name"] == "Closed")
            .expect("closed instant exported");
        assert_eq!(closed["args"]["reason"], "Backdrop");
    }

    #[test]
    fn ignored_event_names_operation() {
        let mut rec = RecorderSink::new();
        rec.on_ignored(&IgnoredEvent {
            id: PresentationId(1),
            at: HostTime(2_000),
            operation: Operation::Open,
            state: Some(OverlayState::Closing),
        });
        let parsed = exported(rec.as_bytes());
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["ts"], 2.0);
        assert_eq!(parsed[0]["args"]["operation"], "Open");
        assert_eq!(parsed[0]["args"]["state"], "Closing");
    }

    #[test]
    fn export_empty_recording() {
        let parsed = exported(&[]);
        assert!(parsed.is_empty(), "no events, empty array");
    }
}
