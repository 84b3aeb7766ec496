// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted session that exercises the tracing and diagnostics pipeline.
//!
//! A five-slot tab bar (the center slot is a "create" action that shows no
//! highlight) opens a quick-action sheet that is dragged away, then a filter
//! sheet is dragged a little, snaps back, and is closed from its backdrop.
//! Every controller reports to one shared sink that fans out to a
//! [`PrettyPrintSink`](glissade_debug::pretty::PrettyPrintSink) on stdout and
//! a [`RecorderSink`](glissade_debug::recorder::RecorderSink); the recording
//! is exported as a Chrome trace JSON file at the end.

use std::cell::RefCell;
use std::fmt::Debug;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::Rect;

use glissade_core::gesture::DragSample;
use glissade_core::id::PresentationId;
use glissade_core::indicator::{IndicatorConfig, IndicatorTracker};
use glissade_core::overlay::{OverlayConfig, OverlayController};
use glissade_core::presentation::{Presentation, Presenter};
use glissade_harness::{FrameClock, MotionProbe, run_until_settled};

use glissade_debug::pretty::PrettyPrintSink;
use glissade_debug::recorder::RecorderSink;
use glissade_debug::tee::Tee;

/// Viewport height in points.
const VIEWPORT: f64 = 812.0;
/// Tab bar slot widths, left to right.
const TAB_WIDTHS: [f64; 5] = [72.0, 80.0, 64.0, 96.0, 88.0];
/// Order in which the tab slots finish layout.
const LAYOUT_ORDER: [usize; 5] = [3, 0, 4, 1, 2];
const CREATE_SLOT: usize = 2;
const MS: u64 = 1_000_000;

type SharedSink = Rc<RefCell<Tee<PrettyPrintSink, RecorderSink>>>;

fn main() {
    let mut clock = FrameClock::default();
    let timebase = clock.timebase();

    // -- sinks -------------------------------------------------------------
    let shared: SharedSink = Rc::new(RefCell::new(Tee::new(
        PrettyPrintSink::new(Box::new(std::io::stdout()), timebase),
        RecorderSink::new(),
    )));

    // -- controllers -------------------------------------------------------
    let mut tabs = IndicatorTracker::new(IndicatorConfig::tab_bar(), TAB_WIDTHS.len(), timebase)
        .with_action_slot(CREATE_SLOT)
        .with_id(PresentationId(1))
        .with_trace_sink(Box::new(Rc::clone(&shared)));
    let mut quick = OverlayController::new(OverlayConfig::quick_action(VIEWPORT), timebase)
        .with_id(PresentationId(2))
        .with_trace_sink(Box::new(Rc::clone(&shared)));
    let mut filter = OverlayController::new(OverlayConfig::filter_sheet(VIEWPORT), timebase)
        .with_id(PresentationId(3))
        .with_trace_sink(Box::new(Rc::clone(&shared)));

    // 1. Tab bar lays out, out of order.
    let mut x = 0.0;
    let frames: Vec<Rect> = TAB_WIDTHS
        .iter()
        .map(|&w| {
            let frame = Rect::new(x, 0.0, x + w, 49.0);
            x += w;
            frame
        })
        .collect();
    for index in LAYOUT_ORDER {
        tabs.report_layout(index, frames[index], clock.now());
    }
    settle("tabs: initial layout", &mut tabs, &mut clock);

    // 2. Move between regular tabs.
    tabs.select(1, clock.now());
    settle("tabs: select 1", &mut tabs, &mut clock);

    // 3. Tap the create slot: the highlight fades and the quick-action sheet
    //    opens.
    tabs.select(CREATE_SLOT, clock.now());
    settle("tabs: select create", &mut tabs, &mut clock);
    quick.open(clock.now());
    settle("quick: open", &mut quick, &mut clock);

    // 4. Drag the quick-action sheet 200pt down and let go.
    drag(&mut quick, &clock, 200.0);
    settle("quick: drag 200 + release", &mut quick, &mut clock);

    // 5. Back to a regular tab, then open the filter sheet.
    tabs.select(3, clock.now());
    settle("tabs: select 3", &mut tabs, &mut clock);
    filter.open(clock.now());
    settle("filter: open", &mut filter, &mut clock);

    // 6. Drag it 60pt: not enough, it snaps back.
    drag(&mut filter, &clock, 60.0);
    settle("filter: drag 60 + release", &mut filter, &mut clock);

    // 7. A stray second tap on the backdrop is ignored while closing.
    filter.backdrop_tapped(clock.now());
    filter.backdrop_tapped(clock.between(MS));
    settle("filter: backdrop", &mut filter, &mut clock);

    // -- export Chrome trace -----------------------------------------------
    drop((tabs, quick, filter));
    let path = "glissade_trace.json";
    let file = File::create(path).expect("failed to create glissade_trace.json");
    let mut writer = BufWriter::new(file);
    let sink = shared.borrow();
    glissade_debug::chrome::export(sink.second.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({} frames, {} bytes recorded)",
        clock.frame_index(),
        sink.second.as_bytes().len()
    );
}

/// Four evenly spaced samples 8ms apart, then release.
fn drag(sheet: &mut OverlayController, clock: &FrameClock, distance: f64) {
    for step in 1..=4_u32 {
        let at = clock.between(u64::from(step) * 8 * MS);
        sheet.on_drag_sample(DragSample::new(distance * f64::from(step) / 4.0, at));
    }
    sheet.on_drag_end(distance, clock.between(32 * MS));
}

/// Runs `presentation` until it rests and prints a sparkline of its motion.
fn settle<P>(label: &str, presentation: &mut P, clock: &mut FrameClock)
where
    P: Presentation,
    P::Notice: Debug,
    MotionProbe: Presenter<P::Visual>,
{
    let mut probe = MotionProbe::new();
    let report = run_until_settled(presentation, &mut probe, clock, 600);
    let (lo, hi) = (
        probe.min().unwrap_or_default(),
        probe.max().unwrap_or_default(),
    );
    println!(
        "-- {label}: {} frames [{}] {lo:.0}..{hi:.0} notices={:?}",
        report.frames,
        probe.sparkline_ascii(lo, hi),
        report.notices,
    );
}
