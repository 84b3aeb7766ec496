// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-driven, physics-animated overlays and selection indicators.
//!
//! `glissade_core` owns the state machines behind two common mobile UI
//! elements: a sheet that springs in from a viewport edge and can be dragged
//! away, and a highlight that follows the selected item in a row whose layout
//! is only known once the items have measured themselves. It is `no_std`
//! compatible (with `alloc`) and knows nothing about any particular view
//! system.
//!
//! # Architecture
//!
//! Hosts feed discrete input into a controller as it arrives, then advance
//! the controller once per rendered frame:
//!
//! ```text
//!   taps, drag samples,            select, measurements
//!   drag release                          │
//!       │                                 ▼
//!       ▼                          IndicatorTracker
//!   OverlayController                     │
//!       │                                 │
//!       └──────► Presentation::advance(now) ◄─┘
//!                        │
//!                        ▼
//!          Visual ──► Presenter::present()
//!                        │
//!                        ▼
//!          Lifecycle notices (Opened / Closed)
//! ```
//!
//! **[`overlay`]** — [`OverlayController`](overlay::OverlayController):
//! `Closed → Opening → Open → Closing → Closed`, with 1:1 drag tracking and a
//! single commit-or-cancel decision at release.
//!
//! **[`indicator`]** — [`IndicatorTracker`](indicator::IndicatorTracker):
//! an incrementally filled [`TabLayout`](indicator::TabLayout) and a target
//! re-derived on every selection or measurement.
//!
//! **[`gesture`]** — Drag samples, release-velocity estimation, and the
//! [`DismissPolicy`](gesture::DismissPolicy) that decides a release.
//!
//! **[`motion`]** — Springs, tweens, and the
//! [`AnimatedValue`](motion::AnimatedValue) both controllers animate with.
//!
//! **[`presentation`]** — The [`Presentation`](presentation::Presentation)
//! and [`Presenter`](presentation::Presenter) traits connecting controllers
//! to a host's frame loop and render layer.
//!
//! **[`time`]** — Host-time ticks and the timebase that converts them.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! controller instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-frame
//!   sample events for every animated channel.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod gesture;
pub mod id;
pub mod indicator;
pub mod motion;
pub mod overlay;
pub mod presentation;
pub mod time;
pub mod trace;
