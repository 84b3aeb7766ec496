// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation primitives shared by the controllers.
//!
//! - [`SpringConfig`] — damped spring parameters and a sub-stepped integrator.
//! - [`Tween`] / [`Easing`] — fixed-duration interpolation.
//! - [`AnimatedValue`] — a scalar owned by at most one animation at a time,
//!   advanced once per frame by its controller.

mod spring;
mod tween;
mod value;

pub use spring::SpringConfig;
pub use tween::{Easing, Tween};
pub use value::{AnimatedValue, Progress};
