// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller instance identification.

use core::fmt;

/// Names one controller instance in trace output.
///
/// Every usage site (a quick-action launcher, a filter sheet, a tab row) gets
/// its own controller; the host picks the ids. Core passes them through
/// without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PresentationId(pub u32);

impl fmt::Debug for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PresentationId({})", self.0)
    }
}
