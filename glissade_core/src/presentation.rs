// Copyright 2026 the Glissade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract between controllers and the host's frame loop.
//!
//! Both controllers implement [`Presentation`]: the host feeds them discrete
//! events through their inherent methods, then once per rendered frame calls
//! [`advance`](Presentation::advance) and hands the resulting visual to its
//! render layer. The render layer implements [`Presenter`] and only paints;
//! nothing it reads is fed back into controller logic.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(now: HostTime) {
//!     // Events that arrived since the last frame were already applied:
//!     //   sheet.open(t), sheet.on_drag_sample(s), tabs.select(i, t), ...
//!
//!     if let Some(Lifecycle::Closed(reason)) = drive(&mut sheet, &mut sheet_view, now) {
//!         release_focus(reason);
//!     }
//!     drive(&mut tabs, &mut highlight_view, now);
//! }
//! ```

use kurbo::{Affine, Rect, Vec2};

use crate::time::HostTime;

/// Direction along which a row of items is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Items laid out left to right.
    #[default]
    Horizontal,
    /// Items laid out top to bottom.
    Vertical,
}

impl Axis {
    /// Translation by `offset` along this axis.
    #[must_use]
    pub fn translation(self, offset: f64) -> Affine {
        match self {
            Self::Horizontal => Affine::translate(Vec2::new(offset, 0.0)),
            Self::Vertical => Affine::translate(Vec2::new(0.0, offset)),
        }
    }

    /// Start coordinate and length of `frame` along this axis.
    #[must_use]
    pub fn span(self, frame: Rect) -> (f64, f64) {
        match self {
            Self::Horizontal => (frame.x0, frame.width()),
            Self::Vertical => (frame.y0, frame.height()),
        }
    }
}

/// Viewport edge an overlay is anchored to.
///
/// The controller works in *dismiss-direction distance*: 0 is the resting
/// position, positive values move the sheet toward (and past) its edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Bottom sheet; dragging down dismisses.
    #[default]
    Bottom,
    /// Top sheet; dragging up dismisses.
    Top,
}

impl Edge {
    /// Converts a raw vertical drag delta (positive is downward) to distance
    /// in the dismiss direction.
    #[must_use]
    pub const fn dismiss_distance(self, delta_y: f64) -> f64 {
        match self {
            Self::Bottom => delta_y,
            Self::Top => -delta_y,
        }
    }

    /// Screen-space translation for a sheet pushed `offset` toward this edge.
    #[must_use]
    pub fn translation(self, offset: f64) -> Affine {
        Axis::Vertical.translation(self.dismiss_distance(offset))
    }
}

/// A controller whose visual state is advanced once per frame.
pub trait Presentation {
    /// What the render layer paints.
    type Visual: Copy;
    /// Lifecycle notices emitted when animations complete.
    type Notice;

    /// Advances all animations to `now` and returns a notice if one became
    /// due on this frame.
    fn advance(&mut self, now: HostTime) -> Option<Self::Notice>;

    /// The latest interpolated visual.
    fn visual(&self) -> Self::Visual;

    /// Whether any animation is still in flight. Hosts can stop requesting
    /// frames once this is `false`.
    fn is_animating(&self) -> bool;
}

/// Paints a visual produced by a [`Presentation`].
///
/// Implemented by the host's render layer (a native view, a DOM node, a test
/// double).
pub trait Presenter<V> {
    /// Applies `visual` to the backing view.
    fn present(&mut self, visual: &V);
}

/// Advances `presentation` to `now`, hands its visual to `presenter`, and
/// returns any lifecycle notice.
pub fn drive<P, R>(presentation: &mut P, presenter: &mut R, now: HostTime) -> Option<P::Notice>
where
    P: Presentation + ?Sized,
    R: Presenter<P::Visual> + ?Sized,
{
    let notice = presentation.advance(now);
    presenter.present(&presentation.visual());
    notice
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn edge_maps_drag_direction() {
        assert_eq!(Edge::Bottom.dismiss_distance(40.0), 40.0);
        assert_eq!(Edge::Top.dismiss_distance(40.0), -40.0);
    }

    #[test]
    fn edge_translation_moves_toward_edge() {
        let down = Edge::Bottom.translation(100.0) * Point::ORIGIN;
        let up = Edge::Top.translation(100.0) * Point::ORIGIN;
        assert_eq!(down, Point::new(0.0, 100.0));
        assert_eq!(up, Point::new(0.0, -100.0));
    }

    #[test]
    fn axis_span_reads_frame() {
        let frame = Rect::new(60.0, 10.0, 140.0, 70.0);
        assert_eq!(Axis::Horizontal.span(frame), (60.0, 80.0));
        assert_eq!(Axis::Vertical.span(frame), (10.0, 60.0));
    }
}
