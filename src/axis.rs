// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

/// An axis in the plane.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// The coordinate of `p` along this axis.
    #[inline]
    pub const fn coord(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }

    /// The extent of `rect` along this axis, as `(min, max)`.
    #[inline]
    pub(crate) fn range(self, rect: Rect) -> (f64, f64) {
        let r = rect.abs();
        match self {
            Self::Horizontal => (r.x0, r.x1),
            Self::Vertical => (r.y0, r.y1),
        }
    }

    /// A copy of `rect` with its extent along this axis replaced.
    #[inline]
    pub(crate) fn with_range(self, rect: Rect, min: f64, max: f64) -> Rect {
        let r = rect.abs();
        match self {
            Self::Horizontal => Rect::new(min, r.y0, max, r.y1),
            Self::Vertical => Rect::new(r.x0, min, r.x1, max),
        }
    }
}
