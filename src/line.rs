// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Infinite lines in implicit form.

use kurbo::{Line, Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::rot90;

/// An infinite line `a·x + b·y + c = 0`.
///
/// The coefficients are not normalized; `(a, b)` is a normal of the line
/// and the line's direction is `(b, -a)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImplicitLine {
    /// The coefficient of `x`.
    pub a: f64,
    /// The coefficient of `y`.
    pub b: f64,
    /// The constant term.
    pub c: f64,
}

impl ImplicitLine {
    /// Create a line from its coefficients.
    #[inline]
    pub const fn new(a: f64, b: f64, c: f64) -> ImplicitLine {
        ImplicitLine { a, b, c }
    }

    /// The line through `origin` with direction `vector`.
    ///
    /// The resulting direction, as returned by [`versor`](Self::versor), has
    /// the same orientation as `vector`.
    pub fn from_origin_and_vector(origin: Point, vector: Vec2) -> ImplicitLine {
        let n = rot90(vector);
        ImplicitLine::new(n.x, n.y, -n.dot(origin.to_vec2()))
    }

    /// The line through two points, oriented from `p0` to `p1`.
    pub fn from_points(p0: Point, p1: Point) -> ImplicitLine {
        ImplicitLine::from_origin_and_vector(p0, p1 - p0)
    }

    /// The coefficients as an array `[a, b, c]`.
    #[inline]
    pub fn coefficients(self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    /// The (unnormalized) normal vector `(a, b)`.
    #[inline]
    pub fn normal(self) -> Vec2 {
        Vec2::new(self.a, self.b)
    }

    /// Whether the equation fails to describe a line, as `0·x + 0·y + c = 0` does.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.a == 0.0 && self.b == 0.0
    }

    /// The unit direction vector of the line.
    pub fn versor(self) -> Vec2 {
        Vec2::new(self.b, -self.a).normalize()
    }

    /// The point of the line closest to the coordinate origin.
    pub fn origin(self) -> Point {
        let n = self.normal();
        (n * (-self.c / n.hypot2())).to_point()
    }

    /// The angle of the line's direction, in `(-π, π]`.
    pub fn angle(self) -> f64 {
        Vec2::new(self.b, -self.a).atan2()
    }

    /// The point at unit-speed parameter `t` from [`origin`](Self::origin).
    pub fn point_at(self, t: f64) -> Point {
        self.origin() + self.versor() * t
    }

    /// The parameter of the orthogonal projection of `p` onto the line.
    pub fn time_at_projection(self, p: Point) -> f64 {
        (p - self.origin()).dot(self.versor())
    }

    /// Evaluate `a·x + b·y + c`.
    #[inline]
    pub fn value_at(self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// Scale the coefficients so that the normal has unit length.
    ///
    /// After this, [`value_at`](Self::value_at) is the signed distance.
    #[must_use]
    pub fn normalized(self) -> ImplicitLine {
        let len = self.normal().hypot();
        ImplicitLine::new(self.a / len, self.b / len, self.c / len)
    }

    /// The point where two lines cross, or `None` if they are parallel.
    pub fn crossing(self, other: ImplicitLine) -> Option<Point> {
        let w = self.a * other.b - self.b * other.a;
        let x = self.b * other.c - self.c * other.b;
        let y = self.c * other.a - self.a * other.c;
        let scale = self.normal().hypot() * other.normal().hypot();
        if w.abs() <= crate::common::TANGENCY_EPSILON * scale || !scale.is_finite() {
            return None;
        }
        Some(Point::new(x / w, y / w))
    }

    /// The part of the line inside `rect`, as a segment oriented along the
    /// line's direction.
    ///
    /// Returns `None` when the line misses the rectangle.
    pub fn clip(self, rect: Rect) -> Option<Line> {
        if self.is_degenerate() {
            return None;
        }
        let r = rect.abs();
        let o = self.origin();
        let d = self.versor();
        let mut t0 = f64::NEG_INFINITY;
        let mut t1 = f64::INFINITY;
        for (o, d, lo, hi) in [(o.x, d.x, r.x0, r.x1), (o.y, d.y, r.y0, r.y1)] {
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (ta, tb) = ((lo - o) / d, (hi - o) / d);
            t0 = t0.max(ta.min(tb));
            t1 = t1.min(ta.max(tb));
        }
        if t0 > t1 {
            return None;
        }
        Some(Line::new(o + d * t0, o + d * t1))
    }
}

impl From<Line> for ImplicitLine {
    #[inline]
    fn from(line: Line) -> ImplicitLine {
        ImplicitLine::from_points(line.p0, line.p1)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Line, Point, Rect, Vec2};

    use crate::ImplicitLine;

    fn assert_near(p0: Point, p1: Point) {
        assert!((p1 - p0).hypot() < 1e-9, "{p0:?} != {p1:?}");
    }

    #[test]
    fn through_points() {
        let l = ImplicitLine::from_points(Point::new(1.0, 1.0), Point::new(3.0, 2.0));
        assert!(l.value_at(Point::new(1.0, 1.0)).abs() < 1e-12);
        assert!(l.value_at(Point::new(5.0, 3.0)).abs() < 1e-12);
        let v = l.versor();
        assert!((v - Vec2::new(2.0, 1.0).normalize()).hypot() < 1e-12);
        let o = l.origin();
        assert!(l.value_at(o).abs() < 1e-12);
        assert!(o.to_vec2().dot(v).abs() < 1e-12);
        let t = l.time_at_projection(Point::new(3.0, 2.0));
        assert_near(l.point_at(t), Point::new(3.0, 2.0));
    }

    #[test]
    fn crossing() {
        let x_axis = ImplicitLine::new(0.0, 1.0, 0.0);
        let diag = ImplicitLine::from_points(Point::new(0.0, -1.0), Point::new(1.0, 0.0));
        assert_near(x_axis.crossing(diag).unwrap(), Point::new(1.0, 0.0));
        let shifted = ImplicitLine::new(0.0, 2.0, 3.0);
        assert!(x_axis.crossing(shifted).is_none());
    }

    #[test]
    fn clip_to_rect() {
        let r = Rect::new(0.0, 0.0, 4.0, 2.0);
        let l = ImplicitLine::from_points(Point::new(-1.0, -1.0), Point::new(0.0, 0.0));
        let seg = l.clip(r).unwrap();
        assert_near(seg.p0, Point::ZERO);
        assert_near(seg.p1, Point::new(2.0, 2.0));

        let vertical = ImplicitLine::from(Line::new((1.0, 5.0), (1.0, 6.0)));
        let seg = vertical.clip(r).unwrap();
        assert_near(seg.p0, Point::new(1.0, 0.0));
        assert_near(seg.p1, Point::new(1.0, 2.0));

        let outside = ImplicitLine::new(0.0, 1.0, -3.0);
        assert!(outside.clip(r).is_none());
    }
}
