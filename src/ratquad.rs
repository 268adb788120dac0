// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rational quadratic Bézier segments.

use core::ops::{Mul, Range};

use kurbo::{Affine, CubicBez, ParamCurve, Point, Vec2};
use nalgebra::Vector3;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::{signed_triangle_area, POINT_EPSILON};
use crate::ImplicitLine;

/// A rational quadratic Bézier segment.
///
/// The curve is
///
/// ```text
/// B(t) = ((1-t)²·p0 + 2t(1-t)·w·p1 + t²·p2) / ((1-t)² + 2t(1-t)·w + t²)
/// ```
///
/// Unlike a plain quadratic Bézier it can represent an arc of any conic
/// exactly: the arc is elliptic when `w < 1`, parabolic when `w = 1` and
/// hyperbolic when `w > 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatQuad {
    /// The start point.
    pub p0: Point,
    /// The control point.
    pub p1: Point,
    /// The end point.
    pub p2: Point,
    /// The weight of the control point.
    pub w: f64,
}

impl RatQuad {
    /// Create a new rational quadratic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, w: f64) -> RatQuad {
        RatQuad {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            w,
        }
    }

    /// The arc from `p0` to `p2`, tangent there to `d0` and `d2`, that passes
    /// through `p`.
    ///
    /// The control point is where the two tangent lines cross, and the
    /// weight follows from where `p` lies in the control triangle. When the
    /// points are collinear, or the tangent lines coincide, the result is the
    /// straight segment from `p0` to `p2`.
    ///
    /// Returns `None` when the tangent lines are parallel but distinct, or
    /// when `p` lies where no arc with these tangents can reach.
    ///
    /// ```
    /// use conics::RatQuad;
    /// use kurbo::{ParamCurve, Point, Vec2};
    ///
    /// let s = 0.5_f64.sqrt();
    /// let arc = RatQuad::from_points_tangents(
    ///     Point::new(1.0, 0.0),
    ///     Vec2::new(0.0, 1.0),
    ///     Point::new(s, s),
    ///     Point::new(0.0, 1.0),
    ///     Vec2::new(-1.0, 0.0),
    /// )
    /// .unwrap();
    /// assert!((arc.w - s).abs() < 1e-12);
    /// assert!((arc.eval(0.5).to_vec2().hypot() - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_points_tangents(
        p0: Point,
        d0: Vec2,
        p: Point,
        p2: Point,
        d2: Vec2,
    ) -> Option<RatQuad> {
        let line0 = ImplicitLine::from_origin_and_vector(p0, d0);
        let line2 = ImplicitLine::from_origin_and_vector(p2, d2);
        let straight = RatQuad::new(p0, p0.midpoint(p2), p2, 1.0);
        let Some(p1) = line0.crossing(line2) else {
            let scale = 1.0 + (p2 - p0).hypot();
            let coincident = !line0.is_degenerate()
                && line0.normalized().value_at(p2).abs() <= POINT_EPSILON * scale;
            return coincident.then_some(straight);
        };
        let area = signed_triangle_area(p0, p1, p2);
        if area == 0.0 {
            return Some(straight);
        }
        let tau0 = signed_triangle_area(p, p1, p2) / area;
        let tau1 = signed_triangle_area(p0, p, p2) / area;
        let tau2 = signed_triangle_area(p0, p1, p) / area;
        if tau0 == 0.0 || tau1 == 0.0 || tau2 == 0.0 {
            return Some(straight);
        }
        let w = tau1 / (2.0 * (tau0 * tau2).sqrt());
        w.is_finite().then(|| RatQuad::new(p0, p1, p2, w))
    }

    /// The circular arc with control polygon `p0 p1 p2`.
    ///
    /// The points are expected to form an isosceles triangle with apex `p1`,
    /// as the end points and tangent crossing of a circular arc do.
    pub fn circular_arc(p0: Point, p1: Point, p2: Point) -> RatQuad {
        let w = (p0 - p1).normalize().dot((p0 - p2).normalize());
        RatQuad::new(p0, p1, p2, w)
    }

    /// The shape parameter used by [`to_cubic`](Self::to_cubic).
    ///
    /// This is Floater's G4 continuous choice, which gives smooth joins
    /// between consecutive approximations.
    pub fn lambda(&self) -> f64 {
        let ww = self.w * self.w;
        2.0 * (6.0 * ww + 1.0 - (3.0 * ww + 1.0).sqrt()) / (12.0 * ww + 3.0)
    }

    /// A cubic Bézier approximating the segment.
    #[inline]
    pub fn to_cubic(&self) -> CubicBez {
        self.to_cubic_with_lambda(self.lambda())
    }

    /// A cubic Bézier with the same end points and tangents, its inner
    /// control points placed a fraction `lambda` of the way towards `p1`.
    pub fn to_cubic_with_lambda(&self, lambda: f64) -> CubicBez {
        CubicBez::new(
            self.p0,
            self.p0.lerp(self.p1, lambda),
            self.p2.lerp(self.p1, lambda),
            self.p2,
        )
    }

    /// Split the segment at `t = 0.5` into two halves.
    pub fn split(&self) -> (RatQuad, RatQuad) {
        let w = self.w;
        let a1 = ((self.p0.to_vec2() + self.p1.to_vec2() * w) / (1.0 + w)).to_point();
        let b1 = ((self.p1.to_vec2() * w + self.p2.to_vec2()) / (1.0 + w)).to_point();
        let mid = a1.midpoint(b1);
        let half_w = ((1.0 + w) / 2.0).sqrt();
        (
            RatQuad::new(self.p0, a1, mid, half_w),
            RatQuad::new(mid, b1, self.p2, half_w),
        )
    }

    /// The control points in homogeneous coordinates `(w·x, w·y, w)`.
    ///
    /// In this form the segment is an ordinary quadratic Bézier in three
    /// dimensions, projected onto the plane `w = 1`.
    pub fn homogeneous(&self) -> [Vector3<f64>; 3] {
        let lift = |p: Point, w: f64| Vector3::new(p.x * w, p.y * w, w);
        [lift(self.p0, 1.0), lift(self.p1, self.w), lift(self.p2, 1.0)]
    }

    /// Is this segment [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.w.is_finite()
    }

    /// Is this segment [NaN]?
    ///
    /// [NaN]: f64::is_nan
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.p0.is_nan() || self.p1.is_nan() || self.p2.is_nan() || self.w.is_nan()
    }
}

/// The homogeneous point of a quadratic Bézier with control points `h` at
/// the blossom arguments `(a, b)`.
fn blossom(h: &[Vector3<f64>; 3], a: f64, b: f64) -> Vector3<f64> {
    h[0] * ((1.0 - a) * (1.0 - b)) + h[1] * ((1.0 - a) * b + a * (1.0 - b)) + h[2] * (a * b)
}

impl ParamCurve for RatQuad {
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let b0 = mt * mt;
        let b1 = 2.0 * mt * t * self.w;
        let b2 = t * t;
        let d = b0 + b1 + b2;
        Point::new(
            (b0 * self.p0.x + b1 * self.p1.x + b2 * self.p2.x) / d,
            (b0 * self.p0.y + b1 * self.p1.y + b2 * self.p2.y) / d,
        )
    }

    fn subsegment(&self, range: Range<f64>) -> RatQuad {
        let h = self.homogeneous();
        let (a, b) = (range.start, range.end);
        let q0 = blossom(&h, a, a);
        let q1 = blossom(&h, a, b);
        let q2 = blossom(&h, b, b);
        let project = |q: Vector3<f64>| Point::new(q.x / q.z, q.y / q.z);
        // Rescale the weights so that both end weights are 1 again.
        let w = q1.z / (q0.z * q2.z).sqrt();
        RatQuad::new(project(q0), project(q1), project(q2), w)
    }

    #[inline]
    fn subdivide(&self) -> (RatQuad, RatQuad) {
        self.split()
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p2
    }
}

impl Mul<RatQuad> for Affine {
    type Output = RatQuad;

    #[inline]
    fn mul(self, other: RatQuad) -> RatQuad {
        RatQuad {
            p0: self * other.p0,
            p1: self * other.p1,
            p2: self * other.p2,
            w: other.w,
        }
    }
}
