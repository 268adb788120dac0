// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The general conic section.

use core::f64::consts::PI;
use core::ops::{Add, Mul, Neg, Sub};

use arrayvec::ArrayVec;
use kurbo::common::solve_quadratic;
use kurbo::{Affine, Point, Rect, Vec2};
use nalgebra::{Matrix2, Matrix3, Vector2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::{
    is_near_zero, normalize_angle, rect_contains, rot90, signed_triangle_area, tolerant_sign,
    EPSILON, POINT_EPSILON, TANGENCY_EPSILON,
};
use crate::{AngleInterval, Axis, ConicError, ConicKind, ImplicitLine};

/// A conic section, the zero set of a quadratic polynomial in two variables.
///
/// The curve is the set of points `(x, y)` with
///
/// ```text
/// c0·x² + c1·x·y + c2·y² + c3·x + c4·y + c5 = 0
/// ```
///
/// The coefficients are only meaningful up to a non-zero common factor:
/// scaling all six of them describes the same curve, and none of the
/// queries on this type depend on the scale. Adding or subtracting two
/// conics combines them coefficient-wise; the result is a member of the
/// pencil spanned by the two, not a blend of their shapes.
///
/// # Examples
///
/// ```
/// use conics::{ConicKind, ConicSection};
/// use kurbo::Point;
///
/// let circle = ConicSection::circle(Point::new(1.0, 2.0), 3.0);
/// assert_eq!(circle.kind(), ConicKind::Circle);
/// assert!(circle.value_at(Point::new(4.0, 2.0)).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConicSection {
    c: [f64; 6],
}

impl ConicSection {
    /// Create a conic from its six coefficients, in the order
    /// `x², xy, y², x, y, 1`.
    #[inline]
    pub const fn new(c0: f64, c1: f64, c2: f64, c3: f64, c4: f64, c5: f64) -> ConicSection {
        ConicSection {
            c: [c0, c1, c2, c3, c4, c5],
        }
    }

    /// Create a conic from an array of coefficients.
    #[inline]
    pub const fn from_coeffs(c: [f64; 6]) -> ConicSection {
        ConicSection { c }
    }

    /// Create a conic from a 3×3 matrix `M`, so that the curve is
    /// `pᵀ·M·p = 0` for homogeneous points `p = (x, y, 1)`.
    ///
    /// Only the symmetric part of `M` matters.
    pub fn from_matrix(m: &Matrix3<f64>) -> ConicSection {
        ConicSection::new(
            m[(0, 0)],
            m[(0, 1)] + m[(1, 0)],
            m[(1, 1)],
            m[(0, 2)] + m[(2, 0)],
            m[(1, 2)] + m[(2, 1)],
            m[(2, 2)],
        )
    }

    /// The squared distance to `p`, as a conic.
    ///
    /// Its only real point is `p` itself; adding a negative constant turns
    /// it into a circle around `p`, see [`circle`](Self::circle).
    pub fn from_point(p: Point) -> ConicSection {
        ConicSection::new(1.0, 0.0, 1.0, -2.0 * p.x, -2.0 * p.y, p.to_vec2().hypot2())
    }

    /// The circle with the given centre and radius.
    pub fn circle(center: Point, radius: f64) -> ConicSection {
        ConicSection::from_point(center) + -(radius * radius)
    }

    /// The squared distance to `line`, as a conic.
    ///
    /// This is the line counted twice, a [`ConicKind::DoubleLine`].
    pub fn from_line(line: ImplicitLine) -> ConicSection {
        let l = line.normalized();
        ConicSection::new(
            l.a * l.a,
            2.0 * l.a * l.b,
            l.b * l.b,
            2.0 * l.a * l.c,
            2.0 * l.b * l.c,
            l.c * l.c,
        )
    }

    /// The degenerate conic made of two lines, the product of their equations.
    pub fn from_lines(l1: ImplicitLine, l2: ImplicitLine) -> ConicSection {
        ConicSection::new(
            l1.a * l2.a,
            l1.a * l2.b + l1.b * l2.a,
            l1.b * l2.b,
            l1.a * l2.c + l1.c * l2.a,
            l1.b * l2.c + l1.c * l2.b,
            l1.c * l2.c,
        )
    }

    /// The conic with a vertex at `vertex`, its focal axis at `angle`, and
    /// its foci at signed distances `dist1` and `dist2` from the vertex,
    /// measured along the axis.
    ///
    /// An infinite `dist2` gives a parabola with its focus at `dist1`; when
    /// both are infinite the result is the line through `vertex` at `angle`.
    /// Otherwise the nearer focus is taken as `dist1`, and the result is an
    /// ellipse when both foci lie on the same side of the vertex and a
    /// hyperbola when they do not.
    pub fn from_vertex_angle(vertex: Point, angle: f64, dist1: f64, dist2: f64) -> ConicSection {
        if dist2.is_infinite() {
            if dist1 == f64::INFINITY {
                let l = ImplicitLine::from_origin_and_vector(vertex, Vec2::from_angle(angle));
                return ConicSection::new(0.0, 0.0, 0.0, l.a, l.b, l.c);
            }
            // y² - 4·p·x = 0, opening along the positive x axis.
            return ConicSection::new(0.0, 0.0, 1.0, -4.0 * dist1, 0.0, 0.0)
                .rotate(angle)
                .translate(vertex.to_vec2());
        }
        let (mut d1, mut d2, mut angle) = (dist1, dist2, angle);
        if d1.abs() > d2.abs() {
            core::mem::swap(&mut d1, &mut d2);
        }
        if d1 < 0.0 {
            angle -= PI;
            d1 = -d1;
            d2 = -d2;
        }
        let linear_eccentricity = (d2 - d1) / 2.0;
        let rx = (d2 + d1) / 2.0;
        let ca = rx * rx - linear_eccentricity * linear_eccentricity;
        let cc = rx * rx;
        let centre = vertex + Vec2::from_angle(angle) * rx;
        ConicSection::new(ca, 0.0, cc, 0.0, 0.0, -ca * cc)
            .rotate(angle)
            .translate(centre.to_vec2())
    }

    /// The conic with a vertex at `vertex` and foci `focus1` and `focus2`.
    ///
    /// The three points should be collinear. A non-finite focus stands for a
    /// focus at infinity, which makes the result a parabola. When both foci
    /// coincide with the vertex the result is the single point `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`ConicError::PointAtInfinity`] if the vertex is not finite,
    /// or if neither focus is.
    pub fn from_vertex_foci(
        vertex: Point,
        focus1: Point,
        focus2: Point,
    ) -> Result<ConicSection, ConicError> {
        if !vertex.is_finite() {
            return Err(ConicError::PointAtInfinity);
        }
        let parabola = |focus: Point| {
            let vf = focus - vertex;
            ConicSection::from_vertex_angle(vertex, vf.atan2(), vf.hypot(), f64::INFINITY)
        };
        match (focus1.is_finite(), focus2.is_finite()) {
            (false, false) => Err(ConicError::PointAtInfinity),
            (true, false) => Ok(parabola(focus1)),
            (false, true) => Ok(parabola(focus2)),
            (true, true) => {
                let near = |p: Point| {
                    let scale = 1.0 + vertex.to_vec2().hypot().max(p.to_vec2().hypot());
                    (p - vertex).hypot() <= POINT_EPSILON * scale
                };
                if !near(focus1) {
                    let vf = focus1 - vertex;
                    let mut dist2 = (focus2 - vertex).hypot();
                    if (focus2 - vertex).dot(vf) < 0.0 {
                        dist2 = -dist2;
                    }
                    Ok(ConicSection::from_vertex_angle(
                        vertex,
                        vf.atan2(),
                        vf.hypot(),
                        dist2,
                    ))
                } else if !near(focus2) {
                    let vf = focus2 - vertex;
                    Ok(ConicSection::from_vertex_angle(
                        vertex,
                        vf.atan2(),
                        0.0,
                        vf.hypot(),
                    ))
                } else {
                    Ok(ConicSection::from_point(vertex))
                }
            }
        }
    }

    /// The conic with the given focus, directrix and eccentricity.
    ///
    /// An eccentricity below 1 gives an ellipse, exactly 1 a parabola and
    /// above 1 a hyperbola.
    pub fn from_focus_directrix(
        focus: Point,
        directrix: ImplicitLine,
        eccentricity: f64,
    ) -> ConicSection {
        let foot = directrix.point_at(directrix.time_at_projection(focus));
        let axis = focus - foot;
        let p = axis.hypot();
        ConicSection::new(
            1.0 - eccentricity * eccentricity,
            0.0,
            1.0,
            -2.0 * p,
            0.0,
            p * p,
        )
        .rotate(axis.atan2())
        .translate(foot.to_vec2())
    }

    /// The coefficients, in the order `x², xy, y², x, y, 1`.
    #[inline]
    pub fn coeffs(&self) -> [f64; 6] {
        self.c
    }

    /// The coefficient at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 6 or more.
    #[inline]
    pub fn coeff(&self, index: usize) -> f64 {
        self.c[index]
    }

    /// A mutable reference to the coefficient at `index`.
    ///
    /// Prefer the transforms returning new conics; this exists for callers
    /// that assemble coefficients incrementally.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 6 or more.
    #[inline]
    pub fn coeff_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.c[index]
    }

    /// The largest coefficient magnitude.
    pub fn norm(&self) -> f64 {
        self.c.iter().fold(0.0, |acc, c| acc.max(c.abs()))
    }

    /// The same conic scaled so that its largest-magnitude coefficient is 1.
    ///
    /// Two conics describe the same curve exactly when their normalized
    /// coefficients agree. The zero conic is returned unchanged.
    #[must_use]
    pub fn normalized(&self) -> ConicSection {
        let pivot = self
            .c
            .iter()
            .fold(0.0_f64, |acc, &c| if c.abs() > acc.abs() { c } else { acc });
        if pivot == 0.0 {
            *self
        } else {
            ConicSection {
                c: self.c.map(|c| c / pivot),
            }
        }
    }

    /// The symmetric 3×3 matrix of the conic.
    pub fn matrix(&self) -> Matrix3<f64> {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        Matrix3::new(
            c0,
            c1 / 2.0,
            c3 / 2.0,
            c1 / 2.0,
            c2,
            c4 / 2.0,
            c3 / 2.0,
            c4 / 2.0,
            c5,
        )
    }

    /// Evaluate the polynomial at `(x, y)`.
    #[inline]
    pub fn evaluate_at(&self, x: f64, y: f64) -> f64 {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        c0 * x * x + c1 * x * y + c2 * y * y + c3 * x + c4 * y + c5
    }

    /// Evaluate the homogeneous form of the polynomial at `(x, y, w)`.
    #[inline]
    pub fn evaluate_at_homogeneous(&self, x: f64, y: f64, w: f64) -> f64 {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        c0 * x * x + c1 * x * y + c2 * y * y + (c3 * x + c4 * y) * w + c5 * w * w
    }

    /// Evaluate the polynomial at `p`.
    ///
    /// The sign tells on which side of the curve `p` lies.
    #[inline]
    pub fn value_at(&self, p: Point) -> f64 {
        self.evaluate_at(p.x, p.y)
    }

    /// The gradient of the polynomial at `p`, a normal of the curve there.
    #[inline]
    pub fn gradient(&self, p: Point) -> Vec2 {
        let [c0, c1, c2, c3, c4, _] = self.c;
        Vec2::new(
            2.0 * c0 * p.x + c1 * p.y + c3,
            c1 * p.x + 2.0 * c2 * p.y + c4,
        )
    }

    /// The (constant) Hessian of the polynomial, as a linear map.
    pub fn hessian(&self) -> Affine {
        let [c0, c1, c2, ..] = self.c;
        Affine::new([2.0 * c0, c1, c1, 2.0 * c2, 0.0, 0.0])
    }

    /// Whether any second degree coefficient is non-zero.
    ///
    /// A conic without second degree terms is a line (or nothing at all).
    #[inline]
    pub fn is_quadratic(&self) -> bool {
        let [c0, c1, c2, ..] = self.c;
        c0 != 0.0 || c1 != 0.0 || c2 != 0.0
    }

    /// Whether the conic splits into lines, that is its matrix is singular.
    pub fn is_degenerate(&self) -> bool {
        let (det, scale) = self.det_with_scale();
        is_near_zero(det, scale)
    }

    /// Classify the conic.
    ///
    /// See [`EPSILON`] for how near-zero invariants are decided.
    pub fn kind(&self) -> ConicKind {
        if !self.is_quadratic() {
            return ConicKind::Unknown;
        }
        let (t1, t1_scale) = self.quadratic_trace();
        let (t2, t2_scale) = self.quadratic_det();
        let (t3, t3_scale) = self.det_with_scale();
        let st1 = tolerant_sign(t1, t1_scale);
        let st2 = tolerant_sign(t2, t2_scale);
        let st3 = tolerant_sign(t3, t3_scale);
        if st3 != 0 {
            match st2 {
                0 => ConicKind::Parabola,
                1 if st3 * st1 < 0 => {
                    if self.is_circular() {
                        ConicKind::Circle
                    } else {
                        ConicKind::RealEllipse
                    }
                }
                1 => ConicKind::ImaginaryEllipse,
                _ if st1 == 0 => ConicKind::RectangularHyperbola,
                _ => ConicKind::Hyperbola,
            }
        } else {
            match st2 {
                0 => {
                    let (t, scale) = self.principal_minor_sum();
                    match tolerant_sign(t, scale) {
                        0 => ConicKind::DoubleLine,
                        -1 => ConicKind::TwoRealParallelLines,
                        _ => ConicKind::TwoImaginaryParallelLines,
                    }
                }
                -1 => ConicKind::TwoRealCrossingLines,
                _ => ConicKind::TwoImaginaryCrossingLines,
            }
        }
    }

    /// The centre of symmetry, where both partial derivatives vanish.
    ///
    /// Returns `None` when the quadratic part is singular, as for parabolas,
    /// parallel line pairs and lines.
    pub fn centre(&self) -> Option<Point> {
        let (t2, scale) = self.quadratic_det();
        if is_near_zero(t2, scale) {
            return None;
        }
        let [c0, c1, c2, c3, c4, _] = self.c;
        let a = Matrix2::new(2.0 * c0, c1, c1, 2.0 * c2);
        let p = a.lu().solve(&Vector2::new(-c3, -c4))?;
        Some(Point::new(p.x, p.y))
    }

    /// The angle of the principal axis, in `[0, π)`.
    ///
    /// This is the major axis of an ellipse, the transverse axis of a
    /// hyperbola (the one the curve crosses) and the axis of a parabola. The
    /// answer does not depend on the sign of the equation. Circles report 0,
    /// and a conic without second degree terms reports the angle of its line.
    pub fn axis_angle(&self) -> f64 {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        if !self.is_quadratic() {
            return ImplicitLine::new(c3, c4, c5).angle();
        }
        if self.is_circular() {
            return 0.0;
        }
        let (t2, t2_scale) = self.quadratic_det();
        if is_near_zero(t2, t2_scale) {
            return half_turn(self.null_direction().atan2());
        }
        // Orient the equation so that it is negative at the centre. The
        // major axis of an ellipse is then the direction of least growth,
        // and the transverse axis of a hyperbola the direction of most.
        let (t1, t1_scale) = self.quadratic_trace();
        let k = self.centre().map_or(0.0, |p| self.value_at(p));
        let s = if k != 0.0 {
            -k.signum()
        } else if tolerant_sign(t1, t1_scale) < 0 {
            -1.0
        } else {
            1.0
        };
        let steepest = (s * c1).atan2(s * (c0 - c2)) / 2.0;
        if t2 > 0.0 {
            half_turn(steepest + PI / 2.0)
        } else {
            half_turn(steepest)
        }
    }

    /// The tangent line at `p`, the polar line of `p`.
    ///
    /// `p` is expected to lie on the conic; this is not checked.
    pub fn tangent(&self, p: Point) -> ImplicitLine {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        ImplicitLine::new(
            c0 * p.x + 0.5 * c1 * p.y + 0.5 * c3,
            0.5 * c1 * p.x + c2 * p.y + 0.5 * c4,
            0.5 * c3 * p.x + 0.5 * c4 * p.y + c5,
        )
    }

    /// The dual conic, whose points are the tangent lines of this one.
    ///
    /// It is given by the adjugate matrix. For a degenerate conic the result
    /// is itself degenerate and does not describe the original.
    #[must_use]
    pub fn dual(&self) -> ConicSection {
        ConicSection::from_matrix(&adjugate(&self.matrix()))
    }

    /// The conic moved by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vec2) -> ConicSection {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        let b = c1 / 2.0;
        let d = c3 / 2.0;
        let e = c4 / 2.0;
        let t = -offset;
        let de = Vec2::new(c0 * t.x + b * t.y, b * t.x + c2 * t.y);
        ConicSection::new(
            c0,
            c1,
            c2,
            2.0 * (de.x + d),
            2.0 * (de.y + e),
            t.dot(de) + 2.0 * (t.x * d + t.y * e) + c5,
        )
    }

    /// The conic rotated by `angle` radians about the origin.
    #[must_use]
    pub fn rotate(&self, angle: f64) -> ConicSection {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        let (s, c) = ((-angle).sin(), (-angle).cos());
        let (cc, ss, cs) = (c * c, s * s, c * s);
        ConicSection::new(
            c0 * cc + c1 * cs + c2 * ss,
            c1 * (cc - ss) + 2.0 * (c2 - c0) * cs,
            c0 * ss - c1 * cs + c2 * cc,
            c3 * c + c4 * s,
            c4 * c - c3 * s,
            c5,
        )
    }

    /// The conic rotated by `angle` radians about `center`.
    #[must_use]
    pub fn rotate_about(&self, center: Point, angle: f64) -> ConicSection {
        let v = center.to_vec2();
        self.translate(-v).rotate(angle).translate(v)
    }

    /// The conic scaled about the origin by `sx` horizontally and `sy`
    /// vertically.
    ///
    /// Non-uniform scaling may change the kind, for example turning a circle
    /// into an ellipse.
    #[must_use]
    pub fn scale(&self, sx: f64, sy: f64) -> ConicSection {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        ConicSection::new(
            c0 / (sx * sx),
            c1 / (sx * sy),
            c2 / (sy * sy),
            c3 / sx,
            c4 / sy,
            c5,
        )
    }

    /// The image of the conic under `affine`.
    ///
    /// The map must be invertible.
    #[must_use]
    pub fn transform(&self, affine: Affine) -> ConicSection {
        let [a, b, c, d, e, f] = affine.inverse().as_coeffs();
        let h = Matrix3::new(a, c, e, b, d, f, 0.0, 0.0, 1.0);
        ConicSection::from_matrix(&(h.transpose() * self.matrix() * h))
    }

    /// The parameters at which `line` meets the conic, in ascending order.
    ///
    /// The parameters are those of [`ImplicitLine::point_at`]. A line
    /// touching the conic yields one parameter; a line lying on the conic
    /// yields none.
    pub fn roots(&self, line: ImplicitLine) -> ArrayVec<f64, 2> {
        if line.is_degenerate() {
            return ArrayVec::new();
        }
        self.roots_along(line.origin(), line.versor())
    }

    /// Fix the coordinate along `axis` to `value` and return the values of
    /// the other coordinate at which the conic is met.
    ///
    /// ```
    /// use conics::{Axis, ConicSection};
    /// use kurbo::Point;
    ///
    /// let circle = ConicSection::circle(Point::ZERO, 5.0);
    /// let ys = circle.roots_at(3.0, Axis::Horizontal);
    /// assert_eq!(ys.len(), 2);
    /// assert!((ys[0] + 4.0).abs() < 1e-12 && (ys[1] - 4.0).abs() < 1e-12);
    /// ```
    pub fn roots_at(&self, value: f64, axis: Axis) -> ArrayVec<f64, 2> {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        let (p, q, r) = match axis {
            Axis::Horizontal => (c2, c4 + c1 * value, c5 + (c0 * value + c3) * value),
            Axis::Vertical => (c0, c3 + c1 * value, c5 + (c2 * value + c4) * value),
        };
        solve_tolerant_quadratic(r, q, p, c0.abs() + c1.abs() + c2.abs())
    }

    /// Parameters `t` at which `origin + t·direction` lies on the conic.
    pub(crate) fn roots_along(&self, origin: Point, direction: Vec2) -> ArrayVec<f64, 2> {
        let [c0, c1, c2, c3, c4, _] = self.c;
        let (o, d) = (origin, direction);
        let q2 = c0 * d.x * d.x + c1 * d.x * d.y + c2 * d.y * d.y;
        let q1 = 2.0 * c0 * d.x * o.x
            + c1 * (d.x * o.y + d.y * o.x)
            + 2.0 * c2 * d.y * o.y
            + c3 * d.x
            + c4 * d.y;
        let q0 = self.value_at(o);
        // Along the axis of a parabola or an asymptote of a hyperbola, `q2`
        // is zero up to the rounding of the coefficients.
        let q2_scale = (c0.abs() + c1.abs() + c2.abs()) * d.hypot2();
        solve_tolerant_quadratic(q0, q1, q2, q2_scale)
    }

    /// The range of values the polynomial takes over `rect`, as `(min, max)`.
    pub fn value_range(&self, rect: Rect) -> (f64, f64) {
        let r = rect.abs();
        let [c0, c1, c2, c3, c4, c5] = self.c;
        let mut range = (f64::INFINITY, f64::NEG_INFINITY);
        for p in [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x0, r.y1),
            Point::new(r.x1, r.y1),
        ] {
            expand(&mut range, self.value_at(p));
        }
        if !self.is_quadratic() {
            return range;
        }
        // Along each edge the polynomial is a parabola in one variable.
        for x in [r.x0, r.x1] {
            edge_extremum(&mut range, c2, c1 * x + c4, (c0 * x + c3) * x + c5, r.y0, r.y1);
        }
        for y in [r.y0, r.y1] {
            edge_extremum(&mut range, c0, c1 * y + c3, (c2 * y + c4) * y + c5, r.x0, r.x1);
        }
        if let Some(centre) = self.centre() {
            if rect_contains(r, centre, 0.0) {
                expand(&mut range, self.value_at(centre));
            }
        }
        range
    }

    /// Split a real degenerate conic into its two lines.
    ///
    /// A double line is returned twice. Returns `None` for conics that are
    /// not degenerate or whose lines are not real.
    pub fn decompose(&self) -> Option<(ImplicitLine, ImplicitLine)> {
        match self.kind() {
            ConicKind::DoubleLine
            | ConicKind::TwoRealParallelLines
            | ConicKind::TwoRealCrossingLines => self.line_pair(),
            _ => None,
        }
    }

    /// The lines of a conic known to be degenerate, or `None` if they are
    /// complex conjugates.
    pub(crate) fn line_pair(&self) -> Option<(ImplicitLine, ImplicitLine)> {
        let c = self.matrix();
        let b = -adjugate(&c);
        // The diagonal of -adj(C) holds squares of the coordinates of the
        // lines' crossing (up to a common factor): non-negative for real
        // lines, non-positive for conjugate ones, zero for a double line.
        let mut pivot: Option<(usize, f64)> = None;
        for i in 0..3 {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            let product = c[(j, j)] * c[(k, k)];
            let square = c[(j, k)] * c[(j, k)];
            let v = b[(i, i)];
            if v.abs() <= TANGENCY_EPSILON * (product.abs() + square) {
                continue;
            }
            if pivot.map_or(true, |(_, p)| v.abs() > p.abs()) {
                pivot = Some((i, v));
            }
        }
        let mut m = c;
        if let Some((i, v)) = pivot {
            if v < 0.0 {
                return None;
            }
            let s = v.sqrt();
            let p = [b[(i, 0)] / s, b[(i, 1)] / s, b[(i, 2)] / s];
            // Adding the skew matrix of p turns the symmetric product of the
            // two lines into their (rank one) outer product.
            m[(1, 2)] += p[0];
            m[(2, 1)] -= p[0];
            m[(0, 2)] -= p[1];
            m[(2, 0)] += p[1];
            m[(0, 1)] += p[2];
            m[(1, 0)] -= p[2];
        }
        let (i, j) = m.iamax_full();
        let l1 = ImplicitLine::new(m[(i, 0)], m[(i, 1)], m[(i, 2)]);
        let l2 = ImplicitLine::new(m[(0, j)], m[(1, j)], m[(2, j)]);
        Some((l1, l2))
    }

    /// The angle of the tangent direction at `p`, in `[0, 2π)`.
    ///
    /// The tangent is oriented a quarter turn counter-clockwise from the
    /// gradient. Along an ellipse or a single branch of a hyperbola this angle
    /// changes monotonically, so it can be used as a parameter of the curve.
    pub fn angle_at(&self, p: Point) -> f64 {
        normalize_angle(rot90(self.gradient(p)).atan2())
    }

    /// Whether `p` lies on the arc of the conic that starts at `initial`,
    /// passes through `inner` and ends at `final_point`.
    ///
    /// Points are compared by their [`angle_at`](Self::angle_at); all four
    /// are expected to lie on the conic.
    pub fn arc_contains(&self, p: Point, initial: Point, inner: Point, final_point: Point) -> bool {
        AngleInterval::from_three(
            self.angle_at(initial),
            self.angle_at(inner),
            self.angle_at(final_point),
        )
        .contains(self.angle_at(p))
    }

    /// The bounding box of the arc from `p1` through `q` to `p2`.
    ///
    /// All three points are expected to lie on the conic, on a single
    /// bounded arc.
    pub fn arc_bound(&self, p1: Point, q: Point, p2: Point) -> Rect {
        let [c0, c1, c2, c3, c4, _] = self.c;
        let side = |m: Point| tolerant_sign(signed_triangle_area(p1, m, p2), 0.0);
        let q_side = side(q);
        let mut bound = Rect::from_points(p1, p2);
        // Where ∂f/∂y vanishes the tangent is vertical, and x is extremal;
        // likewise for ∂f/∂x and y.
        let polars = [
            (Axis::Horizontal, ImplicitLine::new(c1, 2.0 * c2, c4)),
            (Axis::Vertical, ImplicitLine::new(2.0 * c0, c1, c3)),
        ];
        for (axis, line) in polars {
            if line.is_degenerate() {
                continue;
            }
            let mut m: ArrayVec<Point, 2> = self
                .roots(line)
                .into_iter()
                .map(|t| line.point_at(t))
                .collect();
            m.sort_by(|a, b| axis.coord(*a).total_cmp(&axis.coord(*b)));
            let (mut lo, mut hi) = axis.range(bound);
            match m.as_slice() {
                [m0] => {
                    if side(*m0) == q_side {
                        lo = lo.min(axis.coord(*m0));
                        hi = hi.max(axis.coord(*m0));
                    }
                }
                [m0, m1] => {
                    let (a, b) = (axis.coord(*m0), axis.coord(*m1));
                    if a > hi {
                        if side(*m0) == q_side {
                            hi = a;
                        }
                    } else if b < lo {
                        if side(*m1) == q_side {
                            lo = b;
                        }
                    } else {
                        if side(*m0) == q_side {
                            lo = lo.min(a);
                        }
                        if side(*m1) == q_side {
                            hi = hi.max(b);
                        }
                    }
                }
                _ => {}
            }
            bound = axis.with_range(bound, lo, hi);
        }
        bound
    }

    /// Whether `c0 = c2` and `c1 = 0`, up to tolerance.
    fn is_circular(&self) -> bool {
        let [c0, c1, c2, ..] = self.c;
        (c0 - c2).hypot(c1) <= EPSILON * (c0.abs() + c2.abs())
    }

    /// A direction in which the quadratic part vanishes, for conics whose
    /// quadratic part is singular.
    pub(crate) fn null_direction(&self) -> Vec2 {
        let [c0, c1, c2, ..] = self.c;
        let row0 = Vec2::new(c0, c1 / 2.0);
        let row1 = Vec2::new(c1 / 2.0, c2);
        let row = if row0.hypot2() >= row1.hypot2() { row0 } else { row1 };
        rot90(row)
    }

    /// The trace of the quadratic part, and the size of the quadratic part
    /// it is compared against.
    fn quadratic_trace(&self) -> (f64, f64) {
        let [c0, c1, c2, ..] = self.c;
        (c0 + c2, c0.abs() + c1.abs() + c2.abs())
    }

    /// The determinant of the quadratic part and the magnitude of its terms.
    pub(crate) fn quadratic_det(&self) -> (f64, f64) {
        let [c0, c1, c2, ..] = self.c;
        let (p, q) = (c0 * c2, 0.25 * c1 * c1);
        (p - q, p.abs() + q)
    }

    /// The determinant of the matrix and the magnitude of its terms.
    fn det_with_scale(&self) -> (f64, f64) {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        let (h, g, f) = (c1 / 2.0, c3 / 2.0, c4 / 2.0);
        let terms = [
            c0 * c2 * c5,
            2.0 * f * g * h,
            -c0 * f * f,
            -c2 * g * g,
            -c5 * h * h,
        ];
        (terms.iter().sum(), terms.iter().map(|t| t.abs()).sum())
    }

    /// The sum of the principal 2×2 minors of the matrix and the magnitude
    /// of its terms.
    fn principal_minor_sum(&self) -> (f64, f64) {
        let [c0, c1, c2, c3, c4, c5] = self.c;
        let (h, g, f) = (c1 / 2.0, c3 / 2.0, c4 / 2.0);
        let terms = [c0 * c2, -h * h, c0 * c5, -g * g, c2 * c5, -f * f];
        (terms.iter().sum(), terms.iter().map(|t| t.abs()).sum())
    }
}

/// The adjugate of a 3×3 matrix.
pub(crate) fn adjugate(m: &Matrix3<f64>) -> Matrix3<f64> {
    let minor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    };
    Matrix3::new(
        minor(1, 2, 1, 2),
        -minor(0, 2, 1, 2),
        minor(0, 1, 1, 2),
        -minor(1, 2, 0, 2),
        minor(0, 2, 0, 2),
        -minor(0, 1, 0, 2),
        minor(1, 2, 0, 1),
        -minor(0, 2, 0, 1),
        minor(0, 1, 0, 1),
    )
}

/// Solve `c0 + c1·x + c2·x² = 0`, treating a barely negative discriminant
/// as a double root.
///
/// `c2` is dropped when it is negligible next to `c2_scale`, the size of
/// the terms it was computed from, so that rounding noise does not produce
/// a root at a huge distance. Returns no roots when all coefficients vanish.
fn solve_tolerant_quadratic(c0: f64, c1: f64, c2: f64, c2_scale: f64) -> ArrayVec<f64, 2> {
    let c2 = if c2.abs() <= TANGENCY_EPSILON * c2_scale {
        0.0
    } else {
        c2
    };
    if c2 == 0.0 && c1 == 0.0 {
        return ArrayVec::new();
    }
    if c2 != 0.0 {
        let disc = c1 * c1 - 4.0 * c0 * c2;
        if disc < 0.0 && disc.abs() <= TANGENCY_EPSILON * (c1 * c1 + (4.0 * c0 * c2).abs()) {
            let mut result = ArrayVec::new();
            result.push(-c1 / (2.0 * c2));
            return result;
        }
    }
    solve_quadratic(c0, c1, c2)
}

/// Wrap an angle into `[0, π)`.
fn half_turn(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    let a = if a >= PI { a - PI } else { a };
    if a >= PI {
        0.0
    } else {
        a
    }
}

fn expand(range: &mut (f64, f64), value: f64) {
    range.0 = range.0.min(value);
    range.1 = range.1.max(value);
}

/// Include the interior extremum of `a·t² + b·t + c` over `[lo, hi]`.
fn edge_extremum(range: &mut (f64, f64), a: f64, b: f64, c: f64, lo: f64, hi: f64) {
    if a == 0.0 {
        return;
    }
    let t = -b / (2.0 * a);
    if t > lo && t < hi {
        expand(range, (a * t + b) * t + c);
    }
}

impl From<[f64; 6]> for ConicSection {
    #[inline]
    fn from(c: [f64; 6]) -> ConicSection {
        ConicSection::from_coeffs(c)
    }
}

impl Add for ConicSection {
    type Output = ConicSection;

    #[inline]
    fn add(self, other: ConicSection) -> ConicSection {
        let mut c = self.c;
        for (a, b) in c.iter_mut().zip(other.c) {
            *a += b;
        }
        ConicSection { c }
    }
}

impl Sub for ConicSection {
    type Output = ConicSection;

    #[inline]
    fn sub(self, other: ConicSection) -> ConicSection {
        self + -other
    }
}

/// Adds a constant to the polynomial.
impl Add<f64> for ConicSection {
    type Output = ConicSection;

    #[inline]
    fn add(mut self, other: f64) -> ConicSection {
        self.c[5] += other;
        self
    }
}

impl Mul<f64> for ConicSection {
    type Output = ConicSection;

    #[inline]
    fn mul(self, other: f64) -> ConicSection {
        ConicSection {
            c: self.c.map(|c| c * other),
        }
    }
}

impl Neg for ConicSection {
    type Output = ConicSection;

    #[inline]
    fn neg(self) -> ConicSection {
        self * -1.0
    }
}

impl Mul<ConicSection> for Affine {
    type Output = ConicSection;

    #[inline]
    fn mul(self, other: ConicSection) -> ConicSection {
        other.transform(self)
    }
}
