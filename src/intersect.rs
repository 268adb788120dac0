// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection of conics, and nearest points.

use arrayvec::ArrayVec;
use kurbo::common::solve_cubic;
use kurbo::{Point, Vec2};
use log::{debug, trace};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::POINT_EPSILON;
use crate::conic::adjugate;
use crate::{ConicError, ConicKind, ConicSection, ImplicitLine};

/// How far a point may be from a curve, relative to the terms of the
/// curve's equation, and still count as lying on it.
const ON_CURVE_TOLERANCE: f64 = 1e-6;

/// The real point set of a conic, in the form intersection works with.
enum Components {
    /// A non-degenerate curve, or an imaginary ellipse.
    Curve,
    /// One or two real lines.
    Lines(ArrayVec<ImplicitLine, 2>),
    /// A single real point.
    Point(Point),
    /// No real points, or the whole plane.
    Nothing,
}

impl ConicSection {
    fn components(&self) -> Components {
        let [_, _, _, c3, c4, c5] = self.coeffs();
        match self.kind() {
            ConicKind::Unknown => {
                let line = ImplicitLine::new(c3, c4, c5);
                if line.is_degenerate() {
                    Components::Nothing
                } else {
                    Components::Lines([line].into_iter().collect())
                }
            }
            ConicKind::TwoImaginaryParallelLines => Components::Nothing,
            ConicKind::TwoImaginaryCrossingLines => match self.centre() {
                Some(p) => Components::Point(p),
                None => Components::Nothing,
            },
            kind @ (ConicKind::DoubleLine
            | ConicKind::TwoRealParallelLines
            | ConicKind::TwoRealCrossingLines) => match self.line_pair() {
                Some((l1, l2)) => {
                    let mut lines = ArrayVec::new();
                    lines.push(l1);
                    if kind != ConicKind::DoubleLine {
                        lines.push(l2);
                    }
                    Components::Lines(lines)
                }
                None => Components::Nothing,
            },
            _ => Components::Curve,
        }
    }

    /// The points where this conic meets `other`.
    ///
    /// Degenerate conics take part through their real lines or their single
    /// real point. When the two conics share a whole line, the points on it
    /// are not reported.
    ///
    /// ```
    /// use conics::ConicSection;
    /// use kurbo::Point;
    ///
    /// let a = ConicSection::circle(Point::new(0.0, 0.0), 1.0);
    /// let b = ConicSection::circle(Point::new(1.0, 0.0), 1.0);
    /// let points = a.intersect(&b);
    /// assert_eq!(points.len(), 2);
    /// assert!(points.iter().all(|p| (p.x - 0.5).abs() < 1e-9));
    /// ```
    pub fn intersect(&self, other: &ConicSection) -> SmallVec<[Point; 4]> {
        let mut points = SmallVec::new();
        match (self.components(), other.components()) {
            (Components::Nothing, _) | (_, Components::Nothing) => {}
            (Components::Point(p), Components::Point(q)) => {
                if (p - q).hypot() <= POINT_EPSILON * (1.0 + p.to_vec2().hypot()) {
                    points.push(p);
                }
            }
            (Components::Point(p), _) => {
                if other.passes_through(p) {
                    points.push(p);
                }
            }
            (_, Components::Point(p)) => {
                if self.passes_through(p) {
                    points.push(p);
                }
            }
            (Components::Lines(lines), _) => other.meet_lines(&lines, &mut points),
            (_, Components::Lines(lines)) => self.meet_lines(&lines, &mut points),
            (Components::Curve, Components::Curve) => self.meet_curve(other, &mut points),
        }
        dedup_points(&mut points);
        points
    }

    /// All the points of the conic nearest to `p`.
    ///
    /// There is more than one when `p` lies on an axis of symmetry, for
    /// example at the centre of an ellipse. From the centre of a circle,
    /// where every point is equally near, the point in the `+x` direction is
    /// returned. The result is empty when the conic has no real points.
    pub fn all_nearest_points(&self, p: Point) -> SmallVec<[Point; 4]> {
        let mut result = SmallVec::new();
        if self.kind() == ConicKind::Circle {
            if let Some(centre) = self.centre() {
                let [c0, ..] = self.coeffs();
                let radius = (-self.value_at(centre) / c0).max(0.0).sqrt();
                if (p - centre).hypot() <= POINT_EPSILON * radius.max(1.0) {
                    result.push(centre + Vec2::new(radius, 0.0));
                    return result;
                }
            }
        }
        // The points where the normal passes through `p` form another conic.
        let [c0, c1, c2, c3, c4, _] = self.coeffs();
        let normals = ConicSection::new(
            -c1,
            2.0 * (c0 - c2),
            c1,
            -c4 + c1 * p.x - 2.0 * c0 * p.y,
            c3 - c1 * p.y + 2.0 * c2 * p.x,
            -c3 * p.y + c4 * p.x,
        );
        let candidates = self.intersect(&normals);
        let Some(min) = candidates
            .iter()
            .map(|q| (*q - p).hypot2())
            .min_by(f64::total_cmp)
        else {
            return result;
        };
        let tolerance = POINT_EPSILON * min.max(1.0);
        result.extend(
            candidates
                .into_iter()
                .filter(|q| (*q - p).hypot2() - min <= tolerance),
        );
        result
    }

    /// The point of the conic nearest to `p`.
    ///
    /// When several points are equally near, the first one found is
    /// returned; see [`all_nearest_points`](Self::all_nearest_points).
    ///
    /// # Errors
    ///
    /// Returns [`ConicError::NoNearestPoint`] if the conic has no real
    /// points, as for an imaginary ellipse.
    ///
    /// ```
    /// use conics::ConicSection;
    /// use kurbo::Point;
    ///
    /// let circle = ConicSection::circle(Point::ZERO, 2.0);
    /// let p = circle.nearest_point(Point::new(4.0, 0.0)).unwrap();
    /// assert!((p - Point::new(2.0, 0.0)).hypot() < 1e-9);
    /// ```
    pub fn nearest_point(&self, p: Point) -> Result<Point, ConicError> {
        self.all_nearest_points(p)
            .first()
            .copied()
            .ok_or(ConicError::NoNearestPoint)
    }

    /// Whether `p` lies on the conic, relative to the size of the terms of
    /// its equation at `p`.
    fn passes_through(&self, p: Point) -> bool {
        let [c0, c1, c2, c3, c4, c5] = self.coeffs();
        let terms = [
            c0 * p.x * p.x,
            c1 * p.x * p.y,
            c2 * p.y * p.y,
            c3 * p.x,
            c4 * p.y,
            c5,
        ];
        let scale: f64 = terms.iter().map(|t| t.abs()).sum();
        self.value_at(p).abs() <= ON_CURVE_TOLERANCE * scale
    }

    fn meet_lines(&self, lines: &[ImplicitLine], points: &mut SmallVec<[Point; 4]>) {
        for line in lines {
            points.extend(self.roots(*line).into_iter().map(|t| line.point_at(t)));
        }
    }

    /// Intersect two non-degenerate conics through a degenerate member of
    /// the pencil they span.
    fn meet_curve(&self, other: &ConicSection, points: &mut SmallVec<[Point; 4]>) {
        let a = self.matrix();
        let b = other.matrix();
        // det(A + λB) as a cubic in λ.
        let d0 = a.determinant();
        let d1 = (adjugate(&a) * b).trace();
        let d2 = (a * adjugate(&b)).trace();
        let d3 = b.determinant();
        let lambdas = solve_cubic(d0, d1, d2, d3);
        // Every point of the pencil's base lies on each member, so any
        // member that splits into real lines will do.
        let Some((l1, l2)) = lambdas
            .iter()
            .find_map(|&lambda| (*self + *other * lambda).line_pair())
        else {
            debug!("no real degenerate member among {} in pencil", lambdas.len());
            return;
        };
        for line in [l1, l2] {
            for t in self.roots(line) {
                let p = line.point_at(t);
                if other.passes_through(p) {
                    points.push(p);
                } else {
                    trace!("dropping {p:?}, not on both conics");
                }
            }
        }
    }
}

/// Remove points that coincide with an earlier one.
fn dedup_points(points: &mut SmallVec<[Point; 4]>) {
    let mut i = 0;
    while i < points.len() {
        let p = points[i];
        let tolerance = POINT_EPSILON * p.to_vec2().hypot().max(1.0);
        if points[..i].iter().any(|q| (*q - p).hypot() <= tolerance) {
            points.remove(i);
        } else {
            i += 1;
        }
    }
}
