// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipping conics to rectangles, as rational quadratic arcs.

use alloc::vec::Vec;
use core::f64::consts::PI;

use arrayvec::ArrayVec;
use kurbo::common::solve_quadratic;
use kurbo::{Point, Rect, Vec2};
use log::{debug, trace};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::{normalize_angle, rect_contains, rect_tolerance, rot90};
use crate::{AngleInterval, ConicKind, ConicSection, ImplicitLine, RatQuad};

/// Arcs sweeping more than this are split before fitting, so that the
/// control point stays near the curve.
const MAX_SWEEP: f64 = 0.75 * PI;

/// How many times an arc may be halved when it cannot be fitted.
const MAX_DEPTH: u32 = 8;

/// Slack on the edge parameter of a crossing.
const EDGE_SLACK: f64 = 1e-9;

/// Append the parts of `conic` inside `rect` to `out`.
///
/// Curves are cut into arcs between their crossings with the rectangle's
/// edges, and each arc inside is appended as one or more [`RatQuad`]s; long
/// arcs are split so that no piece turns by more than 135°. A bounded curve
/// lying wholly inside comes out as four quarter arcs. Real line pairs are
/// appended as straight segments (with weight 1).
///
/// Returns whether anything was appended.
///
/// ```
/// use conics::ConicSection;
/// use kurbo::{Point, Rect};
///
/// let circle = ConicSection::circle(Point::ZERO, 1.0);
/// let mut arcs = Vec::new();
/// assert!(conics::clip(&circle, Rect::new(0.0, -2.0, 2.0, 2.0), &mut arcs));
/// assert_eq!(arcs.len(), 2);
/// ```
pub fn clip(conic: &ConicSection, rect: Rect, out: &mut Vec<RatQuad>) -> bool {
    let before = out.len();
    let rect = rect.abs();
    match conic.kind() {
        ConicKind::Circle
        | ConicKind::RealEllipse
        | ConicKind::Parabola
        | ConicKind::Hyperbola
        | ConicKind::RectangularHyperbola => conic.clip_curve(rect, out),
        ConicKind::DoubleLine => {
            if let Some((line, _)) = conic.decompose() {
                clip_line(line, rect, out);
            }
        }
        ConicKind::TwoRealParallelLines | ConicKind::TwoRealCrossingLines => {
            if let Some((l1, l2)) = conic.decompose() {
                clip_line(l1, rect, out);
                clip_line(l2, rect, out);
            }
        }
        ConicKind::Unknown => {
            let [_, _, _, c3, c4, c5] = conic.coeffs();
            clip_line(ImplicitLine::new(c3, c4, c5), rect, out);
        }
        ConicKind::ImaginaryEllipse
        | ConicKind::TwoImaginaryParallelLines
        | ConicKind::TwoImaginaryCrossingLines => {}
    }
    out.len() > before
}

fn clip_line(line: ImplicitLine, rect: Rect, out: &mut Vec<RatQuad>) {
    let Some(seg) = line.clip(rect) else {
        return;
    };
    if (seg.p1 - seg.p0).hypot() > rect_tolerance(rect) {
        out.push(RatQuad::new(seg.p0, seg.p0.midpoint(seg.p1), seg.p1, 1.0));
    }
}

impl ConicSection {
    /// The points where the conic crosses the boundary of `rect`.
    ///
    /// Edges are visited in order starting from `(x0, y0)`, and points
    /// closer together than a small fraction of the rectangle's size are
    /// reported once. An edge lying on the conic contributes no points.
    pub fn crossings(&self, rect: Rect) -> SmallVec<[Point; 8]> {
        let r = rect.abs();
        let tolerance = rect_tolerance(r);
        let corners = [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ];
        let mut points: SmallVec<[Point; 8]> = SmallVec::new();
        for i in 0..4 {
            let start = corners[i];
            let edge = corners[(i + 1) % 4] - start;
            for t in self.roots_along(start, edge) {
                if !(-EDGE_SLACK..=1.0 + EDGE_SLACK).contains(&t) {
                    continue;
                }
                let p = start + edge * t.clamp(0.0, 1.0);
                if points.iter().any(|q| (*q - p).hypot() <= tolerance) {
                    continue;
                }
                trace!("crossing at {p:?} on edge {i}");
                points.push(p);
            }
        }
        points
    }

    /// Append the parts of the conic inside `rect` to `out`.
    ///
    /// See [`clip`](crate::clip()) for details. Returns whether anything was
    /// appended.
    pub fn clip(&self, rect: Rect, out: &mut Vec<RatQuad>) -> bool {
        clip(self, rect, out)
    }

    /// The part of the conic inside `rect`, if it is a single arc.
    ///
    /// Returns `None` when nothing is inside, and also when the inside part
    /// needs more than one [`RatQuad`], as a whole ellipse does. Use
    /// [`clip`](Self::clip) to get every piece.
    pub fn to_curve(&self, rect: Rect) -> Option<RatQuad> {
        let mut arcs = Vec::new();
        self.clip(rect, &mut arcs);
        match arcs.as_slice() {
            [arc] => Some(*arc),
            [] => None,
            _ => {
                debug!("{} pieces inside {rect:?}, not a single arc", arcs.len());
                None
            }
        }
    }

    /// The point of the curve whose tangent, oriented as in
    /// [`angle_at`](Self::angle_at), points at `angle`.
    ///
    /// These points lie on the diameter conjugate to that direction.
    fn point_at_angle(&self, angle: f64) -> Option<Point> {
        let [c0, c1, c2, c3, c4, _] = self.coeffs();
        let u = Vec2::from_angle(angle);
        let diameter = ImplicitLine::new(
            2.0 * c0 * u.x + c1 * u.y,
            c1 * u.x + 2.0 * c2 * u.y,
            c3 * u.x + c4 * u.y,
        );
        self.roots(diameter)
            .into_iter()
            .map(|t| diameter.point_at(t))
            .find(|p| rot90(self.gradient(*p)).dot(u) > 0.0)
    }

    /// Tangent angles that no point of the curve reaches, and that separate
    /// its branches: the directions of the axis of a parabola and of the
    /// asymptotes of a hyperbola.
    fn forbidden_angles(&self) -> ArrayVec<f64, 4> {
        let [c0, c1, c2, ..] = self.coeffs();
        let mut directions: ArrayVec<Vec2, 2> = ArrayVec::new();
        match self.kind() {
            ConicKind::Parabola => directions.push(self.null_direction()),
            ConicKind::Hyperbola | ConicKind::RectangularHyperbola => {
                // Directions where the quadratic part vanishes.
                if c0.abs() >= c2.abs() {
                    if c0 == 0.0 {
                        directions.push(Vec2::new(1.0, 0.0));
                        directions.push(Vec2::new(0.0, 1.0));
                    } else {
                        for x in solve_quadratic(c2, c1, c0) {
                            directions.push(Vec2::new(x, 1.0));
                        }
                    }
                } else {
                    for y in solve_quadratic(c0, c1, c2) {
                        directions.push(Vec2::new(1.0, y));
                    }
                }
            }
            _ => {}
        }
        let mut angles = ArrayVec::new();
        for d in directions {
            angles.push(normalize_angle(d.atan2()));
            angles.push(normalize_angle((-d).atan2()));
        }
        angles
    }

    fn clip_curve(&self, rect: Rect, out: &mut Vec<RatQuad>) {
        let tolerance = rect_tolerance(rect);
        let crossings = self.crossings(rect);
        if crossings.len() <= 1 {
            if !self.kind().is_bounded() {
                return;
            }
            // Either the whole curve is inside, touching the boundary at
            // most once, or none of it is.
            let (start, opposite) = match crossings.first() {
                Some(p) => (*p, self.angle_at(*p) + PI),
                None => match self.point_at_angle(0.0) {
                    Some(p) => (p, PI),
                    None => return,
                },
            };
            let inside = self
                .point_at_angle(opposite)
                .is_some_and(|p| rect_contains(rect, p, tolerance));
            if inside {
                let a = self.angle_at(start);
                self.push_arc(AngleInterval::new(a, a, true), start, start, 0, out);
            }
            return;
        }
        let forbidden = self.forbidden_angles();
        let mut ends: SmallVec<[(f64, Point); 8]> =
            crossings.iter().map(|p| (self.angle_at(*p), *p)).collect();
        ends.sort_by(|a, b| a.0.total_cmp(&b.0));
        for i in 0..ends.len() {
            let (a, pa) = ends[i];
            let (b, pb) = ends[(i + 1) % ends.len()];
            let arc = AngleInterval::new(a, b, true);
            if forbidden.iter().any(|f| arc.contains(*f)) {
                continue;
            }
            let Some(mid) = self.point_at_angle(arc.angle_at(0.5)) else {
                trace!("no point between {pa:?} and {pb:?}");
                continue;
            };
            if rect_contains(rect, mid, tolerance) {
                self.push_arc(arc, pa, pb, 0, out);
            }
        }
    }

    /// Append the arc running over `arc` from `from` to `to`, splitting it
    /// as needed.
    fn push_arc(
        &self,
        arc: AngleInterval,
        from: Point,
        to: Point,
        depth: u32,
        out: &mut Vec<RatQuad>,
    ) {
        let mid_angle = arc.angle_at(0.5);
        let Some(mid) = self.point_at_angle(mid_angle) else {
            debug!("arc from {from:?} to {to:?} has no middle, dropped");
            return;
        };
        let fitted = if arc.extent() > MAX_SWEEP * (1.0 + 1e-9) {
            None
        } else {
            RatQuad::from_points_tangents(
                from,
                Vec2::from_angle(arc.start()),
                mid,
                to,
                Vec2::from_angle(arc.end()),
            )
        };
        match fitted {
            Some(q) => out.push(q),
            None if depth < MAX_DEPTH => {
                trace!("splitting arc at {mid:?}");
                let first = AngleInterval::new(arc.start(), mid_angle, true);
                let second = AngleInterval::new(mid_angle, arc.end(), true);
                self.push_arc(first, from, mid, depth + 1, out);
                self.push_arc(second, mid, to, depth + 1, out);
            }
            None => {
                debug!("no arc fits from {from:?} to {to:?}, using a straight segment");
                out.push(RatQuad::new(from, from.midpoint(to), to, 1.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::f64::consts::PI;

    use kurbo::{Affine, ParamCurve, Point, Rect, Vec2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{clip, ConicSection, ImplicitLine, RatQuad};

    fn unit_circle() -> ConicSection {
        ConicSection::circle(Point::ZERO, 1.0)
    }

    /// Every arc starts where the previous one ended, and sampled points
    /// lie on `conic` inside `rect`.
    fn check_arcs(conic: &ConicSection, rect: Rect, arcs: &[RatQuad]) {
        for arc in arcs {
            for i in 0..=16 {
                let p = arc.eval(f64::from(i) / 16.0);
                assert!(conic.value_at(p).abs() < 1e-9, "{p:?} off {conic:?}");
                assert!(
                    p.x >= rect.x0 - 1e-9
                        && p.x <= rect.x1 + 1e-9
                        && p.y >= rect.y0 - 1e-9
                        && p.y <= rect.y1 + 1e-9,
                    "{p:?} outside {rect:?}"
                );
            }
        }
    }

    #[test]
    fn circle_crossings() {
        let crossings = unit_circle().crossings(Rect::new(0.0, -2.0, 2.0, 2.0));
        assert_eq!(crossings.len(), 2);
        assert!(crossings.iter().all(|p| p.x == 0.0));
        // Through the corners of the square inscribed in the circle.
        let s = 0.5_f64.sqrt();
        let crossings = unit_circle().crossings(Rect::new(-s, -s, s, s));
        assert_eq!(crossings.len(), 4, "{crossings:?}");
        assert!(unit_circle()
            .crossings(Rect::new(-2.0, -2.0, 2.0, 2.0))
            .is_empty());
    }

    #[test]
    fn whole_circle() {
        let rect = Rect::new(-2.0, -2.0, 2.0, 2.0);
        let mut arcs = Vec::new();
        assert!(clip(&unit_circle(), rect, &mut arcs));
        assert_eq!(arcs.len(), 4);
        check_arcs(&unit_circle(), rect, &arcs);
        for (a, b) in arcs.iter().zip(arcs.iter().cycle().skip(1)) {
            assert!((a.p2 - b.p0).hypot() < 1e-12);
        }
        assert!(unit_circle().to_curve(rect).is_none());
    }

    #[test]
    fn half_circle() {
        let rect = Rect::new(0.0, -2.0, 2.0, 2.0);
        let mut arcs = Vec::new();
        assert!(unit_circle().clip(rect, &mut arcs));
        assert_eq!(arcs.len(), 2);
        check_arcs(&unit_circle(), rect, &arcs);
        assert_eq!(arcs[0].p0.x, 0.0);
        assert_eq!(arcs[1].p2.x, 0.0);
        assert!((arcs[0].p0.y - arcs[1].p2.y).abs() > 1.9);
        assert!(unit_circle().to_curve(rect).is_none());
    }

    #[test]
    fn single_arc() {
        let rect = Rect::new(0.5, -2.0, 2.0, 2.0);
        let arc = unit_circle().to_curve(rect).unwrap();
        assert_eq!(arc.p0.x, 0.5);
        assert_eq!(arc.p2.x, 0.5);
        assert!((arc.w - 0.5).abs() < 1e-9);
        assert!((arc.p1 - Point::new(2.0, 0.0)).hypot() < 1e-9);
        check_arcs(&unit_circle(), rect, &[arc]);
        let mid = arc.eval(0.5);
        assert!((mid - Point::new(1.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn outside_or_missing() {
        let mut arcs = Vec::new();
        assert!(!clip(&unit_circle(), Rect::new(2.0, 2.0, 3.0, 3.0), &mut arcs));
        // The rectangle inside the circle, not touching it.
        assert!(!clip(&unit_circle(), Rect::new(-0.1, -0.1, 0.1, 0.1), &mut arcs));
        let imaginary = ConicSection::new(1.0, 0.0, 1.0, 0.0, 0.0, 1.0);
        assert!(!clip(&imaginary, Rect::new(-2.0, -2.0, 2.0, 2.0), &mut arcs));
        let point = ConicSection::from_point(Point::ZERO);
        assert!(!clip(&point, Rect::new(-2.0, -2.0, 2.0, 2.0), &mut arcs));
        assert!(arcs.is_empty());
    }

    #[test]
    fn ellipse_in_corner() {
        // x²/4 + y² = 1 against a rectangle covering its first quadrant
        // and a bit more.
        let ellipse = ConicSection::new(0.25, 0.0, 1.0, 0.0, 0.0, -1.0);
        let rect = Rect::new(0.0, 0.0, 3.0, 3.0);
        let mut arcs = Vec::new();
        assert!(ellipse.clip(rect, &mut arcs));
        assert_eq!(arcs.len(), 1);
        check_arcs(&ellipse, rect, &arcs);
        let ends = [arcs[0].p0, arcs[0].p2];
        assert!(ends.iter().any(|p| (*p - Point::new(2.0, 0.0)).hypot() < 1e-9));
        assert!(ends.iter().any(|p| (*p - Point::new(0.0, 1.0)).hypot() < 1e-9));
    }

    #[test]
    fn hyperbola_branches() {
        // x² - y² = 1 in a box around the vertices: one arc per branch.
        let hyperbola = ConicSection::new(1.0, 0.0, -1.0, 0.0, 0.0, -1.0);
        let rect = Rect::new(-2.0, -1.0, 2.0, 1.0);
        let mut arcs = Vec::new();
        assert!(hyperbola.clip(rect, &mut arcs));
        assert_eq!(arcs.len(), 2, "{arcs:?}");
        check_arcs(&hyperbola, rect, &arcs);
        assert!(arcs.iter().any(|a| a.eval(0.5).x > 0.0));
        assert!(arcs.iter().any(|a| a.eval(0.5).x < 0.0));
        for arc in &arcs {
            assert!(arc.w > 1.0);
        }
        // Only the right branch.
        let rect = Rect::new(0.0, -1.0, 2.0, 1.0);
        let arc = hyperbola.to_curve(rect).unwrap();
        assert!((arc.eval(0.5) - Point::new(1.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn parabola_arc() {
        // y = x² cut off at y = 1.
        let parabola = ConicSection::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0);
        let rect = Rect::new(-2.0, -1.0, 2.0, 1.0);
        let arc = parabola.to_curve(rect).unwrap();
        assert!((arc.w - 1.0).abs() < 1e-9);
        check_arcs(&parabola, rect, &[arc]);
        assert!((arc.eval(0.5) - Point::ZERO).hypot() < 1e-9);
    }

    /// Every point of `curve` well inside `rect` is close to one of `arcs`.
    fn assert_covered(curve: impl Iterator<Item = Point>, rect: Rect, arcs: &[RatQuad]) {
        let inner = rect.inset(-1e-3);
        let samples: Vec<Point> = arcs
            .iter()
            .flat_map(|arc| (0..=512).map(|i| arc.eval(f64::from(i) / 512.0)))
            .collect();
        for p in curve.filter(|p| inner.contains(*p)) {
            let d = samples
                .iter()
                .map(|q| (*q - p).hypot())
                .fold(f64::INFINITY, f64::min);
            assert!(d < 0.05, "{p:?} is not covered by {arcs:?}");
        }
    }

    #[test]
    fn turned_parabolas() {
        let mut rng = StdRng::seed_from_u64(17);
        let rect = Rect::new(-2.0, -2.0, 2.0, 2.0);
        // y = x²
        let parabola = ConicSection::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0);
        let mut cases = vec![(1.5, Vec2::ZERO), (5.0, Vec2::ZERO)];
        for _ in 0..40 {
            let offset = Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5));
            cases.push((rng.random_range(-PI..PI), offset));
        }
        for (angle, offset) in cases {
            let conic = parabola.rotate(angle).translate(offset);
            let affine = Affine::translate(offset) * Affine::rotate(angle);
            let mut arcs = Vec::new();
            assert!(conic.clip(rect, &mut arcs), "nothing of {conic:?}");
            let scale = conic.norm();
            for arc in &arcs {
                for i in 0..=16 {
                    let p = arc.eval(f64::from(i) / 16.0);
                    assert!(conic.value_at(p).abs() < 1e-7 * scale, "{p:?} off {conic:?}");
                    assert!(rect.inset(1e-6).contains(p), "{p:?} outside");
                }
            }
            let curve = (-400..=400).map(|i| {
                let t = f64::from(i) / 100.0;
                affine * Point::new(t, t * t)
            });
            assert_covered(curve, rect, &arcs);
        }
    }

    #[test]
    fn small_circle_far_away() {
        let centre = Point::new(1e4, 1e4);
        let circle = ConicSection::circle(centre, 0.1);
        let rect = Rect::new(1e4 - 1.0, 1e4 - 1.0, 1e4 + 1.0, 1e4 + 1.0);
        let mut arcs = Vec::new();
        assert!(circle.clip(rect, &mut arcs));
        assert_eq!(arcs.len(), 4);
        for arc in &arcs {
            for i in 0..=8 {
                let p = arc.eval(f64::from(i) / 8.0);
                assert!(((p - centre).hypot() - 0.1).abs() < 1e-6, "{p:?}");
            }
        }
    }

    #[test]
    fn line_pairs() {
        let rect = Rect::new(-1.0, -1.0, 1.0, 1.0);
        let l1 = ImplicitLine::new(1.0, -1.0, 0.0);
        let l2 = ImplicitLine::new(1.0, 1.0, 0.0);
        let mut arcs = Vec::new();
        assert!(ConicSection::from_lines(l1, l2).clip(rect, &mut arcs));
        assert_eq!(arcs.len(), 2);
        for arc in &arcs {
            assert_eq!(arc.w, 1.0);
            assert!(((arc.p2 - arc.p0).hypot() - 8.0_f64.sqrt()).abs() < 1e-9);
        }
        arcs.clear();
        assert!(ConicSection::from_line(l1).clip(rect, &mut arcs));
        assert_eq!(arcs.len(), 1);
        // A conic without second degree terms is a line.
        let line = ConicSection::new(0.0, 0.0, 0.0, 0.0, 1.0, -0.5);
        let seg = line.to_curve(rect).unwrap();
        assert!((seg.p0.y - 0.5).abs() < 1e-12 && (seg.p2.y - 0.5).abs() < 1e-12);
        assert!(line.to_curve(Rect::new(2.0, 2.0, 3.0, 3.0)).is_none());
    }
}
