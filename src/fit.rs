// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a conic to points.

use core::f64::consts::SQRT_2;

use kurbo::{Point, Vec2};
use nalgebra::{Matrix6, Vector6};

use crate::{ConicError, ConicSection};

/// The number of points that determine a conic.
const MIN_POINTS: usize = 5;

impl ConicSection {
    /// The conic that best fits `points` in the algebraic least squares
    /// sense.
    ///
    /// The coefficient vector minimizes the sum of the squared values of the
    /// polynomial at the points, among vectors of unit length. The points are
    /// first moved to their centroid and scaled to a mean distance of √2 from
    /// it, which keeps the problem well conditioned far from the origin.
    /// Five points in general position determine the conic exactly. The
    /// result is [`normalized`](Self::normalized).
    ///
    /// When the points are collinear, or otherwise fail to pin down a single
    /// conic, the result is one of the many conics through them.
    ///
    /// # Errors
    ///
    /// Returns [`ConicError::TooFewPoints`] if fewer than five points are
    /// given.
    ///
    /// ```
    /// use conics::ConicSection;
    /// use kurbo::Point;
    ///
    /// let points = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0), (0.6, 0.8)]
    ///     .map(Point::from);
    /// let conic = ConicSection::fit(&points).unwrap();
    /// assert!(conic.kind().is_bounded());
    /// assert!(conic.value_at(Point::new(-0.8, 0.6)).abs() < 1e-12);
    /// ```
    pub fn fit(points: &[Point]) -> Result<ConicSection, ConicError> {
        if points.len() < MIN_POINTS {
            return Err(ConicError::TooFewPoints {
                needed: MIN_POINTS,
                got: points.len(),
            });
        }
        let n = points.len() as f64;
        let centroid = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2()) / n;
        let mean_dist = points
            .iter()
            .map(|p| (p.to_vec2() - centroid).hypot())
            .sum::<f64>()
            / n;
        let s = if mean_dist > 0.0 { SQRT_2 / mean_dist } else { 1.0 };
        let mut scatter = Matrix6::zeros();
        for p in points {
            let q = (p.to_vec2() - centroid) * s;
            let row = Vector6::new(q.x * q.x, q.x * q.y, q.y * q.y, q.x, q.y, 1.0);
            scatter += row * row.transpose();
        }
        let eigen = scatter.symmetric_eigen();
        let c = eigen.eigenvectors.column(eigen.eigenvalues.imin());
        let normalized = ConicSection::new(c[0], c[1], c[2], c[3], c[4], c[5]);
        Ok(normalized
            .scale(1.0 / s, 1.0 / s)
            .translate(centroid)
            .normalized())
    }
}
