// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by conic queries and constructors.

use core::fmt;

/// An error from a conic section operation.
///
/// Most queries without a meaningful answer return `None`; this type is
/// reserved for outcomes that indicate a real failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConicError {
    /// No point of the conic could be found near the query point.
    ///
    /// This is what happens for conics without real points, such as an
    /// imaginary ellipse.
    NoNearestPoint,
    /// Fitting needs more points than were supplied.
    TooFewPoints {
        /// The minimum number of points.
        needed: usize,
        /// The number of points supplied.
        got: usize,
    },
    /// A vertex or both foci were not finite.
    PointAtInfinity,
}

impl fmt::Display for ConicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConicError::NoNearestPoint => write!(f, "no nearest point found"),
            ConicError::TooFewPoints { needed, got } => {
                write!(f, "fitting error: need {needed} points, got {got}")
            }
            ConicError::PointAtInfinity => write!(f, "vertex or foci at infinity"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConicError {}
