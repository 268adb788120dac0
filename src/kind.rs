// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification of conic sections.

use core::fmt;

/// The kind of a conic section.
///
/// Computed by [`ConicSection::kind`] from the signs of the projective
/// invariants of the conic's matrix: the determinant of the full 3×3 matrix,
/// and the trace and determinant of its leading 2×2 minor.
///
/// [`ConicSection::kind`]: crate::ConicSection::kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConicKind {
    /// A parabola.
    Parabola,
    /// A circle.
    Circle,
    /// An ellipse with real points that is not a circle.
    RealEllipse,
    /// An ellipse without any real point, such as `x² + y² + 1 = 0`.
    ImaginaryEllipse,
    /// A hyperbola whose asymptotes are perpendicular.
    RectangularHyperbola,
    /// A hyperbola that is not rectangular.
    Hyperbola,
    /// A line counted twice, such as `x² = 0`.
    DoubleLine,
    /// Two distinct parallel lines.
    TwoRealParallelLines,
    /// Two complex conjugate parallel lines, such as `x² + 1 = 0`.
    TwoImaginaryParallelLines,
    /// Two lines crossing at a real point.
    TwoRealCrossingLines,
    /// Two complex conjugate lines crossing at a real point.
    ///
    /// The only real point of such a conic is the crossing; see
    /// [`ConicKind::SINGLE_POINT`].
    TwoImaginaryCrossingLines,
    /// Not a quadratic curve: all second degree coefficients vanish.
    Unknown,
}

impl ConicKind {
    /// Alias for [`ConicKind::TwoImaginaryCrossingLines`], whose only real
    /// point is the crossing.
    pub const SINGLE_POINT: ConicKind = ConicKind::TwoImaginaryCrossingLines;

    /// Whether the kind is a line pair (real or not).
    pub fn is_degenerate(self) -> bool {
        matches!(
            self,
            ConicKind::DoubleLine
                | ConicKind::TwoRealParallelLines
                | ConicKind::TwoImaginaryParallelLines
                | ConicKind::TwoRealCrossingLines
                | ConicKind::TwoImaginaryCrossingLines
        )
    }

    /// Whether the conic has a real curve (more than an isolated point).
    pub fn is_real(self) -> bool {
        !matches!(
            self,
            ConicKind::ImaginaryEllipse
                | ConicKind::TwoImaginaryParallelLines
                | ConicKind::TwoImaginaryCrossingLines
                | ConicKind::Unknown
        )
    }

    /// Whether the conic is a closed bounded curve.
    pub fn is_bounded(self) -> bool {
        matches!(self, ConicKind::Circle | ConicKind::RealEllipse)
    }

    /// Whether the conic is a hyperbola of either kind.
    pub fn is_hyperbola(self) -> bool {
        matches!(self, ConicKind::Hyperbola | ConicKind::RectangularHyperbola)
    }
}

impl fmt::Display for ConicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConicKind::Parabola => "parabola",
            ConicKind::Circle => "circle",
            ConicKind::RealEllipse => "real ellipse",
            ConicKind::ImaginaryEllipse => "imaginary ellipse",
            ConicKind::RectangularHyperbola => "rectangular hyperbola",
            ConicKind::Hyperbola => "hyperbola",
            ConicKind::DoubleLine => "double line",
            ConicKind::TwoRealParallelLines => "two real parallel lines",
            ConicKind::TwoImaginaryParallelLines => "two imaginary parallel lines",
            ConicKind::TwoRealCrossingLines => "two real crossing lines",
            ConicKind::TwoImaginaryCrossingLines => "two imaginary crossing lines",
            ConicKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
