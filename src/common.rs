// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations and the crate's tolerance policy.

use core::f64::consts::TAU;

use kurbo::{Point, Rect, Vec2};

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for signum, because libm doesn't have it.
            fn signum(self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn signum(self) -> f64 {
                if self.is_nan() {
                    f64::NAN
                } else {
                    1.0_f64.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("conics requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs;
    fn atan2(self, other: Self) -> Self => atan2;
    fn copysign(self, sign: Self) -> Self => copysign;
    fn cos(self) -> Self => cos;
    fn hypot(self, other: Self) -> Self => hypot;
    fn sin(self) -> Self => sin;
    fn sqrt(self) -> Self => sqrt;
}

/// Relative tolerance used for every "is this invariant zero" decision.
///
/// The invariants of a conic (determinants, traces) are sums of products of
/// coefficients. Such a sum is treated as zero when its magnitude is at
/// most `EPSILON` times the sum of the magnitudes of its products, which
/// bounds the rounding error it can carry. The test is homogeneous, so
/// scaling a conic never changes the outcome.
///
/// The bound is only a few hundred ulps. A small conic far from the
/// origin has large cancelling terms, and its shape survives only in the
/// low bits of their sum.
pub const EPSILON: f64 = 128.0 * f64::EPSILON;

/// Relative tolerance for decisions about values that are themselves
/// approximate: near-tangent lines, near-parallel lines, and second degree
/// terms of the equation along a line that are only rounding noise.
pub const TANGENCY_EPSILON: f64 = 1e-10;

/// Geometric tolerance, relative to the size of the rectangle involved,
/// used to merge coincident crossings and for inclusive containment.
pub const POINT_EPSILON: f64 = 1e-9;

/// Whether `value` is zero relative to `scale`.
///
/// `scale` is the magnitude `value` is compared against, usually the sum of
/// the absolute values of the terms that were added up to produce it.
#[inline]
pub fn is_near_zero(value: f64, scale: f64) -> bool {
    value.abs() <= EPSILON * scale
}

/// The sign of `value` as -1, 0 or 1, with zero decided by [`is_near_zero`].
#[inline]
pub fn tolerant_sign(value: f64, scale: f64) -> i32 {
    if is_near_zero(value, scale) {
        0
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}

/// Twice the signed area of the triangle `p1 p2 p3`.
///
/// Positive when the points turn counter-clockwise (in a y-up frame).
#[inline]
pub fn signed_triangle_area(p1: Point, p2: Point, p3: Point) -> f64 {
    (p2 - p1).cross(p3 - p1)
}

/// Rotate a vector by a quarter turn, mapping `(x, y)` to `(-y, x)`.
#[inline]
pub fn rot90(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        // `a + TAU` can round up to exactly `TAU` for tiny negative `a`.
        let wrapped = a + TAU;
        if wrapped >= TAU {
            0.0
        } else {
            wrapped
        }
    } else {
        a
    }
}

/// Geometric tolerance appropriate for a rectangle.
#[inline]
pub(crate) fn rect_tolerance(rect: Rect) -> f64 {
    let size = rect.width().abs().max(rect.height().abs()).max(1.0);
    POINT_EPSILON * size
}

/// Inclusive containment, padded by `tolerance` on every side.
///
/// Unlike [`Rect::contains`], points on the right and bottom edges count.
#[inline]
pub(crate) fn rect_contains(rect: Rect, p: Point, tolerance: f64) -> bool {
    let r = rect.abs();
    p.x >= r.x0 - tolerance
        && p.x <= r.x1 + tolerance
        && p.y >= r.y0 - tolerance
        && p.y <= r.y1 + tolerance
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{PI, TAU};

    use kurbo::{Point, Rect, Vec2};

    use crate::common::*;

    #[test]
    fn tolerance_is_relative() {
        assert!(is_near_zero(1e-15, 1.0));
        assert!(!is_near_zero(1e-12, 1.0));
        assert!(!is_near_zero(1e-15, 1e-6));
        assert!(is_near_zero(1e-7, 1e8));
        assert_eq!(tolerant_sign(-2.0, 1.0), -1);
        assert_eq!(tolerant_sign(2.0, 1.0), 1);
        assert_eq!(tolerant_sign(1e-15, 1.0), 0);
        assert_eq!(tolerant_sign(-1e-12, 1.0), -1);
    }

    #[test]
    fn wrap_angles() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
        assert!(normalize_angle(-1e-300) < TAU);
    }

    #[test]
    fn triangle_orientation() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 1.0);
        assert_eq!(signed_triangle_area(a, b, c), 1.0);
        assert_eq!(signed_triangle_area(a, c, b), -1.0);
        assert_eq!(rot90(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn inclusive_rect() {
        let r = Rect::new(0.0, 0.0, 2.0, 1.0);
        assert!(rect_contains(r, Point::new(2.0, 1.0), 0.0));
        assert!(!rect_contains(r, Point::new(2.1, 1.0), 0.0));
        assert!(rect_contains(r, Point::new(2.0 + 1e-12, 1.0), rect_tolerance(r)));
    }
}
