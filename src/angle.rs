// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directed intervals of angles on the circle.

use core::f64::consts::TAU;

use crate::common::normalize_angle;

/// An arc of the circle of directions, from `start` to `end`.
///
/// Angles are taken modulo 2π. When `sweep` is true the interval runs from
/// `start` to `end` in the direction of increasing angle, otherwise in the
/// direction of decreasing angle, so an interval may cross the zero angle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleInterval {
    start: f64,
    end: f64,
    sweep: bool,
}

impl AngleInterval {
    /// Create an interval from `start` to `end`.
    ///
    /// Both angles are wrapped into `[0, 2π)`. If they coincide the interval
    /// covers the whole circle.
    pub fn new(start: f64, end: f64, sweep: bool) -> AngleInterval {
        AngleInterval {
            start: normalize_angle(start),
            end: normalize_angle(end),
            sweep,
        }
    }

    /// The interval from `start` to `end` that passes through `inner`.
    pub fn from_three(start: f64, inner: f64, end: f64) -> AngleInterval {
        let ccw = AngleInterval::new(start, end, true);
        if ccw.contains(inner) {
            ccw
        } else {
            AngleInterval::new(start, end, false)
        }
    }

    /// The initial angle, in `[0, 2π)`.
    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// The final angle, in `[0, 2π)`.
    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether the interval runs in the direction of increasing angle.
    #[inline]
    pub fn sweep(&self) -> bool {
        self.sweep
    }

    /// The angular length of the interval, in `(0, 2π]`.
    pub fn extent(&self) -> f64 {
        let d = if self.sweep {
            normalize_angle(self.end - self.start)
        } else {
            normalize_angle(self.start - self.end)
        };
        if d == 0.0 {
            TAU
        } else {
            d
        }
    }

    /// The angle reached after travelling `fraction` of the extent from the start.
    pub fn angle_at(&self, fraction: f64) -> f64 {
        let delta = self.extent() * fraction;
        if self.sweep {
            normalize_angle(self.start + delta)
        } else {
            normalize_angle(self.start - delta)
        }
    }

    /// Whether `angle` lies within the interval, endpoints included.
    pub fn contains(&self, angle: f64) -> bool {
        let offset = if self.sweep {
            normalize_angle(angle - self.start)
        } else {
            normalize_angle(self.start - angle)
        };
        offset <= self.extent()
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use crate::AngleInterval;

    fn deg(d: f64) -> f64 {
        d * PI / 180.0
    }

    #[test]
    fn wraparound() {
        let i = AngleInterval::new(deg(350.0), deg(10.0), true);
        assert!(i.contains(0.0));
        assert!(i.contains(deg(355.0)));
        assert!(i.contains(deg(5.0)));
        assert!(!i.contains(deg(180.0)));
        assert!(!i.contains(deg(20.0)));
        assert!((i.extent() - deg(20.0)).abs() < 1e-12);
    }

    #[test]
    fn three_point_orientation() {
        let i = AngleInterval::from_three(deg(350.0), deg(0.0), deg(10.0));
        assert!(i.sweep());
        assert!(i.contains(deg(355.0)));
        assert!(!i.contains(deg(180.0)));

        let i = AngleInterval::from_three(deg(350.0), deg(180.0), deg(10.0));
        assert!(!i.sweep());
        assert!(i.contains(deg(180.0)));
        assert!(!i.contains(0.0));
        assert!((i.extent() - deg(340.0)).abs() < 1e-12);
    }

    #[test]
    fn full_circle_and_midpoint() {
        let i = AngleInterval::new(1.0, 1.0, true);
        assert!(i.contains(4.0));
        let i = AngleInterval::new(deg(350.0), deg(10.0), true);
        assert!(i.angle_at(0.5).abs() < 1e-12 || (i.angle_at(0.5) - 2.0 * PI).abs() < 1e-12);
        let i = AngleInterval::new(deg(10.0), deg(350.0), false);
        assert!((i.angle_at(0.25) - deg(5.0)).abs() < 1e-12);
    }

    #[test]
    fn negative_input_angles() {
        let i = AngleInterval::new(-PI / 4.0, PI / 4.0, true);
        assert!(i.contains(0.0));
        assert!(i.contains(deg(350.0)));
        assert!(!i.contains(PI));
    }
}
