//! Angle conventions and small numeric helpers.
//!
//! The game measures headings ("y rotation") in degrees with 0 at due south (+z),
//! increasing clockwise when viewed from above, so that west (-x) is +90 and east (+x)
//! is -90. The mathematical polar angle `phi` is 0 at +x and increases towards +z.
//! Both live in (-180, 180] (or (-pi, pi]).
use std::f64::consts::{PI, TAU};

use crate::geometry::Point;

/// Converts a game heading in degrees to a polar angle in radians.
pub fn to_phi(yrot_deg: f64) -> f64 {
    wrap_radians(yrot_deg.to_radians() + PI / 2.0)
}

/// Converts a polar angle in radians to a game heading in degrees.
pub fn to_yrot(phi: f64) -> f64 {
    wrap_degrees((phi - PI / 2.0).to_degrees())
}

/// Wraps an angle in degrees into (-180, 180].
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Wraps an angle in radians into (-pi, pi].
pub fn wrap_radians(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Game heading in degrees from `from` towards `to`.
///
/// Returns `None` when both points coincide.
pub fn bearing(from: Point, to: Point) -> Option<f64> {
    let d = to - from;
    if d.x() == 0.0 && d.z() == 0.0 {
        return None;
    }
    Some(wrap_degrees((-d.x()).atan2(d.z()).to_degrees()))
}

/// Signed difference `angle - reference` in degrees, wrapped into (-180, 180].
pub fn angular_deviation(angle: f64, reference: f64) -> f64 {
    wrap_degrees(angle - reference)
}

/// Returns whether `x` lies in the closed interval spanned by `a` and `b`, in either order.
pub fn in_interval(x: f64, a: f64, b: f64) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo <= x && x <= hi
}

/// Arguments of the n-th roots of unity: `0, 2pi/n, ..., 2pi(n-1)/n`.
pub fn unity_angles(n: usize) -> Vec<f64> {
    (0..n).map(|i| TAU * i as f64 / n as f64).collect()
}

/// Probability density of a normal distribution.
pub fn normal_pdf(y: f64, mean: f64, std: f64) -> f64 {
    let u = (y - mean) / std;
    (-0.5 * u * u).exp() / (TAU * std * std).sqrt()
}

/// Neumaier-compensated sum.
pub fn compensated_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0f64;
    let mut compensation = 0.0f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phi_and_yrot_are_inverse() {
        for yrot in [-179.5, -90.0, -12.25, 0.0, 45.0, 90.0, 180.0] {
            let back = to_yrot(to_phi(yrot));
            assert!((back - yrot).abs() < 1e-9, "{yrot} -> {back}");
        }
    }

    #[test]
    fn south_heading_points_along_positive_z() {
        assert!((to_phi(0.0) - PI / 2.0).abs() < 1e-12);
        assert!((to_phi(90.0) - PI).abs() < 1e-12);
    }

    #[test]
    fn wrap_degrees_range() {
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
    }

    #[test]
    fn deviation_wraps_across_discontinuity() {
        assert!((angular_deviation(-179.0, 179.0) - 2.0).abs() < 1e-12);
        assert!((angular_deviation(179.0, -179.0) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn bearing_is_undefined_at_observer() {
        let p = Point::new(3.0, 4.0);
        assert!(bearing(p, p).is_none());
        assert_eq!(bearing(p, Point::new(3.0, 10.0)), Some(0.0));
        assert_eq!(bearing(Point::ORIGIN, Point::new(-0.0, -5.0)), Some(180.0));
    }

    #[test]
    fn in_interval_is_order_independent() {
        assert!(in_interval(2.0, 1.0, 3.0));
        assert!(in_interval(2.0, 3.0, 1.0));
        assert!(in_interval(1.0, 3.0, 1.0));
        assert!(!in_interval(3.5, 3.0, 1.0));
    }

    #[test]
    fn unity_angles_are_evenly_spaced() {
        let angles = unity_angles(4);
        assert_eq!(angles.len(), 4);
        assert!((angles[1] - PI / 2.0).abs() < 1e-12);
        assert!((angles[3] - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn normal_pdf_peak() {
        let peak = normal_pdf(0.0, 0.0, 1.0);
        assert!((peak - 0.398_942_280_4).abs() < 1e-9);
        assert!(normal_pdf(1.0, 0.0, 1.0) < peak);
    }

    #[test]
    fn compensated_sum_recovers_small_terms() {
        let values = [1e16, 1.0, -1e16, 1.0];
        assert_eq!(compensated_sum(values), 2.0);
    }
}
