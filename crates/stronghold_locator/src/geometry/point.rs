//! Immutable 2D point in the x/z plane.
use std::ops::{Add, Mul, Neg, Sub};

use glam::{DMat2, DVec2, Vec2};

use crate::geometry::angle::bearing;

/// A position in the horizontal x/z plane of the world, in blocks.
///
/// `x` grows towards east and `z` grows towards south. The polar angle [`Point::phi`]
/// follows the mathematical convention (`atan2(z, x)`), while [`Point::yrot`] reports
/// the in-game compass heading of the point as seen from the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point(pub DVec2);

impl Point {
    pub const ORIGIN: Point = Point(DVec2::ZERO);

    /// Creates a point from rectangular coordinates.
    #[inline]
    pub const fn new(x: f64, z: f64) -> Self {
        Self(DVec2::new(x, z))
    }

    /// Creates a point from a radius and a polar angle in radians.
    #[inline]
    pub fn from_polar(radius: f64, phi: f64) -> Self {
        Self(DVec2::from_angle(phi) * radius)
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn z(self) -> f64 {
        self.0.y
    }

    /// Distance from the world origin.
    #[inline]
    pub fn radius(self) -> f64 {
        self.0.length()
    }

    /// Polar angle in radians, in (-pi, pi], measured from +x towards +z.
    #[inline]
    pub fn phi(self) -> f64 {
        self.0.y.atan2(self.0.x)
    }

    /// Compass heading in degrees of this point as seen from the origin.
    ///
    /// Returns `0.0` for the origin itself, where the heading is undefined.
    pub fn yrot(self) -> f64 {
        bearing(Point::ORIGIN, self).unwrap_or(0.0)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.0.distance(other.0)
    }

    #[inline]
    pub fn distance_squared(self, other: Point) -> f64 {
        self.0.distance_squared(other.0)
    }

    /// Rotates the point counterclockwise in the x/z plane by `delta` radians about `origin`.
    pub fn rotated(self, delta: f64, origin: Point) -> Self {
        let rotation = DMat2::from_angle(delta);
        Self(origin.0 + rotation * (self.0 - origin.0))
    }

    /// Unit vector pointing in the same direction, or zero for the origin.
    #[inline]
    pub fn normalize_or_zero(self) -> Self {
        Self(self.0.normalize_or_zero())
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.0.dot(other.0)
    }

    /// The z component of the 3D cross product, positive when `other` lies counterclockwise.
    #[inline]
    pub fn perp_dot(self, other: Point) -> f64 {
        self.0.perp_dot(other.0)
    }

    /// Single precision copy, used by the compact heatmap store.
    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        self.0.as_vec2()
    }
}

/// Anything located in the x/z plane: points, compact heatmap samples and candidates.
pub trait Planar: Copy + Send + Sync {
    fn xz(self) -> DVec2;
}

impl Planar for Point {
    #[inline]
    fn xz(self) -> DVec2 {
        self.0
    }
}

impl Planar for DVec2 {
    #[inline]
    fn xz(self) -> DVec2 {
        self
    }
}

impl Planar for Vec2 {
    #[inline]
    fn xz(self) -> DVec2 {
        self.as_dvec2()
    }
}

impl From<DVec2> for Point {
    fn from(value: DVec2) -> Self {
        Self(value)
    }
}

impl From<Point> for DVec2 {
    fn from(value: Point) -> Self {
        value.0
    }
}

impl From<Vec2> for Point {
    fn from(value: Vec2) -> Self {
        Self(value.as_dvec2())
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, z): (f64, f64)) -> Self {
        Self::new(x, z)
    }
}

impl From<mint::Vector2<f64>> for Point {
    fn from(value: mint::Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point> for mint::Vector2<f64> {
    fn from(value: Point) -> Self {
        value.0.into()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point(self.0 * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0)
    }
}
