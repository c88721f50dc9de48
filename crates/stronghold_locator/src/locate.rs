//! Targeting queries: nearest stronghold lookup and the angular cone filter of a throw.
//!
//! Bearings use the game's compass convention (see [`crate::geometry::angle`]): south is
//! 0 degrees and headings grow clockwise. The cone test compares the wrapped deviation
//! from the reported heading, so intervals crossing the +/-180 degree seam behave.
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::geometry::{angular_deviation, bearing, to_phi, Planar, Point};

/// Slack in degrees added to every cone half-width to absorb floating point noise.
pub const ANGLE_TOLERANCE_DEG: f64 = 1e-9;

/// How the angular error of a throw is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorMode {
    /// The error is an absolute half-width in degrees.
    #[default]
    Absolute,
    /// The error is a fraction of the reported heading.
    Relative,
}

impl ErrorMode {
    /// Cone half-width in degrees for a heading and error.
    pub fn half_width(self, angle: f64, error: f64) -> f64 {
        match self {
            ErrorMode::Absolute => error.abs(),
            ErrorMode::Relative => (angle * error).abs(),
        }
    }
}

/// Options for [`points_in_cone`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConeOptions {
    /// Interpretation of the angular error.
    pub error_mode: ErrorMode,
    /// Keep candidates located exactly at the observer, whose bearing is undefined.
    pub include_observer: bool,
}

impl ConeOptions {
    /// Sets the error interpretation.
    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    /// Sets whether candidates at the observer position are kept.
    pub fn with_include_observer(mut self, include_observer: bool) -> Self {
        self.include_observer = include_observer;
        self
    }
}

/// Candidate nearest to `observer`, or `None` for an empty slice.
///
/// Equidistant candidates resolve to the first in slice order.
pub fn nearest<P: Planar>(observer: Point, candidates: &[P]) -> Option<P> {
    let origin = observer.xz();
    let mut best: Option<(P, f64)> = None;
    for &candidate in candidates {
        let d = candidate.xz().distance_squared(origin);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((candidate, d));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Nearest candidate of every set for every observer, indexed `[observer][set]`.
pub fn nearest_many<P: Planar>(observers: &[Point], sets: &[&[P]]) -> Vec<Vec<Option<P>>> {
    observers
        .par_iter()
        .map(|&observer| sets.iter().map(|set| nearest(observer, set)).collect())
        .collect()
}

/// Candidates whose bearing from `observer` lies within `angle +/- angle_error` degrees.
///
/// Candidate order is preserved.
pub fn points_in_cone<P: Planar>(
    observer: Point,
    candidates: &[P],
    angle: f64,
    angle_error: f64,
    opts: &ConeOptions,
) -> Vec<P> {
    let half_width = opts.error_mode.half_width(angle, angle_error) + ANGLE_TOLERANCE_DEG;
    candidates
        .par_iter()
        .copied()
        .filter(|candidate| match bearing(observer, Point(candidate.xz())) {
            Some(b) => angular_deviation(b, angle).abs() <= half_width,
            None => opts.include_observer,
        })
        .collect()
}

/// One Eye of Ender throw: where it was thrown from, the heading it flew and its error.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EyeThrow {
    observer: Point,
    angle: f64,
    error: f64,
    phi: f64,
    ray: Point,
}

impl EyeThrow {
    /// Creates a throw from an observer position, a heading and an error, both in degrees.
    pub fn new(observer: Point, angle: f64, error: f64) -> Result<Self> {
        if !observer.x().is_finite() || !observer.z().is_finite() {
            return Err(Error::InvalidConfig("observer must be finite".into()));
        }
        if !angle.is_finite() {
            return Err(Error::InvalidConfig("throw angle must be finite".into()));
        }
        if !error.is_finite() || error < 0.0 {
            return Err(Error::InvalidConfig(
                "throw error must be finite and >= 0".into(),
            ));
        }
        let phi = to_phi(angle);
        Ok(Self {
            observer,
            angle,
            error,
            phi,
            ray: Point::from_polar(1.0, phi),
        })
    }

    /// Position the eye was thrown from.
    pub fn observer(&self) -> Point {
        self.observer
    }

    /// Reported heading in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Reported error in degrees.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Reported heading as a polar angle in radians.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Unit vector along the reported heading.
    pub fn ray(&self) -> Point {
        self.ray
    }

    /// Cone half-width in degrees for an error interpretation.
    pub fn half_width(&self, mode: ErrorMode) -> f64 {
        mode.half_width(self.angle, self.error)
    }

    /// Unit vector along the counterclockwise edge of the cone.
    pub fn ray_a(&self, mode: ErrorMode) -> Point {
        Point::from_polar(1.0, to_phi(self.angle - self.half_width(mode)))
    }

    /// Unit vector along the clockwise edge of the cone.
    pub fn ray_b(&self, mode: ErrorMode) -> Point {
        Point::from_polar(1.0, to_phi(self.angle + self.half_width(mode)))
    }

    /// Deviation in radians of the bearing towards `p` from the reported heading.
    ///
    /// Returns `None` when `p` coincides with the observer.
    pub fn deviation_to(&self, p: Point) -> Option<f64> {
        bearing(self.observer, p).map(|b| angular_deviation(b, self.angle).to_radians())
    }

    /// Candidates inside the cone spanned by `width_factor` times the throw error.
    pub fn points_in_cone<P: Planar>(
        &self,
        candidates: &[P],
        width_factor: f64,
        opts: &ConeOptions,
    ) -> Vec<P> {
        points_in_cone(
            self.observer,
            candidates,
            self.angle,
            self.error * width_factor,
            opts,
        )
    }
}
