//! Static description of the eight concentric rings that hold strongholds.
//!
//! Ring bands are disjoint and ordered by increasing radius. Membership uses the closed
//! interval `[inner, outer]`; points in the gaps between bands are attributed to the ring
//! whose boundary is nearest with [`closest_ring`].
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::geometry::{Planar, Point};

/// Number of stronghold rings.
pub const RING_COUNT: usize = 8;

/// Strongholds in a complete world, summed over all rings.
pub const STRONGHOLD_COUNT: usize = 128;

/// One annular band of stronghold placement.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ring {
    /// Position of the ring, 0 being innermost.
    pub index: usize,
    /// Inner radius in blocks.
    pub inner: f64,
    /// Outer radius in blocks.
    pub outer: f64,
    /// Number of strongholds placed in this ring.
    pub count: usize,
}

impl Ring {
    const fn new(index: usize, inner: f64, outer: f64, count: usize) -> Self {
        Self {
            index,
            inner,
            outer,
            count,
        }
    }

    /// Mid radius of the band.
    #[inline]
    pub fn center(&self) -> f64 {
        (self.inner + self.outer) / 2.0
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.outer - self.inner
    }

    /// Returns whether a radius lies in the closed band.
    #[inline]
    pub fn contains_radius(&self, radius: f64) -> bool {
        self.inner <= radius && radius <= self.outer
    }

    /// Returns whether a point lies in the closed band.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.contains_radius(p.radius())
    }

    /// Distance from a radius to the nearest boundary of the band.
    #[inline]
    pub fn boundary_distance(&self, radius: f64) -> f64 {
        (radius - self.inner).abs().min((radius - self.outer).abs())
    }
}

pub const RINGS: [Ring; RING_COUNT] = [
    Ring::new(0, 1280.0, 2816.0, 3),
    Ring::new(1, 4352.0, 5888.0, 6),
    Ring::new(2, 7424.0, 8960.0, 10),
    Ring::new(3, 10496.0, 12032.0, 15),
    Ring::new(4, 13568.0, 15104.0, 21),
    Ring::new(5, 16640.0, 18176.0, 28),
    Ring::new(6, 19712.0, 21248.0, 36),
    Ring::new(7, 22784.0, 24320.0, 9),
];

/// Looks up a ring by index.
pub fn ring(index: usize) -> Result<&'static Ring> {
    RINGS.get(index).ok_or(Error::UnknownRing { index })
}

/// Checks every index and rejects an empty selection.
pub fn validate_ring_indices(indices: &[usize]) -> Result<()> {
    if indices.is_empty() {
        return Err(Error::InvalidConfig(
            "at least one ring index is required".into(),
        ));
    }
    for &index in indices {
        ring(index)?;
    }
    Ok(())
}

/// All ring indices in order.
pub fn all_ring_indices() -> Vec<usize> {
    (0..RING_COUNT).collect()
}

/// Returns whether a point lies within the given ring.
pub fn in_ring(p: Point, index: usize) -> Result<bool> {
    Ok(ring(index)?.contains(p))
}

/// Returns whether a point lies within any of the given rings.
pub fn in_any_ring(p: Point, indices: &[usize]) -> Result<bool> {
    let radius = p.radius();
    for &index in indices {
        if ring(index)?.contains_radius(radius) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Ring whose inner or outer boundary is nearest to the point's radius.
///
/// Ties go to the lowest index.
pub fn closest_ring(p: Point) -> usize {
    closest_ring_for_radius(p.radius())
}

/// Ring whose boundary is nearest to a radius; ties go to the lowest index.
pub fn closest_ring_for_radius(radius: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for r in &RINGS {
        let d = r.boundary_distance(radius);
        if d < best_distance {
            best = r.index;
            best_distance = d;
        }
    }
    best
}

/// Ring containing the point, or the closest ring when the point lies in a gap.
pub fn ring_of(p: Point) -> usize {
    let radius = p.radius();
    RINGS
        .iter()
        .find(|r| r.contains_radius(radius))
        .map(|r| r.index)
        .unwrap_or_else(|| closest_ring_for_radius(radius))
}

/// [`ring_of`] for many points at once, in input order.
pub fn rings_of<P: Planar>(points: &[P]) -> Vec<usize> {
    points.par_iter().map(|p| ring_of(Point(p.xz()))).collect()
}
