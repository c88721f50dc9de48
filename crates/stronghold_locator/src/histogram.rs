//! Regular 2D histogram of sampled positions with bilinear lookup.
//!
//! Bin edges span the data range on each axis, the last bin is closed on the right,
//! and a degenerate axis (all samples equal) is widened by half a block on both sides.
//! [`Histogram2d::sample`] interpolates bilinearly between bin centres and returns zero
//! outside the lattice of centres.
use glam::DVec2;

use crate::error::{Error, Result};
use crate::geometry::{Planar, Point};

/// Edges of `bins` equal-width bins covering `[lo, hi]`.
fn linspace_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let step = (hi - lo) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { hi } else { lo + step * i as f64 })
        .collect()
}

/// Bin index of `v` given the edges, or `None` when outside `[first, last]`.
fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let bins = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[bins]);
    if !(lo..=hi).contains(&v) {
        return None;
    }
    if v == hi {
        return Some(bins - 1);
    }
    let i = ((v - lo) / (hi - lo) * bins as f64).floor() as usize;
    // Rounding can land one bin off near an edge.
    let i = i.min(bins - 1);
    if v < edges[i] {
        Some(i.saturating_sub(1))
    } else if i + 1 < bins && v >= edges[i + 1] {
        Some(i + 1)
    } else {
        Some(i)
    }
}

fn centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Locates `v` on a regular lattice of centres as `(lower index, fraction)`.
fn lattice_position(centers: &[f64], v: f64) -> Option<(usize, f64)> {
    let n = centers.len();
    let first = centers[0];
    let last = centers[n - 1];
    if !(first..=last).contains(&v) {
        return None;
    }
    if n == 1 {
        return Some((0, 0.0));
    }
    let t = (v - first) / (last - first) * (n - 1) as f64;
    let i = (t.floor() as usize).min(n - 2);
    Some((i, t - i as f64))
}

/// Counts of sampled positions on a regular `bins x bins` grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram2d {
    bins: usize,
    /// Row-major by x: `counts[ix * bins + iz]`.
    counts: Vec<f64>,
    x_edges: Vec<f64>,
    z_edges: Vec<f64>,
    x_centers: Vec<f64>,
    z_centers: Vec<f64>,
}

impl Histogram2d {
    /// Bins `points` into `bins x bins` cells spanning their bounding box.
    pub fn from_points<P: Planar>(points: &[P], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidConfig("histogram bins must be > 0".into()));
        }
        if points.is_empty() {
            return Err(Error::InvalidConfig(
                "cannot build a histogram from zero points".into(),
            ));
        }

        let (min, max) = points.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(min, max), p| (min.min(p.xz()), max.max(p.xz())),
        );
        let x_edges = linspace_edges(min.x, max.x, bins);
        let z_edges = linspace_edges(min.y, max.y, bins);

        let mut counts = vec![0.0; bins * bins];
        for p in points {
            let p = p.xz();
            if let (Some(ix), Some(iz)) = (bin_index(&x_edges, p.x), bin_index(&z_edges, p.y)) {
                counts[ix * bins + iz] += 1.0;
            }
        }

        Ok(Self {
            bins,
            counts,
            x_centers: centers(&x_edges),
            z_centers: centers(&z_edges),
            x_edges,
            z_edges,
        })
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Count of the bin at `(ix, iz)`, zero when out of range.
    pub fn count(&self, ix: usize, iz: usize) -> f64 {
        if ix >= self.bins || iz >= self.bins {
            return 0.0;
        }
        self.counts[ix * self.bins + iz]
    }

    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    pub fn z_edges(&self) -> &[f64] {
        &self.z_edges
    }

    /// Centre of the bin at `(ix, iz)`.
    pub fn bin_center(&self, ix: usize, iz: usize) -> Option<Point> {
        Some(Point::new(*self.x_centers.get(ix)?, *self.z_centers.get(iz)?))
    }

    /// Centres of all bins along x and z.
    pub fn bin_centers(&self) -> (&[f64], &[f64]) {
        (&self.x_centers, &self.z_centers)
    }

    /// Total number of binned samples.
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Bilinear interpolation of the counts at `p`, zero outside the bin-centre lattice.
    pub fn sample<P: Planar>(&self, p: P) -> f64 {
        let p = p.xz();
        let (Some((ix, fx)), Some((iz, fz))) = (
            lattice_position(&self.x_centers, p.x),
            lattice_position(&self.z_centers, p.y),
        ) else {
            return 0.0;
        };
        let c00 = self.count(ix, iz);
        let c10 = self.count(ix + 1, iz);
        let c01 = self.count(ix, iz + 1);
        let c11 = self.count(ix + 1, iz + 1);
        let low = c00 * (1.0 - fx) + c10 * fx;
        let high = c01 * (1.0 - fx) + c11 * fx;
        low * (1.0 - fz) + high * fz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(n: usize) -> Vec<Point> {
        let mut points = Vec::new();
        for x in 0..n {
            for z in 0..n {
                points.push(Point::new(x as f64, z as f64));
            }
        }
        points
    }

    #[test]
    fn counts_every_point_once() {
        let points = square(10);
        let hist = Histogram2d::from_points(&points, 4).unwrap();
        assert_eq!(hist.total(), 100.0);
        assert_eq!(hist.x_edges().len(), 5);
        assert_eq!(hist.x_edges()[0], 0.0);
        assert_eq!(hist.x_edges()[4], 9.0);
    }

    #[test]
    fn last_bin_is_closed() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        let hist = Histogram2d::from_points(&points, 2).unwrap();
        assert_eq!(hist.count(0, 0), 1.0);
        assert_eq!(hist.count(1, 1), 2.0);
    }

    #[test]
    fn degenerate_axis_is_widened() {
        let points = [Point::new(5.0, 1.0), Point::new(5.0, 3.0)];
        let hist = Histogram2d::from_points(&points, 2).unwrap();
        assert_eq!(hist.x_edges(), &[4.5, 5.0, 5.5]);
        assert_eq!(hist.total(), 2.0);
        // 5.0 sits on the middle edge and goes into the upper bin.
        assert_eq!(hist.count(1, 0), 1.0);
        assert_eq!(hist.count(1, 1), 1.0);
    }

    #[test]
    fn sample_hits_bin_centres_exactly() {
        let points = square(10);
        let hist = Histogram2d::from_points(&points, 3).unwrap();
        for ix in 0..3 {
            for iz in 0..3 {
                let centre = hist.bin_center(ix, iz).unwrap();
                assert!((hist.sample(centre) - hist.count(ix, iz)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn sample_interpolates_between_centres() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
        ];
        let hist = Histogram2d::from_points(&points, 2).unwrap();
        // Centres are at 0.5 and 1.5 on both axes.
        assert_eq!(hist.bin_centers().0, &[0.5, 1.5]);
        let mid = hist.sample(Point::new(1.0, 1.0));
        assert!((mid - 1.25).abs() < 1e-12);
        let edge = hist.sample(Point::new(1.0, 0.5));
        assert!((edge - 1.5).abs() < 1e-12);
    }

    #[test]
    fn sample_is_zero_outside_lattice() {
        let hist = Histogram2d::from_points(&square(10), 5).unwrap();
        assert_eq!(hist.sample(Point::new(-100.0, 4.0)), 0.0);
        assert_eq!(hist.sample(Point::new(4.0, 0.1)), 0.0);
        assert!(hist.sample(Point::new(4.0, 4.0)) > 0.0);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(Histogram2d::from_points::<Point>(&[], 10).is_err());
        assert!(Histogram2d::from_points(&[Point::ORIGIN], 0).is_err());
    }
}
