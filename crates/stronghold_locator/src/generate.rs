//! Procedural generator reproducing ring-based stronghold placement.
//!
//! Each ring draws one uniformly random base angle and spaces its strongholds evenly
//! around the circle from there; every stronghold gets an independent radius drawn
//! uniformly across the band. With snapping enabled the position is rounded to the
//! nearest chunk, displaced by the biome-search jitter of up to [`JITTER_CHUNKS`]
//! chunks per axis and finally reported at the requested [`ChunkAlignment`].
//!
//! Snapping can push a stronghold slightly outside its band. The real placement
//! algorithm has the same property, so it is not corrected.
use std::f64::consts::TAU;
use std::ops::Range;

use rand::Rng;

use crate::error::Result;
use crate::geometry::{unity_angles, ChunkAlignment, ChunkId, Point, CHUNK_SIZE, JITTER_CHUNKS};
use crate::random::{uniform, uniform_int};
use crate::rings::{self, Ring, RING_COUNT};

/// Options for a generator run.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerateOptions {
    /// Snap to chunks and apply the biome-search jitter.
    pub snap: bool,
    /// Position reported inside the final chunk when snapping.
    pub alignment: ChunkAlignment,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            snap: true,
            alignment: ChunkAlignment::Center,
        }
    }
}

impl GenerateOptions {
    /// Options producing raw, unsnapped polar placements.
    pub fn unsnapped() -> Self {
        Self {
            snap: false,
            ..Default::default()
        }
    }

    /// Sets whether positions are snapped to chunks.
    pub fn with_snap(mut self, snap: bool) -> Self {
        self.snap = snap;
        self
    }

    /// Sets the in-chunk alignment used when snapping.
    pub fn with_alignment(mut self, alignment: ChunkAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Strongholds of one simulated world, grouped by ring in ring order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedWorld {
    points: Vec<Point>,
    rings: Vec<(usize, Range<usize>)>,
}

impl GeneratedWorld {
    /// All strongholds, concatenated in ring order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ring indices present in this world, in generation order.
    pub fn ring_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rings.iter().map(|(index, _)| *index)
    }

    /// Strongholds of a single ring, or `None` if the ring was not generated.
    pub fn ring(&self, index: usize) -> Option<&[Point]> {
        self.rings
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, range)| &self.points[range.clone()])
    }

    /// Iterates over `(ring_index, strongholds)` pairs.
    pub fn iter_rings(&self) -> impl Iterator<Item = (usize, &[Point])> + '_ {
        self.rings
            .iter()
            .map(|(index, range)| (*index, &self.points[range.clone()]))
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Generates the strongholds of a single ring.
pub fn generate_ring<R: Rng + ?Sized>(
    ring_index: usize,
    rng: &mut R,
    opts: &GenerateOptions,
) -> Result<Vec<Point>> {
    let ring = rings::ring(ring_index)?;
    Ok(generate_ring_in(ring, rng, opts))
}

fn generate_ring_in<R: Rng + ?Sized>(
    ring: &Ring,
    rng: &mut R,
    opts: &GenerateOptions,
) -> Vec<Point> {
    let base = uniform(rng, 0.0, TAU);
    let mut points: Vec<Point> = unity_angles(ring.count)
        .into_iter()
        .map(|offset| {
            let radius = uniform(rng, ring.inner, ring.outer);
            Point::from_polar(radius, base + offset)
        })
        .collect();

    if opts.snap {
        for p in points.iter_mut() {
            *p = snap_with_jitter(*p, rng, opts.alignment);
        }
    }

    points
}

/// Rounds to the nearest chunk, applies the biome-search jitter and aligns inside the chunk.
fn snap_with_jitter<R: Rng + ?Sized>(p: Point, rng: &mut R, alignment: ChunkAlignment) -> Point {
    let dx = uniform_int(rng, -JITTER_CHUNKS, JITTER_CHUNKS);
    let dz = uniform_int(rng, -JITTER_CHUNKS, JITTER_CHUNKS);
    let chunk = ChunkId::nearest(p).offset(dx, dz);
    let offset = alignment.offset() as f64;
    Point::new(
        (chunk.0 * CHUNK_SIZE) as f64 + offset,
        (chunk.1 * CHUNK_SIZE) as f64 + offset,
    )
}

/// Generates the given rings and concatenates them in the order supplied.
pub fn generate_rings<R: Rng + ?Sized>(
    ring_indices: &[usize],
    rng: &mut R,
    opts: &GenerateOptions,
) -> Result<GeneratedWorld> {
    rings::validate_ring_indices(ring_indices)?;

    let mut points = Vec::with_capacity(
        ring_indices
            .iter()
            .map(|&i| rings::RINGS[i].count)
            .sum::<usize>(),
    );
    let mut ranges = Vec::with_capacity(ring_indices.len());
    for &index in ring_indices {
        let start = points.len();
        points.extend(generate_ring_in(&rings::RINGS[index], rng, opts));
        ranges.push((index, start..points.len()));
    }

    Ok(GeneratedWorld {
        points,
        rings: ranges,
    })
}

/// Generates all 128 strongholds of a world.
pub fn generate_all<R: Rng + ?Sized>(rng: &mut R, opts: &GenerateOptions) -> GeneratedWorld {
    let mut points = Vec::with_capacity(rings::STRONGHOLD_COUNT);
    let mut ranges = Vec::with_capacity(RING_COUNT);
    for ring in &rings::RINGS {
        let start = points.len();
        points.extend(generate_ring_in(ring, rng, opts));
        ranges.push((ring.index, start..points.len()));
    }
    GeneratedWorld {
        points,
        rings: ranges,
    }
}

/// Number of strongholds produced per world for a ring selection.
pub fn strongholds_per_world(ring_indices: &[usize]) -> Result<usize> {
    let mut total = 0;
    for &index in ring_indices {
        total += rings::ring(index)?.count;
    }
    Ok(total)
}
