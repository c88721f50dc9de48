//! Chunk utilities.
//!
//! Convert between block positions, chunk coordinates and the chunk-aligned
//! [`Candidate`] positions that make up the hypothesis space. Also provides the
//! overworld-to-nether coordinate scaling used when players travel through the nether.
use glam::DVec2;

use crate::geometry::point::Planar;
use crate::geometry::Point;

/// Edge length of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Maximum biome-search displacement of a stronghold, in chunks along each axis.
pub const JITTER_CHUNKS: i32 = 7;

/// Overworld blocks per nether block.
pub const NETHER_SCALE: f64 = 8.0;

/// Where inside its chunk a candidate position is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChunkAlignment {
    /// Block (0, 0) of the chunk.
    Corner,
    /// Block (8, 8) of the chunk.
    #[default]
    Center,
}

impl ChunkAlignment {
    /// Offset in blocks from the chunk corner along each axis.
    #[inline]
    pub const fn offset(self) -> i32 {
        match self {
            ChunkAlignment::Corner => 0,
            ChunkAlignment::Center => CHUNK_SIZE / 2,
        }
    }
}

/// Identifier for a chunk in the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkId(
    /// Chunk index along the X axis.
    pub i32,
    /// Chunk index along the Z axis.
    pub i32,
);

impl ChunkId {
    /// Chunk containing the given position.
    pub fn containing(p: Point) -> Self {
        let size = CHUNK_SIZE as f64;
        ChunkId(
            (p.x() / size).floor() as i32,
            (p.z() / size).floor() as i32,
        )
    }

    /// Chunk whose corner is nearest to the given position.
    pub fn nearest(p: Point) -> Self {
        let size = CHUNK_SIZE as f64;
        ChunkId(
            (p.x() / size).round() as i32,
            (p.z() / size).round() as i32,
        )
    }

    /// World-space corner of the chunk.
    pub fn origin(self) -> Point {
        Point::new(
            (self.0 * CHUNK_SIZE) as f64,
            (self.1 * CHUNK_SIZE) as f64,
        )
    }

    /// Offsets the chunk by whole chunks along each axis.
    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkId(self.0 + dx, self.1 + dz)
    }
}

/// A chunk-aligned block position that can hold a stronghold.
///
/// Coordinates are whole blocks; the grid builder and the generator produce them at a
/// fixed [`ChunkAlignment`] so that equal positions compare and hash equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub x: i32,
    pub z: i32,
}

impl Candidate {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Candidate inside the given chunk at the requested alignment.
    pub const fn from_chunk(chunk: ChunkId, alignment: ChunkAlignment) -> Self {
        let offset = alignment.offset();
        Self {
            x: chunk.0 * CHUNK_SIZE + offset,
            z: chunk.1 * CHUNK_SIZE + offset,
        }
    }

    /// Rounds a point to the nearest whole block.
    pub fn from_point(p: Point) -> Self {
        Self {
            x: p.x().round() as i32,
            z: p.z().round() as i32,
        }
    }

    /// Chunk that contains this candidate.
    pub fn chunk(self) -> ChunkId {
        ChunkId(
            self.x.div_euclid(CHUNK_SIZE),
            self.z.div_euclid(CHUNK_SIZE),
        )
    }

    /// Returns whether the candidate sits at the given alignment within its chunk.
    pub fn is_aligned(self, alignment: ChunkAlignment) -> bool {
        let offset = alignment.offset();
        self.x.rem_euclid(CHUNK_SIZE) == offset && self.z.rem_euclid(CHUNK_SIZE) == offset
    }

    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(self.x as f64, self.z as f64)
    }
}

impl From<Candidate> for Point {
    fn from(value: Candidate) -> Self {
        value.to_point()
    }
}

impl Planar for Candidate {
    #[inline]
    fn xz(self) -> DVec2 {
        DVec2::new(self.x as f64, self.z as f64)
    }
}

impl From<Candidate> for DVec2 {
    fn from(value: Candidate) -> Self {
        DVec2::new(value.x as f64, value.z as f64)
    }
}

impl Point {
    /// Chunk containing this point.
    pub fn chunk(self) -> ChunkId {
        ChunkId::containing(self)
    }

    /// Corner of the chunk containing this point.
    pub fn chunk_corner(self) -> Point {
        self.chunk().origin()
    }

    /// Center block of the chunk containing this point.
    pub fn chunk_center(self) -> Point {
        let half = (CHUNK_SIZE / 2) as f64;
        self.chunk_corner() + Point::new(half, half)
    }

    /// Rounds the point to the nearest chunk corner.
    pub fn snap_to_chunk(self) -> Point {
        ChunkId::nearest(self).origin()
    }

    /// Nether position corresponding to this overworld position.
    pub fn in_nether(self) -> Point {
        Point::new(
            (self.x() / NETHER_SCALE).floor(),
            (self.z() / NETHER_SCALE).floor(),
        )
    }

    /// Nether chunk corresponding to this overworld position.
    pub fn in_nether_chunk(self) -> ChunkId {
        self.in_nether().chunk()
    }
}
