//! Candidate grid: the discrete hypothesis space of possible stronghold positions.
//!
//! The grid holds one [`Candidate`] per chunk whose aligned position lies inside one of the
//! selected rings. It covers the square `[-GRID_HALF_EXTENT, GRID_HALF_EXTENT)` on both axes,
//! which reaches past the outermost ring by the jitter radius plus a margin. The full grid
//! over all rings has several million entries; build it once and share it.
use tracing::debug;

use crate::error::Result;
use crate::geometry::{Candidate, ChunkAlignment, ChunkId, CHUNK_SIZE};
use crate::rings;

/// Half extent of the enumerated square in blocks.
pub const GRID_HALF_EXTENT: i32 = 24_496;

/// Half extent of the enumerated square in chunks.
pub const GRID_HALF_EXTENT_CHUNKS: i32 = GRID_HALF_EXTENT / CHUNK_SIZE;

/// Sorted, deduplicated set of chunk-aligned candidates inside the selected rings.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateGrid {
    candidates: Vec<Candidate>,
    ring_indices: Vec<usize>,
    alignment: ChunkAlignment,
}

impl CandidateGrid {
    /// Enumerates every aligned candidate inside the given rings.
    pub fn build(ring_indices: &[usize], alignment: ChunkAlignment) -> Result<Self> {
        rings::validate_ring_indices(ring_indices)?;
        let mut selected: Vec<usize> = ring_indices.to_vec();
        selected.sort_unstable();
        selected.dedup();
        Ok(Self::enumerate(selected, alignment))
    }

    /// Grid over all eight rings.
    pub fn build_all(alignment: ChunkAlignment) -> Self {
        Self::enumerate(rings::all_ring_indices(), alignment)
    }

    fn enumerate(selected: Vec<usize>, alignment: ChunkAlignment) -> Self {
        let bands: Vec<&rings::Ring> = selected.iter().map(|&i| &rings::RINGS[i]).collect();

        // Chunks beyond the outermost selected band can never pass the radius filter.
        let max_outer = bands.iter().map(|b| b.outer).fold(0.0f64, f64::max);
        let reach = ((max_outer / CHUNK_SIZE as f64).ceil() as i32 + 1).min(GRID_HALF_EXTENT_CHUNKS);

        let mut candidates = Vec::new();
        for cx in -reach..reach {
            for cz in -reach..reach {
                let candidate = Candidate::from_chunk(ChunkId(cx, cz), alignment);
                let radius = candidate.to_point().radius();
                if bands.iter().any(|b| b.contains_radius(radius)) {
                    candidates.push(candidate);
                }
            }
        }
        candidates.sort_unstable();
        candidates.dedup();

        debug!(
            "Built candidate grid for rings {:?}: {} candidates.",
            selected,
            candidates.len()
        );

        Self {
            candidates,
            ring_indices: selected,
            alignment,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns whether the candidate is part of the grid.
    pub fn contains(&self, candidate: Candidate) -> bool {
        self.candidates.binary_search(&candidate).is_ok()
    }

    /// Ring indices covered by the grid, sorted and deduplicated.
    pub fn ring_indices(&self) -> &[usize] {
        &self.ring_indices
    }

    pub fn alignment(&self) -> ChunkAlignment {
        self.alignment
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

/// Enumerates every aligned candidate inside the given rings.
pub fn build_grid(ring_indices: &[usize], alignment: ChunkAlignment) -> Result<CandidateGrid> {
    CandidateGrid::build(ring_indices, alignment)
}
