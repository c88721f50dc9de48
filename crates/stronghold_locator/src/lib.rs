#![forbid(unsafe_code)]
//! stronghold_locator: ring-based stronghold placement simulation and Bayesian
//! triangulation from Eye of Ender throws.
//!
//! Modules:
//! - geometry: x/z points, compass angle conventions, chunks and candidates
//! - rings: the eight placement rings and membership queries
//! - generate: procedural world generator (one stronghold per ring slot)
//! - grid: discrete hypothesis space of chunk-aligned candidates
//! - heatmap: Monte-Carlo sample of many generated worlds
//! - locate: nearest-stronghold and angular cone queries, [`locate::EyeThrow`]
//! - histogram, probability: empirical density and discrete distributions
//! - predict: incremental fusion of throws into a posterior over the grid
//!
//! For examples and docs, see README and the `stronghold_locator_examples` crate.
pub mod error;
pub mod generate;
pub mod geometry;
pub mod grid;
pub mod heatmap;
pub mod histogram;
pub mod locate;
pub mod predict;
pub mod probability;
mod random;
pub mod rings;

/// Convenient re-exports for common types. Import with `use stronghold_locator::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::generate::{
        generate_all, generate_ring, generate_rings, GenerateOptions, GeneratedWorld,
    };
    pub use crate::geometry::{bearing, Candidate, ChunkAlignment, ChunkId, Planar, Point};
    pub use crate::grid::{build_grid, CandidateGrid};
    pub use crate::heatmap::{build_heatmap, Heatmap, HeatmapConfig, Retention};
    pub use crate::histogram::Histogram2d;
    pub use crate::locate::{
        nearest, nearest_many, points_in_cone, ConeOptions, ErrorMode, EyeThrow,
    };
    pub use crate::predict::{Predictor, PredictorConfig, PredictorState, ThrowOutcome};
    pub use crate::probability::ProbabilityMap;
    pub use crate::rings::{closest_ring, in_ring, ring_of, Ring, RINGS};
}
