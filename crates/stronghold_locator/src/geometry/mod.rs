//! 2D geometry primitives in the game's x/z plane.
//!
//! - [`Point`]: immutable x/z value type with polar accessors and rotation.
//! - [`angle`]: compass conversions (south is 0, clockwise positive) and angle helpers.
//! - [`chunk`]: chunk alignment, [`Candidate`] block positions and nether scaling.
pub mod angle;
pub mod chunk;
pub mod point;

pub use angle::{
    angular_deviation, bearing, compensated_sum, in_interval, normal_pdf, to_phi, to_yrot,
    unity_angles, wrap_degrees, wrap_radians,
};
pub use chunk::{Candidate, ChunkAlignment, ChunkId, CHUNK_SIZE, JITTER_CHUNKS};
pub use point::{Planar, Point};
