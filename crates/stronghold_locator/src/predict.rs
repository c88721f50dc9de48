//! Incremental Bayesian prediction of the nearest stronghold from Eye of Ender throws.
//!
//! Each throw narrows the candidate grid to an angular cone. Every surviving candidate
//! is weighted by two factors. The first is the empirical density of "nearest stronghold
//! to this observer" positions, taken from the heatmap. The second is a Gaussian in the
//! bearing deviation, whose width combines the throw error with a lateral error term that
//! shrinks with distance. The per-throw distribution is then fused with every earlier
//! constraining throw by multiplying on the shared support.
//!
//! The predictor moves through [`PredictorState`]: it starts uninitialized, accumulates
//! evidence while the fused posterior is non-empty, and is exhausted once the throws
//! contradict each other. Dropping the offending throw with
//! [`Predictor::discard_last_throw`] recovers from exhaustion.
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geometry::{normal_pdf, Candidate, Point};
use crate::grid::CandidateGrid;
use crate::heatmap::Heatmap;
use crate::histogram::Histogram2d;
use crate::locate::{ConeOptions, EyeThrow};
use crate::probability::{ProbabilityMap, DEFAULT_TRIM_THRESHOLD};

/// Default histogram resolution along each axis.
pub const DEFAULT_HISTOGRAM_BINS: usize = 60;

/// Default lateral positional error of a throw, in blocks.
pub const DEFAULT_LATERAL_ERROR: f64 = 0.005;

/// Configuration for a [`Predictor`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictorConfig {
    /// Bins per axis of the nearest-stronghold histogram.
    pub histogram_bins: usize,
    /// Relative threshold below which entries are dropped when renormalizing.
    pub trim_threshold: f64,
    /// Cone filter options.
    pub cone: ConeOptions,
    /// Multiple of the throw error used as the cone half-width.
    pub cone_width: f64,
    /// Lateral positional error in blocks, added in quadrature to the angular error.
    pub lateral_error: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            trim_threshold: DEFAULT_TRIM_THRESHOLD,
            cone: ConeOptions::default(),
            cone_width: 1.0,
            lateral_error: DEFAULT_LATERAL_ERROR,
        }
    }
}

impl PredictorConfig {
    pub fn with_histogram_bins(mut self, histogram_bins: usize) -> Self {
        self.histogram_bins = histogram_bins;
        self
    }

    pub fn with_trim_threshold(mut self, trim_threshold: f64) -> Self {
        self.trim_threshold = trim_threshold;
        self
    }

    pub fn with_cone(mut self, cone: ConeOptions) -> Self {
        self.cone = cone;
        self
    }

    pub fn with_cone_width(mut self, cone_width: f64) -> Self {
        self.cone_width = cone_width;
        self
    }

    pub fn with_lateral_error(mut self, lateral_error: f64) -> Self {
        self.lateral_error = lateral_error;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(Error::InvalidConfig("histogram_bins must be > 0".into()));
        }
        if !(0.0..1.0).contains(&self.trim_threshold) {
            return Err(Error::InvalidConfig(
                "trim_threshold must be in [0, 1)".into(),
            ));
        }
        if !self.cone_width.is_finite() || self.cone_width <= 0.0 {
            return Err(Error::InvalidConfig("cone_width must be > 0".into()));
        }
        if !self.lateral_error.is_finite() || self.lateral_error <= 0.0 {
            return Err(Error::InvalidConfig("lateral_error must be > 0".into()));
        }
        Ok(())
    }
}

/// Result of adding a throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrowOutcome {
    /// The posterior was updated and still has support.
    Narrowed {
        /// Candidates left in the fused posterior.
        candidates: usize,
    },
    /// No grid candidate lies in the throw's cone; the throw was recorded but not fused.
    NoConstraint,
    /// The throw contradicts earlier evidence and the fused posterior is empty.
    Contradiction,
}

/// Where the predictor is in its evidence cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictorState {
    /// No constraining throw recorded yet.
    Uninitialized,
    /// The fused posterior has support.
    Accumulating,
    /// The fused posterior is empty.
    Exhausted,
}

/// Stateful fusion of throws over a candidate grid.
#[derive(Clone, Debug)]
pub struct Predictor {
    grid: CandidateGrid,
    heatmap: Heatmap,
    config: PredictorConfig,
    throws: Vec<EyeThrow>,
    individual: Vec<Option<ProbabilityMap>>,
    cumulative: Option<ProbabilityMap>,
}

impl Predictor {
    /// Creates a predictor over `grid`, scoring candidates with `heatmap`.
    ///
    /// The heatmap must keep trial boundaries and, when snapped, share the grid's alignment.
    pub fn new(grid: CandidateGrid, heatmap: Heatmap, config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        if !heatmap.is_per_trial() {
            return Err(Error::InvalidConfig(
                "predictor needs a heatmap that keeps trial boundaries".into(),
            ));
        }
        let generate = heatmap.generate_options();
        if generate.snap && generate.alignment != grid.alignment() {
            return Err(Error::InvalidConfig(format!(
                "heatmap alignment {:?} does not match grid alignment {:?}",
                generate.alignment,
                grid.alignment()
            )));
        }
        if grid
            .ring_indices()
            .iter()
            .any(|i| !heatmap.ring_indices().contains(i))
        {
            warn!(
                "Heatmap rings {:?} do not cover grid rings {:?}; uncovered candidates get zero density.",
                heatmap.ring_indices(),
                grid.ring_indices()
            );
        }

        Ok(Self {
            grid,
            heatmap,
            config,
            throws: Vec::new(),
            individual: Vec::new(),
            cumulative: None,
        })
    }

    /// Records a throw and updates the fused posterior.
    ///
    /// `angle` and `angle_error` are in degrees, `angle` in the game's heading convention.
    pub fn add_throw(&mut self, observer: Point, angle: f64, angle_error: f64) -> Result<ThrowOutcome> {
        let throw = EyeThrow::new(observer, angle, angle_error)?;
        let cone = throw.points_in_cone(self.grid.candidates(), self.config.cone_width, &self.config.cone);

        info!(
            "Throw #{} from ({:.1}, {:.1}) at {:.3} +/- {:.3} degrees: {} candidates in cone.",
            self.throws.len() + 1,
            observer.x(),
            observer.z(),
            angle,
            angle_error,
            cone.len()
        );

        if cone.is_empty() {
            warn!("Throw cone contains no candidates; the throw adds no constraint.");
            self.throws.push(throw);
            self.individual.push(None);
            return Ok(ThrowOutcome::NoConstraint);
        }

        let map = self.score(&throw, &cone)?;
        self.throws.push(throw);
        self.individual.push(Some(map));
        Ok(self.fuse())
    }

    /// Probability that each cone candidate is the stronghold nearest to the observer.
    fn score(&self, throw: &EyeThrow, cone: &[Candidate]) -> Result<ProbabilityMap> {
        let density = self.spatial_density(throw.observer())?;
        let err = throw.half_width(self.config.cone.error_mode).to_radians();
        let lateral = self.config.lateral_error;

        let weights: Vec<(Candidate, f64)> = cone
            .par_iter()
            .map(|&candidate| {
                let p = candidate.to_point();
                let weight = match throw.deviation_to(p) {
                    Some(deviation) => {
                        let distance = p.distance(throw.observer());
                        let sigma = err.hypot(lateral / (3f64.sqrt() * distance));
                        density.sample(candidate) * normal_pdf(deviation, 0.0, sigma)
                    }
                    None => 0.0,
                };
                (candidate, weight)
            })
            .collect();

        let map = ProbabilityMap::from_weights(weights, self.config.trim_threshold);
        debug!("Throw keeps {} of {} cone candidates.", map.len(), cone.len());
        Ok(map)
    }

    /// Recomputes the fused posterior from every constraining throw.
    fn fuse(&mut self) -> ThrowOutcome {
        let maps: Vec<&ProbabilityMap> = self.individual.iter().flatten().collect();
        if maps.is_empty() {
            self.cumulative = None;
            return ThrowOutcome::NoConstraint;
        }

        let fused = ProbabilityMap::intersection(&maps, self.config.trim_threshold);
        let outcome = if fused.is_empty() {
            warn!(
                "Throws contradict each other; posterior is empty after {} throws.",
                self.throws.len()
            );
            ThrowOutcome::Contradiction
        } else {
            if let Some((best, p)) = fused.best() {
                info!(
                    "Posterior has {} candidates; best ({}, {}) with p = {:.4}.",
                    fused.len(),
                    best.x,
                    best.z,
                    p
                );
            }
            ThrowOutcome::Narrowed {
                candidates: fused.len(),
            }
        };
        self.cumulative = Some(fused);
        outcome
    }

    /// Removes the most recent throw and recomputes the posterior from the rest.
    ///
    /// Returns the removed throw, or `None` when there was none.
    pub fn discard_last_throw(&mut self) -> Option<EyeThrow> {
        let throw = self.throws.pop()?;
        self.individual.pop();
        self.fuse();
        Some(throw)
    }

    /// Forgets every throw.
    pub fn reset(&mut self) {
        self.throws.clear();
        self.individual.clear();
        self.cumulative = None;
    }

    pub fn state(&self) -> PredictorState {
        match &self.cumulative {
            None => PredictorState::Uninitialized,
            Some(map) if map.is_empty() => PredictorState::Exhausted,
            Some(_) => PredictorState::Accumulating,
        }
    }

    /// Histogram of the stronghold nearest to `observer` across all heatmap trials.
    pub fn spatial_density(&self, observer: Point) -> Result<Histogram2d> {
        let nearest = self.heatmap.nearest_per_trial(observer)?;
        Histogram2d::from_points(&nearest, self.config.histogram_bins)
    }

    pub fn grid(&self) -> &CandidateGrid {
        &self.grid
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Recorded throws in order.
    pub fn throws(&self) -> &[EyeThrow] {
        &self.throws
    }

    /// Per-throw distributions aligned with [`Predictor::throws`]; `None` for throws
    /// that added no constraint.
    pub fn individual(&self) -> &[Option<ProbabilityMap>] {
        &self.individual
    }

    /// Fused posterior, or `None` before the first constraining throw.
    pub fn cumulative(&self) -> Option<&ProbabilityMap> {
        self.cumulative.as_ref()
    }

    /// Fused posterior sorted by descending probability.
    pub fn ranked(&self) -> Vec<(Candidate, f64)> {
        self.cumulative
            .as_ref()
            .map(ProbabilityMap::ranked)
            .unwrap_or_default()
    }
}
