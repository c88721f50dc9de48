//! Monte-Carlo heatmap: many independently generated worlds used as an empirical
//! description of where strongholds end up.
//!
//! Trials are independent, so the sampler generates them in parallel. Every trial gets
//! its own generator seeded from one draw of the caller's RNG mixed with the trial
//! index, which keeps the result identical for identical RNG state no matter how the
//! work is scheduled across threads. Long runs can be cancelled through an
//! [`AtomicBool`] that is checked before each trial.
//!
//! Points are stored in single precision (`Vec2`); snapped coordinates are whole blocks
//! well below 2^24 and survive the conversion exactly. Memory use is roughly
//! `8 * num_samples * strongholds_per_world` bytes, about 1 GiB for the default of one
//! million complete worlds. Choosing a sample count large enough for a stable
//! histogram at the observer distances of interest is up to the caller.
use std::slice::ChunksExact;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::generate::{generate_rings, strongholds_per_world, GenerateOptions, GeneratedWorld};
use crate::geometry::Point;
use crate::locate::nearest;
use crate::rings;

/// Default number of simulated worlds.
pub const DEFAULT_NUM_SAMPLES: usize = 1_000_000;

/// How generated worlds are kept after sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Retention {
    /// Keep trial boundaries; required for nearest-per-trial queries.
    #[default]
    PerTrial,
    /// One flat cloud of positions with trial boundaries discarded.
    Concatenated,
}

/// Configuration for building a [`Heatmap`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatmapConfig {
    /// Number of worlds to simulate.
    pub num_samples: usize,
    /// Rings generated in every world, in generation order.
    pub ring_indices: Vec<usize>,
    /// Generator options applied to every world.
    pub generate: GenerateOptions,
    /// Whether trial boundaries are retained.
    pub retention: Retention,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            ring_indices: rings::all_ring_indices(),
            generate: GenerateOptions::default(),
            retention: Retention::PerTrial,
        }
    }
}

impl HeatmapConfig {
    /// Creates a configuration for `num_samples` complete worlds.
    pub fn new(num_samples: usize) -> Self {
        Self {
            num_samples,
            ..Default::default()
        }
    }

    /// Sets the rings generated in every world.
    pub fn with_ring_indices(mut self, ring_indices: impl Into<Vec<usize>>) -> Self {
        self.ring_indices = ring_indices.into();
        self
    }

    /// Sets the generator options.
    pub fn with_generate_options(mut self, generate: GenerateOptions) -> Self {
        self.generate = generate;
        self
    }

    /// Sets the retention mode.
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(Error::InvalidConfig("num_samples must be > 0".into()));
        }
        rings::validate_ring_indices(&self.ring_indices)
    }
}

/// Sampled stronghold positions of many simulated worlds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heatmap {
    points: Vec<Vec2>,
    trial_len: usize,
    ring_indices: Vec<usize>,
    generate: GenerateOptions,
    retention: Retention,
}

impl Heatmap {
    /// Simulates `config.num_samples` worlds.
    pub fn build<R: Rng + ?Sized>(config: &HeatmapConfig, rng: &mut R) -> Result<Self> {
        Self::build_inner(config, rng, None)
    }

    /// Like [`Heatmap::build`], but stops with [`Error::Cancelled`] once `cancel` is set.
    ///
    /// The flag is checked before each trial, never in the middle of one.
    pub fn build_cancellable<R: Rng + ?Sized>(
        config: &HeatmapConfig,
        rng: &mut R,
        cancel: &AtomicBool,
    ) -> Result<Self> {
        Self::build_inner(config, rng, Some(cancel))
    }

    fn build_inner<R: Rng + ?Sized>(
        config: &HeatmapConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<Self> {
        config.validate()?;

        let requested = config.num_samples;
        let trial_len = strongholds_per_world(&config.ring_indices)?;
        let base_seed = rng.next_u64();

        info!(
            "Sampling {} worlds over rings {:?} ({} strongholds each).",
            requested, config.ring_indices, trial_len
        );

        let mut points = vec![Vec2::ZERO; requested * trial_len];
        let completed = AtomicUsize::new(0);
        let outcome = points
            .par_chunks_mut(trial_len)
            .enumerate()
            .try_for_each(|(trial, slot)| {
                if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                    return Err(Error::Cancelled {
                        completed: completed.load(Ordering::Relaxed),
                        requested,
                    });
                }
                let mut trial_rng = StdRng::seed_from_u64(seed_for_trial(base_seed, trial as u64));
                let world = generate_rings(&config.ring_indices, &mut trial_rng, &config.generate)?;
                for (dst, src) in slot.iter_mut().zip(world.points()) {
                    *dst = src.as_vec2();
                }
                completed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            });

        if let Err(err) = outcome {
            return Err(match err {
                Error::Cancelled { .. } => {
                    let completed = completed.load(Ordering::Relaxed);
                    warn!(
                        "Heatmap sampling cancelled after {} of {} trials.",
                        completed, requested
                    );
                    Error::Cancelled {
                        completed,
                        requested,
                    }
                }
                other => other,
            });
        }

        info!("Sampled {} stronghold positions.", points.len());

        Ok(Self {
            points,
            trial_len,
            ring_indices: config.ring_indices.clone(),
            generate: config.generate,
            retention: config.retention,
        })
    }

    /// Builds a per-trial heatmap from explicitly supplied worlds.
    ///
    /// All worlds must contain the same rings in the same order.
    pub fn from_worlds(worlds: &[GeneratedWorld], generate: GenerateOptions) -> Result<Self> {
        let first = worlds
            .first()
            .ok_or_else(|| Error::InvalidConfig("at least one world is required".into()))?;
        let ring_indices: Vec<usize> = first.ring_indices().collect();
        let trial_len = first.len();
        if trial_len == 0 {
            return Err(Error::InvalidConfig("worlds must not be empty".into()));
        }

        let mut points = Vec::with_capacity(worlds.len() * trial_len);
        for world in worlds {
            if !world.ring_indices().eq(ring_indices.iter().copied()) || world.len() != trial_len {
                return Err(Error::InvalidConfig(
                    "all worlds must share the same ring layout".into(),
                ));
            }
            points.extend(world.points().iter().map(|p| p.as_vec2()));
        }

        Ok(Self {
            points,
            trial_len,
            ring_indices,
            generate,
            retention: Retention::PerTrial,
        })
    }

    /// All sampled positions, concatenated in trial order.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Per-trial view, or `None` when trial boundaries were discarded.
    pub fn trials(&self) -> Option<ChunksExact<'_, Vec2>> {
        match self.retention {
            Retention::PerTrial if self.trial_len > 0 => {
                Some(self.points.chunks_exact(self.trial_len))
            }
            Retention::PerTrial => None,
            Retention::Concatenated => None,
        }
    }

    /// A single trial, or `None` when out of range or trial boundaries were discarded.
    pub fn trial(&self, index: usize) -> Option<&[Vec2]> {
        self.trials()?.nth(index)
    }

    /// Number of simulated worlds.
    pub fn num_trials(&self) -> usize {
        self.points.len().checked_div(self.trial_len).unwrap_or(0)
    }

    /// Strongholds per simulated world.
    pub fn trial_len(&self) -> usize {
        self.trial_len
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn is_per_trial(&self) -> bool {
        self.retention == Retention::PerTrial
    }

    pub fn ring_indices(&self) -> &[usize] {
        &self.ring_indices
    }

    pub fn generate_options(&self) -> GenerateOptions {
        self.generate
    }

    /// Discards trial boundaries, keeping the positions.
    pub fn concatenated(mut self) -> Self {
        self.retention = Retention::Concatenated;
        self
    }

    /// For every trial, the stronghold nearest to `observer`, in trial order.
    ///
    /// Equidistant strongholds resolve to the first in generation order.
    pub fn nearest_per_trial(&self, observer: Point) -> Result<Vec<Vec2>> {
        if !self.is_per_trial() {
            return Err(Error::InvalidConfig(
                "nearest-per-trial queries need a per-trial heatmap".into(),
            ));
        }
        if self.trial_len == 0 {
            return Err(Error::InvalidConfig("heatmap has zero strongholds per trial".into()));
        }
        Ok(self
            .points
            .par_chunks_exact(self.trial_len)
            .filter_map(|trial| nearest(observer, trial))
            .collect())
    }
}

/// Simulates `num_samples` worlds over the given rings with default generator options.
pub fn build_heatmap<R: Rng + ?Sized>(
    num_samples: usize,
    ring_indices: &[usize],
    rng: &mut R,
) -> Result<Heatmap> {
    let config = HeatmapConfig::new(num_samples).with_ring_indices(ring_indices);
    Heatmap::build(&config, rng)
}

/// Creates a deterministic seed for a trial from a base seed.
pub fn seed_for_trial(base_seed: u64, trial: u64) -> u64 {
    mix_u64(base_seed ^ trial.wrapping_mul(0x9E3779B97F4A7C15))
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::rings::RINGS;

    #[test]
    fn validate_rejects_bad_config() {
        assert!(HeatmapConfig::new(0).validate().is_err());
        assert!(HeatmapConfig::new(10)
            .with_ring_indices(vec![8])
            .validate()
            .is_err());
        assert!(HeatmapConfig::new(10).validate().is_ok());
    }

    #[test]
    fn build_keeps_trial_boundaries() {
        let mut rng = StdRng::seed_from_u64(1);
        let heatmap = build_heatmap(50, &[0, 1], &mut rng).unwrap();
        assert_eq!(heatmap.num_trials(), 50);
        assert_eq!(heatmap.trial_len(), 9);
        assert_eq!(heatmap.points().len(), 450);
        assert_eq!(heatmap.trials().unwrap().count(), 50);
        assert_eq!(heatmap.trial(49).unwrap().len(), 9);
        assert!(heatmap.trial(50).is_none());
    }

    #[test]
    fn same_seed_same_heatmap() {
        let config = HeatmapConfig::new(200).with_ring_indices(vec![0, 2]);
        let a = Heatmap::build(&config, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = Heatmap::build(&config, &mut StdRng::seed_from_u64(77)).unwrap();
        let c = Heatmap::build(&config, &mut StdRng::seed_from_u64(78)).unwrap();
        assert_eq!(a.points(), b.points());
        assert_ne!(a.points(), c.points());
    }

    #[test]
    fn trials_follow_ring_layout() {
        let config = HeatmapConfig::new(20).with_generate_options(GenerateOptions::unsnapped());
        let heatmap = Heatmap::build(&config, &mut StdRng::seed_from_u64(3)).unwrap();
        for trial in heatmap.trials().unwrap() {
            let mut offset = 0;
            for ring in &RINGS {
                for p in &trial[offset..offset + ring.count] {
                    let radius = p.length() as f64;
                    assert!(radius > ring.inner - 1.0 && radius < ring.outer + 1.0);
                }
                offset += ring.count;
            }
        }
    }

    #[test]
    fn concatenated_drops_trial_view() {
        let config = HeatmapConfig::new(10)
            .with_ring_indices(vec![0])
            .with_retention(Retention::Concatenated);
        let heatmap = Heatmap::build(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert!(heatmap.trials().is_none());
        assert_eq!(heatmap.points().len(), 30);
        assert!(heatmap.nearest_per_trial(Point::ORIGIN).is_err());
    }

    #[test]
    fn cancellation_is_reported() {
        let cancel = AtomicBool::new(true);
        let config = HeatmapConfig::new(100).with_ring_indices(vec![0]);
        let result = Heatmap::build_cancellable(&config, &mut StdRng::seed_from_u64(1), &cancel);
        assert!(matches!(
            result,
            Err(Error::Cancelled {
                completed: 0,
                requested: 100
            })
        ));
    }

    #[test]
    fn nearest_per_trial_returns_one_point_per_trial() {
        let heatmap = build_heatmap(40, &[0], &mut StdRng::seed_from_u64(12)).unwrap();
        let observer = Point::new(1500.0, 0.0);
        let nearest_points = heatmap.nearest_per_trial(observer).unwrap();
        assert_eq!(nearest_points.len(), 40);
        for (trial, chosen) in heatmap.trials().unwrap().zip(&nearest_points) {
            let best = trial
                .iter()
                .map(|p| Point::from(*p).distance(observer))
                .fold(f64::INFINITY, f64::min);
            assert!((Point::from(*chosen).distance(observer) - best).abs() < 1e-6);
        }
    }

    #[test]
    fn from_worlds_requires_consistent_layout() {
        let opts = GenerateOptions::default();
        let mut rng = StdRng::seed_from_u64(4);
        let a = generate_rings(&[0], &mut rng, &opts).unwrap();
        let b = generate_rings(&[1], &mut rng, &opts).unwrap();
        assert!(Heatmap::from_worlds(&[a.clone(), b], opts).is_err());
        assert!(Heatmap::from_worlds(&[], opts).is_err());

        let heatmap = Heatmap::from_worlds(&[a.clone(), a], opts).unwrap();
        assert_eq!(heatmap.num_trials(), 2);
        assert_eq!(heatmap.ring_indices(), &[0]);
    }

    #[test]
    fn zero_length_trials_do_not_panic() {
        let heatmap = Heatmap {
            points: Vec::new(),
            trial_len: 0,
            ring_indices: vec![0],
            generate: GenerateOptions::default(),
            retention: Retention::PerTrial,
        };
        assert_eq!(heatmap.num_trials(), 0);
        assert!(heatmap.trials().is_none());
        assert!(heatmap.trial(0).is_none());
        assert!(heatmap.nearest_per_trial(Point::ORIGIN).is_err());
    }

    #[test]
    fn trial_seeds_differ() {
        assert_ne!(seed_for_trial(1, 0), seed_for_trial(1, 1));
        assert_ne!(seed_for_trial(1, 0), seed_for_trial(2, 0));
        assert_eq!(seed_for_trial(5, 9), seed_for_trial(5, 9));
    }
}
