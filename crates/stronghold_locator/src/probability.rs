//! Discrete probability distributions over candidate positions.
use std::collections::btree_map::{self, BTreeMap};

use crate::geometry::{compensated_sum, Candidate, ChunkId};

/// Default relative trim threshold used when renormalizing.
pub const DEFAULT_TRIM_THRESHOLD: f64 = 1e-5;

/// Weights over a subset of the candidate grid.
///
/// After [`ProbabilityMap::normalize`] the weights sum to one, or the map is empty.
/// Entries are removed rather than set to zero so the support stays compact. Iteration
/// follows candidate order, which keeps results deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbabilityMap {
    weights: BTreeMap<Candidate, f64>,
}

impl ProbabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects raw weights and normalizes them with the given relative trim threshold.
    ///
    /// Non-finite and non-positive weights are dropped. Duplicate candidates keep the
    /// last weight.
    pub fn from_weights<I>(weights: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = (Candidate, f64)>,
    {
        let mut map = Self::from_raw(weights);
        map.normalize(threshold);
        map
    }

    /// Collects raw weights without normalizing.
    pub fn from_raw<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (Candidate, f64)>,
    {
        Self {
            weights: weights
                .into_iter()
                .filter(|(_, w)| w.is_finite() && *w > 0.0)
                .collect(),
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        compensated_sum(self.weights.values().copied())
    }

    /// Drops every entry with weight `<= threshold`.
    pub fn trim(&mut self, threshold: f64) {
        self.weights.retain(|_, w| *w > threshold);
    }

    /// Drops entries at or below `threshold` times the total, then rescales to sum to one.
    ///
    /// A map whose total is zero ends up empty.
    pub fn normalize(&mut self, threshold: f64) {
        let total = self.total();
        if total <= 0.0 || !total.is_finite() {
            self.weights.clear();
            return;
        }
        self.trim(threshold * total);
        let kept = self.total();
        if kept <= 0.0 {
            self.weights.clear();
            return;
        }
        for w in self.weights.values_mut() {
            *w /= kept;
        }
    }

    /// Element-wise product on the shared support, without renormalizing.
    pub fn intersect(&self, other: &ProbabilityMap) -> ProbabilityMap {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let weights = small
            .weights
            .iter()
            .filter_map(|(c, w)| large.weights.get(c).map(|v| (*c, w * v)))
            .filter(|(_, w)| *w > 0.0)
            .collect();
        ProbabilityMap { weights }
    }

    /// Product of all maps on their common support, normalized with `threshold`.
    ///
    /// An empty slice yields an empty map.
    pub fn intersection(maps: &[&ProbabilityMap], threshold: f64) -> ProbabilityMap {
        let Some((first, rest)) = maps.split_first() else {
            return ProbabilityMap::new();
        };
        let mut fused = rest
            .iter()
            .fold((*first).clone(), |acc, map| acc.intersect(map));
        fused.normalize(threshold);
        fused
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn get(&self, candidate: Candidate) -> Option<f64> {
        self.weights.get(&candidate).copied()
    }

    pub fn contains(&self, candidate: Candidate) -> bool {
        self.weights.contains_key(&candidate)
    }

    /// Entries in candidate order.
    pub fn iter(&self) -> impl Iterator<Item = (Candidate, f64)> + '_ {
        self.weights.iter().map(|(c, w)| (*c, *w))
    }

    pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.weights.keys().copied()
    }

    /// Entries sorted by descending weight; equal weights keep candidate order.
    pub fn ranked(&self) -> Vec<(Candidate, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    /// Most probable candidate; the lowest candidate wins ties.
    pub fn best(&self) -> Option<(Candidate, f64)> {
        self.iter()
            .fold(None, |best: Option<(Candidate, f64)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
    }

    /// Ranked copy renormalized with `threshold`.
    pub fn view(&self, threshold: f64) -> Vec<(Candidate, f64)> {
        let mut copy = self.clone();
        copy.normalize(threshold);
        copy.ranked()
    }

    /// Like [`ProbabilityMap::view`], reported per containing chunk.
    pub fn chunk_view(&self, threshold: f64) -> Vec<(ChunkId, f64)> {
        self.view(threshold)
            .into_iter()
            .map(|(c, w)| (c.chunk(), w))
            .collect()
    }
}

impl FromIterator<(Candidate, f64)> for ProbabilityMap {
    fn from_iter<T: IntoIterator<Item = (Candidate, f64)>>(iter: T) -> Self {
        Self::from_raw(iter)
    }
}

impl<'a> IntoIterator for &'a ProbabilityMap {
    type Item = (&'a Candidate, &'a f64);
    type IntoIter = btree_map::Iter<'a, Candidate, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, z: i32) -> Candidate {
        Candidate::new(x, z)
    }

    fn map(entries: &[((i32, i32), f64)]) -> ProbabilityMap {
        ProbabilityMap::from_weights(entries.iter().map(|&((x, z), w)| (c(x, z), w)), 0.0)
    }

    fn assert_maps_close(a: &ProbabilityMap, b: &ProbabilityMap) {
        assert_eq!(a.len(), b.len());
        for ((ca, wa), (cb, wb)) in a.iter().zip(b.iter()) {
            assert_eq!(ca, cb);
            assert!((wa - wb).abs() < 1e-12, "{ca:?}: {wa} != {wb}");
        }
    }

    #[test]
    fn normalize_sums_to_one() {
        let m = map(&[((0, 0), 2.0), ((16, 0), 6.0)]);
        assert!((m.total() - 1.0).abs() < 1e-12);
        assert_eq!(m.get(c(0, 0)), Some(0.25));
        assert_eq!(m.get(c(16, 0)), Some(0.75));
    }

    #[test]
    fn normalize_trims_relative_to_total() {
        let weights = vec![(c(0, 0), 1.0), (c(16, 0), 1e-6), (c(32, 0), 0.5)];
        let m = ProbabilityMap::from_weights(weights, 1e-5);
        assert_eq!(m.len(), 2);
        assert!(!m.contains(c(16, 0)));
        assert!((m.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_total_yields_empty_map() {
        let m = ProbabilityMap::from_weights(vec![(c(0, 0), 0.0), (c(16, 0), f64::NAN)], 1e-5);
        assert!(m.is_empty());
        assert_eq!(m.total(), 0.0);
    }

    #[test]
    fn trim_is_absolute() {
        let mut m = ProbabilityMap::from_raw(vec![(c(0, 0), 0.1), (c(16, 0), 0.2)]);
        m.trim(0.1);
        assert_eq!(m.len(), 1);
        assert!(m.contains(c(16, 0)));
    }

    #[test]
    fn intersect_multiplies_shared_keys() {
        let a = map(&[((0, 0), 1.0), ((16, 0), 1.0)]);
        let b = map(&[((16, 0), 3.0), ((32, 0), 1.0)]);
        let i = a.intersect(&b);
        assert_eq!(i.len(), 1);
        assert!((i.get(c(16, 0)).unwrap() - 0.375).abs() < 1e-12);
    }

    #[test]
    fn disjoint_support_is_empty() {
        let a = map(&[((0, 0), 1.0)]);
        let b = map(&[((16, 0), 1.0)]);
        assert!(ProbabilityMap::intersection(&[&a, &b], DEFAULT_TRIM_THRESHOLD).is_empty());
        assert!(ProbabilityMap::intersection(&[], DEFAULT_TRIM_THRESHOLD).is_empty());
    }

    #[test]
    fn intersection_is_commutative_and_associative() {
        let a = map(&[((0, 0), 1.0), ((16, 0), 2.0), ((32, 0), 3.0), ((48, 0), 4.0)]);
        let b = map(&[((0, 0), 5.0), ((16, 0), 1.0), ((32, 0), 2.0)]);
        let d = map(&[((16, 0), 7.0), ((32, 0), 1.0), ((48, 0), 9.0)]);

        let abd = ProbabilityMap::intersection(&[&a, &b, &d], DEFAULT_TRIM_THRESHOLD);
        let dba = ProbabilityMap::intersection(&[&d, &b, &a], DEFAULT_TRIM_THRESHOLD);
        let ab = ProbabilityMap::intersection(&[&a, &b], DEFAULT_TRIM_THRESHOLD);
        let ab_d = ProbabilityMap::intersection(&[&ab, &d], DEFAULT_TRIM_THRESHOLD);

        assert_maps_close(&abd, &dba);
        assert_maps_close(&abd, &ab_d);
        assert_eq!(abd.len(), 2);
        assert!((abd.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ranked_and_best_agree() {
        let m = map(&[((0, 0), 1.0), ((16, 0), 3.0), ((32, 0), 3.0), ((48, 0), 2.0)]);
        let ranked = m.ranked();
        assert_eq!(ranked[0].0, c(16, 0));
        assert_eq!(ranked[1].0, c(32, 0));
        assert_eq!(ranked[3].0, c(0, 0));
        assert_eq!(m.best().map(|(c, _)| c), Some(c(16, 0)));
        assert!(ProbabilityMap::new().best().is_none());
    }

    #[test]
    fn views_renormalize_and_report_chunks() {
        let m = ProbabilityMap::from_raw(vec![(c(8, 8), 3.0), (c(-8, 24), 1.0)]);
        let view = m.view(0.0);
        assert_eq!(view[0], (c(8, 8), 0.75));
        let chunks = m.chunk_view(0.0);
        assert_eq!(chunks, vec![(ChunkId(0, 0), 0.75), (ChunkId(-1, 1), 0.25)]);
        let trimmed = m.view(0.3);
        assert_eq!(trimmed, vec![(c(8, 8), 1.0)]);
    }
}
