#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_SIZE: usize = 10;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

/// Ring selections benchmarked from cheapest to a complete world.
pub const RING_SETS: [&[usize]; 3] = [&[0], &[0, 1, 2], &[0, 1, 2, 3, 4, 5, 6, 7]];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn rng(salt: u64) -> StdRng {
    StdRng::seed_from_u64(0x5EED_u64 ^ salt)
}

pub fn ring_label(rings: &[usize]) -> String {
    rings
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("-")
}
