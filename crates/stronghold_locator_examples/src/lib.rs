#![forbid(unsafe_code)]

mod report;

pub use report::{format_candidate, init_tracing, print_ranked, seeded_rng};
