//! Shared helpers for the example binaries: logging setup and plain-text reports.
use rand::rngs::StdRng;
use rand::SeedableRng;
use stronghold_locator::geometry::Candidate;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Installs a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// RNG seeded from the first command line argument, or `default_seed`.
pub fn seeded_rng(default_seed: u64) -> StdRng {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(default_seed);
    StdRng::seed_from_u64(seed)
}

pub fn format_candidate(c: Candidate) -> String {
    let chunk = c.chunk();
    format!("({:>6}, {:>6})  chunk ({:>5}, {:>5})", c.x, c.z, chunk.0, chunk.1)
}

/// Prints the `limit` most probable candidates.
pub fn print_ranked(ranked: &[(Candidate, f64)], limit: usize) {
    println!("{:>4}  {:<34}  {:>9}", "rank", "position", "p");
    for (rank, (candidate, p)) in ranked.iter().take(limit).enumerate() {
        println!("{:>4}  {:<34}  {:>9.5}", rank + 1, format_candidate(*candidate), p);
    }
    if ranked.len() > limit {
        println!("      ... {} more", ranked.len() - limit);
    }
}
