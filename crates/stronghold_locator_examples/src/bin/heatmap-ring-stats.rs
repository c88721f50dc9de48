use glam::Vec2;
use stronghold_locator::prelude::*;
use stronghold_locator::rings::{rings_of, RING_COUNT};
use stronghold_locator_examples::{init_tracing, seeded_rng};

const SAMPLES: usize = 20_000;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = seeded_rng(7);

    let config = HeatmapConfig::new(SAMPLES);
    let heatmap = Heatmap::build(&config, &mut rng)?;

    let assigned = rings_of(heatmap.points());
    let mut per_ring = [0usize; RING_COUNT];
    let mut outside = [0usize; RING_COUNT];
    for (p, &ring) in heatmap.points().iter().zip(&assigned) {
        per_ring[ring] += 1;
        if !RINGS[ring].contains(Point::from(*p)) {
            outside[ring] += 1;
        }
    }

    println!("{} worlds, {} strongholds", heatmap.num_trials(), heatmap.points().len());
    println!("{:>4}  {:>9}  {:>9}  {:>8}", "ring", "expected", "observed", "outside");
    for ring in &RINGS {
        println!(
            "{:>4}  {:>9}  {:>9}  {:>7.3}%",
            ring.index,
            ring.count * heatmap.num_trials(),
            per_ring[ring.index],
            100.0 * outside[ring.index] as f64 / per_ring[ring.index].max(1) as f64
        );
    }

    let spawn = Point::ORIGIN;
    let nearest_points = heatmap.nearest_per_trial(spawn)?;
    let mean = nearest_points.iter().map(|p| p.length() as f64).sum::<f64>()
        / nearest_points.len().max(1) as f64;
    let farthest = nearest_points
        .iter()
        .map(|p: &Vec2| p.length())
        .fold(0.0f32, f32::max);
    println!("\nnearest stronghold to spawn: mean distance {mean:.1}, max {farthest:.1}");

    let density = Histogram2d::from_points(&nearest_points, 60)?;
    let (xs, zs) = density.bin_centers();
    println!(
        "density lattice spans x {:.0}..{:.0}, z {:.0}..{:.0}",
        xs[0],
        xs[xs.len() - 1],
        zs[0],
        zs[zs.len() - 1]
    );
    Ok(())
}
