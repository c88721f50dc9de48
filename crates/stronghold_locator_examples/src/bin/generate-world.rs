use stronghold_locator::prelude::*;
use stronghold_locator::rings;
use stronghold_locator_examples::{init_tracing, seeded_rng};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = seeded_rng(2024);

    let world = generate_all(&mut rng, &GenerateOptions::default());
    println!("Generated {} strongholds.", world.len());

    for (index, points) in world.iter_rings() {
        let ring = rings::ring(index)?;
        println!(
            "\nring {index}: {} strongholds, radius {:.0}..{:.0}",
            points.len(),
            ring.inner,
            ring.outer
        );
        for p in points {
            let inside = if ring.contains(*p) { "" } else { "  (outside band)" };
            println!(
                "  ({:>7.0}, {:>7.0})  r = {:>7.1}  heading {:>7.2}{inside}",
                p.x(),
                p.z(),
                p.radius(),
                p.yrot()
            );
        }
    }

    let spawn = Point::ORIGIN;
    if let Some(closest) = nearest(spawn, world.points()) {
        println!(
            "\nnearest to spawn: ({:.0}, {:.0}) at distance {:.1}",
            closest.x(),
            closest.z(),
            closest.distance(spawn)
        );
    }
    Ok(())
}
