use std::f64::consts::FRAC_PI_2;

use stronghold_locator::geometry::to_phi;
use stronghold_locator::prelude::*;
use stronghold_locator_examples::{format_candidate, init_tracing, print_ranked, seeded_rng};

const SAMPLES: usize = 100_000;
const RING_SELECTION: [usize; 3] = [0, 1, 2];

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = seeded_rng(99);

    // A hidden world supplies the stronghold the throws point at.
    let world = generate_rings(&RING_SELECTION, &mut rng, &GenerateOptions::default())?;
    let first_observer = Point::new(150.0, -220.0);
    let target = nearest(first_observer, world.points())
        .ok_or_else(|| anyhow::anyhow!("generated world is empty"))?;
    let target = Candidate::from_point(target);
    tracing::info!("Hidden target {}", format_candidate(target));

    let grid = CandidateGrid::build(&RING_SELECTION, ChunkAlignment::Center)?;
    let config = HeatmapConfig::new(SAMPLES).with_ring_indices(RING_SELECTION);
    let heatmap = Heatmap::build(&config, &mut rng)?;
    let mut predictor = Predictor::new(grid, heatmap, PredictorConfig::default())?;

    // Walk a few hundred blocks sideways before the second throw.
    let heading = bearing(first_observer, target.to_point())
        .ok_or_else(|| anyhow::anyhow!("observer stands on the target"))?;
    let sideways = Point::from_polar(400.0, to_phi(heading) + FRAC_PI_2);
    let second_observer = first_observer + sideways;

    for (observer, error) in [(first_observer, 0.1), (second_observer, 0.1)] {
        let angle = bearing(observer, target.to_point())
            .ok_or_else(|| anyhow::anyhow!("observer stands on the target"))?;
        let outcome = predictor.add_throw(observer, angle, error)?;
        println!(
            "\nthrow from ({:.0}, {:.0}) at {angle:.2} deg: {outcome:?}",
            observer.x(),
            observer.z()
        );
        print_ranked(&predictor.ranked(), 5);
    }

    match predictor.state() {
        PredictorState::Accumulating => {
            let rank = predictor
                .ranked()
                .iter()
                .position(|(c, _)| *c == target)
                .map_or("not in posterior".to_string(), |r| format!("rank {}", r + 1));
            println!("\ntarget is at {rank}");
        }
        PredictorState::Exhausted => println!("\nthrows contradict each other"),
        PredictorState::Uninitialized => println!("\nno throw constrained the grid"),
    }
    Ok(())
}
