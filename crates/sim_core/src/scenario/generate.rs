use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::scenario::params::ScenarioParams;
use crate::scenario::parse::ScenarioRecord;
use crate::spatial::Location;

/// Attempts at drawing a destination distinct from the origin before accepting a zero-length trip.
const MAX_DESTINATION_ATTEMPTS: usize = 16;

fn random_location<R: Rng>(rng: &mut R, grid_size: u32) -> Location {
    let size = grid_size.max(1) as i32;
    Location::new(rng.gen_range(0..size), rng.gen_range(0..size))
}

/// Picks a destination other than `origin` when the grid allows it.
pub fn random_destination<R: Rng>(rng: &mut R, origin: Location, grid_size: u32) -> Location {
    let mut destination = random_location(rng, grid_size);
    for _ in 0..MAX_DESTINATION_ATTEMPTS {
        if destination != origin {
            break;
        }
        destination = random_location(rng, grid_size);
    }
    destination
}

fn ordered<T: PartialOrd>(min: T, max: T) -> (T, T) {
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

/// Generates a random scenario. With a seed the output is reproducible.
///
/// Records are sorted by timestamp; drivers precede riders at equal timestamps
/// since the sort is stable and drivers are generated first.
pub fn generate_scenario(params: &ScenarioParams) -> Vec<ScenarioRecord> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (min_speed, max_speed) = ordered(params.min_speed.max(1), params.max_speed.max(1));
    let (min_patience, max_patience) = ordered(params.min_patience, params.max_patience);

    let mut records = Vec::with_capacity(params.num_drivers + params.num_riders);
    for index in 0..params.num_drivers {
        records.push(ScenarioRecord::DriverRequest {
            timestamp: rng.gen_range(0..=params.driver_spread),
            id: format!("driver-{index}"),
            location: random_location(&mut rng, params.grid_size),
            speed: rng.gen_range(min_speed..=max_speed),
        });
    }
    for index in 0..params.num_riders {
        let origin = random_location(&mut rng, params.grid_size);
        records.push(ScenarioRecord::RiderRequest {
            timestamp: rng.gen_range(0..=params.request_window),
            id: format!("rider-{index}"),
            origin,
            destination: random_destination(&mut rng, origin, params.grid_size),
            patience: rng.gen_range(min_patience..=max_patience),
        });
    }
    records.sort_by_key(ScenarioRecord::timestamp);

    debug!(
        riders = params.num_riders,
        drivers = params.num_drivers,
        seed = ?params.seed,
        "generated scenario"
    );
    records
}
