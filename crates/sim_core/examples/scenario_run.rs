//! Generate a 500 riders / 100 drivers scenario, run it and print a summary.
//!
//! Run with: cargo run -p sim_core --example scenario_run

use bevy_ecs::prelude::World;
use sim_core::clock::SimulationClock;
use sim_core::observer::{ActionKind, SubjectKind};
use sim_core::runner::{run_until_empty, simulation_schedule};
use sim_core::scenario::{build_scenario, generate_scenario, ScenarioParams, SimulationConfig};
use sim_core::telemetry::Monitor;

fn main() {
    const NUM_RIDERS: usize = 500;
    const NUM_DRIVERS: usize = 100;
    const SEED: u64 = 123;

    let records = generate_scenario(
        &ScenarioParams::default()
            .with_seed(SEED)
            .with_counts(NUM_RIDERS, NUM_DRIVERS)
            .with_grid_size(40)
            .with_request_window(2_000)
            .with_patience_range(10, 60),
    );

    let mut world = World::new();
    build_scenario(&mut world, &records, SimulationConfig::default());
    let mut schedule = simulation_schedule::<Monitor>();
    let steps = run_until_empty(&mut world, &mut schedule, 2_000_000);

    let monitor = world.resource::<Monitor>();
    let report = monitor.report();
    let clock = world.resource::<SimulationClock>();

    println!(
        "--- Scenario run ({} riders, {} drivers, seed {}) ---",
        NUM_RIDERS, NUM_DRIVERS, SEED
    );
    println!("Steps executed: {}", steps);
    println!("Simulation time: {}", clock.now());
    println!(
        "Rides completed: {} / cancelled: {}",
        report.counts.rider_dropoffs, report.counts.rider_cancellations
    );
    println!("Average wait: {:.2}", report.rider_wait_time);

    const SAMPLE: usize = 10;
    println!("\nFirst {} pickups:", SAMPLE);
    for n in monitor
        .notifications()
        .iter()
        .filter(|n| n.subject == SubjectKind::Rider && n.action == ActionKind::Pickup)
        .take(SAMPLE)
    {
        println!("  {}", n);
    }
}
