//! Load tests for sim_core: validate throughput on large generated scenarios.

use bevy_ecs::prelude::World;
use sim_core::runner::{run_until_empty, simulation_schedule};
use sim_core::scenario::{build_scenario, generate_scenario, ScenarioParams, SimulationConfig};
use sim_core::telemetry::Monitor;
use std::time::Instant;

fn run_load(label: &str, params: ScenarioParams, config: SimulationConfig) -> f64 {
    let records = generate_scenario(&params);
    let mut world = World::new();
    build_scenario(&mut world, &records, config);

    let start = Instant::now();
    let mut schedule = simulation_schedule::<Monitor>();
    let events = run_until_empty(&mut world, &mut schedule, 50_000_000);
    let duration = start.elapsed();

    let events_per_sec = events as f64 / duration.as_secs_f64();
    println!(
        "{label}: {} events in {:.2}s ({:.0} events/sec)",
        events,
        duration.as_secs_f64(),
        events_per_sec
    );
    events_per_sec
}

#[test]
#[ignore] // Only run explicitly: cargo test --package sim_core --test load_tests -- --ignored
fn test_sustained_load() {
    let params = ScenarioParams::default()
        .with_seed(42)
        .with_counts(20_000, 2_000)
        .with_grid_size(200)
        .with_request_window(10_000)
        .with_driver_spread(10_000);

    let events_per_sec = run_load("Sustained load test", params, SimulationConfig::default());

    assert!(
        events_per_sec > 1000.0,
        "Should process >1000 events/sec, got {:.0}",
        events_per_sec
    );
}

#[test]
#[ignore]
fn test_peak_load() {
    // Every rider requests within a short window against a small fleet.
    let params = ScenarioParams::default()
        .with_seed(42)
        .with_counts(10_000, 200)
        .with_grid_size(100)
        .with_request_window(50)
        .with_driver_spread(10);

    let events_per_sec = run_load("Peak load test", params, SimulationConfig::default());

    assert!(
        events_per_sec > 500.0,
        "Should process >500 events/sec under peak load, got {:.0}",
        events_per_sec
    );
}

#[test]
#[ignore]
fn test_long_running() {
    let params = ScenarioParams::default()
        .with_seed(42)
        .with_counts(5_000, 500)
        .with_grid_size(50)
        .with_request_window(1_000_000)
        .with_driver_spread(1_000_000)
        .with_patience_range(100, 10_000);
    let config = SimulationConfig::default().with_end_time(900_000);

    let events_per_sec = run_load("Long-running test", params, config);

    assert!(
        events_per_sec > 500.0,
        "Should process >500 events/sec in long-running scenario, got {:.0}",
        events_per_sec
    );
}
