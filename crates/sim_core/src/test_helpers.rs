//! Test helpers for common test setup and utilities.
//!
//! Shared by the unit tests, the integration tests and the benches.

use bevy_ecs::prelude::{Entity, World};

use crate::clock::{Event, EventKind, SimulationClock, SpawnedEvents};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::runner::{execute_event, simulation_schedule};
use crate::spatial::Location;
use crate::telemetry::Monitor;

/// Create a world with the engine resources and a [Monitor] observer.
///
/// For worlds loaded from scenario records, use `build_scenario` instead.
pub fn create_test_world() -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(Dispatcher::default());
    world.insert_resource(SpawnedEvents::default());
    world.insert_resource(Monitor::default());
    world
}

pub fn at(row: i32, column: i32) -> Location {
    Location::new(row, column)
}

pub fn spawn_rider(
    world: &mut World,
    id: &str,
    origin: Location,
    destination: Location,
    patience: u64,
) -> Entity {
    world.spawn(Rider::new(id, patience, origin, destination)).id()
}

pub fn spawn_driver(world: &mut World, id: &str, location: Location, speed: u32) -> Entity {
    world.spawn(Driver::new(id, location, speed)).id()
}

/// Execute a single event outside the clock and return what it spawned.
///
/// Uses a fresh schedule per call, which is fine for tests but wasteful in loops.
pub fn execute(world: &mut World, timestamp: u64, kind: EventKind) -> Vec<(u64, EventKind)> {
    let mut schedule = simulation_schedule::<Monitor>();
    let event = Event {
        timestamp,
        seq: 0,
        kind,
    };
    execute_event(world, &mut schedule, event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_has_engine_resources() {
        let world = create_test_world();
        assert!(world.get_resource::<SimulationClock>().is_some());
        assert!(world.get_resource::<Dispatcher>().is_some());
        assert!(world.get_resource::<SpawnedEvents>().is_some());
        assert!(world.get_resource::<Monitor>().is_some());
    }

    #[test]
    fn execute_leaves_the_clock_alone() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "r1", at(0, 0), at(1, 1), 4);

        let spawned = execute(&mut world, 2, EventKind::RiderRequest { rider });

        assert_eq!(spawned, vec![(6, EventKind::Cancellation { rider })]);
        assert!(world.resource::<SimulationClock>().is_empty());
        assert!(world.resource::<SpawnedEvents>().is_empty());
    }
}
