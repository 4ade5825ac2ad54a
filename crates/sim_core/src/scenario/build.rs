use std::collections::BTreeMap;

use bevy_ecs::prelude::{Entity, World};
use tracing::info;

use crate::clock::{EventKind, SimulationClock, SpawnedEvents};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::scenario::params::{SimulationConfig, SimulationEndTime};
use crate::scenario::parse::ScenarioRecord;
use crate::telemetry::Monitor;

/// Entities spawned for a scenario, keyed by their scenario id.
#[derive(Debug, Default, Clone)]
pub struct ScenarioEntities {
    pub riders: BTreeMap<String, Entity>,
    pub drivers: BTreeMap<String, Entity>,
}

impl ScenarioEntities {
    pub fn rider(&self, id: &str) -> Option<Entity> {
        self.riders.get(id).copied()
    }

    pub fn driver(&self, id: &str) -> Option<Entity> {
        self.drivers.get(id).copied()
    }
}

/// Inserts the engine resources, spawns one entity per record and schedules
/// the initial request events in record order.
///
/// Any previous clock, dispatcher or monitor in `world` is replaced.
pub fn build_scenario(
    world: &mut World,
    records: &[ScenarioRecord],
    config: SimulationConfig,
) -> ScenarioEntities {
    world.insert_resource(Dispatcher::default());
    world.insert_resource(SpawnedEvents::default());
    world.insert_resource(Monitor::default());
    match config.end_time {
        Some(end) => world.insert_resource(SimulationEndTime(end)),
        None => {
            world.remove_resource::<SimulationEndTime>();
        }
    }

    let mut clock = SimulationClock::default();
    let mut entities = ScenarioEntities::default();
    for record in records {
        match record {
            ScenarioRecord::DriverRequest {
                timestamp,
                id,
                location,
                speed,
            } => {
                let driver = world.spawn(Driver::new(id.clone(), *location, *speed)).id();
                entities.drivers.insert(id.clone(), driver);
                clock.schedule_at(*timestamp, EventKind::DriverRequest { driver });
            }
            ScenarioRecord::RiderRequest {
                timestamp,
                id,
                origin,
                destination,
                patience,
            } => {
                let rider = world
                    .spawn(Rider::new(id.clone(), *patience, *origin, *destination))
                    .id();
                entities.riders.insert(id.clone(), rider);
                clock.schedule_at(*timestamp, EventKind::RiderRequest { rider });
            }
        }
    }
    world.insert_resource(clock);

    info!(
        riders = entities.riders.len(),
        drivers = entities.drivers.len(),
        end_time = ?config.end_time,
        "scenario built"
    );
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::parse::parse_scenario;
    use crate::spatial::Location;

    #[test]
    fn spawns_entities_and_queues_requests_in_order() {
        let records = parse_scenario(
            "5 RiderRequest r1 0,0 1,1 3\n0 DriverRequest d1 2,2 1\n5 DriverRequest d2 3,3 2\n",
        )
        .expect("scenario");
        let mut world = World::new();

        let entities = build_scenario(&mut world, &records, SimulationConfig::default());

        let r1 = entities.rider("r1").expect("r1");
        let d1 = entities.driver("d1").expect("d1");
        let d2 = entities.driver("d2").expect("d2");
        assert_eq!(world.get::<Rider>(r1).expect("rider").origin, Location::new(0, 0));
        assert_eq!(world.get::<Driver>(d2).expect("driver").speed, 2);

        let mut clock = world.resource_mut::<SimulationClock>();
        assert_eq!(clock.pending(), 3);
        let order: Vec<(u64, EventKind)> = std::iter::from_fn(|| clock.pop_next())
            .map(|e| (e.timestamp, e.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, EventKind::DriverRequest { driver: d1 }),
                (5, EventKind::RiderRequest { rider: r1 }),
                (5, EventKind::DriverRequest { driver: d2 }),
            ]
        );
        assert!(world.get_resource::<SimulationEndTime>().is_none());
        assert!(world.resource::<Monitor>().is_empty());
        assert!(!world.resource::<Dispatcher>().has_available_drivers());
    }

    #[test]
    fn end_time_is_inserted_when_configured() {
        let mut world = World::new();
        build_scenario(&mut world, &[], SimulationConfig::default().with_end_time(42));
        assert_eq!(world.get_resource::<SimulationEndTime>(), Some(&SimulationEndTime(42)));
        assert!(world.resource::<SimulationClock>().is_empty());
    }
}
