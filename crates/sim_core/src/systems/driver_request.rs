use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SpawnedEvents};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::observer::{ActionKind, Observer, SubjectKind};

/// A driver asks for a rider. The first request from a driver only registers it.
pub fn driver_request_system<O: Observer>(
    event: Res<CurrentEvent>,
    mut dispatcher: ResMut<Dispatcher>,
    mut observer: ResMut<O>,
    mut spawned: ResMut<SpawnedEvents>,
    riders: Query<&Rider>,
    mut drivers: Query<&mut Driver>,
) {
    let EventKind::DriverRequest {
        driver: driver_entity,
    } = event.0.kind
    else {
        return;
    };
    let now = event.0.timestamp;

    {
        let Ok(driver) = drivers.get(driver_entity) else {
            return;
        };
        observer.notify(
            now,
            SubjectKind::Driver,
            ActionKind::Request,
            &driver.id,
            driver.location,
        );
    }

    let Some(rider_entity) = dispatcher.request_rider(driver_entity, &mut drivers) else {
        return;
    };
    let Ok(rider) = riders.get(rider_entity) else {
        return;
    };
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        return;
    };
    let travel_time = driver.start_drive(rider.origin);
    spawned.push(
        now.saturating_add(travel_time),
        EventKind::Pickup {
            rider: rider_entity,
            driver: driver_entity,
        },
    );
}

#[cfg(test)]
mod tests {
    use crate::clock::EventKind;
    use crate::dispatcher::Dispatcher;
    use crate::ecs::Driver;
    use crate::observer::ActionKind;
    use crate::telemetry::Monitor;
    use crate::test_helpers::{at, create_test_world, execute, spawn_driver, spawn_rider};

    #[test]
    fn first_request_registers_without_spawning() {
        let mut world = create_test_world();
        let driver = spawn_driver(&mut world, "d1", at(0, 0), 1);

        let spawned = execute(&mut world, 0, EventKind::DriverRequest { driver });

        assert!(spawned.is_empty());
        assert_eq!(world.resource::<Dispatcher>().available_drivers(), &[driver]);
        assert!(world.get::<Driver>(driver).expect("driver").is_idle);
        let monitor = world.resource::<Monitor>();
        assert_eq!(monitor.notifications()[0].action, ActionKind::Request);
        assert_eq!(monitor.notifications()[0].id, "d1");
    }

    #[test]
    fn registration_ignores_waiting_riders_until_next_poll() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "r1", at(0, 4), at(1, 4), 20);
        execute(&mut world, 0, EventKind::RiderRequest { rider });
        let driver = spawn_driver(&mut world, "d1", at(0, 0), 2);

        assert!(execute(&mut world, 1, EventKind::DriverRequest { driver }).is_empty());
        assert!(world.resource::<Dispatcher>().is_waiting(rider));

        let spawned = execute(&mut world, 3, EventKind::DriverRequest { driver });
        assert_eq!(spawned, vec![(5, EventKind::Pickup { rider, driver })]);
        assert!(!world.resource::<Dispatcher>().is_waiting(rider));
        let record = world.get::<Driver>(driver).expect("driver");
        assert!(!record.is_idle);
        assert_eq!(record.destination, Some(at(0, 4)));
    }

    #[test]
    fn registered_driver_with_no_riders_spawns_nothing() {
        let mut world = create_test_world();
        let driver = spawn_driver(&mut world, "d1", at(0, 0), 1);
        execute(&mut world, 0, EventKind::DriverRequest { driver });
        assert!(execute(&mut world, 1, EventKind::DriverRequest { driver }).is_empty());
        assert_eq!(world.resource::<Monitor>().len(), 2);
    }
}
