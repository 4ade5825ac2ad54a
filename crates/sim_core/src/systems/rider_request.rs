use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SpawnedEvents};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::observer::{ActionKind, Observer, SubjectKind};

/// A rider asks for a driver.
///
/// Spawns a `Pickup` when a driver is assigned, then always a `Cancellation` at
/// the end of the rider's patience.
pub fn rider_request_system<O: Observer>(
    event: Res<CurrentEvent>,
    mut dispatcher: ResMut<Dispatcher>,
    mut observer: ResMut<O>,
    mut spawned: ResMut<SpawnedEvents>,
    riders: Query<&Rider>,
    mut drivers: Query<&mut Driver>,
) {
    let EventKind::RiderRequest { rider: rider_entity } = event.0.kind else {
        return;
    };
    let Ok(rider) = riders.get(rider_entity) else {
        return;
    };
    let now = event.0.timestamp;

    observer.notify(
        now,
        SubjectKind::Rider,
        ActionKind::Request,
        &rider.id,
        rider.origin,
    );

    if let Some(driver_entity) = dispatcher.request_driver(rider_entity, rider.origin, &mut drivers)
    {
        if let Ok(mut driver) = drivers.get_mut(driver_entity) {
            let travel_time = driver.start_drive(rider.origin);
            spawned.push(
                now.saturating_add(travel_time),
                EventKind::Pickup {
                    rider: rider_entity,
                    driver: driver_entity,
                },
            );
        }
    }

    spawned.push(
        now.saturating_add(rider.patience),
        EventKind::Cancellation {
            rider: rider_entity,
        },
    );
}

#[cfg(test)]
mod tests {
    use crate::clock::EventKind;
    use crate::dispatcher::Dispatcher;
    use crate::ecs::Driver;
    use crate::observer::{ActionKind, SubjectKind};
    use crate::telemetry::Monitor;
    use crate::test_helpers::{at, create_test_world, execute, spawn_driver, spawn_rider};

    #[test]
    fn unmatched_rider_waits_and_schedules_cancellation() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "r1", at(0, 0), at(2, 2), 5);

        let spawned = execute(&mut world, 0, EventKind::RiderRequest { rider });

        assert_eq!(spawned, vec![(5, EventKind::Cancellation { rider })]);
        assert!(world.resource::<Dispatcher>().is_waiting(rider));
        let monitor = world.resource::<Monitor>();
        assert_eq!(monitor.len(), 1);
        assert_eq!(monitor.notifications()[0].subject, SubjectKind::Rider);
        assert_eq!(monitor.notifications()[0].action, ActionKind::Request);
        assert_eq!(monitor.notifications()[0].location, at(0, 0));
    }

    #[test]
    fn matched_rider_spawns_pickup_then_cancellation() {
        let mut world = create_test_world();
        let driver = spawn_driver(&mut world, "d1", at(0, 0), 1);
        execute(&mut world, 0, EventKind::DriverRequest { driver });
        let rider = spawn_rider(&mut world, "r1", at(0, 3), at(0, 5), 10);

        let spawned = execute(&mut world, 1, EventKind::RiderRequest { rider });

        assert_eq!(
            spawned,
            vec![
                (4, EventKind::Pickup { rider, driver }),
                (11, EventKind::Cancellation { rider }),
            ]
        );
        let record = world.get::<Driver>(driver).expect("driver");
        assert!(!record.is_idle);
        assert_eq!(record.destination, Some(at(0, 3)));
        assert!(!world.resource::<Dispatcher>().is_waiting(rider));
    }

    #[test]
    fn nearest_of_two_drivers_is_chosen() {
        let mut world = create_test_world();
        let d1 = spawn_driver(&mut world, "d1", at(0, 0), 1);
        let d2 = spawn_driver(&mut world, "d2", at(10, 10), 1);
        execute(&mut world, 0, EventKind::DriverRequest { driver: d1 });
        execute(&mut world, 0, EventKind::DriverRequest { driver: d2 });
        let rider = spawn_rider(&mut world, "r1", at(1, 1), at(4, 4), 10);

        let spawned = execute(&mut world, 2, EventKind::RiderRequest { rider });

        assert_eq!(spawned[0], (4, EventKind::Pickup { rider, driver: d1 }));
        assert!(world.get::<Driver>(d2).expect("d2").is_idle);
    }

    #[test]
    fn cancellation_time_saturates_instead_of_overflowing() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "r1", at(0, 0), at(2, 2), u64::MAX);

        let spawned = execute(&mut world, 7, EventKind::RiderRequest { rider });

        assert_eq!(spawned, vec![(u64::MAX, EventKind::Cancellation { rider })]);
    }
}
