use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SpawnedEvents};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider, RiderStatus};
use crate::observer::{ActionKind, Observer, SubjectKind};

/// The driver delivers a picked-up rider and goes back into the pool.
pub fn dropoff_system<O: Observer>(
    event: Res<CurrentEvent>,
    mut dispatcher: ResMut<Dispatcher>,
    mut observer: ResMut<O>,
    mut spawned: ResMut<SpawnedEvents>,
    riders: Query<&Rider>,
    mut drivers: Query<&mut Driver>,
) {
    let EventKind::Dropoff {
        rider: rider_entity,
        driver: driver_entity,
    } = event.0.kind
    else {
        return;
    };
    let Ok(rider) = riders.get(rider_entity) else {
        return;
    };
    if rider.status() != RiderStatus::Satisfied {
        return;
    }
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        return;
    };
    let now = event.0.timestamp;

    dispatcher.return_driver(driver_entity);
    // The ride always ends at the rider's destination.
    driver.destination = Some(rider.destination);
    driver.end_ride();

    observer.notify(
        now,
        SubjectKind::Driver,
        ActionKind::Dropoff,
        &driver.id,
        driver.location,
    );
    observer.notify(
        now,
        SubjectKind::Rider,
        ActionKind::Dropoff,
        &rider.id,
        rider.destination,
    );

    spawned.push(
        now,
        EventKind::DriverRequest {
            driver: driver_entity,
        },
    );
}
