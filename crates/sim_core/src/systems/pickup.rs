use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SpawnedEvents};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::observer::{ActionKind, Observer, SubjectKind};

/// The driver reaches a waiting rider.
///
/// Guarded on the rider still waiting and a non-empty driver pool; a rider who
/// already cancelled is left alone. The driver's notification carries the spot it
/// was dispatched from; only then is it moved onto the rider's origin. The
/// `Dropoff` is spawned at the pickup time.
pub fn pickup_system<O: Observer>(
    event: Res<CurrentEvent>,
    mut dispatcher: ResMut<Dispatcher>,
    mut observer: ResMut<O>,
    mut spawned: ResMut<SpawnedEvents>,
    mut riders: Query<&mut Rider>,
    mut drivers: Query<&mut Driver>,
) {
    let EventKind::Pickup {
        rider: rider_entity,
        driver: driver_entity,
    } = event.0.kind
    else {
        return;
    };
    let Ok(mut rider) = riders.get_mut(rider_entity) else {
        return;
    };
    if !rider.is_waiting() || !dispatcher.has_available_drivers() {
        return;
    }
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        return;
    };
    let now = event.0.timestamp;

    dispatcher.remove_driver(driver_entity);
    rider.satisfy();
    driver.is_idle = false;

    observer.notify(
        now,
        SubjectKind::Rider,
        ActionKind::Pickup,
        &rider.id,
        rider.origin,
    );
    observer.notify(
        now,
        SubjectKind::Driver,
        ActionKind::Pickup,
        &driver.id,
        driver.location,
    );

    spawned.push(
        now,
        EventKind::Dropoff {
            rider: rider_entity,
            driver: driver_entity,
        },
    );

    driver.start_ride(&rider);
}
