use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SpawnedEvents};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::observer::{ActionKind, Observer, SubjectKind};

/// A rider's patience ran out.
///
/// Only acts while the rider is still waiting and at least one driver is pooled.
/// The dispatcher hands back the nearest pooled driver, which is relocated to the
/// rider's origin and put back into service with a fresh `DriverRequest`.
///
/// With an empty pool nothing happens and the rider stays waiting for good; no
/// later event will clear it.
pub fn rider_cancel_system<O: Observer>(
    event: Res<CurrentEvent>,
    mut dispatcher: ResMut<Dispatcher>,
    mut observer: ResMut<O>,
    mut spawned: ResMut<SpawnedEvents>,
    mut riders: Query<&mut Rider>,
    mut drivers: Query<&mut Driver>,
) {
    let EventKind::Cancellation { rider: rider_entity } = event.0.kind else {
        return;
    };
    let Ok(mut rider) = riders.get_mut(rider_entity) else {
        return;
    };
    if !rider.is_waiting() || !dispatcher.has_available_drivers() {
        return;
    }

    let Some(driver_entity) =
        dispatcher.reclaim_for_cancellation(rider_entity, rider.origin, &mut drivers)
    else {
        return;
    };
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        return;
    };
    let now = event.0.timestamp;

    rider.cancel();
    driver.reset_at(rider.origin);

    observer.notify(
        now,
        SubjectKind::Rider,
        ActionKind::Cancel,
        &rider.id,
        rider.origin,
    );
    observer.notify(
        now,
        SubjectKind::Driver,
        ActionKind::Cancel,
        &driver.id,
        driver.location,
    );

    spawned.push(
        now,
        EventKind::DriverRequest {
            driver: driver_entity,
        },
    );
}
