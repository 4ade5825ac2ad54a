//! Matching authority: the pool of registered drivers and the FIFO of riders
//! waiting for one.
//!
//! The two request directions are deliberately asymmetric. A driver's first
//! request only registers it in the pool; matching against waiting riders happens
//! on that driver's next request. A rider's request is matched immediately against
//! the nearest pooled driver (by travel time), or queued when the pool is empty.
//!
//! Drivers chosen by [Dispatcher::request_driver] stay in the pool; they are only
//! flagged busy. Removal happens at pickup (or when a cancellation reclaims them).

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Query, Resource};

use crate::ecs::Driver;
use crate::spatial::Location;

#[derive(Debug, Default, Resource)]
pub struct Dispatcher {
    available: Vec<Entity>,
    waiting: VecDeque<Entity>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a driver for `rider`, or `None` if the pool is empty.
    ///
    /// With an empty pool the rider joins the waiting list. Otherwise the pooled
    /// driver with the smallest travel time to `origin` is chosen (first in pool
    /// order on ties) and marked non-idle.
    pub fn request_driver(
        &mut self,
        rider: Entity,
        origin: Location,
        drivers: &mut Query<&mut Driver>,
    ) -> Option<Entity> {
        if self.available.is_empty() {
            self.enqueue(rider);
            return None;
        }

        let mut nearest: Option<(Entity, u64)> = None;
        for &entity in &self.available {
            let Ok(driver) = drivers.get(entity) else {
                continue;
            };
            let time = driver.travel_time(origin);
            if nearest.map_or(true, |(_, best)| time < best) {
                nearest = Some((entity, time));
            }
        }

        // Pooled entities that no longer carry a Driver count as an empty pool.
        let Some((entity, _)) = nearest else {
            self.enqueue(rider);
            return None;
        };
        if let Ok(mut driver) = drivers.get_mut(entity) {
            driver.is_idle = false;
        }
        Some(entity)
    }

    fn enqueue(&mut self, rider: Entity) {
        if !self.waiting.contains(&rider) {
            self.waiting.push_back(rider);
        }
    }

    /// Return a waiting rider for `driver`, or `None`.
    ///
    /// An unregistered driver is appended to the pool and gets nothing, even if
    /// riders are waiting. A registered driver takes the oldest waiting rider and is
    /// marked non-idle.
    pub fn request_rider(
        &mut self,
        driver: Entity,
        drivers: &mut Query<&mut Driver>,
    ) -> Option<Entity> {
        if !self.is_registered(driver) {
            self.available.push(driver);
            return None;
        }
        let rider = self.waiting.pop_front()?;
        if let Ok(mut record) = drivers.get_mut(driver) {
            record.is_idle = false;
        }
        Some(rider)
    }

    /// Drop `rider` from the waiting list; no-op if absent.
    pub fn cancel_ride(&mut self, rider: Entity) {
        self.waiting.retain(|&waiting| waiting != rider);
    }

    /// Pick up a driver on behalf of a rider whose patience ran out.
    ///
    /// Re-runs [Dispatcher::request_driver] as an availability check. That call
    /// really assigns the nearest pooled driver (flagging it busy), so the driver it
    /// returns is detached from the pool here and handed back to the caller, and
    /// the rider's pending request is withdrawn. Returns `None` without touching
    /// any state when the pool is empty.
    pub fn reclaim_for_cancellation(
        &mut self,
        rider: Entity,
        origin: Location,
        drivers: &mut Query<&mut Driver>,
    ) -> Option<Entity> {
        if !self.has_available_drivers() {
            return None;
        }
        let driver = self.request_driver(rider, origin, drivers)?;
        self.remove_driver(driver);
        self.cancel_ride(rider);
        Some(driver)
    }

    pub fn has_available_drivers(&self) -> bool {
        !self.available.is_empty()
    }

    pub fn is_registered(&self, driver: Entity) -> bool {
        self.available.contains(&driver)
    }

    pub fn is_waiting(&self, rider: Entity) -> bool {
        self.waiting.contains(&rider)
    }

    /// Take `driver` out of the pool. Returns whether it was there.
    pub fn remove_driver(&mut self, driver: Entity) -> bool {
        let before = self.available.len();
        self.available.retain(|&entity| entity != driver);
        self.available.len() != before
    }

    /// Put `driver` back at the end of the pool unless it is already pooled.
    pub fn return_driver(&mut self, driver: Entity) {
        if !self.is_registered(driver) {
            self.available.push(driver);
        }
    }

    pub fn available_drivers(&self) -> &[Entity] {
        &self.available
    }

    pub fn waiting_riders(&self) -> impl Iterator<Item = Entity> + '_ {
        self.waiting.iter().copied()
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }
}
