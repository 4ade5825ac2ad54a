//! Rider and driver components.
//!
//! Identity is the string id carried by each component: equality compares ids only,
//! never mutable state. The dispatcher and in-flight events refer to riders and
//! drivers by [bevy_ecs::prelude::Entity]; the component data lives in the `World`.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::spatial::{manhattan_distance, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiderStatus {
    Waiting,
    Cancelled,
    Satisfied,
}

impl RiderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RiderStatus::Waiting)
    }
}

#[derive(Debug, Clone, Component)]
pub struct Rider {
    pub id: String,
    /// Time units the rider waits before a cancellation fires.
    pub patience: u64,
    pub origin: Location,
    pub destination: Location,
    status: RiderStatus,
}

impl Rider {
    pub fn new(id: impl Into<String>, patience: u64, origin: Location, destination: Location) -> Self {
        Self {
            id: id.into(),
            patience,
            origin,
            destination,
            status: RiderStatus::Waiting,
        }
    }

    pub fn status(&self) -> RiderStatus {
        self.status
    }

    pub fn is_waiting(&self) -> bool {
        self.status == RiderStatus::Waiting
    }

    /// WAITING -> CANCELLED. Returns `false` (and changes nothing) from a terminal state.
    pub fn cancel(&mut self) -> bool {
        self.transition(RiderStatus::Cancelled)
    }

    /// WAITING -> SATISFIED. Returns `false` (and changes nothing) from a terminal state.
    pub fn satisfy(&mut self) -> bool {
        self.transition(RiderStatus::Satisfied)
    }

    fn transition(&mut self, to: RiderStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = to;
        true
    }
}

impl PartialEq for Rider {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Rider {}

#[derive(Debug, Clone, Component)]
pub struct Driver {
    pub id: String,
    pub location: Location,
    /// Distance units per time unit; always positive.
    pub speed: u32,
    pub is_idle: bool,
    /// Set while en route or on a ride.
    pub destination: Option<Location>,
}

impl Driver {
    pub fn new(id: impl Into<String>, location: Location, speed: u32) -> Self {
        debug_assert!(speed > 0, "driver speed must be positive");
        Self {
            id: id.into(),
            location,
            speed,
            is_idle: true,
            destination: None,
        }
    }

    /// Time to reach `destination` from the current location.
    pub fn travel_time(&self, destination: Location) -> u64 {
        travel_time(manhattan_distance(self.location, destination), self.speed)
    }

    /// Head for `destination`; returns the travel time.
    pub fn start_drive(&mut self, destination: Location) -> u64 {
        self.is_idle = false;
        self.destination = Some(destination);
        self.travel_time(destination)
    }

    /// Arrive at the current destination, if any, and become idle.
    pub fn end_drive(&mut self) {
        self.is_idle = true;
        if let Some(destination) = self.destination.take() {
            self.location = destination;
        }
    }

    /// Take `rider` on board at their origin; returns the ride time.
    pub fn start_ride(&mut self, rider: &Rider) -> u64 {
        self.is_idle = false;
        self.location = rider.origin;
        self.destination = Some(rider.destination);
        travel_time(manhattan_distance(rider.origin, rider.destination), self.speed)
    }

    /// Drop the rider off at the ride destination and become idle.
    pub fn end_ride(&mut self) {
        self.end_drive();
    }

    /// Abandon any drive or ride and wait idle at `location`.
    pub fn reset_at(&mut self, location: Location) {
        self.is_idle = true;
        self.destination = None;
        self.location = location;
    }
}

impl PartialEq for Driver {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Driver {}

/// `round(distance / speed)`, with halves rounded to even.
pub fn travel_time(distance: u64, speed: u32) -> u64 {
    let speed = u64::from(speed.max(1));
    let quotient = distance / speed;
    let twice_remainder = 2 * (distance % speed);
    if twice_remainder > speed || (twice_remainder == speed && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
