//! Telemetry / KPIs: the [Monitor] observer records every notification and
//! summarises them into a [SimulationReport].

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::observer::{ActionKind, Notification, Observer, SubjectKind};
use crate::spatial::{manhattan_distance, Location};

/// Records notifications in arrival order.
#[derive(Debug, Default, Resource)]
pub struct Monitor {
    notifications: Vec<Notification>,
}

impl Observer for Monitor {
    fn notify(
        &mut self,
        timestamp: u64,
        subject: SubjectKind,
        action: ActionKind,
        id: &str,
        location: Location,
    ) {
        self.notifications.push(Notification {
            timestamp,
            subject,
            action,
            id: id.to_string(),
            location,
        });
    }
}

/// Aggregated counts of notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub rider_requests: usize,
    pub rider_cancellations: usize,
    pub rider_pickups: usize,
    pub rider_dropoffs: usize,
    pub driver_requests: usize,
    pub driver_cancellations: usize,
    pub driver_pickups: usize,
    pub driver_dropoffs: usize,
}

impl ActivityCounts {
    pub fn add(&mut self, subject: SubjectKind, action: ActionKind) {
        let slot = match (subject, action) {
            (SubjectKind::Rider, ActionKind::Request) => &mut self.rider_requests,
            (SubjectKind::Rider, ActionKind::Cancel) => &mut self.rider_cancellations,
            (SubjectKind::Rider, ActionKind::Pickup) => &mut self.rider_pickups,
            (SubjectKind::Rider, ActionKind::Dropoff) => &mut self.rider_dropoffs,
            (SubjectKind::Driver, ActionKind::Request) => &mut self.driver_requests,
            (SubjectKind::Driver, ActionKind::Cancel) => &mut self.driver_cancellations,
            (SubjectKind::Driver, ActionKind::Pickup) => &mut self.driver_pickups,
            (SubjectKind::Driver, ActionKind::Dropoff) => &mut self.driver_dropoffs,
        };
        *slot += 1;
    }
}

/// Summary statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub riders: usize,
    pub drivers: usize,
    pub counts: ActivityCounts,
    /// Mean time from request to pickup over riders that were picked up.
    pub rider_wait_time: f64,
    /// Mean distance covered per driver between consecutive notified locations.
    pub driver_total_distance: f64,
    /// Mean distance per driver from pickup to the following dropoff.
    pub driver_ride_distance: f64,
}

impl Monitor {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Notifications for one subject, in arrival order.
    pub fn activities<'a>(
        &'a self,
        subject: SubjectKind,
        id: &'a str,
    ) -> impl Iterator<Item = &'a Notification> + 'a {
        self.notifications
            .iter()
            .filter(move |n| n.subject == subject && n.id == id)
    }

    pub fn report(&self) -> SimulationReport {
        let mut counts = ActivityCounts::default();
        // BTreeMap keeps per-subject iteration deterministic.
        let mut riders: BTreeMap<&str, Vec<&Notification>> = BTreeMap::new();
        let mut drivers: BTreeMap<&str, Vec<&Notification>> = BTreeMap::new();
        for n in &self.notifications {
            counts.add(n.subject, n.action);
            match n.subject {
                SubjectKind::Rider => riders.entry(n.id.as_str()).or_default().push(n),
                SubjectKind::Driver => drivers.entry(n.id.as_str()).or_default().push(n),
            }
        }

        SimulationReport {
            riders: riders.len(),
            drivers: drivers.len(),
            counts,
            rider_wait_time: average_wait_time(&riders),
            driver_total_distance: average_total_distance(&drivers),
            driver_ride_distance: average_ride_distance(&drivers),
        }
    }
}

fn mean(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

fn average_wait_time(riders: &BTreeMap<&str, Vec<&Notification>>) -> f64 {
    let mut total = 0;
    let mut picked_up = 0;
    for activities in riders.values() {
        let mut requested_at = None;
        for n in activities {
            match n.action {
                ActionKind::Request => requested_at = Some(n.timestamp),
                ActionKind::Pickup => {
                    if let Some(at) = requested_at.take() {
                        total += n.timestamp.saturating_sub(at);
                        picked_up += 1;
                    }
                }
                ActionKind::Cancel | ActionKind::Dropoff => {}
            }
        }
    }
    mean(total, picked_up)
}

fn average_total_distance(drivers: &BTreeMap<&str, Vec<&Notification>>) -> f64 {
    let total: u64 = drivers
        .values()
        .map(|activities| {
            activities
                .windows(2)
                .map(|pair| manhattan_distance(pair[0].location, pair[1].location))
                .sum::<u64>()
        })
        .sum();
    mean(total, drivers.len())
}

fn average_ride_distance(drivers: &BTreeMap<&str, Vec<&Notification>>) -> f64 {
    let total: u64 = drivers
        .values()
        .map(|activities| {
            let mut pickup_at: Option<Location> = None;
            let mut distance = 0;
            for n in activities {
                match n.action {
                    ActionKind::Pickup => pickup_at = Some(n.location),
                    ActionKind::Dropoff => {
                        if let Some(from) = pickup_at.take() {
                            distance += manhattan_distance(from, n.location);
                        }
                    }
                    ActionKind::Request | ActionKind::Cancel => {}
                }
            }
            distance
        })
        .sum();
    mean(total, drivers.len())
}
