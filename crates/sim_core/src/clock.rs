//! Simulation clock: a min-heap of timestamped events with stable tie-breaking.
//!
//! Events at the same timestamp pop in the order they were scheduled. The clock
//! assigns each event a sequence number on insertion and orders by
//! `(timestamp, seq)`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use bevy_ecs::prelude::{Entity, Resource};

/// The closed set of simulation events and the entities each one acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RiderRequest { rider: Entity },
    DriverRequest { driver: Entity },
    Cancellation { rider: Entity },
    Pickup { rider: Entity, driver: Entity },
    Dropoff { rider: Entity, driver: Entity },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::RiderRequest { .. } => "RiderRequest",
            EventKind::DriverRequest { .. } => "DriverRequest",
            EventKind::Cancellation { .. } => "Cancellation",
            EventKind::Pickup { .. } => "Pickup",
            EventKind::Dropoff { .. } => "Dropoff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    /// Insertion order; breaks timestamp ties.
    pub seq: u64,
    pub kind: EventKind,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.timestamp, self.kind.name())
    }
}

/// The event currently being executed. Inserted by the runner before each schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Events spawned while executing the current event, in spawn order.
/// The runner moves them into the clock after the schedule finishes.
#[derive(Debug, Default, Resource)]
pub struct SpawnedEvents(Vec<(u64, EventKind)>);

impl SpawnedEvents {
    pub fn push(&mut self, timestamp: u64, kind: EventKind) {
        self.0.push((timestamp, kind));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn take(&mut self) -> Vec<(u64, EventKind)> {
        std::mem::take(&mut self.0)
    }
}

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue `kind` at `timestamp`. Past timestamps are accepted; ordering them is
    /// the scenario author's responsibility.
    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind) -> Event {
        let event = Event {
            timestamp,
            seq: self.next_seq,
            kind,
        };
        self.next_seq += 1;
        self.events.push(event);
        event
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
