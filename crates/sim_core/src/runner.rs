//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent], runs
//! the schedule, then moves whatever the event spawned into the clock in spawn
//! order. Everything runs on the caller's thread, one event at a time.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use tracing::{debug, warn};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock, SpawnedEvents};
use crate::observer::Observer;
use crate::scenario::SimulationEndTime;
use crate::systems::{
    driver_request::driver_request_system, dropoff::dropoff_system, pickup::pickup_system,
    rider_cancel::rider_cancel_system, rider_request::rider_request_system,
};

fn is_rider_request(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::RiderRequest { .. }))
        .unwrap_or(false)
}

fn is_driver_request(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::DriverRequest { .. }))
        .unwrap_or(false)
}

fn is_cancellation(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Cancellation { .. }))
        .unwrap_or(false)
}

fn is_pickup(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Pickup { .. }))
        .unwrap_or(false)
}

fn is_dropoff(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Dropoff { .. }))
        .unwrap_or(false)
}

/// Builds the simulation schedule for observer type `O`: one system per event kind,
/// each gated on the [CurrentEvent] so exactly one of them does work per step.
pub fn simulation_schedule<O: Observer>() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        rider_request_system::<O>.run_if(is_rider_request),
        driver_request_system::<O>.run_if(is_driver_request),
        rider_cancel_system::<O>.run_if(is_cancellation),
        pickup_system::<O>.run_if(is_pickup),
        dropoff_system::<O>.run_if(is_dropoff),
    ));
    schedule
}

/// Executes `event` against the world and returns the events it spawned, in
/// spawn order. Does not touch the clock.
pub fn execute_event(
    world: &mut World,
    schedule: &mut Schedule,
    event: Event,
) -> Vec<(u64, EventKind)> {
    debug!(
        timestamp = event.timestamp,
        seq = event.seq,
        kind = event.kind.name(),
        "executing event"
    );
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    world
        .get_resource_mut::<SpawnedEvents>()
        .map(|mut spawned| spawned.take())
        .unwrap_or_default()
}

fn next_event(world: &mut World) -> Option<Event> {
    let stop_at = world.get_resource::<SimulationEndTime>().map(|e| e.0);
    let mut clock = world.get_resource_mut::<SimulationClock>()?;
    if let (Some(end), Some(ts)) = (stop_at, clock.next_event_time()) {
        if ts > end {
            debug!(next = ts, end, "next event is past the simulation end time");
            return None;
        }
    }
    clock.pop_next()
}

fn schedule_spawned(world: &mut World, parent: &Event, spawned: Vec<(u64, EventKind)>) {
    let mut clock = world.resource_mut::<SimulationClock>();
    for (timestamp, kind) in spawned {
        if timestamp < parent.timestamp {
            warn!(
                timestamp,
                parent = parent.timestamp,
                kind = kind.name(),
                "spawned event is earlier than the event that spawned it"
            );
        }
        clock.schedule_at(timestamp, kind);
    }
}

/// Runs one simulation step. Returns `true` if an event was processed, `false` if
/// the clock was empty or the next event lies beyond [SimulationEndTime] (when that
/// resource is present). Events past the end time stay queued.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    run_next_event_with_hook(world, schedule, |_, _| {})
}

/// Runs one simulation step and invokes `hook` after the spawned events are queued.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let Some(event) = next_event(world) else {
        return false;
    };
    let spawned = execute_event(world, schedule, event);
    schedule_spawned(world, &event, spawned);
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty (or the end time is reached)
/// or `max_steps` is reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    run_until_empty_with_hook(world, schedule, max_steps, |_, _| {})
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}
