//! One system per event kind. Each system returns immediately unless the
//! [crate::clock::CurrentEvent] is its kind, and reports spawned follow-up events
//! through [crate::clock::SpawnedEvents].

pub mod driver_request;
pub mod dropoff;
pub mod pickup;
pub mod rider_cancel;
pub mod rider_request;
