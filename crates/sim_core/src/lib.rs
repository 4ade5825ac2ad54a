pub mod spatial;
pub mod clock;
pub mod dispatcher;
pub mod ecs;
pub mod observer;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
