use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Default side length of the square grid scenarios are generated on.
const DEFAULT_GRID_SIZE: u32 = 20;

/// Default window over which generated riders request rides (time units).
const DEFAULT_REQUEST_WINDOW: u64 = 100;

/// Simulation end time. When set, the runner stops before executing any event
/// whose timestamp is beyond this value; those events stay queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct SimulationEndTime(pub u64);

/// Resources configured when building a world from scenario records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Optional simulation end time. If set, runner stops once the next event is past it.
    pub end_time: Option<u64>,
}

impl SimulationConfig {
    pub fn with_end_time(mut self, end_time: u64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

/// Parameters for generating a random scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub num_riders: usize,
    pub num_drivers: usize,
    pub seed: Option<u64>,
    /// Locations are drawn from `[0, grid_size) x [0, grid_size)`.
    pub grid_size: u32,
    /// Riders request uniformly in `[0, request_window]`.
    pub request_window: u64,
    /// Drivers come online uniformly in `[0, driver_spread]`.
    pub driver_spread: u64,
    pub min_speed: u32,
    pub max_speed: u32,
    pub min_patience: u64,
    pub max_patience: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_riders: 50,
            num_drivers: 10,
            seed: None,
            grid_size: DEFAULT_GRID_SIZE,
            request_window: DEFAULT_REQUEST_WINDOW,
            driver_spread: DEFAULT_REQUEST_WINDOW / 4,
            min_speed: 1,
            max_speed: 3,
            min_patience: 5,
            max_patience: 30,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_counts(mut self, num_riders: usize, num_drivers: usize) -> Self {
        self.num_riders = num_riders;
        self.num_drivers = num_drivers;
        self
    }

    /// Side length of the square grid (locations are in `0..size` on both axes).
    pub fn with_grid_size(mut self, size: u32) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the rider request window (riders request uniformly in [0, window]).
    pub fn with_request_window(mut self, window: u64) -> Self {
        self.request_window = window;
        self
    }

    /// Set the driver spread window (drivers come online uniformly in [0, window]).
    pub fn with_driver_spread(mut self, window: u64) -> Self {
        self.driver_spread = window;
        self
    }

    /// Driver speeds are drawn from `min..=max`; a zero minimum is raised to 1.
    pub fn with_speed_range(mut self, min: u32, max: u32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    pub fn with_patience_range(mut self, min: u64, max: u64) -> Self {
        self.min_patience = min;
        self.max_patience = max;
        self
    }
}
