//! Scenario setup: read or generate the initial requests and load them into a world.
//!
//! A scenario is a list of [ScenarioRecord]s, either parsed from the line-based
//! text format or generated from [ScenarioParams]. [build_scenario] turns them into
//! entities plus queued request events.

mod build;
mod generate;
mod params;
mod parse;

pub use build::{build_scenario, ScenarioEntities};
pub use generate::{generate_scenario, random_destination};
pub use params::{ScenarioParams, SimulationConfig, SimulationEndTime};
pub use parse::{load_scenario, parse_scenario, LineError, ScenarioError, ScenarioRecord};
