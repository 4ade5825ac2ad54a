#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use sim_core::ecs::{Driver, Rider};
use sim_core::scenario::{build_scenario, parse_scenario, ScenarioEntities, SimulationConfig};
use sim_core::telemetry::Monitor;

/// A world loaded from scenario text, with handles to its entities by id.
pub struct TestWorld {
    pub world: World,
    pub entities: ScenarioEntities,
}

impl TestWorld {
    pub fn from_text(text: &str) -> Self {
        Self::with_config(text, SimulationConfig::default())
    }

    pub fn with_end_time(text: &str, end_time: u64) -> Self {
        Self::with_config(text, SimulationConfig::default().with_end_time(end_time))
    }

    pub fn with_config(text: &str, config: SimulationConfig) -> Self {
        let records = parse_scenario(text).expect("test scenario should parse");
        let mut world = World::new();
        let entities = build_scenario(&mut world, &records, config);
        Self { world, entities }
    }

    pub fn rider_entity(&self, id: &str) -> Entity {
        self.entities
            .rider(id)
            .unwrap_or_else(|| panic!("no rider `{id}` in scenario"))
    }

    pub fn driver_entity(&self, id: &str) -> Entity {
        self.entities
            .driver(id)
            .unwrap_or_else(|| panic!("no driver `{id}` in scenario"))
    }

    pub fn rider(&self, id: &str) -> &Rider {
        self.world
            .get::<Rider>(self.rider_entity(id))
            .expect("rider component")
    }

    pub fn driver(&self, id: &str) -> &Driver {
        self.world
            .get::<Driver>(self.driver_entity(id))
            .expect("driver component")
    }

    pub fn monitor(&self) -> &Monitor {
        self.world.resource::<Monitor>()
    }
}
