mod support;

use std::io::Write;

use bevy_ecs::prelude::World;
use sim_core::ecs::RiderStatus;
use sim_core::scenario::{
    build_scenario, generate_scenario, load_scenario, LineError, ScenarioError, ScenarioParams,
    SimulationConfig,
};
use sim_core::telemetry::Monitor;
use support::schedule::ScheduleRunner;
use tempfile::NamedTempFile;

fn scenario_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write scenario");
    file
}

#[test]
fn loads_and_runs_a_scenario_file() {
    let file = scenario_file(
        "# two drivers, one rider\n\
         0 DriverRequest D1 0,0 1\n\
         0 DriverRequest D2 6,6 2\n\
         3 RiderRequest R1 5,5 0,0 8\n",
    );

    let records = load_scenario(file.path()).expect("load scenario");
    assert_eq!(records.len(), 3);

    let mut world = World::new();
    let entities = build_scenario(&mut world, &records, SimulationConfig::default());
    ScheduleRunner::new().run_full(&mut world);

    let rider = entities.rider("R1").expect("R1");
    assert_eq!(
        world.get::<sim_core::ecs::Rider>(rider).expect("rider").status(),
        RiderStatus::Satisfied
    );
    let pickups: Vec<&str> = world
        .resource::<Monitor>()
        .notifications()
        .iter()
        .filter(|n| n.action == sim_core::observer::ActionKind::Pickup)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(pickups, vec!["R1", "D2"]);
}

#[test]
fn malformed_file_reports_line_number() {
    let file = scenario_file("0 DriverRequest D1 0,0 1\n\n2 RiderRequest R1 0,0 1,1\n");

    let err = load_scenario(file.path()).expect_err("short rider line");

    assert_eq!(err.line(), Some(3));
    match err {
        ScenarioError::Line { source, .. } => assert_eq!(
            source,
            LineError::FieldCount {
                kind: "RiderRequest",
                expected: 6,
                found: 5,
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nope.txt");

    let err = load_scenario(&path).expect_err("missing file");

    assert!(matches!(err, ScenarioError::Io { .. }));
    assert_eq!(err.line(), None);
    assert!(err.to_string().contains("nope.txt"));
}

#[test]
fn generated_scenario_written_to_disk_loads_back() {
    let records = generate_scenario(&ScenarioParams::default().with_seed(11).with_counts(20, 5));
    let text: String = records.iter().map(|r| format!("{r}\n")).collect();
    let file = scenario_file(&text);

    assert_eq!(load_scenario(file.path()).expect("reload"), records);
}

fn run_seeded(seed: u64) -> Vec<sim_core::observer::Notification> {
    let params = ScenarioParams::default()
        .with_seed(seed)
        .with_counts(60, 12)
        .with_grid_size(15);
    let records = generate_scenario(&params);
    let mut world = World::new();
    build_scenario(&mut world, &records, SimulationConfig::default());
    ScheduleRunner::new().run_full(&mut world);
    world.resource::<Monitor>().notifications().to_vec()
}

#[test]
fn runs_are_deterministic_for_a_seed() {
    let first = run_seeded(99);
    assert!(!first.is_empty());
    assert_eq!(first, run_seeded(99));
}

#[test]
fn rider_status_never_leaves_a_terminal_state() {
    let params = ScenarioParams::default().with_seed(3).with_counts(40, 6);
    let records = generate_scenario(&params);
    let mut world = World::new();
    build_scenario(&mut world, &records, SimulationConfig::default());

    let mut runner = ScheduleRunner::new();
    let mut previous: Vec<(bevy_ecs::prelude::Entity, RiderStatus)> = Vec::new();
    while runner.run_one(&mut world) {
        let mut query = world.query::<(bevy_ecs::prelude::Entity, &sim_core::ecs::Rider)>();
        let current: Vec<_> = query
            .iter(&world)
            .map(|(entity, rider)| (entity, rider.status()))
            .collect();
        for (entity, before) in &previous {
            if before.is_terminal() {
                let after = current
                    .iter()
                    .find(|(e, _)| e == entity)
                    .map(|(_, status)| *status);
                assert_eq!(after, Some(*before));
            }
        }
        previous = current;
    }
}
