use std::path::Path;

use anyhow::{Context, Result};
use bevy_ecs::prelude::World;
use serde::Serialize;
use sim_core::clock::SimulationClock;
use sim_core::runner::{run_until_empty_with_hook, simulation_schedule};
use sim_core::scenario::{build_scenario, load_scenario, ScenarioRecord, SimulationConfig};
use sim_core::telemetry::{Monitor, SimulationReport};
use tracing::info;

/// Outcome of one `run` invocation.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    pub final_time: u64,
    /// Events left queued past the end time or step budget.
    pub pending: usize,
    pub report: SimulationReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
}

pub struct RunOptions {
    pub end_time: Option<u64>,
    pub max_steps: usize,
    pub trace: bool,
}

pub fn run_file(path: &Path, options: &RunOptions) -> Result<RunSummary> {
    let records = load_scenario(path)
        .with_context(|| format!("could not load scenario {}", path.display()))?;
    Ok(run_records(&records, options))
}

pub fn run_records(records: &[ScenarioRecord], options: &RunOptions) -> RunSummary {
    let mut world = World::new();
    let config = SimulationConfig {
        end_time: options.end_time,
    };
    build_scenario(&mut world, records, config);

    let mut schedule = simulation_schedule::<Monitor>();
    let mut trace = Vec::new();
    let mut seen = 0;
    let steps = run_until_empty_with_hook(&mut world, &mut schedule, options.max_steps, |world, event| {
        if !options.trace {
            return;
        }
        trace.push(event.to_string());
        let notifications = world.resource::<Monitor>().notifications();
        for notification in &notifications[seen..] {
            trace.push(format!("  {notification}"));
        }
        seen = notifications.len();
    });

    let clock = world.resource::<SimulationClock>();
    let summary = RunSummary {
        steps,
        final_time: clock.now(),
        pending: clock.pending(),
        report: world.resource::<Monitor>().report(),
        trace,
    };
    info!(
        steps = summary.steps,
        final_time = summary.final_time,
        pending = summary.pending,
        "simulation finished"
    );
    summary
}

/// Human-readable rendering of a run.
pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    for line in &summary.trace {
        out.push_str(line);
        out.push('\n');
    }
    if !summary.trace.is_empty() {
        out.push('\n');
    }

    let report = &summary.report;
    let counts = &report.counts;
    let mut lines = vec![
        format!("steps:            {}", summary.steps),
        format!("final time:       {}", summary.final_time),
    ];
    if summary.pending > 0 {
        lines.push(format!("pending events:   {}", summary.pending));
    }
    lines.extend([
        format!("riders:           {}", report.riders),
        format!(
            "  requests {} / pickups {} / dropoffs {} / cancellations {}",
            counts.rider_requests, counts.rider_pickups, counts.rider_dropoffs, counts.rider_cancellations
        ),
        format!("drivers:          {}", report.drivers),
        format!(
            "  requests {} / pickups {} / dropoffs {} / cancellations {}",
            counts.driver_requests,
            counts.driver_pickups,
            counts.driver_dropoffs,
            counts.driver_cancellations
        ),
        format!("avg rider wait:   {:.2}", report.rider_wait_time),
        format!("avg driver dist:  {:.2}", report.driver_total_distance),
        format!("avg ride dist:    {:.2}", report.driver_ride_distance),
    ]);
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
