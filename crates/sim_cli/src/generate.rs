use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sim_core::scenario::{generate_scenario, ScenarioParams, ScenarioRecord};
use tracing::info;

/// Renders records in the scenario file format, one per line.
pub fn render_scenario(params: &ScenarioParams, records: &[ScenarioRecord]) -> String {
    let mut out = format!(
        "# {} riders, {} drivers, {}x{} grid, seed {}\n",
        params.num_riders,
        params.num_drivers,
        params.grid_size,
        params.grid_size,
        params
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string())
    );
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

/// Generates a scenario and writes it to `output`, or stdout when `None`.
pub fn generate_to(params: &ScenarioParams, output: Option<&Path>) -> Result<()> {
    let records = generate_scenario(params);
    let text = render_scenario(params, &records);
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("could not write scenario to {}", path.display()))?;
            info!(path = %path.display(), records = records.len(), "scenario written");
        }
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("could not write scenario to stdout")?,
    }
    Ok(())
}
