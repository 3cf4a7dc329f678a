use clap::Args;
use serde_json::{json, Value};

use constellation_valuation_core::persistence::export_snapshot;

use crate::input;
use crate::input::scenario::{resolve_state, ScenarioArgs};

/// Arguments for snapshot export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Write the snapshot to this file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

/// Resolve the scenario (snapshot, flags, defaults) and write it back out.
pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = resolve_state(&args.scenario)?;
    let snapshot = export_snapshot(&state)?;

    match args.out {
        Some(path) => {
            let written = input::file::write_text(&path, &snapshot)?;
            tracing::info!(path = %written.display(), "snapshot written");
            Ok(json!({ "written": written.display().to_string() }))
        }
        None => Ok(serde_json::from_str(&snapshot)?),
    }
}
