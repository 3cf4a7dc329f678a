use clap::Args;
use serde_json::Value;

use constellation_valuation_core::analysis::{run_projection, ProjectionRequest};

use crate::input::scenario::{resolve_state, ScenarioArgs};

/// Arguments for the year-by-year projection
#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = resolve_state(&args.scenario)?;
    let request = ProjectionRequest {
        params: state.params,
        schedules: state.schedules,
    };
    let result = run_projection(&request)?;
    Ok(serde_json::to_value(result)?)
}
