use clap::Args;
use serde_json::Value;

use constellation_valuation_core::sensitivity::{
    self, OutputMetric, SensitivityDriver, SensitivityInput, SensitivityVariable,
};

use crate::input::scenario::{resolve_state, ScenarioArgs};

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// First sensitivity variable in format name:min:max:step
    /// (e.g. "adoption_rate:0.02:0.10:0.02")
    #[arg(long)]
    pub var1: String,

    /// Second sensitivity variable (optional, creates a 2D grid)
    #[arg(long)]
    pub var2: Option<String>,

    /// Headline figure to report: price_per_share, enterprise_value,
    /// equity_value, net_revenue, ebitda
    #[arg(long, default_value = "price_per_share")]
    pub metric: String,
}

fn parse_sens_var(spec: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    Ok(SensitivityVariable {
        driver: parts[0].parse::<SensitivityDriver>()?,
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let variable_1 = parse_sens_var(&args.var1)?;
    let variable_2 = args.var2.as_deref().map(parse_sens_var).transpose()?;
    let metric: OutputMetric = args.metric.parse()?;

    let state = resolve_state(&args.scenario)?;
    let input = SensitivityInput {
        params: state.params,
        schedules: state.schedules,
        variable_1,
        variable_2,
        metric,
    };
    let result = sensitivity::run_sensitivity(&input)?;
    Ok(serde_json::to_value(result)?)
}
