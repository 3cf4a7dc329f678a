use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use constellation_valuation_core::analysis::{input_warnings, run_valuation, ValuationRequest};
use constellation_valuation_core::scenario::{ScenarioState, TERMINAL_YEAR};
use constellation_valuation_core::valuation::{
    capacity_breakdown, demand_breakdown, evaluate_capacity_model, evaluate_demand_model,
    ValuationResult,
};
use constellation_valuation_core::with_metadata;

use crate::input::scenario::{resolve_state, ScenarioArgs};

/// Arguments for the headline valuation
#[derive(Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Current share price, for the upside figure
    #[arg(long)]
    pub market_price: Option<Decimal>,
}

/// Arguments for a single-model run
#[derive(Args)]
pub struct ModelArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

/// One model's revenue lines and the valuation they reduce to.
#[derive(Serialize)]
struct ModelOutput<B: Serialize> {
    breakdown: B,
    valuation: ValuationResult,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = resolve_state(&args.scenario)?;
    let request = ValuationRequest {
        params: state.params,
        schedules: state.schedules,
        market_price: args.market_price,
    };
    let result = run_valuation(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_capacity(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let state = resolve_state(&args.scenario)?;
    let terminal = state.schedules.apply_to(&state.params, TERMINAL_YEAR);

    let output = ModelOutput {
        breakdown: capacity_breakdown(&terminal.capacity)?,
        valuation: evaluate_capacity_model(&terminal.capacity, &terminal.financial)?,
    };
    let warnings = single_model_warnings(&state, &output.valuation);

    let result = with_metadata(
        &format!("Capacity Model ({TERMINAL_YEAR})"),
        &serde_json::json!({
            "capacity": terminal.capacity,
            "financial": terminal.financial,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_demand(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let state = resolve_state(&args.scenario)?;
    let terminal = state.schedules.apply_to(&state.params, TERMINAL_YEAR);

    let output = ModelOutput {
        breakdown: demand_breakdown(&terminal.demand)?,
        valuation: evaluate_demand_model(&terminal.demand, &terminal.financial)?,
    };
    let warnings = single_model_warnings(&state, &output.valuation);

    let result = with_metadata(
        &format!("Demand Model ({TERMINAL_YEAR})"),
        &serde_json::json!({
            "demand": terminal.demand,
            "financial": terminal.financial,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    );
    Ok(serde_json::to_value(result)?)
}

fn single_model_warnings(state: &ScenarioState, valuation: &ValuationResult) -> Vec<String> {
    let mut warnings = input_warnings(&state.params, &state.schedules);
    if valuation.equity_value < Decimal::ZERO {
        warnings.push("Equity value is negative; price per share floored at zero".into());
    }
    warnings
}
