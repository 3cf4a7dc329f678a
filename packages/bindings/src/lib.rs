use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use constellation_valuation_core::scenario::{
    CapacityParameters, DemandParameters, FinancialParameters, ScenarioState,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct CapacityRequest {
    capacity: CapacityParameters,
    financial: FinancialParameters,
}

#[derive(Deserialize)]
struct DemandRequest {
    demand: DemandParameters,
    financial: FinancialParameters,
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_capacity(input_json: String) -> NapiResult<String> {
    let input: CapacityRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = constellation_valuation_core::valuation::evaluate_capacity_model(
        &input.capacity,
        &input.financial,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_demand(input_json: String) -> NapiResult<String> {
    let input: DemandRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = constellation_valuation_core::valuation::evaluate_demand_model(
        &input.demand,
        &input.financial,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Both models and the active result for a `{ params, schedules }` state.
#[napi]
pub fn evaluate_scenario(input_json: String) -> NapiResult<String> {
    let state: ScenarioState = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = state.evaluate().map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[napi]
pub fn valuation_report(input_json: String) -> NapiResult<String> {
    let input: constellation_valuation_core::analysis::ValuationRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        constellation_valuation_core::analysis::run_valuation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_projection(input_json: String) -> NapiResult<String> {
    let input: constellation_valuation_core::analysis::ProjectionRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        constellation_valuation_core::analysis::run_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_grid(input_json: String) -> NapiResult<String> {
    let input: constellation_valuation_core::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = constellation_valuation_core::sensitivity::run_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Snapshot of the stock assumptions, for a fresh session.
#[napi]
pub fn default_snapshot() -> NapiResult<String> {
    constellation_valuation_core::persistence::export_snapshot(&ScenarioState::default())
        .map_err(to_napi_error)
}

/// Parse an exported snapshot and return the `{ params, schedules }` state.
#[napi]
pub fn import_snapshot(snapshot_json: String) -> NapiResult<String> {
    let snapshot = constellation_valuation_core::persistence::import_snapshot(&snapshot_json)
        .map_err(to_napi_error)?;
    serde_json::to_string(&snapshot.into_state()).map_err(to_napi_error)
}

#[napi]
pub fn export_snapshot(state_json: String) -> NapiResult<String> {
    let state: ScenarioState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    constellation_valuation_core::persistence::export_snapshot(&state).map_err(to_napi_error)
}
