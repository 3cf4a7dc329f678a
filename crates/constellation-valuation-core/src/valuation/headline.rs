use serde::{Deserialize, Serialize};

use super::blend::select_active_result;
use super::capacity::evaluate_capacity_model;
use super::demand::evaluate_demand_model;
use super::reducer::ValuationResult;
use crate::scenario::{ModelMode, ScenarioParameters, Schedules, TERMINAL_YEAR};
use crate::EngineResult;

/// Both models plus the active result, as shown on the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioValuation {
    pub mode: ModelMode,
    pub capacity: ValuationResult,
    pub demand: ValuationResult,
    pub active: ValuationResult,
}

/// Evaluate the scenario at the terminal projection year: scheduled drivers
/// take their terminal-year override where one exists.
pub fn evaluate_scenario(
    params: &ScenarioParameters,
    schedules: &Schedules,
) -> EngineResult<ScenarioValuation> {
    let terminal = schedules.apply_to(params, TERMINAL_YEAR);

    let capacity = evaluate_capacity_model(&terminal.capacity, &terminal.financial)?;
    let demand = evaluate_demand_model(&terminal.demand, &terminal.financial)?;
    let active = select_active_result(params.mode, &capacity, &demand);

    Ok(ScenarioValuation {
        mode: params.mode,
        capacity,
        demand,
        active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioState;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_terminal_override_wins_over_scalar() {
        let params = ScenarioParameters::default();
        let mut schedules = Schedules::default();
        schedules.multiple_schedule.set(TERMINAL_YEAR, dec!(10));

        let out = evaluate_scenario(&params, &schedules).unwrap();
        assert_eq!(
            out.capacity.enterprise_value,
            out.capacity.ebitda * dec!(10)
        );
    }

    #[test]
    fn test_missing_terminal_entry_uses_scalar() {
        let params = ScenarioParameters::default();
        let mut schedules = Schedules::default();
        schedules.multiple_schedule.remove(TERMINAL_YEAR);

        let out = evaluate_scenario(&params, &schedules).unwrap();
        assert_eq!(
            out.demand.enterprise_value,
            out.demand.ebitda * params.financial.ev_ebitda_multiple
        );
    }

    #[test]
    fn test_mode_selects_active() {
        let mut state = ScenarioState::default();
        state.set_mode(ModelMode::DemandOnly);
        let out = state.evaluate().unwrap();
        assert_eq!(out.active, out.demand);
        assert_eq!(out.mode, ModelMode::DemandOnly);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let state = ScenarioState::default();
        assert_eq!(state.evaluate().unwrap(), state.evaluate().unwrap());
    }
}
