use serde::{Deserialize, Serialize};

use super::params::{ModelMode, ScenarioParameters};
use super::schedule::{Schedules, TERMINAL_YEAR};
use crate::types::{Multiple, Rate, Year};
use crate::valuation::{evaluate_scenario, ScenarioValuation};
use crate::EngineResult;

#[cfg(feature = "projection")]
use crate::projection::{generate_projection, ProjectionSeries};

/// Editable scenario owned by the caller (UI session, CLI run, test).
///
/// Each scheduled driver exists twice: as a scalar parameter and as the
/// terminal-year entry of its schedule. The setters here write both in one
/// step so the two can never disagree. Engine functions only borrow this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioState {
    pub params: ScenarioParameters,
    pub schedules: Schedules,
}

impl ScenarioState {
    pub fn new(params: ScenarioParameters, schedules: Schedules) -> Self {
        Self { params, schedules }
    }

    pub fn set_unit_count(&mut self, unit_count: u32) {
        self.params.capacity.unit_count = unit_count;
        self.schedules
            .unit_count_schedule
            .set(TERMINAL_YEAR, unit_count);
    }

    pub fn set_adoption_rate(&mut self, rate: Rate) {
        self.params.demand.adoption_rate = rate;
        self.schedules.adoption_schedule.set(TERMINAL_YEAR, rate);
    }

    pub fn set_ev_ebitda_multiple(&mut self, multiple: Multiple) {
        self.params.financial.ev_ebitda_multiple = multiple;
        self.schedules.multiple_schedule.set(TERMINAL_YEAR, multiple);
    }

    pub fn set_unit_count_for_year(&mut self, year: Year, unit_count: u32) {
        self.schedules.unit_count_schedule.set(year, unit_count);
        if year == TERMINAL_YEAR {
            self.params.capacity.unit_count = unit_count;
        }
    }

    pub fn set_adoption_rate_for_year(&mut self, year: Year, rate: Rate) {
        self.schedules.adoption_schedule.set(year, rate);
        if year == TERMINAL_YEAR {
            self.params.demand.adoption_rate = rate;
        }
    }

    pub fn set_multiple_for_year(&mut self, year: Year, multiple: Multiple) {
        self.schedules.multiple_schedule.set(year, multiple);
        if year == TERMINAL_YEAR {
            self.params.financial.ev_ebitda_multiple = multiple;
        }
    }

    pub fn set_mode(&mut self, mode: ModelMode) {
        self.params.mode = mode;
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Headline (terminal-year) valuation of the current state.
    pub fn evaluate(&self) -> EngineResult<ScenarioValuation> {
        evaluate_scenario(&self.params, &self.schedules)
    }

    #[cfg(feature = "projection")]
    pub fn project(&self) -> EngineResult<ProjectionSeries> {
        generate_projection(&self.params, &self.schedules)
    }
}
