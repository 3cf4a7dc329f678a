pub mod defaults;
pub mod params;
pub mod schedule;
pub mod state;

pub use params::{
    CapacityParameters, DemandParameters, FinancialParameters, ModelMode, ScenarioParameters,
    SecondaryChannel,
};
pub use schedule::{Schedule, ScheduledDriver, Schedules, PROJECTION_YEARS, TERMINAL_YEAR};
pub use state::ScenarioState;
