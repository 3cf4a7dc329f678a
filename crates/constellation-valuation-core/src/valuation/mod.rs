pub mod blend;
pub mod capacity;
pub mod demand;
pub mod headline;
pub mod reducer;

pub use blend::{blend_results, select_active_result};
pub use capacity::{
    capacity_breakdown, evaluate_capacity_model, CapacityBreakdown, CAPACITY_REVENUE_SHARE,
};
pub use demand::{demand_breakdown, evaluate_demand_model, DemandBreakdown};
pub use headline::{evaluate_scenario, ScenarioValuation};
pub use reducer::{reduce_to_valuation, ValuationResult};
