pub mod comparison;
pub mod regime;
pub mod report;

pub use comparison::{model_divergence, upside_pct, ModelDivergence};
pub use regime::ValuationRegime;
pub use report::{
    input_warnings, run_projection, run_valuation, ProjectionRequest, ValuationReport,
    ValuationRequest,
};
