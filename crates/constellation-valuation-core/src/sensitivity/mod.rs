pub mod drivers;
pub mod grid;

pub use drivers::{OutputMetric, SensitivityDriver};
pub use grid::{
    generate_sweep_values, run_sensitivity, SensitivityInput, SensitivityOutput,
    SensitivityPoint, SensitivityVariable,
};
