use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::drivers::{OutputMetric, SensitivityDriver};
use crate::error::EngineError;
use crate::scenario::{ScenarioParameters, ScenarioState, Schedules};
use crate::types::{with_metadata, ComputationOutput};
use crate::EngineResult;

/// Upper bound on sweep points per variable.
const MAX_SWEEP_POINTS: usize = 1_000;

/// One swept input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub driver: SensitivityDriver,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Input for a one- or two-way sensitivity analysis of the headline result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub params: ScenarioParameters,
    pub schedules: Schedules,
    pub variable_1: SensitivityVariable,
    /// Omit for a one-way sweep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_2: Option<SensitivityVariable>,
    #[serde(default)]
    pub metric: OutputMetric,
}

/// A single evaluated cell, flattened for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub x_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_value: Option<Decimal>,
    /// `None` (JSON null) where the scenario could not be evaluated
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1: SensitivityDriver,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2: Option<SensitivityDriver>,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub metric: OutputMetric,
    /// matrix[i][j] = metric at variable_1_values[i], variable_2_values[j].
    /// One-way sweeps have a single column. Failed cells are `None`.
    pub matrix: Vec<Vec<Option<Decimal>>>,
    pub points: Vec<SensitivityPoint>,
    /// Metric for the unmodified scenario
    pub base_case_value: Decimal,
    /// Cell nearest to the unmodified scenario (row, col)
    pub base_case_position: (usize, usize),
}

/// Sweep values from min to max by step; max is always included.
pub fn generate_sweep_values(var: &SensitivityVariable) -> EngineResult<Vec<Decimal>> {
    let field = format!("variable:{}", var.driver);
    if var.step <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field,
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(EngineError::InvalidInput {
            field,
            reason: "Min must be <= max".into(),
        });
    }
    if var.driver.is_integral() {
        if !(var.min.fract().is_zero() && var.max.fract().is_zero() && var.step.fract().is_zero())
        {
            return Err(EngineError::InvalidInput {
                field,
                reason: "Unit count sweeps need whole-number min, max and step".into(),
            });
        }
        if var.min < Decimal::ZERO || var.max > Decimal::from(u32::MAX) {
            return Err(EngineError::InvalidInput {
                field,
                reason: format!("Unit count sweeps must stay within 0..={}", u32::MAX),
            });
        }
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        if values.len() > MAX_SWEEP_POINTS {
            return Err(EngineError::InvalidInput {
                field,
                reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points; widen the step"),
            });
        }
        current = match current.checked_add(var.step) {
            Some(next) => next,
            None => break,
        };
    }
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Evaluate the active headline metric over a grid of driver values.
///
/// A cell whose evaluation fails (e.g. dilution swept below -100%) is left
/// empty (`None`) with a warning, and the rest of the grid is still filled.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> EngineResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base = ScenarioState::new(input.params.clone(), input.schedules.clone());
    let base_case_value = input.metric.extract(&base.evaluate()?.active);

    let v1 = &input.variable_1;
    let v1_values = generate_sweep_values(v1)?;
    let v2_values = match &input.variable_2 {
        Some(v2) => {
            if v2.driver == v1.driver {
                return Err(EngineError::InvalidInput {
                    field: "variable_2".into(),
                    reason: "Both sweep variables use the same driver".into(),
                });
            }
            generate_sweep_values(v2)?
        }
        None => Vec::new(),
    };

    let mut matrix = Vec::with_capacity(v1_values.len());
    let mut points = Vec::new();

    for x in &v1_values {
        let mut row_state = base.clone();
        v1.driver.apply(&mut row_state, *x)?;

        let mut row = Vec::new();
        match &input.variable_2 {
            Some(v2) => {
                for y in &v2_values {
                    let mut cell_state = row_state.clone();
                    v2.driver.apply(&mut cell_state, *y)?;
                    let value =
                        evaluate_cell(&cell_state, input.metric, *x, Some(*y), &mut warnings);
                    row.push(value);
                    points.push(SensitivityPoint {
                        x_value: *x,
                        y_value: Some(*y),
                        value,
                    });
                }
            }
            None => {
                let value = evaluate_cell(&row_state, input.metric, *x, None, &mut warnings);
                row.push(value);
                points.push(SensitivityPoint {
                    x_value: *x,
                    y_value: None,
                    value,
                });
            }
        }
        matrix.push(row);
    }

    let base_row = closest_index(&v1_values, v1.driver.current(&base));
    let base_col = match &input.variable_2 {
        Some(v2) => closest_index(&v2_values, v2.driver.current(&base)),
        None => 0,
    };

    let output = SensitivityOutput {
        variable_1: v1.driver,
        variable_2: input.variable_2.as_ref().map(|v| v.driver),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        metric: input.metric,
        matrix,
        points,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let methodology = if input.variable_2.is_some() {
        "2-Way Sensitivity Analysis"
    } else {
        "1-Way Sensitivity Analysis"
    };
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "variable_1": input.variable_1,
            "variable_2": input.variable_2,
            "metric": input.metric,
            "mode": input.params.mode,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn evaluate_cell(
    state: &ScenarioState,
    metric: OutputMetric,
    x: Decimal,
    y: Option<Decimal>,
    warnings: &mut Vec<String>,
) -> Option<Decimal> {
    match state.evaluate() {
        Ok(v) => Some(metric.extract(&v.active)),
        Err(e) => {
            match y {
                Some(y) => warnings.push(format!("Evaluation failed at ({x}, {y}): {e}")),
                None => warnings.push(format!("Evaluation failed at {x}: {e}")),
            }
            None
        }
    }
}
