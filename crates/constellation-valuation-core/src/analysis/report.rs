use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::comparison::{model_divergence, upside_pct, ModelDivergence};
use super::regime::ValuationRegime;
use crate::projection::{generate_projection, ProjectionSeries};
use crate::scenario::{ScenarioParameters, ScheduledDriver, Schedules, TERMINAL_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Year};
use crate::valuation::{
    capacity_breakdown, demand_breakdown, evaluate_scenario, CapacityBreakdown, DemandBreakdown,
    ScenarioValuation, ValuationResult,
};
use crate::EngineResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a headline valuation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRequest {
    pub params: ScenarioParameters,
    pub schedules: Schedules,
    /// Current market price, for the upside figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_price: Option<Money>,
}

/// Input for a projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub params: ScenarioParameters,
    pub schedules: Schedules,
}

/// Headline valuation with everything the summary view shows around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationReport {
    pub valuation: ScenarioValuation,
    /// Capacity revenue lines at the terminal year
    pub capacity_breakdown: CapacityBreakdown,
    /// Demand revenue lines at the terminal year
    pub demand_breakdown: DemandBreakdown,
    pub fully_diluted_shares: Decimal,
    pub regime: ValuationRegime,
    pub regime_label: String,
    pub divergence: ModelDivergence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upside_pct: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Headline valuation at the terminal year, with breakdowns, price regime,
/// model divergence and market upside.
pub fn run_valuation(
    request: &ValuationRequest,
) -> EngineResult<ComputationOutput<ValuationReport>> {
    let start = Instant::now();
    let mut warnings = input_warnings(&request.params, &request.schedules);

    let valuation = evaluate_scenario(&request.params, &request.schedules)?;
    clamp_warnings(&valuation, &mut warnings);

    let terminal = request.schedules.apply_to(&request.params, TERMINAL_YEAR);
    let price = valuation.active.price_per_share;
    let regime = ValuationRegime::classify(price);

    let upside = match request.market_price {
        Some(market) => {
            let upside = upside_pct(price, market);
            if upside.is_none() {
                warnings.push(format!(
                    "Market price {market} is not positive; upside not computed"
                ));
            }
            upside
        }
        None => None,
    };

    let report = ValuationReport {
        capacity_breakdown: capacity_breakdown(&terminal.capacity)?,
        demand_breakdown: demand_breakdown(&terminal.demand)?,
        fully_diluted_shares: terminal.financial.fully_diluted_shares(),
        regime,
        regime_label: regime.label().to_string(),
        divergence: model_divergence(&valuation.capacity, &valuation.demand),
        upside_pct: upside,
        valuation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("{} Valuation ({TERMINAL_YEAR})", request.params.mode),
        request,
        warnings,
        elapsed,
        report,
    ))
}

/// Year-by-year projection of both models over the horizon.
pub fn run_projection(
    request: &ProjectionRequest,
) -> EngineResult<ComputationOutput<ProjectionSeries>> {
    let start = Instant::now();
    let warnings = input_warnings(&request.params, &request.schedules);

    let series = generate_projection(&request.params, &request.schedules)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Capacity and Demand Projection",
        request,
        warnings,
        elapsed,
        series,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Non-fatal observations about the inputs. The engine computes whatever
/// the arithmetic yields; these only flag it.
pub fn input_warnings(params: &ScenarioParameters, schedules: &Schedules) -> Vec<String> {
    let mut warnings = Vec::new();

    for driver in [
        ScheduledDriver::UnitCount,
        ScheduledDriver::AdoptionRate,
        ScheduledDriver::EvEbitdaMultiple,
    ] {
        let years: Vec<Year> = schedules
            .gaps()
            .into_iter()
            .filter(|(d, _)| *d == driver)
            .map(|(_, y)| y)
            .collect();
        if !years.is_empty() {
            let listed: Vec<String> = years.iter().map(|y| y.to_string()).collect();
            warnings.push(format!(
                "{driver} schedule has no entry for {}; scalar value used",
                listed.join(", ")
            ));
        }
    }

    terminal_sync_warnings(params, schedules, &mut warnings);

    let mut fractions = vec![
        ("capacity.utilization", params.capacity.utilization),
        ("demand.adoption_rate", params.demand.adoption_rate),
        ("demand.revenue_share", params.demand.revenue_share),
        ("financial.ebitda_margin", params.financial.ebitda_margin),
    ];
    if params.demand.secondary.enabled {
        fractions.push((
            "demand.secondary.revenue_share",
            params.demand.secondary.revenue_share,
        ));
    }
    for (field, value) in fractions {
        if value < Decimal::ZERO || value > Decimal::ONE {
            warnings.push(format!("{field} = {value} is outside [0, 1]"));
        }
    }
    for (year, rate) in schedules.adoption_schedule.iter() {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            warnings.push(format!("adoption rate for {year} = {rate} is outside [0, 1]"));
        }
    }

    if params.financial.expected_dilution < Decimal::ZERO {
        warnings.push(format!(
            "Expected dilution {} is negative; fully diluted shares below current count",
            params.financial.expected_dilution
        ));
    }

    warnings
}

fn terminal_sync_warnings(
    params: &ScenarioParameters,
    schedules: &Schedules,
    warnings: &mut Vec<String>,
) {
    if let Some(units) = schedules.unit_count_schedule.terminal() {
        if units != params.capacity.unit_count {
            warnings.push(format!(
                "{TERMINAL_YEAR} unit count {units} differs from scalar {}; schedule entry used",
                params.capacity.unit_count
            ));
        }
    }
    if let Some(rate) = schedules.adoption_schedule.terminal() {
        if rate != params.demand.adoption_rate {
            warnings.push(format!(
                "{TERMINAL_YEAR} adoption rate {rate} differs from scalar {}; schedule entry used",
                params.demand.adoption_rate
            ));
        }
    }
    if let Some(multiple) = schedules.multiple_schedule.terminal() {
        if multiple != params.financial.ev_ebitda_multiple {
            warnings.push(format!(
                "{TERMINAL_YEAR} EV/EBITDA multiple {multiple} differs from scalar {}; schedule entry used",
                params.financial.ev_ebitda_multiple
            ));
        }
    }
}

fn clamp_warnings(valuation: &ScenarioValuation, warnings: &mut Vec<String>) {
    let check = |name: &str, r: &ValuationResult, warnings: &mut Vec<String>| {
        if r.equity_value < Decimal::ZERO {
            warnings.push(format!(
                "{name} model equity value {} is negative; price per share floored at zero",
                r.equity_value
            ));
        }
    };
    check("Capacity", &valuation.capacity, warnings);
    check("Demand", &valuation.demand, warnings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ModelMode;
    use rust_decimal_macros::dec;

    fn default_request() -> ValuationRequest {
        ValuationRequest {
            params: ScenarioParameters::default(),
            schedules: Schedules::default(),
            market_price: None,
        }
    }

    #[test]
    fn test_default_report_has_no_warnings() {
        let out = run_valuation(&default_request()).unwrap();
        assert!(out.warnings.is_empty(), "warnings: {:?}", out.warnings);
        assert_eq!(out.methodology, "Blended Valuation (2030)");
        assert!(out.result.upside_pct.is_none());
    }

    #[test]
    fn test_report_regime_matches_active_price() {
        let out = run_valuation(&default_request()).unwrap();
        let r = &out.result;
        assert_eq!(
            r.regime,
            ValuationRegime::classify(r.valuation.active.price_per_share)
        );
        assert_eq!(r.regime_label, r.regime.label());
        assert_eq!(r.fully_diluted_shares, dec!(409.5));
    }

    #[test]
    fn test_report_upside_against_market() {
        let mut req = default_request();
        req.params.mode = ModelMode::CapacityOnly;
        req.market_price = Some(dec!(50));
        let out = run_valuation(&req).unwrap();
        let price = out.result.valuation.active.price_per_share;
        assert_eq!(
            out.result.upside_pct,
            Some((price - dec!(50)) / dec!(50) * dec!(100))
        );
    }

    #[test]
    fn test_negative_equity_warning() {
        let mut req = default_request();
        req.params.financial.net_debt = dec!(10000000);
        let out = run_valuation(&req).unwrap();
        assert_eq!(out.result.valuation.active.price_per_share, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("floored at zero")));
    }

    #[test]
    fn test_gap_and_range_warnings() {
        let mut req = default_request();
        req.schedules.adoption_schedule.remove(2027);
        req.params.capacity.utilization = dec!(1.2);
        let out = run_valuation(&req).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("adoption rate schedule has no entry for 2027")));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("capacity.utilization")));
    }

    #[test]
    fn test_desync_warning() {
        let mut req = default_request();
        req.params.financial.ev_ebitda_multiple = dec!(20);
        let out = run_valuation(&req).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("EV/EBITDA multiple 25")));
    }

    #[test]
    fn test_run_projection_wraps_series() {
        let req = ProjectionRequest {
            params: ScenarioParameters::default(),
            schedules: Schedules::default(),
        };
        let out = run_projection(&req).unwrap();
        assert_eq!(out.result.len(), 5);
        assert!(out.warnings.is_empty());
    }
}
