use rust_decimal_macros::dec;

use super::reducer::ValuationResult;
use crate::scenario::ModelMode;
use crate::types::Money;

fn mean(a: Money, b: Money) -> Money {
    (a + b) / dec!(2)
}

/// Field-wise mean of two model outputs.
///
/// This averages the outputs; it is not a model run on averaged inputs, and
/// the two generally differ.
pub fn blend_results(capacity: &ValuationResult, demand: &ValuationResult) -> ValuationResult {
    ValuationResult {
        gross_revenue: mean(capacity.gross_revenue, demand.gross_revenue),
        net_revenue: mean(capacity.net_revenue, demand.net_revenue),
        ebitda: mean(capacity.ebitda, demand.ebitda),
        enterprise_value: mean(capacity.enterprise_value, demand.enterprise_value),
        equity_value: mean(capacity.equity_value, demand.equity_value),
        price_per_share: mean(capacity.price_per_share, demand.price_per_share),
    }
}

/// The result that drives the headline for `mode`.
pub fn select_active_result(
    mode: ModelMode,
    capacity: &ValuationResult,
    demand: &ValuationResult,
) -> ValuationResult {
    match mode {
        ModelMode::CapacityOnly => capacity.clone(),
        ModelMode::DemandOnly => demand.clone(),
        ModelMode::Blended => blend_results(capacity, demand),
    }
}
