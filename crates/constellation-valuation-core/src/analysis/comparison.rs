use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};
use crate::valuation::ValuationResult;

/// How far apart the two models land on price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDivergence {
    pub average_price: Money,
    pub absolute_difference: Money,
    /// Difference as a percentage of the average; absent when both are zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_difference: Option<Rate>,
}

/// Upside of the implied price over the market price, in percent.
///
/// `None` when there is no usable market price.
pub fn upside_pct(implied_price: Money, market_price: Money) -> Option<Rate> {
    if market_price <= Decimal::ZERO {
        return None;
    }
    Some((implied_price - market_price) / market_price * dec!(100))
}

pub fn model_divergence(capacity: &ValuationResult, demand: &ValuationResult) -> ModelDivergence {
    let average_price = (capacity.price_per_share + demand.price_per_share) / dec!(2);
    let absolute_difference = (capacity.price_per_share - demand.price_per_share).abs();
    let percent_difference = if average_price.is_zero() {
        None
    } else {
        Some(absolute_difference / average_price * dec!(100))
    };

    ModelDivergence {
        average_price,
        absolute_difference,
        percent_difference,
    }
}
