use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::reducer::{checked_mul, reduce_to_valuation, ValuationResult};
use crate::scenario::{CapacityParameters, FinancialParameters};
use crate::types::{Money, Rate};
use crate::EngineResult;

/// Share of capacity revenue retained after the partner-network split.
///
/// Fixed here, unlike the demand model where it is an input.
pub const CAPACITY_REVENUE_SHARE: Rate = dec!(0.5);

/// Intermediate figures of the capacity model, for the math breakdown view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityBreakdown {
    /// gross output x utilization
    pub billable_per_unit: Decimal,
    /// unit count x billable per unit
    pub total_billable: Decimal,
    pub revenue_share: Rate,
    pub gross_revenue: Money,
    pub net_revenue: Money,
}

/// Capacity model revenue lines, before the financial reduction.
pub fn capacity_breakdown(params: &CapacityParameters) -> EngineResult<CapacityBreakdown> {
    let billable_per_unit = checked_mul(
        params.gross_output_per_unit,
        params.utilization,
        "capacity.billable_per_unit",
    )?;
    let total_billable = checked_mul(
        Decimal::from(params.unit_count),
        billable_per_unit,
        "capacity.total_billable",
    )?;
    let gross_revenue = checked_mul(
        total_billable,
        params.price_per_unit,
        "capacity.gross_revenue",
    )?;
    let net_revenue = checked_mul(gross_revenue, CAPACITY_REVENUE_SHARE, "capacity.net_revenue")?;

    Ok(CapacityBreakdown {
        billable_per_unit,
        total_billable,
        revenue_share: CAPACITY_REVENUE_SHARE,
        gross_revenue,
        net_revenue,
    })
}

/// Value the company from constellation throughput:
/// units x (output x utilization) x price, with a fixed 50% revenue share.
pub fn evaluate_capacity_model(
    params: &CapacityParameters,
    financial: &FinancialParameters,
) -> EngineResult<ValuationResult> {
    let lines = capacity_breakdown(params)?;
    reduce_to_valuation(lines.gross_revenue, lines.net_revenue, financial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn sample_capacity() -> CapacityParameters {
        CapacityParameters {
            unit_count: 200,
            gross_output_per_unit: dec!(150),
            utilization: dec!(0.15),
            price_per_unit: dec!(5),
            spectral_efficiency: dec!(3.0),
        }
    }

    fn sample_financial() -> FinancialParameters {
        FinancialParameters {
            ebitda_margin: dec!(0.85),
            ev_ebitda_multiple: dec!(25),
            current_shares: dec!(273),
            expected_dilution: dec!(0.50),
            net_debt: dec!(2000),
        }
    }

    #[test]
    fn test_breakdown_reference_case() {
        let lines = capacity_breakdown(&sample_capacity()).unwrap();
        assert_eq!(lines.billable_per_unit, dec!(22.5));
        assert_eq!(lines.total_billable, dec!(4500));
        assert_eq!(lines.gross_revenue, dec!(22500));
        assert_eq!(lines.net_revenue, dec!(11250));
        assert_eq!(lines.revenue_share, dec!(0.5));
    }

    #[test]
    fn test_capacity_model_reference_case() {
        let out = evaluate_capacity_model(&sample_capacity(), &sample_financial()).unwrap();
        assert_eq!(out.gross_revenue, dec!(22500));
        assert_eq!(out.net_revenue, dec!(11250));
        assert_eq!(out.ebitda, dec!(9562.5));
        assert_eq!(out.enterprise_value, dec!(239062.5));
        assert_eq!(out.equity_value, dec!(237062.5));
        assert!(
            (out.price_per_share - dec!(578.91)).abs() < dec!(0.01),
            "Expected ~578.91, got {}",
            out.price_per_share
        );
    }

    #[test]
    fn test_spectral_efficiency_does_not_move_price() {
        let mut params = sample_capacity();
        let base = evaluate_capacity_model(&params, &sample_financial()).unwrap();
        params.spectral_efficiency = dec!(4.0);
        let changed = evaluate_capacity_model(&params, &sample_financial()).unwrap();
        assert_eq!(base, changed);
    }

    #[test]
    fn test_zero_units_yields_zero_price() {
        let mut params = sample_capacity();
        params.unit_count = 0;
        let out = evaluate_capacity_model(&params, &sample_financial()).unwrap();
        assert_eq!(out.net_revenue, Decimal::ZERO);
        assert_eq!(out.equity_value, dec!(-2000));
        assert_eq!(out.price_per_share, Decimal::ZERO);
    }

    #[test]
    fn test_utilization_above_one_is_not_rejected() {
        let mut params = sample_capacity();
        params.utilization = dec!(1.5);
        let out = evaluate_capacity_model(&params, &sample_financial()).unwrap();
        assert_eq!(out.gross_revenue, dec!(225000));
    }

    #[test]
    fn test_overflowing_price_is_invalid_input() {
        let mut params = sample_capacity();
        params.price_per_unit = dec!(70000000000000000000000000000);
        match evaluate_capacity_model(&params, &sample_financial()) {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "capacity.gross_revenue")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_shares_propagates_domain_error() {
        let mut fin = sample_financial();
        fin.current_shares = Decimal::ZERO;
        let err = evaluate_capacity_model(&sample_capacity(), &fin).unwrap_err();
        assert!(matches!(err, EngineError::Domain { .. }));
    }
}
