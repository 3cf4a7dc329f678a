use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::reducer::{checked_add, checked_mul, reduce_to_valuation, ValuationResult};
use crate::scenario::{DemandParameters, FinancialParameters, SecondaryChannel};
use crate::types::Money;
use crate::EngineResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Intermediate figures of the demand model, for the math breakdown view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandBreakdown {
    /// population x adoption rate
    pub active_users: Decimal,
    /// monthly ARPU x 12
    pub annual_revenue_per_user: Money,
    pub primary_gross_revenue: Money,
    pub primary_net_revenue: Money,
    /// Zero unless the secondary channel is enabled
    pub secondary_gross_revenue: Money,
    pub secondary_net_revenue: Money,
    pub gross_revenue: Money,
    pub net_revenue: Money,
}

/// Secondary channel (gross, net). Strictly zero when the channel is off;
/// its fields are not read at all in that case.
fn secondary_revenue(channel: &SecondaryChannel) -> EngineResult<(Money, Money)> {
    if !channel.enabled {
        return Ok((Decimal::ZERO, Decimal::ZERO));
    }
    let monthly = checked_mul(
        channel.population,
        channel.monthly_revenue_per_user,
        "demand.secondary_gross_revenue",
    )?;
    let gross = checked_mul(monthly, MONTHS_PER_YEAR, "demand.secondary_gross_revenue")?;
    let net = checked_mul(gross, channel.revenue_share, "demand.secondary_net_revenue")?;
    Ok((gross, net))
}

/// Demand model revenue lines, before the financial reduction.
pub fn demand_breakdown(params: &DemandParameters) -> EngineResult<DemandBreakdown> {
    let active_users = checked_mul(
        params.total_population,
        params.adoption_rate,
        "demand.active_users",
    )?;
    let annual_revenue_per_user = checked_mul(
        params.monthly_revenue_per_user,
        MONTHS_PER_YEAR,
        "demand.annual_revenue_per_user",
    )?;

    let primary_gross_revenue = checked_mul(
        active_users,
        annual_revenue_per_user,
        "demand.primary_gross_revenue",
    )?;
    let primary_net_revenue = checked_mul(
        primary_gross_revenue,
        params.revenue_share,
        "demand.primary_net_revenue",
    )?;

    let (secondary_gross_revenue, secondary_net_revenue) = secondary_revenue(&params.secondary)?;

    Ok(DemandBreakdown {
        active_users,
        annual_revenue_per_user,
        primary_gross_revenue,
        primary_net_revenue,
        secondary_gross_revenue,
        secondary_net_revenue,
        gross_revenue: checked_add(
            primary_gross_revenue,
            secondary_gross_revenue,
            "demand.gross_revenue",
        )?,
        net_revenue: checked_add(
            primary_net_revenue,
            secondary_net_revenue,
            "demand.net_revenue",
        )?,
    })
}

/// Value the company from subscriber demand:
/// population x adoption x ARPU x 12 x revenue share, plus the optional
/// secondary contract channel.
pub fn evaluate_demand_model(
    params: &DemandParameters,
    financial: &FinancialParameters,
) -> EngineResult<ValuationResult> {
    let lines = demand_breakdown(params)?;
    reduce_to_valuation(lines.gross_revenue, lines.net_revenue, financial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn sample_demand(secondary_enabled: bool) -> DemandParameters {
        DemandParameters {
            total_population: dec!(3000),
            adoption_rate: dec!(0.10),
            monthly_revenue_per_user: dec!(5),
            revenue_share: dec!(0.50),
            secondary: SecondaryChannel {
                enabled: secondary_enabled,
                population: dec!(8),
                monthly_revenue_per_user: dec!(5),
                revenue_share: dec!(1.00),
            },
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
    fn test_breakdown_primary_only() {
        let lines = demand_breakdown(&sample_demand(false)).unwrap();
        assert_eq!(lines.active_users, dec!(300));
        assert_eq!(lines.annual_revenue_per_user, dec!(60));
        assert_eq!(lines.primary_gross_revenue, dec!(18000));
        assert_eq!(lines.primary_net_revenue, dec!(9000));
        assert_eq!(lines.secondary_gross_revenue, Decimal::ZERO);
        assert_eq!(lines.secondary_net_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_demand_model_reference_case() {
        let out = evaluate_demand_model(&sample_demand(false), &sample_financial()).unwrap();
        assert_eq!(out.gross_revenue, dec!(18000));
        assert_eq!(out.net_revenue, dec!(9000));
        assert_eq!(out.ebitda, dec!(7650));
        assert_eq!(out.enterprise_value, dec!(191250));
        assert_eq!(out.equity_value, dec!(189250));
        // 189250 / 409.5
        assert!(
            (out.price_per_share - dec!(462.15)).abs() < dec!(0.01),
            "Expected ~462.15, got {}",
            out.price_per_share
        );
    }

    #[test]
    fn test_secondary_channel_adds_revenue() {
        let lines = demand_breakdown(&sample_demand(true)).unwrap();
        // 8 x 5 x 12 = 480 gross, 100% retained
        assert_eq!(lines.secondary_gross_revenue, dec!(480));
        assert_eq!(lines.secondary_net_revenue, dec!(480));
        assert_eq!(lines.gross_revenue, dec!(18480));
        assert_eq!(lines.net_revenue, dec!(9480));
    }

    #[test]
    fn test_disabled_secondary_ignores_its_fields() {
        let mut params = sample_demand(false);
        let base = evaluate_demand_model(&params, &sample_financial()).unwrap();
        params.secondary.population = dec!(1000);
        params.secondary.revenue_share = dec!(0.9);
        let changed = evaluate_demand_model(&params, &sample_financial()).unwrap();
        assert_eq!(base, changed);
    }

    #[test]
    fn test_population_overflow_is_an_error_not_a_panic() {
        let mut params = sample_demand(false);
        params.total_population = dec!(70000000000000000000000000000);
        params.adoption_rate = Decimal::ONE;
        match demand_breakdown(&params) {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "demand.primary_gross_revenue")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(evaluate_demand_model(&params, &sample_financial()).is_err());
    }

    #[test]
    fn test_zero_adoption_clamps_price() {
        let mut params = sample_demand(false);
        params.adoption_rate = Decimal::ZERO;
        let out = evaluate_demand_model(&params, &sample_financial()).unwrap();
        assert_eq!(out.net_revenue, Decimal::ZERO);
        assert_eq!(out.ebitda, Decimal::ZERO);
        assert_eq!(out.enterprise_value, Decimal::ZERO);
        assert_eq!(out.equity_value, dec!(-2000));
        assert_eq!(out.price_per_share, Decimal::ZERO);
    }
}
