use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EngineError;
use crate::scenario::ScenarioState;
use crate::valuation::ValuationResult;
use crate::EngineResult;

/// A scalar scenario input that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityDriver {
    UnitCount,
    GrossOutputPerUnit,
    Utilization,
    PricePerUnit,
    TotalPopulation,
    AdoptionRate,
    MonthlyRevenuePerUser,
    RevenueShare,
    EbitdaMargin,
    EvEbitdaMultiple,
    ExpectedDilution,
    NetDebt,
}

impl SensitivityDriver {
    pub const ALL: [SensitivityDriver; 12] = [
        SensitivityDriver::UnitCount,
        SensitivityDriver::GrossOutputPerUnit,
        SensitivityDriver::Utilization,
        SensitivityDriver::PricePerUnit,
        SensitivityDriver::TotalPopulation,
        SensitivityDriver::AdoptionRate,
        SensitivityDriver::MonthlyRevenuePerUser,
        SensitivityDriver::RevenueShare,
        SensitivityDriver::EbitdaMargin,
        SensitivityDriver::EvEbitdaMultiple,
        SensitivityDriver::ExpectedDilution,
        SensitivityDriver::NetDebt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SensitivityDriver::UnitCount => "unit_count",
            SensitivityDriver::GrossOutputPerUnit => "gross_output_per_unit",
            SensitivityDriver::Utilization => "utilization",
            SensitivityDriver::PricePerUnit => "price_per_unit",
            SensitivityDriver::TotalPopulation => "total_population",
            SensitivityDriver::AdoptionRate => "adoption_rate",
            SensitivityDriver::MonthlyRevenuePerUser => "monthly_revenue_per_user",
            SensitivityDriver::RevenueShare => "revenue_share",
            SensitivityDriver::EbitdaMargin => "ebitda_margin",
            SensitivityDriver::EvEbitdaMultiple => "ev_ebitda_multiple",
            SensitivityDriver::ExpectedDilution => "expected_dilution",
            SensitivityDriver::NetDebt => "net_debt",
        }
    }

    /// Current value of this driver in `state`.
    pub fn current(&self, state: &ScenarioState) -> Decimal {
        let p = &state.params;
        match self {
            SensitivityDriver::UnitCount => Decimal::from(p.capacity.unit_count),
            SensitivityDriver::GrossOutputPerUnit => p.capacity.gross_output_per_unit,
            SensitivityDriver::Utilization => p.capacity.utilization,
            SensitivityDriver::PricePerUnit => p.capacity.price_per_unit,
            SensitivityDriver::TotalPopulation => p.demand.total_population,
            SensitivityDriver::AdoptionRate => p.demand.adoption_rate,
            SensitivityDriver::MonthlyRevenuePerUser => p.demand.monthly_revenue_per_user,
            SensitivityDriver::RevenueShare => p.demand.revenue_share,
            SensitivityDriver::EbitdaMargin => p.financial.ebitda_margin,
            SensitivityDriver::EvEbitdaMultiple => p.financial.ev_ebitda_multiple,
            SensitivityDriver::ExpectedDilution => p.financial.expected_dilution,
            SensitivityDriver::NetDebt => p.financial.net_debt,
        }
    }

    /// Write `value` into `state`. Scheduled drivers go through the
    /// two-way sync setters so the terminal-year entry follows.
    pub fn apply(&self, state: &mut ScenarioState, value: Decimal) -> EngineResult<()> {
        match self {
            SensitivityDriver::UnitCount => state.set_unit_count(whole_units(value)?),
            SensitivityDriver::AdoptionRate => state.set_adoption_rate(value),
            SensitivityDriver::EvEbitdaMultiple => state.set_ev_ebitda_multiple(value),
            SensitivityDriver::GrossOutputPerUnit => {
                state.params.capacity.gross_output_per_unit = value
            }
            SensitivityDriver::Utilization => state.params.capacity.utilization = value,
            SensitivityDriver::PricePerUnit => state.params.capacity.price_per_unit = value,
            SensitivityDriver::TotalPopulation => state.params.demand.total_population = value,
            SensitivityDriver::MonthlyRevenuePerUser => {
                state.params.demand.monthly_revenue_per_user = value
            }
            SensitivityDriver::RevenueShare => state.params.demand.revenue_share = value,
            SensitivityDriver::EbitdaMargin => state.params.financial.ebitda_margin = value,
            SensitivityDriver::ExpectedDilution => {
                state.params.financial.expected_dilution = value
            }
            SensitivityDriver::NetDebt => state.params.financial.net_debt = value,
        }
        Ok(())
    }

    /// Whether sweep values must be whole numbers.
    pub fn is_integral(&self) -> bool {
        matches!(self, SensitivityDriver::UnitCount)
    }
}

impl std::fmt::Display for SensitivityDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SensitivityDriver {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensitivityDriver::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| EngineError::InvalidInput {
                field: "driver".into(),
                reason: format!("unknown sensitivity driver '{s}'"),
            })
    }
}

fn whole_units(value: Decimal) -> EngineResult<u32> {
    if !value.fract().is_zero() {
        return Err(EngineError::InvalidInput {
            field: "unit_count".into(),
            reason: format!("unit count must be a whole number, got {value}"),
        });
    }
    value.to_u32().ok_or_else(|| EngineError::InvalidInput {
        field: "unit_count".into(),
        reason: format!("unit count {value} out of range"),
    })
}

/// Which figure of the headline result a sensitivity grid reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMetric {
    #[default]
    PricePerShare,
    EnterpriseValue,
    EquityValue,
    NetRevenue,
    Ebitda,
}

impl OutputMetric {
    pub fn extract(&self, result: &ValuationResult) -> Decimal {
        match self {
            OutputMetric::PricePerShare => result.price_per_share,
            OutputMetric::EnterpriseValue => result.enterprise_value,
            OutputMetric::EquityValue => result.equity_value,
            OutputMetric::NetRevenue => result.net_revenue,
            OutputMetric::Ebitda => result.ebitda,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputMetric::PricePerShare => "price_per_share",
            OutputMetric::EnterpriseValue => "enterprise_value",
            OutputMetric::EquityValue => "equity_value",
            OutputMetric::NetRevenue => "net_revenue",
            OutputMetric::Ebitda => "ebitda",
        }
    }
}

impl FromStr for OutputMetric {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            OutputMetric::PricePerShare,
            OutputMetric::EnterpriseValue,
            OutputMetric::EquityValue,
            OutputMetric::NetRevenue,
            OutputMetric::Ebitda,
        ]
        .into_iter()
        .find(|m| m.name() == s)
        .ok_or_else(|| EngineError::InvalidInput {
            field: "metric".into(),
            reason: format!("unknown output metric '{s}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::TERMINAL_YEAR;
    use rust_decimal_macros::dec;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for driver in SensitivityDriver::ALL {
            assert_eq!(driver.name().parse::<SensitivityDriver>().unwrap(), driver);
        }
        assert!("satellites".parse::<SensitivityDriver>().is_err());
    }

    #[test]
    fn test_scheduled_driver_syncs_terminal_entry() {
        let mut state = ScenarioState::default();
        SensitivityDriver::AdoptionRate
            .apply(&mut state, dec!(0.15))
            .unwrap();
        assert_eq!(
            state.schedules.adoption_schedule.get(TERMINAL_YEAR),
            Some(dec!(0.15))
        );
        assert_eq!(SensitivityDriver::AdoptionRate.current(&state), dec!(0.15));
    }

    #[test]
    fn test_unit_count_must_be_whole() {
        let mut state = ScenarioState::default();
        assert!(SensitivityDriver::UnitCount
            .apply(&mut state, dec!(10.5))
            .is_err());
        assert!(SensitivityDriver::UnitCount
            .apply(&mut state, dec!(-1))
            .is_err());
        SensitivityDriver::UnitCount
            .apply(&mut state, dec!(120))
            .unwrap();
        assert_eq!(state.params.capacity.unit_count, 120);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(
            "enterprise_value".parse::<OutputMetric>().unwrap(),
            OutputMetric::EnterpriseValue
        );
        assert!("ev".parse::<OutputMetric>().is_err());
    }
}
