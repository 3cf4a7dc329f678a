//! Stock assumptions: the 2030 full-constellation target and the build-out
//! schedules leading up to it. Monetary values are in millions.

use rust_decimal_macros::dec;

use super::params::{
    CapacityParameters, DemandParameters, FinancialParameters, ModelMode, ScenarioParameters,
    SecondaryChannel,
};
use super::schedule::{Schedule, Schedules};

impl Default for CapacityParameters {
    fn default() -> Self {
        Self {
            unit_count: 200,
            gross_output_per_unit: dec!(150),
            utilization: dec!(0.15),
            price_per_unit: dec!(5),
            spectral_efficiency: dec!(3.0),
        }
    }
}

impl Default for SecondaryChannel {
    fn default() -> Self {
        Self {
            enabled: true,
            population: dec!(8),
            monthly_revenue_per_user: dec!(5),
            revenue_share: dec!(1.00),
        }
    }
}

impl Default for DemandParameters {
    fn default() -> Self {
        Self {
            total_population: dec!(3000),
            adoption_rate: dec!(0.10),
            monthly_revenue_per_user: dec!(5),
            revenue_share: dec!(0.50),
            secondary: SecondaryChannel::default(),
        }
    }
}

impl Default for FinancialParameters {
    fn default() -> Self {
        Self {
            ebitda_margin: dec!(0.85),
            ev_ebitda_multiple: dec!(25),
            current_shares: dec!(273),
            expected_dilution: dec!(0.50),
            net_debt: dec!(2000),
        }
    }
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            capacity: CapacityParameters::default(),
            demand: DemandParameters::default(),
            financial: FinancialParameters::default(),
            mode: ModelMode::Blended,
        }
    }
}

impl Default for Schedules {
    fn default() -> Self {
        Self {
            unit_count_schedule: Schedule::from_entries([
                (2026, 45),
                (2027, 90),
                (2028, 135),
                (2029, 170),
                (2030, 200),
            ]),
            adoption_schedule: Schedule::from_entries([
                (2026, dec!(0.02)),
                (2027, dec!(0.04)),
                (2028, dec!(0.06)),
                (2029, dec!(0.08)),
                (2030, dec!(0.10)),
            ]),
            multiple_schedule: Schedule::from_entries([
                (2026, dec!(40)),
                (2027, dec!(35)),
                (2028, dec!(30)),
                (2029, dec!(27.5)),
                (2030, dec!(25)),
            ]),
        }
    }
}
