use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Multiple, Rate};

// ---------------------------------------------------------------------------
// Capacity (throughput-yield) inputs
// ---------------------------------------------------------------------------

/// Infrastructure-driven inputs: how much billable data the constellation
/// can carry and what it sells for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityParameters {
    /// Satellites in service
    pub unit_count: u32,
    /// Gross annual data output per satellite (millions of GB)
    pub gross_output_per_unit: Decimal,
    /// Fraction of gross output that is actually billed
    pub utilization: Rate,
    /// Price per GB of billed output
    pub price_per_unit: Money,
    /// Bits per Hz. Part of the input surface; not used in the arithmetic.
    pub spectral_efficiency: Decimal,
}

// ---------------------------------------------------------------------------
// Demand (user-based) inputs
// ---------------------------------------------------------------------------

/// Fixed-price contract channel (e.g. a public-safety network) billed on
/// top of the partner subscriber base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryChannel {
    pub enabled: bool,
    /// Contracted users (millions); fully attached
    pub population: Decimal,
    pub monthly_revenue_per_user: Money,
    /// Share of secondary revenue retained by the company
    pub revenue_share: Rate,
}

/// Subscriber-driven inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandParameters {
    /// Addressable subscribers across partner networks (millions)
    pub total_population: Decimal,
    /// Fraction of the addressable base that pays for the service
    pub adoption_rate: Rate,
    /// Monthly ARPU in USD
    pub monthly_revenue_per_user: Money,
    /// Share of partner revenue retained by the company
    pub revenue_share: Rate,
    pub secondary: SecondaryChannel,
}

// ---------------------------------------------------------------------------
// Financial inputs shared by both models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialParameters {
    pub ebitda_margin: Rate,
    pub ev_ebitda_multiple: Multiple,
    /// Shares outstanding today (millions)
    pub current_shares: Decimal,
    /// Expected future dilution (0.50 = 50% more shares)
    pub expected_dilution: Rate,
    /// Net debt in millions; negative means net cash
    pub net_debt: Money,
}

impl FinancialParameters {
    /// Current share count grown by the expected dilution.
    pub fn fully_diluted_shares(&self) -> Decimal {
        self.current_shares * (Decimal::ONE + self.expected_dilution)
    }
}

// ---------------------------------------------------------------------------
// Mode and the combined scenario
// ---------------------------------------------------------------------------

/// Which valuation drives the headline result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelMode {
    CapacityOnly,
    DemandOnly,
    #[default]
    Blended,
}

impl std::fmt::Display for ModelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelMode::CapacityOnly => write!(f, "Capacity"),
            ModelMode::DemandOnly => write!(f, "Demand"),
            ModelMode::Blended => write!(f, "Blended"),
        }
    }
}

/// The complete, user-editable input state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub capacity: CapacityParameters,
    pub demand: DemandParameters,
    pub financial: FinancialParameters,
    pub mode: ModelMode,
}
