use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Price bands the implied share price is read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationRegime {
    /// Trading near net asset value
    NavFloor,
    /// Priced for initial 2026 continuous coverage
    Coverage2026,
    /// Priced for the full constellation
    FullConstellation,
    /// Priced for multiple orbital shells
    MultiShell,
}

impl ValuationRegime {
    /// Classify an implied price. Bands overlap at the top end; the higher
    /// band wins.
    pub fn classify(price: Money) -> Self {
        if price >= ValuationRegime::MultiShell.bounds().0 {
            ValuationRegime::MultiShell
        } else if price >= ValuationRegime::FullConstellation.bounds().0 {
            ValuationRegime::FullConstellation
        } else if price >= ValuationRegime::Coverage2026.bounds().0 {
            ValuationRegime::Coverage2026
        } else {
            ValuationRegime::NavFloor
        }
    }

    /// Nominal (min, max) price range of the band.
    pub fn bounds(&self) -> (Decimal, Decimal) {
        match self {
            ValuationRegime::NavFloor => (dec!(40), dec!(50)),
            ValuationRegime::Coverage2026 => (dec!(73), dec!(100)),
            ValuationRegime::FullConstellation => (dec!(100), dec!(257)),
            ValuationRegime::MultiShell => (dec!(250), dec!(1000)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValuationRegime::NavFloor => "NAV Floor",
            ValuationRegime::Coverage2026 => "2026 Coverage",
            ValuationRegime::FullConstellation => "Full Constellation",
            ValuationRegime::MultiShell => "Multi-Shell Upside",
        }
    }
}

impl std::fmt::Display for ValuationRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
