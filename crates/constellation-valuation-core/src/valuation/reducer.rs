use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scenario::FinancialParameters;
use crate::types::Money;
use crate::EngineResult;

/// Output of one model evaluation. All values in millions except the
/// per-share price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub gross_revenue: Money,
    /// Revenue retained after partner revenue share
    pub net_revenue: Money,
    pub ebitda: Money,
    pub enterprise_value: Money,
    /// May be negative when net debt exceeds enterprise value
    pub equity_value: Money,
    /// Implied price on a fully diluted basis; never negative
    pub price_per_share: Money,
}

/// Shared tail of both models: net revenue through margin, multiple and the
/// equity bridge down to a per-share price.
///
/// Fails with [`EngineError::Domain`] if the fully diluted share count is not
/// positive, and with [`EngineError::InvalidInput`] naming the line that
/// overflows the decimal range.
pub fn reduce_to_valuation(
    gross_revenue: Money,
    net_revenue: Money,
    financial: &FinancialParameters,
) -> EngineResult<ValuationResult> {
    let ebitda = checked_mul(net_revenue, financial.ebitda_margin, "ebitda")?;
    let enterprise_value =
        checked_mul(ebitda, financial.ev_ebitda_multiple, "enterprise_value")?;
    let equity_value = enterprise_value
        .checked_sub(financial.net_debt)
        .ok_or_else(|| overflow("equity_value"))?;

    let growth = checked_add(Decimal::ONE, financial.expected_dilution, "expected_dilution")?;
    let shares = checked_mul(financial.current_shares, growth, "fully_diluted_shares")?;
    if shares <= Decimal::ZERO {
        return Err(EngineError::Domain {
            context: "equity value per share".into(),
            reason: format!(
                "fully diluted share count must be positive, got {shares} \
                 (current {} x (1 + {}))",
                financial.current_shares, financial.expected_dilution
            ),
        });
    }

    let raw_price = equity_value
        .checked_div(shares)
        .ok_or_else(|| overflow("price_per_share"))?;
    if raw_price < Decimal::ZERO {
        tracing::debug!(%equity_value, %shares, "negative equity value; price clamped to zero");
    }

    Ok(ValuationResult {
        gross_revenue,
        net_revenue,
        ebitda,
        enterprise_value,
        equity_value,
        price_per_share: raw_price.max(Decimal::ZERO),
    })
}

/// `a * b`, reporting overflow against `field` instead of panicking.
pub(crate) fn checked_mul(a: Decimal, b: Decimal, field: &str) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(field))
}

/// `a + b`, reporting overflow against `field` instead of panicking.
pub(crate) fn checked_add(a: Decimal, b: Decimal, field: &str) -> EngineResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(field))
}

fn overflow(field: &str) -> EngineError {
    EngineError::InvalidInput {
        field: field.into(),
        reason: "result exceeds the decimal range".into(),
    }
}
