use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

use constellation_valuation_core::persistence::snapshot_from_value;
use constellation_valuation_core::scenario::{ModelMode, ScenarioState, Schedules};
use constellation_valuation_core::Year;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Capacity,
    Demand,
    Blended,
}

impl From<ModeArg> for ModelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Capacity => ModelMode::CapacityOnly,
            ModeArg::Demand => ModelMode::DemandOnly,
            ModeArg::Blended => ModelMode::Blended,
        }
    }
}

/// Scenario source and overrides shared by every engine command.
///
/// The snapshot comes from `--input`, else piped stdin, else the stock
/// assumptions. Flags are applied on top in a fixed order: schedule reset,
/// scalars, then per-year entries.
#[derive(Args, Debug, Default)]
pub struct ScenarioArgs {
    /// Path to a scenario snapshot JSON (as written by `cvm export`)
    #[arg(long)]
    pub input: Option<String>,

    /// Which model drives the headline figures
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Drop all per-year schedules so every year uses the scalar inputs
    #[arg(long)]
    pub no_schedules: bool,

    // -- capacity --
    /// Satellites in service (also sets the 2030 schedule entry)
    #[arg(long)]
    pub unit_count: Option<u32>,

    /// Raw output per satellite
    #[arg(long)]
    pub gross_output_per_unit: Option<Decimal>,

    /// Fraction of raw output that is billable (e.g. 0.15)
    #[arg(long)]
    pub utilization: Option<Decimal>,

    /// Price per billable unit
    #[arg(long)]
    pub price_per_unit: Option<Decimal>,

    // -- demand --
    /// Addressable subscribers, in millions
    #[arg(long)]
    pub total_population: Option<Decimal>,

    /// Fraction of the population that subscribes (also sets the 2030 entry)
    #[arg(long)]
    pub adoption_rate: Option<Decimal>,

    /// Monthly revenue per subscriber
    #[arg(long)]
    pub monthly_revenue_per_user: Option<Decimal>,

    /// Operator share of subscriber revenue
    #[arg(long)]
    pub revenue_share: Option<Decimal>,

    /// Include the secondary contract channel (true/false)
    #[arg(long)]
    pub secondary: Option<bool>,

    // -- financial --
    #[arg(long)]
    pub ebitda_margin: Option<Decimal>,

    /// Terminal EV/EBITDA multiple (also sets the 2030 entry)
    #[arg(long)]
    pub ev_ebitda_multiple: Option<Decimal>,

    /// Shares outstanding, in millions
    #[arg(long)]
    pub current_shares: Option<Decimal>,

    /// Expected dilution as a fraction of current shares
    #[arg(long, allow_negative_numbers = true)]
    pub expected_dilution: Option<Decimal>,

    /// Net debt (negative for net cash)
    #[arg(long, allow_negative_numbers = true)]
    pub net_debt: Option<Decimal>,

    // -- schedules --
    /// Per-year unit count, YEAR=VALUE (repeatable)
    #[arg(long = "unit-count-at", value_parser = parse_year_entry::<u32>)]
    pub unit_count_at: Vec<(Year, u32)>,

    /// Per-year adoption rate, YEAR=VALUE (repeatable)
    #[arg(long = "adoption-at", value_parser = parse_year_entry::<Decimal>)]
    pub adoption_at: Vec<(Year, Decimal)>,

    /// Per-year EV/EBITDA multiple, YEAR=VALUE (repeatable)
    #[arg(long = "multiple-at", value_parser = parse_year_entry::<Decimal>)]
    pub multiple_at: Vec<(Year, Decimal)>,
}

fn parse_year_entry<T>(s: &str) -> Result<(Year, T), String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let (year, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected YEAR=VALUE, got '{s}'"))?;
    let year: Year = year
        .trim()
        .parse()
        .map_err(|e| format!("invalid year '{year}': {e}"))?;
    let value = value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("invalid value '{value}': {e}"))?;
    Ok((year, value))
}

/// Load the base scenario and apply every flag override.
pub fn resolve_state(args: &ScenarioArgs) -> Result<ScenarioState, Box<dyn std::error::Error>> {
    let mut state = load_base(args.input.as_deref())?;
    apply_overrides(args, &mut state);
    Ok(state)
}

fn load_base(path: Option<&str>) -> Result<ScenarioState, Box<dyn std::error::Error>> {
    let value = match path {
        Some(path) => Some(input::file::read_json_value(path)?),
        None => input::stdin::read_stdin()?,
    };
    match value {
        Some(value) => {
            tracing::debug!(source = path.unwrap_or("stdin"), "loading scenario snapshot");
            Ok(snapshot_from_value(value)?.into_state())
        }
        None => Ok(ScenarioState::default()),
    }
}

pub fn apply_overrides(args: &ScenarioArgs, state: &mut ScenarioState) {
    if args.no_schedules {
        state.schedules = Schedules::empty();
    }
    if let Some(mode) = args.mode {
        state.set_mode(mode.into());
    }

    if let Some(v) = args.unit_count {
        state.set_unit_count(v);
    }
    if let Some(v) = args.adoption_rate {
        state.set_adoption_rate(v);
    }
    if let Some(v) = args.ev_ebitda_multiple {
        state.set_ev_ebitda_multiple(v);
    }

    let p = &mut state.params;
    if let Some(v) = args.gross_output_per_unit {
        p.capacity.gross_output_per_unit = v;
    }
    if let Some(v) = args.utilization {
        p.capacity.utilization = v;
    }
    if let Some(v) = args.price_per_unit {
        p.capacity.price_per_unit = v;
    }
    if let Some(v) = args.total_population {
        p.demand.total_population = v;
    }
    if let Some(v) = args.monthly_revenue_per_user {
        p.demand.monthly_revenue_per_user = v;
    }
    if let Some(v) = args.revenue_share {
        p.demand.revenue_share = v;
    }
    if let Some(v) = args.secondary {
        p.demand.secondary.enabled = v;
    }
    if let Some(v) = args.ebitda_margin {
        p.financial.ebitda_margin = v;
    }
    if let Some(v) = args.current_shares {
        p.financial.current_shares = v;
    }
    if let Some(v) = args.expected_dilution {
        p.financial.expected_dilution = v;
    }
    if let Some(v) = args.net_debt {
        p.financial.net_debt = v;
    }

    for &(year, v) in &args.unit_count_at {
        state.set_unit_count_for_year(year, v);
    }
    for &(year, v) in &args.adoption_at {
        state.set_adoption_rate_for_year(year, v);
    }
    for &(year, v) in &args.multiple_at {
        state.set_multiple_for_year(year, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellation_valuation_core::scenario::TERMINAL_YEAR;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_flags_leaves_defaults() {
        let mut state = ScenarioState::default();
        apply_overrides(&ScenarioArgs::default(), &mut state);
        assert_eq!(state, ScenarioState::default());
    }

    #[test]
    fn test_scalar_flag_syncs_terminal_entry() {
        let args = ScenarioArgs {
            adoption_rate: Some(dec!(0.2)),
            unit_count: Some(150),
            ..Default::default()
        };
        let mut state = ScenarioState::default();
        apply_overrides(&args, &mut state);
        assert_eq!(state.params.demand.adoption_rate, dec!(0.2));
        assert_eq!(state.schedules.adoption_schedule.get(TERMINAL_YEAR), Some(dec!(0.2)));
        assert_eq!(state.schedules.unit_count_schedule.get(TERMINAL_YEAR), Some(150));
    }

    #[test]
    fn test_year_entries_apply_after_schedule_reset() {
        let args = ScenarioArgs {
            no_schedules: true,
            multiple_at: vec![(2027, dec!(33))],
            ..Default::default()
        };
        let mut state = ScenarioState::default();
        apply_overrides(&args, &mut state);
        assert_eq!(state.schedules.multiple_schedule.len(), 1);
        assert_eq!(state.schedules.multiple_schedule.get(2027), Some(dec!(33)));
        assert!(state.schedules.unit_count_schedule.is_empty());
    }

    #[test]
    fn test_mode_flag() {
        let args = ScenarioArgs {
            mode: Some(ModeArg::Capacity),
            ..Default::default()
        };
        let mut state = ScenarioState::default();
        apply_overrides(&args, &mut state);
        assert_eq!(state.params.mode, ModelMode::CapacityOnly);
    }

    #[test]
    fn test_parse_year_entry() {
        assert_eq!(parse_year_entry::<u32>("2028=135").unwrap(), (2028, 135));
        assert_eq!(
            parse_year_entry::<Decimal>("2029 = 0.08").unwrap(),
            (2029, dec!(0.08))
        );
        assert!(parse_year_entry::<u32>("2028").is_err());
        assert!(parse_year_entry::<u32>("y=1").is_err());
        assert!(parse_year_entry::<u32>("2028=-4").is_err());
    }
}
