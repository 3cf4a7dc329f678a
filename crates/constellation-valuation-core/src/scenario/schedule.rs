use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::params::ScenarioParameters;
use crate::types::{Multiple, Rate, Year};

/// The fixed projection horizon, ascending.
pub const PROJECTION_YEARS: [Year; 5] = [2026, 2027, 2028, 2029, 2030];

/// The final projection year. Its schedule entries mirror the scalar inputs.
pub const TERMINAL_YEAR: Year = 2030;

/// A year-indexed override table for one time-varying driver.
///
/// Serialized as a plain JSON object keyed by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule<T> {
    entries: BTreeMap<Year, T>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Copy> Schedule<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schedule from `(year, value)` pairs; later pairs win.
    pub fn from_entries(entries: impl IntoIterator<Item = (Year, T)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, year: Year) -> Option<T> {
        self.entries.get(&year).copied()
    }

    /// The override for `year`, or `fallback` when the year is absent.
    pub fn resolve(&self, year: Year, fallback: T) -> T {
        self.get(year).unwrap_or(fallback)
    }

    pub fn set(&mut self, year: Year, value: T) {
        self.entries.insert(year, value);
    }

    pub fn remove(&mut self, year: Year) -> Option<T> {
        self.entries.remove(&year)
    }

    pub fn terminal(&self) -> Option<T> {
        self.get(TERMINAL_YEAR)
    }

    /// Projection years with no override.
    pub fn missing_years(&self) -> Vec<Year> {
        PROJECTION_YEARS
            .iter()
            .copied()
            .filter(|y| !self.entries.contains_key(y))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_years().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Year, T)> + '_ {
        self.entries.iter().map(|(y, v)| (*y, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drivers that vary by projection year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledDriver {
    UnitCount,
    AdoptionRate,
    EvEbitdaMultiple,
}

impl std::fmt::Display for ScheduledDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduledDriver::UnitCount => write!(f, "unit count"),
            ScheduledDriver::AdoptionRate => write!(f, "adoption rate"),
            ScheduledDriver::EvEbitdaMultiple => write!(f, "EV/EBITDA multiple"),
        }
    }
}

/// The three year-indexed schedules a scenario carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedules {
    /// Constellation build-out (satellites in service per year)
    pub unit_count_schedule: Schedule<u32>,
    /// Subscriber attachment ramp
    pub adoption_schedule: Schedule<Rate>,
    /// EV/EBITDA multiple compression
    pub multiple_schedule: Schedule<Multiple>,
}

impl Schedules {
    /// Schedules with no overrides; every year falls back to the scalars.
    pub fn empty() -> Self {
        Self {
            unit_count_schedule: Schedule::new(),
            adoption_schedule: Schedule::new(),
            multiple_schedule: Schedule::new(),
        }
    }

    /// Every `(driver, year)` pair that will fall back to its scalar.
    pub fn gaps(&self) -> Vec<(ScheduledDriver, Year)> {
        let unit = self
            .unit_count_schedule
            .missing_years()
            .into_iter()
            .map(|y| (ScheduledDriver::UnitCount, y));
        let adoption = self
            .adoption_schedule
            .missing_years()
            .into_iter()
            .map(|y| (ScheduledDriver::AdoptionRate, y));
        let multiple = self
            .multiple_schedule
            .missing_years()
            .into_iter()
            .map(|y| (ScheduledDriver::EvEbitdaMultiple, y));
        unit.chain(adoption).chain(multiple).collect()
    }

    /// Year-local copy of `params` with the three scheduled drivers replaced
    /// by their overrides for `year`. Absent overrides keep the scalar.
    pub fn apply_to(&self, params: &ScenarioParameters, year: Year) -> ScenarioParameters {
        let mut local = params.clone();

        match self.unit_count_schedule.get(year) {
            Some(units) => local.capacity.unit_count = units,
            None => tracing::debug!(
                year,
                driver = %ScheduledDriver::UnitCount,
                "no override; using scalar"
            ),
        }
        match self.adoption_schedule.get(year) {
            Some(rate) => local.demand.adoption_rate = rate,
            None => tracing::debug!(
                year,
                driver = %ScheduledDriver::AdoptionRate,
                "no override; using scalar"
            ),
        }
        match self.multiple_schedule.get(year) {
            Some(multiple) => local.financial.ev_ebitda_multiple = multiple,
            None => tracing::debug!(
                year,
                driver = %ScheduledDriver::EvEbitdaMultiple,
                "no override; using scalar"
            ),
        }

        local
    }
}
