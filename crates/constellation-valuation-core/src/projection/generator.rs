use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::scenario::{ScenarioParameters, Schedules, PROJECTION_YEARS};
use crate::types::{Money, Multiple, Rate, Year};
use crate::valuation::{evaluate_capacity_model, evaluate_demand_model};
use crate::EngineResult;

/// One year of the projection, as plotted on the revenue and price charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: Year,
    pub label: String,
    /// Drivers in effect for this year (override or scalar)
    pub unit_count: u32,
    pub adoption_rate: Rate,
    pub ev_ebitda_multiple: Multiple,
    pub capacity_net_revenue: Money,
    pub demand_net_revenue: Money,
    pub capacity_price: Money,
    pub demand_price: Money,
    pub blended_net_revenue: Money,
    pub blended_price: Money,
}

/// Projection points in ascending year order. The order is the chart's time
/// axis and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectionSeries {
    points: Vec<ProjectionPoint>,
}

impl ProjectionSeries {
    pub fn points(&self) -> &[ProjectionPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn year(&self, year: Year) -> Option<&ProjectionPoint> {
        self.points.iter().find(|p| p.year == year)
    }

    pub fn into_points(self) -> Vec<ProjectionPoint> {
        self.points
    }
}

impl<'a> IntoIterator for &'a ProjectionSeries {
    type Item = &'a ProjectionPoint;
    type IntoIter = std::slice::Iter<'a, ProjectionPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Run both models over the projection horizon, each year with its own unit
/// count, adoption rate and multiple. Always a full recompute.
pub fn generate_projection(
    params: &ScenarioParameters,
    schedules: &Schedules,
) -> EngineResult<ProjectionSeries> {
    let mut points = Vec::with_capacity(PROJECTION_YEARS.len());

    for year in PROJECTION_YEARS {
        let local = schedules.apply_to(params, year);

        let capacity = evaluate_capacity_model(&local.capacity, &local.financial)?;
        let demand = evaluate_demand_model(&local.demand, &local.financial)?;

        points.push(ProjectionPoint {
            year,
            label: year.to_string(),
            unit_count: local.capacity.unit_count,
            adoption_rate: local.demand.adoption_rate,
            ev_ebitda_multiple: local.financial.ev_ebitda_multiple,
            blended_net_revenue: (capacity.net_revenue + demand.net_revenue) / dec!(2),
            blended_price: (capacity.price_per_share + demand.price_per_share) / dec!(2),
            capacity_net_revenue: capacity.net_revenue,
            demand_net_revenue: demand.net_revenue,
            capacity_price: capacity.price_per_share,
            demand_price: demand.price_per_share,
        });
    }

    tracing::debug!(points = points.len(), "projection generated");
    Ok(ProjectionSeries { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::TERMINAL_YEAR;
    use rust_decimal::Decimal;

    #[test]
    fn test_one_point_per_year_ascending() {
        let series =
            generate_projection(&ScenarioParameters::default(), &Schedules::default()).unwrap();
        let years: Vec<Year> = series.iter().map(|p| p.year).collect();
        assert_eq!(years, PROJECTION_YEARS.to_vec());
        assert_eq!(series.points()[0].label, "2026");
    }

    #[test]
    fn test_default_schedule_drivers_applied() {
        let series =
            generate_projection(&ScenarioParameters::default(), &Schedules::default()).unwrap();
        let first = series.year(2026).unwrap();
        assert_eq!(first.unit_count, 45);
        assert_eq!(first.adoption_rate, dec!(0.02));
        assert_eq!(first.ev_ebitda_multiple, dec!(40));
        let last = series.year(TERMINAL_YEAR).unwrap();
        assert_eq!(last.unit_count, 200);
    }

    #[test]
    fn test_capacity_revenue_grows_with_buildout() {
        let series =
            generate_projection(&ScenarioParameters::default(), &Schedules::default()).unwrap();
        let revenues: Vec<Money> = series.iter().map(|p| p.capacity_net_revenue).collect();
        assert!(revenues.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_blended_fields_are_means() {
        let series =
            generate_projection(&ScenarioParameters::default(), &Schedules::default()).unwrap();
        for p in &series {
            assert_eq!(
                p.blended_net_revenue,
                (p.capacity_net_revenue + p.demand_net_revenue) / dec!(2)
            );
            assert_eq!(p.blended_price, (p.capacity_price + p.demand_price) / dec!(2));
        }
    }

    #[test]
    fn test_zero_shares_fails_whole_projection() {
        let mut params = ScenarioParameters::default();
        params.financial.current_shares = Decimal::ZERO;
        assert!(generate_projection(&params, &Schedules::default()).is_err());
    }
}
