use constellation_valuation_core::scenario::{
    CapacityParameters, DemandParameters, FinancialParameters, ModelMode, SecondaryChannel,
};
use constellation_valuation_core::valuation::{
    blend_results, capacity_breakdown, evaluate_capacity_model, evaluate_demand_model,
    reduce_to_valuation, select_active_result, ValuationResult,
};
use constellation_valuation_core::EngineError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_financial() -> FinancialParameters {
    FinancialParameters {
        ebitda_margin: dec!(0.85),
        ev_ebitda_multiple: dec!(25),
        current_shares: dec!(273),
        expected_dilution: dec!(0.50),
        net_debt: dec!(2000),
    }
}

fn reference_capacity() -> CapacityParameters {
    CapacityParameters {
        unit_count: 200,
        gross_output_per_unit: dec!(150),
        utilization: dec!(0.15),
        price_per_unit: dec!(5),
        spectral_efficiency: dec!(3.0),
    }
}

fn reference_demand() -> DemandParameters {
    DemandParameters {
        total_population: dec!(3000),
        adoption_rate: dec!(0.10),
        monthly_revenue_per_user: dec!(5),
        revenue_share: dec!(0.50),
        secondary: SecondaryChannel {
            enabled: false,
            population: dec!(8),
            monthly_revenue_per_user: dec!(5),
            revenue_share: dec!(1.00),
        },
    }
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn test_capacity_full_constellation_reference() {
    let fin = reference_financial();
    let lines = capacity_breakdown(&reference_capacity()).unwrap();
    assert_eq!(lines.billable_per_unit, dec!(22.5));
    assert_eq!(lines.total_billable, dec!(4500));
    assert_eq!(fin.fully_diluted_shares(), dec!(409.5));

    let out = evaluate_capacity_model(&reference_capacity(), &fin).unwrap();
    assert_eq!(
        ValuationResult {
            price_per_share: Decimal::ZERO,
            ..out.clone()
        },
        ValuationResult {
            gross_revenue: dec!(22500),
            net_revenue: dec!(11250),
            ebitda: dec!(9562.5),
            enterprise_value: dec!(239062.5),
            equity_value: dec!(237062.5),
            price_per_share: Decimal::ZERO,
        }
    );
    assert!(
        (out.price_per_share - dec!(578.91)).abs() < dec!(0.01),
        "Expected ~578.91, got {}",
        out.price_per_share
    );
}

#[test]
fn test_demand_ten_percent_attach_reference() {
    let out = evaluate_demand_model(&reference_demand(), &reference_financial()).unwrap();
    assert_eq!(out.gross_revenue, dec!(18000));
    assert_eq!(out.net_revenue, dec!(9000));
    assert_eq!(out.ebitda, dec!(7650));
    assert_eq!(out.enterprise_value, dec!(191250));
    assert_eq!(out.equity_value, dec!(189250));
    // 189250 / 409.5 = 462.1489...
    assert!(
        (out.price_per_share - dec!(462.1489)).abs() < dec!(0.0001),
        "Expected ~462.1489, got {}",
        out.price_per_share
    );
}

#[test]
fn test_zero_adoption_boundary() {
    let mut demand = reference_demand();
    demand.adoption_rate = Decimal::ZERO;
    let out = evaluate_demand_model(&demand, &reference_financial()).unwrap();
    assert_eq!(out.net_revenue, Decimal::ZERO);
    assert_eq!(out.ebitda, Decimal::ZERO);
    assert_eq!(out.enterprise_value, Decimal::ZERO);
    assert_eq!(out.equity_value, -reference_financial().net_debt);
    assert_eq!(out.price_per_share, Decimal::ZERO);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_price_never_negative_across_debt_levels() {
    let mut fin = reference_financial();
    for net_debt in [dec!(-5000), dec!(0), dec!(2000), dec!(250000), dec!(1000000)] {
        fin.net_debt = net_debt;
        let cap = evaluate_capacity_model(&reference_capacity(), &fin).unwrap();
        let dem = evaluate_demand_model(&reference_demand(), &fin).unwrap();
        assert!(cap.price_per_share >= Decimal::ZERO, "net_debt={net_debt}");
        assert!(dem.price_per_share >= Decimal::ZERO, "net_debt={net_debt}");
    }
}

#[test]
fn test_evaluators_are_idempotent() {
    let fin = reference_financial();
    assert_eq!(
        evaluate_capacity_model(&reference_capacity(), &fin).unwrap(),
        evaluate_capacity_model(&reference_capacity(), &fin).unwrap()
    );
    assert_eq!(
        evaluate_demand_model(&reference_demand(), &fin).unwrap(),
        evaluate_demand_model(&reference_demand(), &fin).unwrap()
    );
}

#[test]
fn test_blended_mode_is_fieldwise_mean() {
    let fin = reference_financial();
    let c = evaluate_capacity_model(&reference_capacity(), &fin).unwrap();
    let d = evaluate_demand_model(&reference_demand(), &fin).unwrap();
    let b = select_active_result(ModelMode::Blended, &c, &d);

    let two = dec!(2);
    assert_eq!(b.gross_revenue, (c.gross_revenue + d.gross_revenue) / two);
    assert_eq!(b.net_revenue, (c.net_revenue + d.net_revenue) / two);
    assert_eq!(b.ebitda, (c.ebitda + d.ebitda) / two);
    assert_eq!(b.enterprise_value, (c.enterprise_value + d.enterprise_value) / two);
    assert_eq!(b.equity_value, (c.equity_value + d.equity_value) / two);
    assert_eq!(b.price_per_share, (c.price_per_share + d.price_per_share) / two);
    assert_eq!(b, blend_results(&c, &d));
}

#[test]
fn test_blend_differs_from_model_on_averaged_inputs() {
    // Averaging outputs is not the same as reducing an averaged revenue once
    // one side is clamped.
    let mut fin = reference_financial();
    fin.net_debt = dec!(200000);
    let c = evaluate_capacity_model(&reference_capacity(), &fin).unwrap();
    let d = evaluate_demand_model(&reference_demand(), &fin).unwrap();
    let blended = blend_results(&c, &d);

    let avg_net = (c.net_revenue + d.net_revenue) / dec!(2);
    let avg_gross = (c.gross_revenue + d.gross_revenue) / dec!(2);
    let on_averaged_inputs = reduce_to_valuation(avg_gross, avg_net, &fin).unwrap();

    assert_eq!(d.price_per_share, Decimal::ZERO);
    assert_ne!(blended.price_per_share, on_averaged_inputs.price_per_share);
}

#[test]
fn test_secondary_channel_only_when_enabled() {
    let mut demand = reference_demand();
    let off = evaluate_demand_model(&demand, &reference_financial()).unwrap();
    demand.secondary.enabled = true;
    let on = evaluate_demand_model(&demand, &reference_financial()).unwrap();
    assert_eq!(on.gross_revenue - off.gross_revenue, dec!(480));
    assert_eq!(on.net_revenue - off.net_revenue, dec!(480));
}

#[test]
fn test_non_positive_share_count_is_domain_error() {
    let mut fin = reference_financial();
    fin.current_shares = dec!(-10);
    match evaluate_demand_model(&reference_demand(), &fin) {
        Err(EngineError::Domain { context, .. }) => {
            assert_eq!(context, "equity value per share")
        }
        other => panic!("expected domain error, got {other:?}"),
    }
}
