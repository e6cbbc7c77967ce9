//! Equilibrium solver integration tests.

mod support;

use abode::application::equilibrium::{EquilibriumSolver, SolverConfig};
use abode::application::{marginal_pairs, SimulationContext};
use abode::domain::error::{DomainError, NumericError};
use abode::domain::{
    Filtration, IndexKind, MetricWeight, Shape, Tenure, UtilityIndex, UtilityModel,
};
use abode::error::Error;

use support::scenario::{
    finance, household, household_aged, household_with, market, owned_unit, rented_unit,
    reservation, solver_config, terms, utility_model, HOUSEHOLDS, INITIAL_PRICE, SUPPLY,
};

/// Price at which expected demand for a single archetype crosses supply, by bisection.
fn clearing_price(
    solver: &EquilibriumSolver,
    ctx: &SimulationContext,
    tenure: Tenure,
    (mut lo, mut hi): (f64, f64),
) -> f64 {
    for _ in 0..200 {
        let mid = (lo + hi) / 2.0;
        let demand = solver.demand_at(ctx, tenure, &[mid]).unwrap()[0];
        if demand > SUPPLY as f64 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

#[test]
fn solve_converges_to_clearing_price() {
    let mut ctx = market();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();
    let target = clearing_price(&solver, &ctx, Tenure::Own, (1.0, 249.99));

    let outcome = solver.solve(&mut ctx, Tenure::Own).unwrap();

    assert!(outcome.converged, "solver did not converge: {outcome:?}");
    assert!(outcome.steps_taken < 250);
    let price = outcome.final_prices[0].price;
    assert!(
        (price - target).abs() / target < 0.01,
        "solved price {price} is not within 1% of clearing price {target}"
    );
}

#[test]
fn solved_prices_are_written_back() {
    let mut ctx = market();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();
    let outcome = solver.solve(&mut ctx, Tenure::Own).unwrap();

    let solved = outcome.final_prices[0];
    let unit = ctx.housing().get(solved.archetype).unwrap();
    assert_eq!(unit.price_per_area(), solved.price);
    assert_ne!(solved.price, INITIAL_PRICE);
}

#[test]
fn resolving_at_equilibrium_is_idempotent() {
    let mut ctx = market();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();
    let first = solver.solve(&mut ctx, Tenure::Own).unwrap();
    assert!(first.converged);

    let second = solver.solve(&mut ctx, Tenure::Own).unwrap();
    assert!(second.converged);
    assert_eq!(second.steps_taken, 1);
    assert_eq!(second.final_prices, first.final_prices);
}

#[test]
fn diagnostics_describe_the_last_solve() {
    let mut ctx = market();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();
    let outcome = solver.solve(&mut ctx, Tenure::Own).unwrap();

    let trajectory = solver.trajectory();
    assert_eq!(trajectory.len(), outcome.steps_taken);
    assert_eq!(trajectory.rows[0].prices, vec![INITIAL_PRICE]);
    assert_eq!(trajectory.rows[0].step, 1);

    let table = solver.demand_supply();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].supply, SUPPLY as f64);
    assert!(table.max_imbalance() <= solver.config().tolerance);
    // The reservation absorbs the remaining households.
    assert!(table.total_demand() < HOUSEHOLDS as f64);

    let scores = solver.scores().unwrap();
    assert!(scores.has_reservation());
    assert_eq!(scores.housing().len(), 1);
    assert_eq!(scores.households().len(), 1);
    assert!(scores.get(0, 0).unwrap() > 0.0);
}

#[test]
fn unaffordable_household_contributes_no_demand() {
    let mut ctx = SimulationContext::new(terms()).with_reservation(reservation());
    // A 20% down payment on 200 000 needs 40 000 in cash.
    ctx.add_households(household(10_000.0), HOUSEHOLDS).unwrap();
    ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), SUPPLY).unwrap();
    let mut solver = EquilibriumSolver::new(SolverConfig {
        max_steps: 1,
        ..solver_config()
    })
    .unwrap();

    let demand = solver.demand_at(&ctx, Tenure::Own, &[INITIAL_PRICE]).unwrap();
    assert_eq!(demand, vec![0.0]);

    let outcome = solver.solve(&mut ctx, Tenure::Own).unwrap();
    assert!(!outcome.converged);
    assert_eq!(solver.scores().unwrap().get(0, 0), None);
}

#[test]
fn all_infeasible_households_spread_uniformly() {
    let mut ctx = SimulationContext::new(terms());
    ctx.add_households(household(10_000.0), HOUSEHOLDS).unwrap();
    ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), SUPPLY).unwrap();
    ctx.add_housing(owned_unit(1200.0, INITIAL_PRICE), SUPPLY).unwrap();
    let solver = EquilibriumSolver::new(solver_config()).unwrap();

    let demand = solver
        .demand_at(&ctx, Tenure::Own, &[INITIAL_PRICE, INITIAL_PRICE])
        .unwrap();
    assert_eq!(demand, vec![50.0, 50.0]);
}

#[test]
fn every_household_is_allocated_once() {
    let mut ctx = SimulationContext::new(terms());
    ctx.add_households(household(50_000.0), 60).unwrap();
    ctx.add_households(household(120_000.0), 40).unwrap();
    ctx.add_housing(owned_unit(900.0, 180.0), 50).unwrap();
    ctx.add_housing(owned_unit(1400.0, 210.0), 50).unwrap();
    let solver = EquilibriumSolver::new(solver_config()).unwrap();

    let demand = solver.demand_at(&ctx, Tenure::Own, &[180.0, 210.0]).unwrap();
    let total: f64 = demand.iter().sum();
    assert!((total - 100.0).abs() < 1e-9, "total demand {total}");
    assert!(demand.iter().all(|d| *d >= 0.0));
}

#[test]
fn registration_order_does_not_change_demand() {
    let households = [(household(50_000.0), 60), (household(120_000.0), 40)];
    let units = [(owned_unit(900.0, 180.0), 50), (owned_unit(1400.0, 210.0), 50)];

    let mut forward = SimulationContext::new(terms()).with_reservation(reservation());
    for (h, n) in households.iter().cloned() {
        forward.add_households(h, n).unwrap();
    }
    for (u, n) in units.iter().cloned() {
        forward.add_housing(u, n).unwrap();
    }

    let mut reverse = SimulationContext::new(terms()).with_reservation(reservation());
    for (h, n) in households.iter().rev().cloned() {
        reverse.add_households(h, n).unwrap();
    }
    for (u, n) in units.iter().rev().cloned() {
        reverse.add_housing(u, n).unwrap();
    }

    let solver = EquilibriumSolver::new(solver_config()).unwrap();
    let a = solver.demand_at(&forward, Tenure::Own, &[180.0, 210.0]).unwrap();
    let b = solver.demand_at(&reverse, Tenure::Own, &[210.0, 180.0]).unwrap();
    assert!((a[0] - b[1]).abs() < 1e-9);
    assert!((a[1] - b[0]).abs() < 1e-9);
}

#[test]
fn parallel_scoring_matches_serial() {
    let build = || {
        let mut ctx = SimulationContext::new(terms()).with_reservation(reservation());
        ctx.add_households(household(50_000.0), 60).unwrap();
        ctx.add_households(household(120_000.0), 40).unwrap();
        ctx.add_housing(owned_unit(900.0, 180.0), 50).unwrap();
        ctx.add_housing(owned_unit(1400.0, 210.0), 50).unwrap();
        ctx
    };
    let config = SolverConfig {
        max_steps: 20,
        ..solver_config()
    };

    let mut serial_ctx = build();
    let mut serial = EquilibriumSolver::new(config.clone()).unwrap();
    let serial_outcome = serial.solve(&mut serial_ctx, Tenure::Own).unwrap();

    let mut parallel_ctx = build();
    let mut parallel = EquilibriumSolver::new(SolverConfig { workers: 4, ..config }).unwrap();
    let parallel_outcome = parallel.solve(&mut parallel_ctx, Tenure::Own).unwrap();

    assert_eq!(serial_outcome, parallel_outcome);
    assert_eq!(serial.scores(), parallel.scores());
}

#[test]
fn exhausted_budget_is_reported_not_raised() {
    let mut ctx = market();
    let mut solver = EquilibriumSolver::new(SolverConfig {
        max_steps: 3,
        ..solver_config()
    })
    .unwrap();

    let outcome = solver.solve(&mut ctx, Tenure::Own).unwrap();
    assert!(!outcome.converged);
    assert_eq!(outcome.steps_taken, 3);
    assert_eq!(solver.trajectory().len(), 3);
}

#[test]
fn rent_market_clears_on_rent_only() {
    let mut ctx = SimulationContext::new(terms()).with_reservation(reservation());
    ctx.add_households(household(50_000.0), HOUSEHOLDS).unwrap();
    let owned = ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), SUPPLY).unwrap();
    let rented = ctx.add_housing(rented_unit(1000.0, 1.4), SUPPLY).unwrap();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();
    let target = clearing_price(&solver, &ctx, Tenure::Rent, (0.01, 10.0));

    let outcome = solver.solve(&mut ctx, Tenure::Rent).unwrap();

    assert!(outcome.converged, "solver did not converge: {outcome:?}");
    assert_eq!(outcome.tenure, Tenure::Rent);
    assert_eq!(outcome.final_prices.len(), 1);
    let solved = outcome.final_prices[0];
    assert_eq!(solved.archetype, rented);
    assert!(
        (solved.price - target).abs() / target < 0.01,
        "solved rent {} is not within 1% of clearing rent {target}",
        solved.price
    );
    assert_eq!(solver.demand_supply().rows[0].supply, SUPPLY as f64);

    let unit = ctx.housing().get(rented).unwrap();
    assert_eq!(unit.rent_per_area(), solved.price);
    assert_eq!(unit.price_per_area(), 0.0);
    let own = ctx.housing().get(owned).unwrap();
    assert_eq!(own.price_per_area(), INITIAL_PRICE);
    assert_eq!(own.rent_per_area(), 0.0);
}

#[test]
fn households_at_the_death_age_do_not_abort_the_solve() {
    let mut ctx = market();
    let aged = ctx
        .add_households(household_aged(85, finance(50_000.0), utility_model()), 5)
        .unwrap();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();

    let outcome = solver.solve(&mut ctx, Tenure::Own).unwrap();
    assert!(outcome.converged, "solver did not converge: {outcome:?}");

    let scores = solver.scores().unwrap();
    let col = scores.households().iter().position(|id| *id == aged).unwrap();
    assert_eq!(scores.get(0, col), None);
}

#[test]
fn zero_counts_are_rejected() {
    let mut ctx = SimulationContext::new(terms());
    assert_eq!(
        ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), 0),
        Err(DomainError::EmptyArchetype)
    );
    assert_eq!(
        ctx.add_households(household(50_000.0), 0),
        Err(DomainError::EmptyArchetype)
    );
    assert!(ctx.housing().is_empty());
    assert!(ctx.households().is_empty());
}

#[test]
fn empty_market_converges_immediately() {
    let mut ctx = market();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();

    let outcome = solver.solve(&mut ctx, Tenure::Rent).unwrap();
    assert!(outcome.converged);
    assert_eq!(outcome.steps_taken, 0);
    assert!(outcome.final_prices.is_empty());
}

#[test]
fn numeric_errors_escape_the_solve() {
    let model = UtilityModel::try_new(vec![UtilityIndex::new(
        "schools",
        IndexKind::School,
        1.0,
        vec![MetricWeight::new("rating", 1.0, Shape::Tangent)],
    )])
    .unwrap();
    let mut ctx = SimulationContext::new(terms());
    ctx.add_households(household_with(finance(50_000.0), model), HOUSEHOLDS).unwrap();
    ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), SUPPLY).unwrap();
    let mut solver = EquilibriumSolver::new(solver_config()).unwrap();

    let err = solver.solve(&mut ctx, Tenure::Own).unwrap_err();
    assert!(matches!(
        err,
        Error::Numeric(NumericError::MissingMetric { .. })
    ));
}

#[test]
fn marginal_pairs_rank_by_response() {
    let mut ctx = SimulationContext::new(terms());
    let modest = ctx.add_households(household(50_000.0), 60).unwrap();
    let wealthy = ctx.add_households(household(400_000.0), 40).unwrap();
    ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), SUPPLY).unwrap();

    let filtration = Filtration::Consumption { delta: 100.0 };
    let pairs = marginal_pairs(&ctx, Tenure::Own, &filtration, 0.0).unwrap();
    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|p| p.delta > 0.0));
    assert!(pairs[0].delta.abs() >= pairs[1].delta.abs());
    // Extra consumption is worth more to the household consuming less.
    assert_eq!(pairs[0].household, modest);
    assert_eq!(pairs[1].household, wealthy);

    let none = marginal_pairs(&ctx, Tenure::Own, &filtration, 1.0).unwrap();
    assert!(none.is_empty());
}

#[test]
fn marginal_pairs_skip_unaffordable_pairs() {
    let mut ctx = SimulationContext::new(terms());
    ctx.add_households(household(10_000.0), HOUSEHOLDS).unwrap();
    ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), SUPPLY).unwrap();

    let pairs = marginal_pairs(&ctx, Tenure::Own, &Filtration::Area { delta: 50.0 }, 0.0).unwrap();
    assert!(pairs.is_empty());
}

#[test]
fn default_model_matches_fixture() {
    assert_eq!(utility_model().indices().len(), 2);
    assert_eq!(market().households().total(), HOUSEHOLDS);
}
