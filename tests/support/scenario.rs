use chrono::NaiveDate;

use abode::application::{MarketTerms, Reservation, SimulationContext, SolverConfig};
use abode::domain::period::{monthly_rate, months};
use abode::domain::{
    Bank, Broker, Demographics, Economy, FinancialPosition, Household, HousingAttributes,
    HousingUnit, IndexKind, Lifecycle, MetricBundle, MetricWeight, Shape, Tenure, UtilityIndex,
    UtilityModel, AREA_METRIC,
};

pub const HOUSEHOLDS: u64 = 100;
pub const SUPPLY: u64 = 90;
pub const INITIAL_PRICE: f64 = 200.0;

pub fn economy() -> Economy {
    Economy::try_new(
        monthly_rate(0.04),
        monthly_rate(0.02),
        monthly_rate(0.04),
        Lifecycle::default(),
    )
    .expect("economy")
}

pub fn bank() -> Bank {
    Bank::from_debt_to_income(monthly_rate(0.06), months(30), 0.28, 0.8, 0.0).expect("bank")
}

pub fn broker() -> Broker {
    Broker::try_new(0.0).expect("broker")
}

pub fn terms() -> MarketTerms {
    MarketTerms {
        economy: economy(),
        bank: bank(),
        broker: broker(),
    }
}

pub fn utility_model() -> UtilityModel {
    UtilityModel::try_new(vec![
        UtilityIndex::new(
            "space",
            IndexKind::Space,
            0.5,
            vec![MetricWeight::new(AREA_METRIC, 1.0, Shape::Logarithm).scaled(1000.0)],
        ),
        UtilityIndex::new(
            "consumption",
            IndexKind::Consumption,
            1.0,
            vec![MetricWeight::new("consumption", 1.0, Shape::Logarithm).scaled(1000.0)],
        ),
    ])
    .expect("utility model")
}

pub fn finance(wealth: f64) -> FinancialPosition {
    FinancialPosition::try_new(wealth, 6000.0, monthly_rate(0.04), 1.0).expect("finance")
}

pub fn household_with(finance: FinancialPosition, model: UtilityModel) -> Household {
    household_aged(35, finance, model)
}

pub fn household_aged(age: u32, finance: FinancialPosition, model: UtilityModel) -> Household {
    Household::try_new(
        age,
        Demographics::default(),
        finance,
        model,
        NaiveDate::from_ymd_opt(2020, 1, 1).expect("date"),
        &Lifecycle::default(),
    )
    .expect("household")
}

/// A 35-year-old earning 6000 a month.
pub fn household(wealth: f64) -> Household {
    household_with(finance(wealth), utility_model())
}

pub fn attributes(area: f64) -> HousingAttributes {
    HousingAttributes {
        space: MetricBundle::new().with(AREA_METRIC, area),
        ..Default::default()
    }
}

pub fn owned_unit(area: f64, price_per_area: f64) -> HousingUnit {
    HousingUnit::try_new(Tenure::Own, price_per_area, 0.0, 0.25, attributes(area), "tract-1", 1990)
        .expect("owned unit")
}

pub fn rented_unit(area: f64, rent_per_area: f64) -> HousingUnit {
    HousingUnit::try_new(Tenure::Rent, 0.0, rent_per_area, 0.0, attributes(area), "tract-1", 1985)
        .expect("rented unit")
}

/// Renting 850 area at 1.4 per area.
pub fn reservation() -> Reservation {
    let unit = HousingUnit::try_new(Tenure::Rent, 0.0, 1.4, 0.0, attributes(850.0), "tract-1", 1970)
        .expect("rental unit");
    Reservation {
        unit,
        tenure: Tenure::Rent,
    }
}

/// 100 identical households, 90 identical 1000-area dwellings at 200 per area,
/// and a rental fallback.
pub fn market() -> SimulationContext {
    let mut ctx = SimulationContext::new(terms()).with_reservation(reservation());
    ctx.add_households(household(50_000.0), HOUSEHOLDS).expect("archetype");
    ctx.add_housing(owned_unit(1000.0, INITIAL_PRICE), SUPPLY).expect("archetype");
    ctx
}

pub fn solver_config() -> SolverConfig {
    SolverConfig {
        tolerance: 1e-4,
        max_steps: 250,
        initial_step_size: 0.5,
        relax_interval: 25,
        relax_rate: 0.9,
        choice_sensitivity: 20.0,
        workers: 1,
    }
}
