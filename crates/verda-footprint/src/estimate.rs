//! Footprint computation and derived equivalents.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityInput;
use crate::factors::EmissionsFactors;

/// kg CO2 absorbed by one tree in a year.
const TREE_KG_PER_YEAR: f64 = 21.0;
/// kg CO2 emitted by one short flight.
const SHORT_FLIGHT_KG: f64 = 500.0;
/// kg CO2 emitted by 100 km of driving.
const DRIVING_100KM_KG: f64 = 230.0;

/// Estimated weekly footprint with breakdown and equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    /// Total emissions (kg CO2/week).
    pub total_kg: f64,
    /// Transport share of the total (kg CO2/week).
    pub transport_kg: f64,
    /// Food share of the total (kg CO2/week).
    pub food_kg: f64,
    /// Trees needed for a year to absorb the total.
    pub trees: i64,
    /// Short flights emitting the same amount.
    pub flights: i64,
    /// 100 km driving legs emitting the same amount.
    pub driving_100km: i64,
}

/// Estimate a weekly footprint using the reference coefficients.
pub fn estimate(activity: &ActivityInput) -> FootprintResult {
    estimate_with(&EmissionsFactors::reference(), activity)
}

/// Estimate a weekly footprint using a custom coefficient set.
pub fn estimate_with(factors: &EmissionsFactors, activity: &ActivityInput) -> FootprintResult {
    let transport_kg = activity.car_km * factors.car_kg_per_km
        + activity.bus_km * factors.bus_kg_per_km
        + activity.train_km * factors.train_kg_per_km
        + activity.air_km * factors.plane_kg_per_km;

    let food_kg = activity.meat_meals * factors.meat_kg_per_meal
        + activity.vegetarian_meals * factors.vegetarian_kg_per_meal
        + activity.vegan_meals * factors.vegan_kg_per_meal;

    let total_kg = transport_kg + food_kg;

    FootprintResult {
        total_kg,
        transport_kg,
        food_kg,
        trees: equivalent(total_kg, TREE_KG_PER_YEAR),
        flights: equivalent(total_kg, SHORT_FLIGHT_KG),
        driving_100km: equivalent(total_kg, DRIVING_100KM_KG),
    }
}

fn equivalent(total_kg: f64, divisor: f64) -> i64 {
    (total_kg / divisor).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_car_only_weighted_sum() {
        let activity = ActivityInput {
            car_km: 100.0,
            ..ActivityInput::default()
        };
        let footprint = estimate(&activity);
        assert_close(footprint.total_kg, 230.0);
        assert_close(footprint.transport_kg, 230.0);
        assert_close(footprint.food_kg, 0.0);
        assert_eq!(footprint.trees, 11);
        assert_eq!(footprint.flights, 0);
        assert_eq!(footprint.driving_100km, 1);
    }

    #[test]
    fn test_zero_activity_is_zero_footprint() {
        let footprint = estimate(&ActivityInput::default());
        assert_eq!(footprint.total_kg, 0.0);
        assert_eq!(footprint.transport_kg, 0.0);
        assert_eq!(footprint.food_kg, 0.0);
        assert_eq!(footprint.trees, 0);
        assert_eq!(footprint.flights, 0);
        assert_eq!(footprint.driving_100km, 0);
    }

    #[test]
    fn test_mixed_activity_sums_both_categories() {
        let activity = ActivityInput {
            car_km: 50.0,
            bus_km: 20.0,
            train_km: 20.0,
            air_km: 200.0,
            meat_meals: 7.0,
            vegetarian_meals: 7.0,
            vegan_meals: 7.0,
        };
        let footprint = estimate(&activity);
        // 50*2.3 + 20*0.1 + 20*0.04 + 200*0.25 = 167.8
        assert_close(footprint.transport_kg, 167.8);
        // 7*6.0 + 7*1.5 + 7*1.0 = 59.5
        assert_close(footprint.food_kg, 59.5);
        assert_close(footprint.total_kg, 227.3);
        assert_eq!(footprint.trees, 11);
        assert_eq!(footprint.flights, 0);
        assert_eq!(footprint.driving_100km, 1);
    }

    #[test]
    fn test_deterministic() {
        let activity = ActivityInput {
            car_km: 12.5,
            air_km: 340.0,
            meat_meals: 3.0,
            ..ActivityInput::default()
        };
        let first = estimate(&activity);
        let second = estimate(&activity);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_factors() {
        let factors = EmissionsFactors {
            car_kg_per_km: 1.0,
            bus_kg_per_km: 0.0,
            train_kg_per_km: 0.0,
            plane_kg_per_km: 0.0,
            meat_kg_per_meal: 0.0,
            vegetarian_kg_per_meal: 0.0,
            vegan_kg_per_meal: 0.0,
        };
        let activity = ActivityInput {
            car_km: 42.0,
            meat_meals: 100.0,
            ..ActivityInput::default()
        };
        let footprint = estimate_with(&factors, &activity);
        assert_close(footprint.total_kg, 42.0);
        assert_eq!(footprint.trees, 2);
    }

    #[test]
    fn test_negative_inputs_are_not_rejected() {
        // Range validation is out of scope; arithmetic stays well-defined.
        let activity = ActivityInput {
            car_km: -100.0,
            ..ActivityInput::default()
        };
        let footprint = estimate(&activity);
        assert_close(footprint.total_kg, -230.0);
        assert_eq!(footprint.trees, -11);
    }

    #[test]
    fn test_large_flight_count() {
        let activity = ActivityInput {
            air_km: 10_000.0,
            ..ActivityInput::default()
        };
        let footprint = estimate(&activity);
        assert_close(footprint.total_kg, 2_500.0);
        assert_eq!(footprint.flights, 5);
        assert_eq!(footprint.trees, 119);
    }
}
