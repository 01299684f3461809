//! Self-reported weekly activity.

use serde::{Deserialize, Serialize};

/// One week of self-reported activity.
///
/// Distances are kilometres travelled per week, meals are counts per week.
/// Values are expected to be finite and non-negative; the estimator does not
/// validate range, so out-of-range inputs produce out-of-range (but still
/// well-defined) results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityInput {
    /// Car travel (km/week).
    pub car_km: f64,
    /// Bus travel (km/week).
    pub bus_km: f64,
    /// Train travel (km/week).
    pub train_km: f64,
    /// Air travel (km/week).
    pub air_km: f64,
    /// Meat-based meals per week.
    pub meat_meals: f64,
    /// Vegetarian meals per week.
    pub vegetarian_meals: f64,
    /// Vegan meals per week.
    pub vegan_meals: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let activity = ActivityInput::default();
        assert_eq!(activity.car_km, 0.0);
        assert_eq!(activity.vegan_meals, 0.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let activity = ActivityInput {
            car_km: 50.0,
            bus_km: 20.0,
            train_km: 20.0,
            air_km: 200.0,
            meat_meals: 7.0,
            vegetarian_meals: 7.0,
            vegan_meals: 7.0,
        };
        let json = serde_json::to_string(&activity).unwrap();
        let back: ActivityInput = serde_json::from_str(&json).unwrap();
        assert_eq!(activity, back);
    }
}
