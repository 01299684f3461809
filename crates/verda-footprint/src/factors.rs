//! Per-unit emissions coefficients.

use serde::{Deserialize, Serialize};

/// CO2 coefficients per unit of activity.
///
/// Transport coefficients are kg CO2 per km, food coefficients are kg CO2
/// per meal. The reference values are fixed at process start; callers that
/// want regional factors can construct their own set and use
/// [`estimate_with`](crate::estimate_with).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionsFactors {
    pub car_kg_per_km: f64,
    pub bus_kg_per_km: f64,
    pub train_kg_per_km: f64,
    pub plane_kg_per_km: f64,
    pub meat_kg_per_meal: f64,
    pub vegetarian_kg_per_meal: f64,
    pub vegan_kg_per_meal: f64,
}

impl EmissionsFactors {
    /// The reference coefficient set used by the chat assistant.
    pub const fn reference() -> Self {
        Self {
            car_kg_per_km: 2.3,
            bus_kg_per_km: 0.1,
            train_kg_per_km: 0.04,
            plane_kg_per_km: 0.25,
            meat_kg_per_meal: 6.0,
            vegetarian_kg_per_meal: 1.5,
            vegan_kg_per_meal: 1.0,
        }
    }
}

impl Default for EmissionsFactors {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        let factors = EmissionsFactors::reference();
        assert_eq!(factors.car_kg_per_km, 2.3);
        assert_eq!(factors.bus_kg_per_km, 0.1);
        assert_eq!(factors.train_kg_per_km, 0.04);
        assert_eq!(factors.plane_kg_per_km, 0.25);
        assert_eq!(factors.meat_kg_per_meal, 6.0);
        assert_eq!(factors.vegetarian_kg_per_meal, 1.5);
        assert_eq!(factors.vegan_kg_per_meal, 1.0);
    }

    #[test]
    fn test_default_is_reference() {
        assert_eq!(EmissionsFactors::default(), EmissionsFactors::reference());
    }
}
