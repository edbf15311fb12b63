//! Property-based tests for element construction and the Kepler solver.

use proptest::prelude::*;
use std::f64::consts::TAU;

use super::{OrbitalElements, solve_kepler};
use crate::types::EARTH_RADIUS_KM;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The solver converges and satisfies M = E - e*sin(E) for bound orbits.
    #[test]
    fn prop_kepler_solver_convergence(
        mean_anomaly_normalized in 0.0f64..1.0,
        eccentricity in 0.0f64..0.95,
    ) {
        let mean_anomaly = mean_anomaly_normalized * TAU;
        let sol = solve_kepler(mean_anomaly, eccentricity);

        prop_assert!(sol.converged, "M={}, e={} did not converge", mean_anomaly, eccentricity);
        let m_check = sol.eccentric_anomaly - eccentricity * sol.eccentric_anomaly.sin();
        let error = (m_check - mean_anomaly).abs();
        prop_assert!(
            error < 1e-8,
            "Kepler solver failed: M={}, e={}, E={}, error={}",
            mean_anomaly, eccentricity, sol.eccentric_anomaly, error
        );
    }

    /// Zero eccentricity makes E equal to M.
    #[test]
    fn prop_circular_orbit_identity(mean_anomaly in 0.0f64..TAU) {
        let sol = solve_kepler(mean_anomaly, 0.0);
        prop_assert!((sol.eccentric_anomaly - mean_anomaly).abs() < 1e-12);
    }

    /// Every accepted element set lies above the Earth's surface.
    #[test]
    fn prop_accepted_elements_are_above_surface(
        inclination in 0.0f64..180.0,
        eccentricity in 0.0f64..0.2,
        mean_motion in 0.5f64..20.0,
    ) {
        match OrbitalElements::from_degrees(inclination, 10.0, eccentricity, 20.0, 30.0, mean_motion) {
            Ok(el) => prop_assert!(el.semi_major_axis > EARTH_RADIUS_KM),
            Err(_) => prop_assert!(mean_motion > 17.0),
        }
    }
}
