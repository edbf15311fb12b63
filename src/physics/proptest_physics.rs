//! Property-based tests for the perturbation model and frame transforms.
//!
//! These verify geometric invariants across a wide range of orbital elements.

use proptest::prelude::*;
use std::f64::consts::TAU;

use super::{Geodetic, SecularRates, apply_secular_drift, orbital_radius, perifocal_position, perifocal_to_eci};
use crate::ephemeris::{OrbitalElements, solve_kepler};
use crate::types::EARTH_RADIUS_KM;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// At t = 0 the ECI radius equals a(1 − e·cos E).
    #[test]
    fn prop_eci_radius_matches_orbit_equation(
        inclination in 0.0f64..180.0,
        raan in 0.0f64..360.0,
        eccentricity in 0.0f64..0.3,
        arg_perigee in 0.0f64..360.0,
        mean_anomaly in 0.0f64..360.0,
        mean_motion in 11.0f64..16.5,
    ) {
        let el = OrbitalElements::from_degrees(
            inclination, raan, eccentricity, arg_perigee, mean_anomaly, mean_motion,
        ).unwrap();
        let drift = apply_secular_drift(&el, 0.0);
        let sol = solve_kepler(drift.mean_anomaly, el.eccentricity);
        let plane = perifocal_position(el.semi_major_axis, el.eccentricity, sol.eccentric_anomaly);
        let eci = perifocal_to_eci(plane, el.inclination, drift.raan, drift.arg_perigee);

        let expected = orbital_radius(el.semi_major_axis, el.eccentricity, sol.eccentric_anomaly);
        let rel = ((eci.length() - expected) / expected).abs();
        prop_assert!(rel < 1e-6, "relative radius error {} exceeds 1e-6", rel);
    }

    /// Geodetic latitude never exceeds the orbit inclination (or its supplement).
    #[test]
    fn prop_latitude_bounded_by_inclination(
        inclination in 0.0f64..180.0,
        arg_perigee in 0.0f64..360.0,
        mean_anomaly in 0.0f64..360.0,
    ) {
        let el = OrbitalElements::from_degrees(inclination, 0.0, 0.001, arg_perigee, mean_anomaly, 15.0).unwrap();
        let sol = solve_kepler(el.mean_anomaly, el.eccentricity);
        let plane = perifocal_position(el.semi_major_axis, el.eccentricity, sol.eccentric_anomaly);
        let geo = Geodetic::from_eci(perifocal_to_eci(plane, el.inclination, el.raan, el.arg_perigee));

        let bound = inclination.min(180.0 - inclination);
        prop_assert!(geo.latitude.abs() <= bound + 1e-9);
        prop_assert!(geo.altitude > -EARTH_RADIUS_KM);
    }

    /// Drifted mean anomaly stays in [0, 2π) for forward propagation.
    #[test]
    fn prop_mean_anomaly_wrapped(
        inclination in 0.0f64..180.0,
        t in 0.0f64..1.0e7,
    ) {
        let el = OrbitalElements::from_degrees(inclination, 0.0, 0.01, 0.0, 200.0, 15.0).unwrap();
        let drift = apply_secular_drift(&el, t);
        prop_assert!((0.0..TAU).contains(&drift.mean_anomaly));
    }

    /// J2 always slows the node for prograde orbits and speeds it for retrograde ones.
    #[test]
    fn prop_nodal_regression_sign(inclination in 0.0f64..180.0) {
        prop_assume!((inclination - 90.0).abs() > 1e-6);
        let el = OrbitalElements::from_degrees(inclination, 0.0, 0.0, 0.0, 0.0, 15.0).unwrap();
        let rates = SecularRates::from_elements(&el);
        if inclination < 90.0 {
            prop_assert!(rates.raan_rate < 0.0);
        } else {
            prop_assert!(rates.raan_rate > 0.0);
        }
    }
}
