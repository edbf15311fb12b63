//! First-order J2 secular perturbation of the node, perigee and mean anomaly.
//!
//! This is a linear secular approximation: no short-period, long-period or
//! tesseral terms, and no drag.

use std::f64::consts::TAU;

use crate::ephemeris::OrbitalElements;
use crate::types::{EARTH_RADIUS_KM, J2};

/// Secular drift rates in radians per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecularRates {
    /// dΩ/dt
    pub raan_rate: f64,
    /// dω/dt
    pub arg_perigee_rate: f64,
    /// dM/dt (mean motion corrected for J2)
    pub mean_anomaly_rate: f64,
}

impl SecularRates {
    /// Compute the J2 secular rates for a set of elements.
    pub fn from_elements(elements: &OrbitalElements) -> Self {
        let e = elements.eccentricity;
        let n = elements.mean_motion_rad;
        let p = elements.semi_latus_rectum();
        let j2_factor = -1.5 * J2 * (EARTH_RADIUS_KM / p).powi(2);

        let sin_i = elements.inclination.sin();
        let sin_i_sq = sin_i * sin_i;

        Self {
            raan_rate: j2_factor * n * elements.inclination.cos(),
            arg_perigee_rate: j2_factor * n * (2.5 * sin_i_sq - 2.0),
            mean_anomaly_rate: n * (1.0 + j2_factor * (1.0 - e * e).sqrt() * (1.5 * sin_i_sq - 1.0)),
        }
    }
}

/// Angles after secular drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftedAngles {
    /// Ω' in radians, not wrapped
    pub raan: f64,
    /// ω' in radians, not wrapped
    pub arg_perigee: f64,
    /// M' in radians, truncated remainder of 2π
    pub mean_anomaly: f64,
}

/// Apply secular drift for `t` seconds since epoch using precomputed rates.
///
/// Only the mean anomaly is reduced modulo 2π. Ω and ω accumulate freely.
pub fn drift_angles(elements: &OrbitalElements, rates: &SecularRates, t: f64) -> DriftedAngles {
    DriftedAngles {
        raan: elements.raan + rates.raan_rate * t,
        arg_perigee: elements.arg_perigee + rates.arg_perigee_rate * t,
        mean_anomaly: (elements.mean_anomaly + rates.mean_anomaly_rate * t) % TAU,
    }
}

/// Apply secular drift for `t` seconds since epoch.
pub fn apply_secular_drift(elements: &OrbitalElements, t: f64) -> DriftedAngles {
    drift_angles(elements, &SecularRates::from_elements(elements), t)
}
