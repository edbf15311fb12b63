//! Mean orbital elements of an Earth satellite.
//!
//! `OrbitalElements` is built once per TLE and never mutated afterwards.
//! Construction validates the bound-orbit domain every numerical routine
//! downstream relies on: `0 ≤ e < 1`, finite angles, positive mean motion and
//! a semi-major axis above Earth's surface.

pub mod kepler;

#[cfg(test)]
mod proptest_ephemeris;

pub use kepler::{KeplerSolution, KeplerSolver, solve_kepler};

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::types::{
    DEG_TO_RAD, EARTH_RADIUS_KM, RAD_TO_DEG, rev_per_day_to_rad_per_sec,
    semi_major_axis_from_mean_motion,
};

/// Elements outside the domain of the bound-orbit model.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("eccentricity {0} outside [0, 1)")]
    Eccentricity(f64),

    #[error("semi-major axis {semi_major_axis_km:.3} km is inside the Earth")]
    SubsurfaceOrbit { semi_major_axis_km: f64 },

    #[error("non-finite orbital element '{field}'")]
    NonFinite { field: &'static str },
}

/// Classical orbital elements at the TLE epoch.
///
/// Angles are radians, distances km, mean motion both rev/day (as published)
/// and rad/s (as used by the dynamics). Only the validating constructors
/// build a value, and deserialization goes through the same checks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElements")]
pub struct OrbitalElements {
    /// Inclination in radians, [0, π]
    pub(crate) inclination: f64,
    /// Right ascension of the ascending node in radians
    pub(crate) raan: f64,
    /// Eccentricity, [0, 1)
    pub(crate) eccentricity: f64,
    /// Argument of perigee in radians
    pub(crate) arg_perigee: f64,
    /// Mean anomaly at epoch in radians
    pub(crate) mean_anomaly: f64,
    /// Mean motion in revolutions per day
    pub(crate) mean_motion: f64,
    /// Mean motion in radians per second
    pub(crate) mean_motion_rad: f64,
    /// Semi-major axis in km
    pub(crate) semi_major_axis: f64,
}

/// Serialized form of `OrbitalElements`; derived fields are recomputed.
#[derive(Deserialize)]
struct RawElements {
    inclination: f64,
    raan: f64,
    eccentricity: f64,
    arg_perigee: f64,
    mean_anomaly: f64,
    mean_motion: f64,
}

impl TryFrom<RawElements> for OrbitalElements {
    type Error = DomainError;

    fn try_from(raw: RawElements) -> Result<Self, Self::Error> {
        Self::from_radians(
            raw.inclination,
            raw.raan,
            raw.eccentricity,
            raw.arg_perigee,
            raw.mean_anomaly,
            raw.mean_motion,
        )
    }
}

impl OrbitalElements {
    /// Build elements from TLE-style values (angles in degrees, mean motion in rev/day).
    ///
    /// Mean motion must already be known to be positive; the TLE parser
    /// reports that case as a parse failure before getting here.
    pub fn from_degrees(
        inclination_deg: f64,
        raan_deg: f64,
        eccentricity: f64,
        arg_perigee_deg: f64,
        mean_anomaly_deg: f64,
        mean_motion_rev_day: f64,
    ) -> Result<Self, DomainError> {
        Self::from_radians(
            inclination_deg * DEG_TO_RAD,
            raan_deg * DEG_TO_RAD,
            eccentricity,
            arg_perigee_deg * DEG_TO_RAD,
            mean_anomaly_deg * DEG_TO_RAD,
            mean_motion_rev_day,
        )
    }

    /// Build elements from angles in radians and mean motion in rev/day.
    pub fn from_radians(
        inclination: f64,
        raan: f64,
        eccentricity: f64,
        arg_perigee: f64,
        mean_anomaly: f64,
        mean_motion_rev_day: f64,
    ) -> Result<Self, DomainError> {
        for (field, value) in [
            ("inclination", inclination),
            ("raan", raan),
            ("eccentricity", eccentricity),
            ("arg_perigee", arg_perigee),
            ("mean_anomaly", mean_anomaly),
            ("mean_motion", mean_motion_rev_day),
        ] {
            if !value.is_finite() {
                return Err(DomainError::NonFinite { field });
            }
        }

        if !(0.0..1.0).contains(&eccentricity) {
            return Err(DomainError::Eccentricity(eccentricity));
        }

        let mean_motion_rad = rev_per_day_to_rad_per_sec(mean_motion_rev_day);
        let semi_major_axis = semi_major_axis_from_mean_motion(mean_motion_rad);
        if !semi_major_axis.is_finite() || semi_major_axis <= EARTH_RADIUS_KM {
            return Err(DomainError::SubsurfaceOrbit {
                semi_major_axis_km: semi_major_axis,
            });
        }

        Ok(Self {
            inclination,
            raan,
            eccentricity,
            arg_perigee,
            mean_anomaly,
            mean_motion: mean_motion_rev_day,
            mean_motion_rad,
            semi_major_axis,
        })
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn raan(&self) -> f64 {
        self.raan
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn arg_perigee(&self) -> f64 {
        self.arg_perigee
    }

    /// Mean anomaly at epoch (radians).
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// Mean motion as published (rev/day).
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Mean motion in rad/s.
    pub fn mean_motion_rad(&self) -> f64 {
        self.mean_motion_rad
    }

    /// Semi-major axis in km.
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Semi-latus rectum p = a(1 − e²) in km.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Unperturbed orbital period in seconds.
    pub fn period_seconds(&self) -> f64 {
        TAU / self.mean_motion_rad
    }

    /// Perigee altitude above the spherical Earth (km).
    pub fn perigee_altitude(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity) - EARTH_RADIUS_KM
    }

    /// Apogee altitude above the spherical Earth (km).
    pub fn apogee_altitude(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity) - EARTH_RADIUS_KM
    }

    /// Inclination in degrees.
    pub fn inclination_deg(&self) -> f64 {
        self.inclination * RAD_TO_DEG
    }
}
