//! Orbital dynamics for the analytic propagator.
//!
//! - `j2`: first-order J2 secular drift of Ω, ω and M
//! - `frames`: perifocal → ECI → spherical geodetic transforms
//! - speed evaluation (vis-viva) in this module

pub mod frames;
pub mod j2;

#[cfg(test)]
mod proptest_physics;

pub use frames::{Geodetic, orbital_radius, perifocal_position, perifocal_to_eci, perifocal_velocity};
pub use j2::{DriftedAngles, SecularRates, apply_secular_drift, drift_angles};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::types::MU_EARTH;

/// Formula used for the scalar speed reported with each propagated state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpeedModel {
    /// Classical vis-viva: v = √(μ(2/r − 1/a)).
    #[default]
    VisViva,
    /// Legacy quantity v = √(μ/a)·√(2/r² − 1/a), with r² = x² + y² + z².
    ///
    /// Reproduced for parity with earlier output. It is NaN whenever
    /// r² > 2a, which holds for every orbit above the Earth's surface.
    SquaredRadius,
}

impl SpeedModel {
    /// Evaluate the speed (km/s) at ECI `position` on an orbit of semi-major axis `a` (km).
    pub fn speed(self, position: DVec3, semi_major_axis: f64) -> f64 {
        match self {
            SpeedModel::VisViva => vis_viva_speed(position.length(), semi_major_axis),
            SpeedModel::SquaredRadius => {
                (MU_EARTH / semi_major_axis).sqrt()
                    * (2.0 / position.length_squared() - 1.0 / semi_major_axis).sqrt()
            }
        }
    }
}

/// Vis-viva speed (km/s) at radius `r` on an orbit with semi-major axis `a`.
pub fn vis_viva_speed(r: f64, semi_major_axis: f64) -> f64 {
    (MU_EARTH * (2.0 / r - 1.0 / semi_major_axis)).sqrt()
}
