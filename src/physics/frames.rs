//! Perifocal → ECI → geodetic coordinate transforms.
//!
//! The geodetic conversion assumes a spherical Earth of radius
//! `EARTH_RADIUS_KM`. Against WGS-84 this overstates altitude by up to
//! ~21 km near the poles and reports geocentric rather than geodetic
//! latitude (difference up to ~0.19°). Longitude is measured in the inertial
//! frame; no Earth rotation is applied.

use glam::{DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::types::{EARTH_RADIUS_KM, MU_EARTH, RAD_TO_DEG};

/// Latitude/longitude/altitude over a spherical Earth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, (-180, 180]
    pub longitude: f64,
    /// Altitude above the sphere in km
    pub altitude: f64,
}

impl Geodetic {
    /// Convert an ECI position (km) to latitude, longitude and altitude.
    pub fn from_eci(position: DVec3) -> Self {
        let r = position.length();
        Self {
            latitude: (position.z / r).asin() * RAD_TO_DEG,
            longitude: position.y.atan2(position.x) * RAD_TO_DEG,
            altitude: r - EARTH_RADIUS_KM,
        }
    }
}

/// Position in the orbital plane (perifocal frame, km), x toward perigee.
pub fn perifocal_position(semi_major_axis: f64, eccentricity: f64, eccentric_anomaly: f64) -> DVec2 {
    let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
    DVec2::new(
        semi_major_axis * (cos_e - eccentricity),
        semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt() * sin_e,
    )
}

/// Velocity in the orbital plane (perifocal frame, km/s).
pub fn perifocal_velocity(semi_major_axis: f64, eccentricity: f64, eccentric_anomaly: f64) -> DVec2 {
    let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
    let r = orbital_radius(semi_major_axis, eccentricity, eccentric_anomaly);
    let scale = (MU_EARTH * semi_major_axis).sqrt() / r;
    DVec2::new(-sin_e, (1.0 - eccentricity * eccentricity).sqrt() * cos_e) * scale
}

/// Distance from Earth's center, r = a(1 − e·cos E), in km.
pub fn orbital_radius(semi_major_axis: f64, eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity * eccentric_anomaly.cos())
}

/// 3-1-3 rotation R3(Ω)·R1(i)·R3(ω) from perifocal to ECI.
pub fn perifocal_to_eci_matrix(inclination: f64, raan: f64, arg_perigee: f64) -> DMat3 {
    DMat3::from_rotation_z(raan) * DMat3::from_rotation_x(inclination) * DMat3::from_rotation_z(arg_perigee)
}

/// Rotate an orbital-plane vector into the ECI frame.
pub fn perifocal_to_eci(vector: DVec2, inclination: f64, raan: f64, arg_perigee: f64) -> DVec3 {
    perifocal_to_eci_matrix(inclination, raan, arg_perigee) * vector.extend(0.0)
}
