//! Common test utilities for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use leo_conjunction::collision::TrackedObject;
use leo_conjunction::types::{EARTH_RADIUS_KM, rev_per_day_to_rad_per_sec, semi_major_axis_from_mean_motion};

/// Mean motion of the circular test orbits (rev/day).
pub const MEAN_MOTION: f64 = 15.5;

/// Fixed detection instant.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// TLE line 1 with an epoch of 2024-01-01 12:00 UTC.
pub fn line1(norad_id: u32) -> String {
    format!("1 {norad_id:05}U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9990")
}

/// TLE line 2 with the elements at their fixed columns.
pub fn line2(
    norad_id: u32,
    inclination_deg: f64,
    raan_deg: f64,
    eccentricity: f64,
    arg_perigee_deg: f64,
    mean_anomaly_deg: f64,
    mean_motion: f64,
) -> String {
    let ecc_digits = (eccentricity * 1e7).round() as u64;
    format!(
        "2 {norad_id:05} {inclination_deg:8.4} {raan_deg:8.4} {ecc_digits:07} {arg_perigee_deg:8.4} {mean_anomaly_deg:8.4} {mean_motion:11.8}000010"
    )
}

/// Circular 51.6° object at the given RAAN and mean anomaly.
pub fn circular_object(norad_id: u32, name: &str, raan_deg: f64, mean_anomaly_deg: f64) -> TrackedObject {
    TrackedObject::new(
        norad_id.to_string(),
        name,
        line1(norad_id),
        line2(norad_id, 51.6, raan_deg, 0.0, 0.0, mean_anomaly_deg, MEAN_MOTION),
    )
}

/// Mean-anomaly offset (degrees) placing two co-orbital circular objects `km` apart.
pub fn along_track_offset_deg(km: f64) -> f64 {
    let a = semi_major_axis();
    2.0 * (km / (2.0 * a)).asin().to_degrees()
}

/// Semi-major axis of the circular test orbits (km).
pub fn semi_major_axis() -> f64 {
    semi_major_axis_from_mean_motion(rev_per_day_to_rad_per_sec(MEAN_MOTION))
}

/// Altitude of the circular test orbits (km).
pub fn circular_altitude() -> f64 {
    semi_major_axis() - EARTH_RADIUS_KM
}
