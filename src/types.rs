//! Physical constants and unit conversions for near-Earth orbital mechanics.
//!
//! All distances are kilometers and all times are seconds unless a name says
//! otherwise.

/// Earth's standard gravitational parameter (km³/s²)
pub const MU_EARTH: f64 = 398600.4418;

/// Second zonal harmonic of Earth's gravity field (dimensionless)
pub const J2: f64 = 1.08262668e-3;

/// Earth's equatorial radius in km.
///
/// The geodetic conversion treats Earth as a sphere of this radius.
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Seconds per hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Fixed propagation grid spacing (5 minutes).
pub const PROPAGATION_STEP_SECONDS: f64 = 300.0;

/// Default close-approach threshold in km.
pub const DEFAULT_THRESHOLD_KM: f64 = 50.0;

/// Largest catalog the pairwise detector accepts by default.
///
/// Detection is O(N²) with no spatial index.
pub const MAX_TRACKED_OBJECTS: usize = 10;

/// Convert mean motion in revolutions per day to radians per second.
pub fn rev_per_day_to_rad_per_sec(rev_per_day: f64) -> f64 {
    rev_per_day * std::f64::consts::TAU / SECONDS_PER_DAY
}

/// Semi-major axis (km) from mean motion (rad/s): a = (μ / n²)^(1/3)
pub fn semi_major_axis_from_mean_motion(mean_motion_rad: f64) -> f64 {
    (MU_EARTH / (mean_motion_rad * mean_motion_rad)).cbrt()
}
