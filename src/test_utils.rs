//! Test utilities for propagation and conjunction tests.
//!
//! Provides element fixtures, a fixed-column TLE builder, and assertions for
//! geometric invariants of propagated states.

use crate::ephemeris::OrbitalElements;

/// Fixtures for creating test orbits and TLE lines.
pub mod fixtures {
    use super::*;

    /// ISS-like elements: 51.64°, near-circular, ~420 km.
    pub fn iss_elements() -> OrbitalElements {
        OrbitalElements::from_degrees(51.64, 208.5, 0.0007417, 68.0, 292.1, 15.4956).unwrap()
    }

    /// A moderately eccentric LEO/MEO orbit (e = 0.1, perigee ~870 km).
    pub fn eccentric_elements() -> OrbitalElements {
        OrbitalElements::from_degrees(63.4, 40.0, 0.1, 270.0, 30.0, 12.0).unwrap()
    }

    /// Line 1 with the given catalog number and an epoch of 2024-01-01 12:00 UTC.
    pub fn line1(norad_id: u32) -> String {
        format!("1 {norad_id:05}U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9990")
    }

    /// Line 2 with the six elements at their fixed columns (69 characters).
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

    /// Circular ISS-altitude line 2 at the given RAAN and mean anomaly.
    pub fn circular_line2(norad_id: u32, raan_deg: f64, mean_anomaly_deg: f64) -> String {
        line2(norad_id, 51.6, raan_deg, 0.0, 0.0, mean_anomaly_deg, 15.5)
    }
}

/// Assertions for verifying propagated states.
pub mod assertions {
    use glam::DVec3;

    /// Assert every component of a vector is finite.
    ///
    /// # Panics
    /// Panics if any component is NaN or infinite.
    pub fn assert_finite(v: DVec3, what: &str) {
        assert!(v.is_finite(), "{what} is not finite: {v:?}");
    }

    /// Number of unordered pairs among `n` objects.
    pub fn pair_count(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::Tle;
    use approx::assert_relative_eq;

    #[test]
    fn test_line2_builder_is_fixed_width() {
        let line = fixtures::line2(25544, 51.64, 208.5, 0.0007417, 68.0, 292.1, 15.4956);
        assert_eq!(line.len(), 69);
        assert_eq!(&line[8..16], " 51.6400");
        assert_eq!(&line[26..33], "0007417");
        assert_eq!(&line[52..63], "15.49560000");
    }

    #[test]
    fn test_builder_round_trips_through_parser() {
        let tle = Tle::parse(
            &fixtures::line1(12345),
            &fixtures::line2(12345, 98.2, 359.9999, 0.0123, 10.0, 350.0, 14.2),
        )
        .unwrap();
        assert_eq!(tle.norad_id, Some(12345));
        assert_relative_eq!(tle.elements.raan.to_degrees(), 359.9999, epsilon = 1e-9);
        assert_relative_eq!(tle.elements.eccentricity, 0.0123, epsilon = 1e-12);
        assert!(tle.epoch.is_some());
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(assertions::pair_count(0), 0);
        assert_eq!(assertions::pair_count(1), 0);
        assert_eq!(assertions::pair_count(10), 45);
    }
}
