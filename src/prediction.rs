//! Trajectory prediction on a fixed time grid.
//!
//! Each sample applies the J2 secular drift, solves Kepler's equation and
//! transforms the result to ECI and geodetic coordinates. The trajectory is a
//! lazy, finite iterator over `t = 0, Δt, 2Δt, … ≤ horizon`. It holds no shared
//! state, so it can be cloned to restart and run on any thread.

use std::iter::FusedIterator;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::ephemeris::{KeplerSolver, OrbitalElements};
use crate::physics::frames::perifocal_to_eci_matrix;
use crate::physics::{Geodetic, SecularRates, SpeedModel, drift_angles, perifocal_position, perifocal_velocity};
use crate::tle::TleError;
use crate::types::{PROPAGATION_STEP_SECONDS, SECONDS_PER_HOUR};

/// Longest accepted prediction horizon (one year).
///
/// The secular model carries no drag, so longer runs are not meaningful.
pub const MAX_HORIZON_HOURS: f64 = 8760.0;

/// Upper bound on samples in one trajectory, whatever the step size.
pub const MAX_SAMPLES: u64 = 1_000_000;

/// Configuration for trajectory prediction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationSettings {
    /// Grid spacing in seconds.
    pub step_seconds: f64,
    /// Newton settings for Kepler's equation.
    pub kepler: KeplerSolver,
    /// Formula for the reported scalar speed.
    pub speed_model: SpeedModel,
}

impl Default for PropagationSettings {
    fn default() -> Self {
        Self {
            step_seconds: PROPAGATION_STEP_SECONDS,
            kepler: KeplerSolver::default(),
            speed_model: SpeedModel::default(),
        }
    }
}

/// Errors raised before any sample is produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PropagationError {
    #[error("invalid TLE: {0}")]
    Tle(#[from] TleError),

    #[error("prediction horizon must be a finite, non-negative number of hours (got {0})")]
    InvalidHorizon(f64),

    #[error("step size must be positive and finite (got {0} s)")]
    InvalidStep(f64),

    #[error("{samples} samples exceed the limit of {max} per trajectory")]
    TooManySamples { samples: f64, max: u64 },

    #[error("sample at {0} s after the anchor is outside the representable time range")]
    TimeOutOfRange(f64),
}

/// One sample of a predicted trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropagatedState {
    /// Seconds since the TLE epoch.
    pub t: f64,
    /// Drifted RAAN in radians (not wrapped).
    pub raan: f64,
    /// Drifted argument of perigee in radians (not wrapped).
    pub arg_perigee: f64,
    /// Drifted mean anomaly in radians, [0, 2π) for t ≥ 0.
    pub mean_anomaly: f64,
    /// Eccentric anomaly in radians.
    pub eccentric_anomaly: f64,
    /// Whether the Kepler solve converged.
    pub converged: bool,
    /// ECI position in km.
    pub position: DVec3,
    /// ECI velocity in km/s.
    pub velocity: DVec3,
    /// Spherical-Earth latitude/longitude/altitude.
    pub geodetic: Geodetic,
    /// Scalar speed in km/s per the configured `SpeedModel`.
    pub speed: f64,
}

impl PropagatedState {
    /// Distance between two states in km.
    pub fn distance_to(&self, other: &PropagatedState) -> f64 {
        self.position.distance(other.position)
    }
}

/// Compute the state `t` seconds after epoch.
pub fn state_at(elements: &OrbitalElements, t: f64, settings: &PropagationSettings) -> PropagatedState {
    evaluate(elements, &SecularRates::from_elements(elements), t, settings)
}

fn evaluate(
    elements: &OrbitalElements,
    rates: &SecularRates,
    t: f64,
    settings: &PropagationSettings,
) -> PropagatedState {
    let a = elements.semi_major_axis;
    let e = elements.eccentricity;

    let drifted = drift_angles(elements, rates, t);
    let kepler = settings.kepler.solve(drifted.mean_anomaly, e);
    let big_e = kepler.eccentric_anomaly;

    let rotation = perifocal_to_eci_matrix(elements.inclination, drifted.raan, drifted.arg_perigee);
    let position = rotation * perifocal_position(a, e, big_e).extend(0.0);
    let velocity = rotation * perifocal_velocity(a, e, big_e).extend(0.0);

    PropagatedState {
        t,
        raan: drifted.raan,
        arg_perigee: drifted.arg_perigee,
        mean_anomaly: drifted.mean_anomaly,
        eccentric_anomaly: big_e,
        converged: kepler.converged,
        position,
        velocity,
        geodetic: Geodetic::from_eci(position),
        speed: settings.speed_model.speed(position, a),
    }
}

/// Index of the last grid step for a horizon: floor(hours·3600 / step).
pub fn last_step_index(horizon_hours: f64, step_seconds: f64) -> Result<u64, PropagationError> {
    if !step_seconds.is_finite() || step_seconds <= 0.0 {
        return Err(PropagationError::InvalidStep(step_seconds));
    }
    if !horizon_hours.is_finite() || !(0.0..=MAX_HORIZON_HOURS).contains(&horizon_hours) {
        return Err(PropagationError::InvalidHorizon(horizon_hours));
    }
    let last = (horizon_hours * SECONDS_PER_HOUR / step_seconds).floor();
    if last + 1.0 > MAX_SAMPLES as f64 {
        return Err(PropagationError::TooManySamples {
            samples: last + 1.0,
            max: MAX_SAMPLES,
        });
    }
    Ok(last as u64)
}

/// Lazy iterator over the predicted states of one object.
#[derive(Clone, Debug)]
pub struct Trajectory {
    elements: OrbitalElements,
    rates: SecularRates,
    settings: PropagationSettings,
    next_step: u64,
    last_step: u64,
    unconverged: usize,
}

impl Trajectory {
    /// Create a trajectory covering `horizon_hours` from the epoch.
    pub fn new(
        elements: OrbitalElements,
        horizon_hours: f64,
        settings: PropagationSettings,
    ) -> Result<Self, PropagationError> {
        let last_step = last_step_index(horizon_hours, settings.step_seconds)?;
        Ok(Self {
            rates: SecularRates::from_elements(&elements),
            elements,
            settings,
            next_step: 0,
            last_step,
            unconverged: 0,
        })
    }

    /// A fresh iterator over the same grid, starting again at t = 0.
    pub fn restart(&self) -> Self {
        Self {
            next_step: 0,
            unconverged: 0,
            ..self.clone()
        }
    }

    /// Elements this trajectory is propagated from.
    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Settings used for every sample.
    pub fn settings(&self) -> &PropagationSettings {
        &self.settings
    }

    /// Samples emitted so far whose Kepler solve hit the iteration cap.
    pub fn unconverged(&self) -> usize {
        self.unconverged
    }

    /// Total number of samples on the grid, including t = 0.
    pub fn total_samples(&self) -> u64 {
        self.last_step + 1
    }

    /// Elapsed time of the final sample in seconds.
    pub fn end_time(&self) -> f64 {
        self.last_step as f64 * self.settings.step_seconds
    }
}

impl Iterator for Trajectory {
    type Item = PropagatedState;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_step > self.last_step {
            return None;
        }
        let t = self.next_step as f64 * self.settings.step_seconds;
        self.next_step += 1;
        let state = evaluate(&self.elements, &self.rates, t, &self.settings);
        if !state.converged {
            self.unconverged += 1;
        }
        Some(state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last_step + 1).saturating_sub(self.next_step);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Trajectory {}

impl FusedIterator for Trajectory {}

/// Propagate `elements` over `horizon_hours` on the configured grid.
pub fn propagate(
    elements: &OrbitalElements,
    horizon_hours: f64,
    settings: &PropagationSettings,
) -> Result<Trajectory, PropagationError> {
    Trajectory::new(*elements, horizon_hours, *settings)
}
