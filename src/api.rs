//! Call contracts for collaborators (web handlers, jobs, the CLI).
//!
//! Inputs are raw TLE lines; outputs are serde records in camelCase with
//! angles in degrees, distances in km and ISO-8601 UTC timestamps.

use chrono::{DateTime, Utc};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::collision::{
    AlertSink, DetectionError, DetectionReport, DetectionSettings, NullSink, TrackedObject, detect,
};
use crate::prediction::{PropagatedState, PropagationError, PropagationSettings, Trajectory};
use crate::time::{offset, to_iso8601};
use crate::tle::{Tle, TleError, parse_catalog};
use crate::types::{RAD_TO_DEG, SECONDS_PER_HOUR};

/// Cartesian triple as `{x, y, z}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<DVec3> for Cartesian {
    fn from(v: DVec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// Drifted elements of one sample, angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalElementsDeg {
    /// km
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,
}

/// One predicted sample as delivered to collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// ISO-8601 UTC.
    pub time: String,
    /// Elapsed hours, two decimals.
    pub hours: String,
    pub latitude: f64,
    pub longitude: f64,
    /// km above the spherical Earth.
    pub altitude: f64,
    /// Scalar speed in km/s.
    pub velocity: f64,
    /// ECI position in km.
    pub position: Cartesian,
    /// ECI velocity in km/s.
    pub velocity_vector: Cartesian,
    pub orbital_elements: OrbitalElementsDeg,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationSummary {
    pub total_predictions: usize,
    pub time_span: String,
    pub time_step: String,
    /// Samples whose Kepler solve hit the iteration cap.
    pub unconverged_steps: usize,
    /// Instant that `t = 0` is mapped to.
    pub anchor: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationResponse {
    pub predictions: Vec<Prediction>,
    pub summary: PropagationSummary,
}

/// Predict a satellite's track over `horizon_hours` with default settings.
///
/// Timestamps start at the TLE epoch, or at the current time when line 1
/// carries no readable epoch.
pub fn propagate(line1: &str, line2: &str, horizon_hours: f64) -> Result<PropagationResponse, PropagationError> {
    let tle = Tle::parse(line1, line2)?;
    let anchor = tle.epoch.unwrap_or_else(Utc::now);
    propagate_tle(&tle, horizon_hours, anchor, &PropagationSettings::default())
}

/// Deterministic variant of [`propagate`] with an explicit anchor and settings.
pub fn propagate_at(
    line1: &str,
    line2: &str,
    horizon_hours: f64,
    anchor: DateTime<Utc>,
    settings: &PropagationSettings,
) -> Result<PropagationResponse, PropagationError> {
    let tle = Tle::parse(line1, line2)?;
    propagate_tle(&tle, horizon_hours, anchor, settings)
}

fn propagate_tle(
    tle: &Tle,
    horizon_hours: f64,
    anchor: DateTime<Utc>,
    settings: &PropagationSettings,
) -> Result<PropagationResponse, PropagationError> {
    let mut trajectory = Trajectory::new(tle.elements, horizon_hours, *settings)?;
    let predictions = trajectory
        .by_ref()
        .map(|state| to_prediction(tle, &state, anchor))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        object = %tle.display_name(),
        samples = predictions.len(),
        unconverged = trajectory.unconverged(),
        "propagation complete"
    );

    Ok(PropagationResponse {
        summary: PropagationSummary {
            total_predictions: predictions.len(),
            time_span: format!("{horizon_hours} hours"),
            time_step: describe_step(settings.step_seconds),
            unconverged_steps: trajectory.unconverged(),
            anchor: to_iso8601(anchor),
        },
        predictions,
    })
}

fn to_prediction(tle: &Tle, state: &PropagatedState, anchor: DateTime<Utc>) -> Result<Prediction, PropagationError> {
    let instant = offset(anchor, state.t).ok_or(PropagationError::TimeOutOfRange(state.t))?;
    let el = &tle.elements;
    Ok(Prediction {
        time: to_iso8601(instant),
        hours: format!("{:.2}", state.t / SECONDS_PER_HOUR),
        latitude: state.geodetic.latitude,
        longitude: state.geodetic.longitude,
        altitude: state.geodetic.altitude,
        velocity: state.speed,
        position: state.position.into(),
        velocity_vector: state.velocity.into(),
        orbital_elements: OrbitalElementsDeg {
            semi_major_axis: el.semi_major_axis,
            eccentricity: el.eccentricity,
            inclination: el.inclination * RAD_TO_DEG,
            raan: state.raan * RAD_TO_DEG,
            argument_of_perigee: state.arg_perigee * RAD_TO_DEG,
            mean_anomaly: state.mean_anomaly * RAD_TO_DEG,
        },
    })
}

fn describe_step(step_seconds: f64) -> String {
    if step_seconds % 60.0 == 0.0 {
        format!("{} minutes", step_seconds / 60.0)
    } else {
        format!("{step_seconds} seconds")
    }
}

/// Compare the current positions of `objects` at `threshold_km`.
///
/// Alerts are stamped with the current time and not persisted.
pub fn detect_collisions(objects: &[TrackedObject], threshold_km: f64) -> Result<DetectionReport, DetectionError> {
    detect_collisions_with(objects, &DetectionSettings::with_threshold(threshold_km), &NullSink, Utc::now())
}

/// Full variant of [`detect_collisions`].
pub fn detect_collisions_with(
    objects: &[TrackedObject],
    settings: &DetectionSettings,
    sink: &dyn AlertSink,
    now: DateTime<Utc>,
) -> Result<DetectionReport, DetectionError> {
    detect(objects, settings, sink, now)
}

/// Parse a TLE catalog into tracked objects.
///
/// Ids are NORAD numbers where readable, else the 1-based position in the catalog.
pub fn tracked_objects_from_catalog(text: &str) -> Result<Vec<TrackedObject>, TleError> {
    Ok(parse_catalog(text)?
        .iter()
        .enumerate()
        .map(|(i, tle)| {
            let id = tle.norad_id.map_or_else(|| format!("#{}", i + 1), |id| id.to_string());
            TrackedObject::from_tle(id, tle)
        })
        .collect())
}
