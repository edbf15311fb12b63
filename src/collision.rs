//! Conjunction detection between tracked objects.
//!
//! Every object is propagated to its epoch state independently and in
//! parallel; then each unordered pair is compared once. A pair closer than
//! the threshold raises a `CollisionAlert`, which is handed to an `AlertSink`
//! for persistence. Sink failures are logged and counted, never fatal.
//!
//! `screen_close_approaches` extends the same pairwise comparison over a
//! shared time grid.

use chrono::{DateTime, Utc};
use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::Geodetic;
use crate::prediction::{PropagatedState, PropagationError, PropagationSettings, propagate, state_at};
use crate::tle::Tle;
use crate::types::{DEFAULT_THRESHOLD_KM, MAX_TRACKED_OBJECTS};

/// An object under surveillance, identified by the caller's id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedObject {
    pub id: String,
    pub name: String,
    pub tle_line1: String,
    pub tle_line2: String,
}

impl TrackedObject {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tle_line1: impl Into<String>,
        tle_line2: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tle_line1: tle_line1.into(),
            tle_line2: tle_line2.into(),
        }
    }

    /// Track a parsed TLE under `id`, named by its display name.
    pub fn from_tle(id: impl Into<String>, tle: &Tle) -> Self {
        Self::new(id, tle.display_name(), tle.line1.clone(), tle.line2.clone())
    }
}

/// Where an object is at the detection instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedObjectPosition {
    pub id: String,
    pub name: String,
    /// ECI position in km.
    pub position: DVec3,
    pub geodetic: Geodetic,
    /// km/s
    pub speed: f64,
}

/// A pair of objects found closer than the alert threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionAlert {
    pub object1_id: String,
    pub object1_name: String,
    pub object2_id: String,
    pub object2_name: String,
    /// Euclidean ECI distance in km.
    pub distance_km: f64,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
    pub position1: Geodetic,
    pub position2: Geodetic,
}

impl CollisionAlert {
    /// Mark the alert as handled.
    pub fn resolve(&mut self) {
        self.resolved = true;
    }
}

/// Configuration for a detection run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Alert when the distance is strictly below this (km).
    pub threshold_km: f64,
    /// Upper bound on objects per run; the comparison is O(N²).
    pub max_objects: usize,
    pub propagation: PropagationSettings,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            threshold_km: DEFAULT_THRESHOLD_KM,
            max_objects: MAX_TRACKED_OBJECTS,
            propagation: PropagationSettings::default(),
        }
    }
}

impl DetectionSettings {
    /// Default settings with a different threshold.
    pub fn with_threshold(threshold_km: f64) -> Self {
        Self {
            threshold_km,
            ..Default::default()
        }
    }

    fn check(&self, found: usize) -> Result<(), DetectionError> {
        if found < 2 {
            return Err(DetectionError::InsufficientObjects { found });
        }
        if !self.threshold_km.is_finite() || self.threshold_km <= 0.0 {
            return Err(DetectionError::InvalidThreshold(self.threshold_km));
        }
        if found > self.max_objects {
            return Err(DetectionError::TooManyObjects {
                found,
                max: self.max_objects,
            });
        }
        Ok(())
    }
}

/// Counters describing one detection run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSummary {
    pub total_objects: usize,
    pub pairs_checked: usize,
    pub alerts_generated: usize,
    pub threshold_km: f64,
    /// Alerts the sink failed to store.
    pub persist_failures: usize,
}

/// Result of a detection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub alerts: Vec<CollisionAlert>,
    pub positions: Vec<TrackedObjectPosition>,
    pub summary: DetectionSummary,
}

impl DetectionReport {
    pub fn has_collisions(&self) -> bool {
        !self.alerts.is_empty()
    }
}

/// Collision detection errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("at least two objects are required for collision detection (found {found})")]
    InsufficientObjects { found: usize },

    #[error("too many objects for one detection run: {found} (max {max})")]
    TooManyObjects { found: usize, max: usize },

    #[error("threshold must be a positive distance in km (got {0})")]
    InvalidThreshold(f64),

    #[error("failed to propagate object '{id}': {source}")]
    Propagation {
        id: String,
        #[source]
        source: PropagationError,
    },
}

/// Failure reported by an `AlertSink`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to persist alert: {0}")]
pub struct SinkError(pub String);

/// Storage for raised alerts.
///
/// Called at most once per alert, from the detecting thread.
pub trait AlertSink: Sync {
    fn persist(&self, alert: &CollisionAlert) -> Result<(), SinkError>;
}

/// Sink that drops every alert.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl AlertSink for NullSink {
    fn persist(&self, _alert: &CollisionAlert) -> Result<(), SinkError> {
        Ok(())
    }
}

fn parse_object(object: &TrackedObject) -> Result<Tle, DetectionError> {
    Tle::parse(&object.tle_line1, &object.tle_line2).map_err(|e| DetectionError::Propagation {
        id: object.id.clone(),
        source: e.into(),
    })
}

fn current_position(
    object: &TrackedObject,
    settings: &PropagationSettings,
) -> Result<TrackedObjectPosition, DetectionError> {
    let tle = parse_object(object)?;
    let state = state_at(&tle.elements, 0.0, settings);
    Ok(TrackedObjectPosition {
        id: object.id.clone(),
        name: object.name.clone(),
        position: state.position,
        geodetic: state.geodetic,
        speed: state.speed,
    })
}

/// Collect per-object results in input order, failing on the first error.
fn collect_ordered<T: Send>(
    results: impl IndexedParallelIterator<Item = Result<T, DetectionError>>,
) -> Result<Vec<T>, DetectionError> {
    let results: Vec<_> = results.collect();
    results.into_iter().collect()
}

/// Compare the epoch positions of every pair of `objects`.
///
/// Alerts are ordered by the first object's index, then the second's, and
/// stamped with `now`.
pub fn detect(
    objects: &[TrackedObject],
    settings: &DetectionSettings,
    sink: &dyn AlertSink,
    now: DateTime<Utc>,
) -> Result<DetectionReport, DetectionError> {
    settings.check(objects.len())?;

    let positions = collect_ordered(
        objects
            .par_iter()
            .map(|object| current_position(object, &settings.propagation)),
    )?;

    let mut alerts = Vec::new();
    let mut pairs_checked = 0;
    for (i, first) in positions.iter().enumerate() {
        for second in &positions[i + 1..] {
            pairs_checked += 1;
            let distance_km = first.position.distance(second.position);
            tracing::debug!(object1 = %first.id, object2 = %second.id, distance_km, "pair distance");

            if distance_km < settings.threshold_km {
                tracing::info!(
                    object1 = %first.name,
                    object2 = %second.name,
                    distance_km,
                    threshold_km = settings.threshold_km,
                    "collision alert"
                );
                alerts.push(CollisionAlert {
                    object1_id: first.id.clone(),
                    object1_name: first.name.clone(),
                    object2_id: second.id.clone(),
                    object2_name: second.name.clone(),
                    distance_km,
                    timestamp: now,
                    resolved: false,
                    position1: first.geodetic,
                    position2: second.geodetic,
                });
            }
        }
    }

    let mut persist_failures = 0;
    for alert in &alerts {
        if let Err(err) = sink.persist(alert) {
            persist_failures += 1;
            tracing::warn!(
                object1 = %alert.object1_id,
                object2 = %alert.object2_id,
                error = %err,
                "alert was raised but not stored"
            );
        }
    }

    let summary = DetectionSummary {
        total_objects: objects.len(),
        pairs_checked,
        alerts_generated: alerts.len(),
        threshold_km: settings.threshold_km,
        persist_failures,
    };
    tracing::info!(
        total_objects = summary.total_objects,
        pairs_checked = summary.pairs_checked,
        alerts = summary.alerts_generated,
        "collision detection complete"
    );

    Ok(DetectionReport {
        alerts,
        positions,
        summary,
    })
}

/// Closest sampled approach of a pair that came within the threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseApproach {
    pub object1_id: String,
    pub object1_name: String,
    pub object2_id: String,
    pub object2_name: String,
    /// Seconds after epoch of the first sample below threshold.
    pub first_breach_seconds: f64,
    pub first_breach_distance_km: f64,
    /// Seconds after epoch of the smallest sampled distance.
    pub closest_approach_seconds: f64,
    /// Grid index of the smallest sampled distance.
    pub closest_sample: usize,
    pub min_distance_km: f64,
}

fn closest_approach(
    first: (&TrackedObject, &[PropagatedState]),
    second: (&TrackedObject, &[PropagatedState]),
    threshold_km: f64,
) -> Option<CloseApproach> {
    let mut breach: Option<(f64, f64)> = None;
    let mut closest = (0, 0.0, f64::INFINITY);

    for (index, (a, b)) in first.1.iter().zip(second.1).enumerate() {
        let distance = a.distance_to(b);
        if distance < threshold_km && breach.is_none() {
            breach = Some((a.t, distance));
        }
        if distance < closest.2 {
            closest = (index, a.t, distance);
        }
    }

    let (first_breach_seconds, first_breach_distance_km) = breach?;
    Some(CloseApproach {
        object1_id: first.0.id.clone(),
        object1_name: first.0.name.clone(),
        object2_id: second.0.id.clone(),
        object2_name: second.0.name.clone(),
        first_breach_seconds,
        first_breach_distance_km,
        closest_approach_seconds: closest.1,
        closest_sample: closest.0,
        min_distance_km: closest.2,
    })
}

/// Screen every pair for approaches below threshold over `horizon_hours`.
///
/// All objects share the same grid measured from their own epochs. Returns
/// one entry per pair that breached, ordered like `detect`'s alerts.
pub fn screen_close_approaches(
    objects: &[TrackedObject],
    horizon_hours: f64,
    settings: &DetectionSettings,
) -> Result<Vec<CloseApproach>, DetectionError> {
    settings.check(objects.len())?;

    let trajectories = collect_ordered(objects.par_iter().map(|object| {
        let tle = parse_object(object)?;
        propagate(&tle.elements, horizon_hours, &settings.propagation)
            .map(|trajectory| trajectory.collect::<Vec<_>>())
            .map_err(|source| DetectionError::Propagation {
                id: object.id.clone(),
                source,
            })
    }))?;

    let pairs: Vec<(usize, usize)> = (0..objects.len())
        .flat_map(|i| (i + 1..objects.len()).map(move |j| (i, j)))
        .collect();

    let approaches: Vec<CloseApproach> = pairs
        .par_iter()
        .filter_map(|&(i, j)| {
            closest_approach(
                (&objects[i], trajectories[i].as_slice()),
                (&objects[j], trajectories[j].as_slice()),
                settings.threshold_km,
            )
        })
        .collect();

    tracing::info!(
        total_objects = objects.len(),
        pairs_checked = pairs.len(),
        horizon_hours,
        close_approaches = approaches.len(),
        "close-approach screening complete"
    );
    Ok(approaches)
}
