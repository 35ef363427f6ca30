use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingested location fix. `seq` is assigned at ingestion time and orders
/// points within a session independent of the storage row id. `raw_json`
/// carries the full original fix plus battery/app-state context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub id: Option<i64>,
    pub session_id: String,
    pub seq: u64,
    pub ts: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub acc: Option<f64>,
    pub alt: Option<f64>,
    pub altitude_accuracy: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub raw_json: String,
}

/// Most-recent-point summary for UI polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointSnapshot {
    pub ts: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub acc: Option<f64>,
}

/// Min/max fix timestamps of a session's points; both absent when the session
/// has no points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBounds {
    pub first_ts: Option<DateTime<Utc>>,
    pub last_ts: Option<DateTime<Utc>>,
}
