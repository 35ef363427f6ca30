use serde::{Deserialize, Serialize};

/// Parameters a tracking session is started with. Serialized onto the session
/// row and into the runtime ledger so a later background invocation can
/// recover them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingConfig {
    pub time_interval_ms: u64,
    pub distance_interval_m: f64,
    pub deferred_updates_interval_ms: u64,
    pub deferred_updates_distance_m: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            time_interval_ms: 5000,
            distance_interval_m: 5.0,
            deferred_updates_interval_ms: 15_000,
            deferred_updates_distance_m: 20.0,
        }
    }
}
