use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bounded tracking interval. `ended_at` stays absent while the session is
/// recording; at most one session is open at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub config_json: String,
}
