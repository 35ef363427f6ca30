use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    db::{models::LogEntry, Database},
    platform::{LocationService, LOCATION_TASK_ID},
    tracking::RuntimeStateLedger,
};

const RECENT_LOG_LIMIT: u32 = 20;

/// Point-in-time snapshot of everything useful when debugging background
/// behavior after the fact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsDump {
    pub platform: String,
    pub app_version: String,
    pub database_path: PathBuf,
    pub location_subscribed: bool,
    pub active_session_id: Option<String>,
    pub last_update_ts: Option<DateTime<Utc>>,
    pub seq: u64,
    pub last_task_error: String,
    pub recent_logs: Vec<LogEntry>,
}

pub async fn collect_diagnostics(
    db: &Database,
    location: &dyn LocationService,
) -> Result<DiagnosticsDump> {
    let ledger = RuntimeStateLedger::new(db.clone());
    let runtime = ledger.runtime_state().await?;

    Ok(DiagnosticsDump {
        platform: std::env::consts::OS.to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        database_path: db.path().to_path_buf(),
        location_subscribed: location.is_subscribed(LOCATION_TASK_ID)?,
        active_session_id: runtime.active_session_id,
        last_update_ts: runtime.last_update_ts,
        seq: runtime.seq,
        last_task_error: ledger
            .last_error()
            .await?
            .unwrap_or_else(|| "none".to_string()),
        recent_logs: db.get_recent_logs(RECENT_LOG_LIMIT).await?,
    })
}
