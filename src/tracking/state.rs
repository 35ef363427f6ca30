use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{helpers::parse_datetime, Database, LAST_ERROR_KEY};

use super::config::TrackingConfig;

const ACTIVE_SESSION_KEY: &str = "activeSessionId";
const SEQUENCE_KEY: &str = "seq";
const LAST_UPDATE_KEY: &str = "lastUpdateTs";
const CONFIG_KEY: &str = "config";

/// Snapshot of the ledger fields the UI polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeState {
    pub active_session_id: Option<String>,
    pub last_update_ts: Option<DateTime<Utc>>,
    pub seq: u64,
}

/// Typed accessors over the persisted kv table.
///
/// This is the only carrier of cross-invocation tracking state: the background
/// callback may run in a freshly spawned process, so nothing here is cached in
/// memory. Absent keys read as empty values, never as faults.
#[derive(Clone)]
pub struct RuntimeStateLedger {
    db: Database,
}

impl RuntimeStateLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn active_session_id(&self) -> Result<Option<String>> {
        Ok(self
            .db
            .get_kv(ACTIVE_SESSION_KEY)
            .await?
            .filter(|id| !id.is_empty()))
    }

    pub async fn set_active_session_id(&self, session_id: &str) -> Result<()> {
        self.db.set_kv(ACTIVE_SESSION_KEY, session_id).await
    }

    /// Clears the active marker by writing the empty sentinel; the key itself
    /// is never deleted.
    pub async fn clear_active_session_id(&self) -> Result<()> {
        self.db.set_kv(ACTIVE_SESSION_KEY, "").await
    }

    pub async fn sequence(&self) -> Result<u64> {
        match self.db.get_kv(SEQUENCE_KEY).await? {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("persisted sequence {raw:?} is not a number")),
            None => Ok(0),
        }
    }

    pub async fn set_sequence(&self, seq: u64) -> Result<()> {
        self.db.set_kv(SEQUENCE_KEY, &seq.to_string()).await
    }

    pub async fn last_update(&self) -> Result<Option<DateTime<Utc>>> {
        match self.db.get_kv(LAST_UPDATE_KEY).await? {
            Some(raw) => parse_datetime(&raw, LAST_UPDATE_KEY).map(Some),
            None => Ok(None),
        }
    }

    pub async fn set_last_update(&self, ts: DateTime<Utc>) -> Result<()> {
        self.db.set_kv(LAST_UPDATE_KEY, &ts.to_rfc3339()).await
    }

    pub async fn active_config(&self) -> Result<Option<TrackingConfig>> {
        match self.db.get_kv(CONFIG_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .context("persisted tracking config is not valid JSON")
                .map(Some),
            None => Ok(None),
        }
    }

    pub async fn set_active_config(&self, config: &TrackingConfig) -> Result<()> {
        let serialized =
            serde_json::to_string(config).context("failed to serialize tracking config")?;
        self.db.set_kv(CONFIG_KEY, &serialized).await
    }

    pub async fn last_error(&self) -> Result<Option<String>> {
        self.db.get_kv(LAST_ERROR_KEY).await
    }

    pub async fn runtime_state(&self) -> Result<RuntimeState> {
        Ok(RuntimeState {
            active_session_id: self.active_session_id().await?,
            last_update_ts: self.last_update().await?,
            seq: self.sequence().await?,
        })
    }
}
