use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::{
    db::{
        models::{LogLevel, Session},
        Database,
    },
    platform::{
        ForegroundServiceDescriptor, LocationAccuracy, LocationService, SubscriptionOptions,
        LOCATION_TASK_ID,
    },
};

use super::{
    config::TrackingConfig,
    state::{RuntimeState, RuntimeStateLedger},
};

/// Starts and stops tracking sessions and reconciles the runtime ledger. The
/// platform subscription status, not local state, is the source of truth for
/// whether tracking is running.
#[derive(Clone)]
pub struct TrackingController {
    db: Database,
    ledger: RuntimeStateLedger,
    location: Arc<dyn LocationService>,
}

impl TrackingController {
    pub fn new(db: Database, location: Arc<dyn LocationService>) -> Self {
        let ledger = RuntimeStateLedger::new(db.clone());
        Self {
            db,
            ledger,
            location,
        }
    }

    /// Creates the session record, primes the ledger, and registers the
    /// background subscription. Callers are expected to check [`is_running`]
    /// first; a second `start` while running registers a second subscription
    /// and relies on the platform to coalesce it.
    ///
    /// [`is_running`]: TrackingController::is_running
    pub async fn start_tracking(&self, config: TrackingConfig) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let config_json =
            serde_json::to_string(&config).context("failed to serialize tracking config")?;

        self.ledger.set_active_session_id(&session_id).await?;
        self.ledger.set_sequence(0).await?;
        self.ledger.set_last_update(started_at).await?;
        self.ledger.set_active_config(&config).await?;

        self.db
            .insert_session(&Session {
                id: session_id.clone(),
                started_at,
                ended_at: None,
                config_json,
            })
            .await?;

        self.location
            .subscribe(LOCATION_TASK_ID, &subscription_options(&config))?;

        info!("tracking session started: {session_id}");
        self.db
            .append_log(
                LogLevel::Info,
                "tracking",
                &format!("session started: {session_id}"),
                None,
            )
            .await?;

        Ok(session_id)
    }

    /// Unregisters the subscription and seals the active session. A second
    /// call with no live subscription is a no-op.
    pub async fn stop_tracking(&self) -> Result<()> {
        if !self.location.is_subscribed(LOCATION_TASK_ID)? {
            return Ok(());
        }
        self.location.unsubscribe(LOCATION_TASK_ID)?;

        if let Some(session_id) = self.ledger.active_session_id().await? {
            self.db.end_session(&session_id, Utc::now()).await?;
        }
        self.ledger.clear_active_session_id().await?;

        info!("tracking session stopped");
        self.db
            .append_log(LogLevel::Info, "tracking", "session stopped", None)
            .await?;

        Ok(())
    }

    pub fn is_running(&self) -> Result<bool> {
        self.location.is_subscribed(LOCATION_TASK_ID)
    }

    pub async fn runtime_state(&self) -> Result<RuntimeState> {
        self.ledger.runtime_state().await
    }
}

fn subscription_options(config: &TrackingConfig) -> SubscriptionOptions {
    SubscriptionOptions {
        accuracy: LocationAccuracy::Highest,
        time_interval_ms: config.time_interval_ms,
        distance_interval_m: config.distance_interval_m,
        deferred_updates_interval_ms: config.deferred_updates_interval_ms,
        deferred_updates_distance_m: config.deferred_updates_distance_m,
        shows_background_location_indicator: true,
        pauses_updates_automatically: false,
        foreground_service: Some(ForegroundServiceDescriptor {
            notification_title: "Tracking active".to_string(),
            notification_body: "Collecting GPS fixes in the background.".to_string(),
            notification_color: "#222222".to_string(),
        }),
    }
}
