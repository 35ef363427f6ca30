use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use log::{error, warn};
use serde::Serialize;

use crate::{
    db::{
        models::{LogLevel, TrackPoint},
        Database,
    },
    platform::{AppLifecycleState, BatteryMonitor, BatteryState, Fix},
};

use super::state::RuntimeStateLedger;

/// What the OS hands a single background invocation: a delivery error or a
/// batch of raw fixes.
#[derive(Debug, Clone)]
pub enum LocationEvent {
    Failure(String),
    Fixes(Vec<Fix>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FixEnvelope<'a> {
    #[serde(flatten)]
    fix: &'a Fix,
    battery_level: Option<f64>,
    battery_state: Option<&'static str>,
    app_state: &'static str,
}

/// Background entry point for delivered location batches.
///
/// May run in a process with no in-memory carryover from the session that
/// registered the subscription, so every sequencing decision reads the
/// persisted ledger. The incremented sequence number is committed before the
/// point row: a kill between the two writes loses at most the in-flight
/// point and never reuses a number on restart.
pub async fn ingest_location_event(
    db: &Database,
    battery: &dyn BatteryMonitor,
    app_state: AppLifecycleState,
    event: LocationEvent,
) -> Result<()> {
    let fixes = match event {
        LocationEvent::Failure(message) => {
            error!("background location delivery failed: {message}");
            db.append_log(LogLevel::Error, "task", &message, None).await?;
            return Ok(());
        }
        LocationEvent::Fixes(fixes) => fixes,
    };

    if fixes.is_empty() {
        return Ok(());
    }

    let ledger = RuntimeStateLedger::new(db.clone());
    let Some(session_id) = ledger.active_session_id().await? else {
        warn!("discarding {} fixes: no active session", fixes.len());
        db.append_log(
            LogLevel::Warn,
            "task",
            "fix received with no active session",
            None,
        )
        .await?;
        return Ok(());
    };

    for fix in &fixes {
        let seq = ledger.sequence().await? + 1;
        ledger.set_sequence(seq).await?;

        let (battery_level, battery_state) = read_battery(battery);
        let envelope = FixEnvelope {
            fix,
            battery_level,
            battery_state: battery_state.map(|state| state.as_str()),
            app_state: app_state.as_str(),
        };
        let raw_json =
            serde_json::to_string(&envelope).context("failed to serialize fix envelope")?;

        let ts = Utc
            .timestamp_millis_opt(fix.timestamp_ms)
            .single()
            .with_context(|| format!("fix timestamp {} out of range", fix.timestamp_ms))?;

        db.insert_point(&TrackPoint {
            id: None,
            session_id: session_id.clone(),
            seq,
            ts,
            lat: fix.coords.lat,
            lon: fix.coords.lon,
            acc: fix.coords.accuracy,
            alt: fix.coords.altitude,
            altitude_accuracy: fix.coords.altitude_accuracy,
            speed: fix.coords.speed,
            heading: fix.coords.heading,
            raw_json,
        })
        .await?;
    }

    ledger.set_last_update(Utc::now()).await?;

    Ok(())
}

/// Best effort; a probe failure is recorded as missing context, never a fault.
fn read_battery(battery: &dyn BatteryMonitor) -> (Option<f64>, Option<BatteryState>) {
    (battery.level().ok(), battery.state().ok())
}
