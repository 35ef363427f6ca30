//! Interfaces over the OS services the tracking core consumes. Real bindings
//! live in the host shell; tests inject in-memory doubles.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Stable identifier for the background location task registration.
pub const LOCATION_TASK_ID: &str = "gps-background-task";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationAccuracy {
    Lowest,
    Low,
    Balanced,
    High,
    Highest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForegroundServiceDescriptor {
    pub notification_title: String,
    pub notification_body: String,
    pub notification_color: String,
}

/// Parameters for the OS-level background location subscription. The deferred
/// thresholds govern batched, power-efficient delivery of fixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionOptions {
    pub accuracy: LocationAccuracy,
    pub time_interval_ms: u64,
    pub distance_interval_m: f64,
    pub deferred_updates_interval_ms: u64,
    pub deferred_updates_distance_m: f64,
    pub shows_background_location_indicator: bool,
    pub pauses_updates_automatically: bool,
    pub foreground_service: Option<ForegroundServiceDescriptor>,
}

/// One raw instantaneous reading from the positioning subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub timestamp_ms: i64,
    pub coords: FixCoordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mocked: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixCoordinates {
    pub lat: f64,
    pub lon: f64,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub altitude_accuracy: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatteryState {
    Unknown,
    Unplugged,
    Charging,
    Full,
}

impl BatteryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryState::Unknown => "unknown",
            BatteryState::Unplugged => "unplugged",
            BatteryState::Charging => "charging",
            BatteryState::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppLifecycleState {
    Active,
    Inactive,
    Background,
}

impl AppLifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppLifecycleState::Active => "active",
            AppLifecycleState::Inactive => "inactive",
            AppLifecycleState::Background => "background",
        }
    }
}

/// Background location subscription surface. The host shell owns handler
/// registration and forwards each delivered batch to
/// [`crate::tracking::ingest_location_event`].
pub trait LocationService: Send + Sync {
    fn subscribe(&self, task_id: &str, options: &SubscriptionOptions) -> Result<()>;
    fn unsubscribe(&self, task_id: &str) -> Result<()>;
    fn is_subscribed(&self, task_id: &str) -> Result<bool>;
}

/// Battery probe consulted once per ingested fix. Lookup failures never abort
/// ingestion.
pub trait BatteryMonitor: Send + Sync {
    fn level(&self) -> Result<f64>;
    fn state(&self) -> Result<BatteryState>;
}

/// Native share sheet for exported artifacts.
pub trait ShareService: Send + Sync {
    fn is_available(&self) -> bool;
    fn share(&self, path: &Path) -> Result<()>;
}
