//! Background GPS session recorder core: session lifecycle, durable point
//! ingestion, and chunked export.
//!
//! The host shell owns the UI, permission prompts, and real OS bindings. It
//! constructs one [`Database`] at startup, implements the traits in
//! [`platform`], and forwards every background location delivery to
//! [`ingest_location_event`]. A delivery may arrive in a freshly spawned
//! process; all cross-invocation state lives in the persisted
//! [`RuntimeStateLedger`].

pub mod db;
pub mod diagnostics;
pub mod export;
pub mod platform;
pub mod tracking;

pub use db::{
    models::{LogEntry, LogLevel, PointSnapshot, Session, SessionBounds, TrackPoint},
    Database,
};
pub use diagnostics::{collect_diagnostics, DiagnosticsDump};
pub use export::{export_session, share_file, ExportPaths};
pub use platform::{
    AppLifecycleState, BatteryMonitor, BatteryState, Fix, FixCoordinates,
    ForegroundServiceDescriptor, LocationAccuracy, LocationService, ShareService,
    SubscriptionOptions, LOCATION_TASK_ID,
};
pub use tracking::{
    ingest_location_event, LocationEvent, RuntimeState, RuntimeStateLedger, TrackingConfig,
    TrackingController,
};
