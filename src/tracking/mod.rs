mod config;
mod controller;
mod ingest;
mod state;

pub use config::TrackingConfig;
pub use controller::TrackingController;
pub use ingest::{ingest_location_event, LocationEvent};
pub use state::{RuntimeState, RuntimeStateLedger};
