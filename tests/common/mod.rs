#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use anyhow::{bail, Result};
use tracklog::{
    BatteryMonitor, BatteryState, Fix, FixCoordinates, LocationService, ShareService,
    SubscriptionOptions,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory stand-in for the OS background location subscription.
#[derive(Default)]
pub struct MockLocationService {
    subscribed: AtomicBool,
    pub subscriptions: Mutex<Vec<SubscriptionOptions>>,
}

impl LocationService for MockLocationService {
    fn subscribe(&self, _task_id: &str, options: &SubscriptionOptions) -> Result<()> {
        self.subscriptions.lock().unwrap().push(options.clone());
        self.subscribed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn unsubscribe(&self, _task_id: &str) -> Result<()> {
        self.subscribed.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_subscribed(&self, _task_id: &str) -> Result<bool> {
        Ok(self.subscribed.load(Ordering::SeqCst))
    }
}

pub struct MockBattery {
    pub failing: bool,
}

impl BatteryMonitor for MockBattery {
    fn level(&self) -> Result<f64> {
        if self.failing {
            bail!("battery service unavailable");
        }
        Ok(0.83)
    }

    fn state(&self) -> Result<BatteryState> {
        if self.failing {
            bail!("battery service unavailable");
        }
        Ok(BatteryState::Unplugged)
    }
}

pub struct MockShare {
    pub available: bool,
    pub shared: Mutex<Vec<PathBuf>>,
}

impl ShareService for MockShare {
    fn is_available(&self) -> bool {
        self.available
    }

    fn share(&self, path: &Path) -> Result<()> {
        self.shared.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub fn fix(timestamp_ms: i64, lat: f64, lon: f64, accuracy: Option<f64>) -> Fix {
    Fix {
        timestamp_ms,
        coords: FixCoordinates {
            lat,
            lon,
            accuracy,
            ..FixCoordinates::default()
        },
        mocked: None,
    }
}
