//! Chunked export of a session's points into sibling CSV and JSONL artifacts.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    db::{
        models::{LogLevel, TrackPoint},
        Database,
    },
    platform::ShareService,
};

const CHUNK_SIZE: u32 = 500;

const CSV_HEADER: &str = "id,sessionId,seq,ts,lat,lon,acc,alt,altitudeAccuracy,speed,heading\n";

/// Locations of the two artifacts produced by [`export_session`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPaths {
    pub csv_path: PathBuf,
    pub jsonl_path: PathBuf,
}

/// Streams a session's points into `<dir>/<sessionId>.csv` and
/// `<dir>/<sessionId>.jsonl`, one page at a time, so memory stays bounded
/// regardless of session size. A failed write propagates and leaves the
/// partial files in place for the caller to retry or clean up.
pub async fn export_session(
    db: &Database,
    export_dir: &Path,
    session_id: &str,
) -> Result<ExportPaths> {
    fs::create_dir_all(export_dir).with_context(|| {
        format!("failed to create export directory {}", export_dir.display())
    })?;

    let csv_path = export_dir.join(format!("{session_id}.csv"));
    let jsonl_path = export_dir.join(format!("{session_id}.jsonl"));

    fs::write(&csv_path, CSV_HEADER)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    fs::write(&jsonl_path, "")
        .with_context(|| format!("failed to write {}", jsonl_path.display()))?;

    let mut offset = 0u64;
    loop {
        let page = db
            .get_session_points_page(session_id, CHUNK_SIZE, offset)
            .await?;
        if page.is_empty() {
            break;
        }

        let mut csv_chunk = String::new();
        let mut jsonl_chunk = String::new();
        for point in &page {
            csv_chunk.push_str(&csv_line(point));
            csv_chunk.push('\n');
            jsonl_chunk.push_str(
                &serde_json::to_string(point).context("failed to serialize point record")?,
            );
            jsonl_chunk.push('\n');
        }

        append(&csv_path, &csv_chunk)?;
        append(&jsonl_path, &jsonl_chunk)?;

        offset += page.len() as u64;
    }

    info!("export completed for session {session_id}");
    db.append_log(
        LogLevel::Info,
        "export",
        &format!("export completed for {session_id}"),
        None,
    )
    .await?;

    Ok(ExportPaths {
        csv_path,
        jsonl_path,
    })
}

/// Hands an exported artifact to the native share sheet.
pub fn share_file(sharing: &dyn ShareService, path: &Path) -> Result<()> {
    if !sharing.is_available() {
        bail!("sharing is not available on this device");
    }
    sharing.share(path)
}

fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {} for append", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("failed to append to {}", path.display()))
}

fn csv_line(point: &TrackPoint) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}",
        point.id.map(|id| id.to_string()).unwrap_or_default(),
        point.session_id,
        point.seq,
        point.ts.to_rfc3339(),
        point.lat,
        point.lon,
        opt(point.acc),
        opt(point.alt),
        opt(point.altitude_accuracy),
        opt(point.speed),
        opt(point.heading),
    )
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
