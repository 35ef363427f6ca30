use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_level},
    models::{LogEntry, LogLevel},
};

/// kv key carrying the most recent error-level log line, so a failure is
/// visible without scanning the log table.
pub const LAST_ERROR_KEY: &str = "lastTaskError";

fn row_to_entry(row: &Row) -> Result<LogEntry> {
    let ts: String = row.get("ts")?;
    let level: String = row.get("level")?;

    Ok(LogEntry {
        id: row.get("id")?,
        ts: parse_datetime(&ts, "ts")?,
        level: parse_level(&level)?,
        source: row.get("source")?,
        message: row.get("message")?,
        raw_json: row.get("rawJson")?,
    })
}

impl Database {
    pub async fn append_log(
        &self,
        level: LogLevel,
        source: &str,
        message: &str,
        raw_json: Option<String>,
    ) -> Result<()> {
        let source = source.to_string();
        let message = message.to_string();
        let ts = Utc::now();

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO logs (ts, level, source, message, rawJson)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![ts.to_rfc3339(), level.as_str(), source, message, raw_json],
            )?;

            if level == LogLevel::Error {
                conn.execute(
                    "INSERT OR REPLACE INTO kv (k, v) VALUES (?1, ?2)",
                    params![
                        LAST_ERROR_KEY,
                        format!("{} | {} | {}", ts.to_rfc3339(), source, message)
                    ],
                )?;
            }

            Ok(())
        })
        .await
    }

    pub async fn get_recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, ts, level, source, message, rawJson
                 FROM logs
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }

            Ok(entries)
        })
        .await
    }
}
