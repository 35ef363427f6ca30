use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime},
    models::Session,
};

fn row_to_session(row: &Row) -> Result<Session> {
    let started_at: String = row.get("startedAt")?;
    let ended_at: Option<String> = row.get("endedAt")?;

    Ok(Session {
        id: row.get("id")?,
        started_at: parse_datetime(&started_at, "startedAt")?,
        ended_at: parse_optional_datetime(ended_at, "endedAt")?,
        config_json: row.get("configJson")?,
    })
}

impl Database {
    pub async fn insert_session(&self, session: &Session) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, startedAt, endedAt, configJson)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id,
                    record.started_at.to_rfc3339(),
                    record.ended_at.as_ref().map(|dt| dt.to_rfc3339()),
                    record.config_json,
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Seals a session by writing its end timestamp. Sessions are never
    /// mutated again afterwards.
    pub async fn end_session(&self, session_id: &str, ended_at: DateTime<Utc>) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE sessions SET endedAt = ?1 WHERE id = ?2",
                params![ended_at.to_rfc3339(), session_id],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, startedAt, endedAt, configJson FROM sessions WHERE id = ?1",
            )?;

            stmt.query_row(params![session_id], |row| Ok(row_to_session(row)))
                .optional()?
                .transpose()
        })
        .await
    }

    pub async fn get_sessions(&self) -> Result<Vec<Session>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, startedAt, endedAt, configJson
                 FROM sessions
                 ORDER BY startedAt DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }
}
