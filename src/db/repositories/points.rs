use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime, to_i64, to_u64},
    models::{PointSnapshot, SessionBounds, TrackPoint},
};

fn row_to_point(row: &Row) -> Result<TrackPoint> {
    let seq: i64 = row.get("seq")?;
    let ts: String = row.get("ts")?;

    Ok(TrackPoint {
        id: row.get("id")?,
        session_id: row.get("sessionId")?,
        seq: to_u64(seq, "seq")?,
        ts: parse_datetime(&ts, "ts")?,
        lat: row.get("lat")?,
        lon: row.get("lon")?,
        acc: row.get("acc")?,
        alt: row.get("alt")?,
        altitude_accuracy: row.get("altitudeAccuracy")?,
        speed: row.get("speed")?,
        heading: row.get("heading")?,
        raw_json: row.get("rawJson")?,
    })
}

impl Database {
    pub async fn insert_point(&self, point: &TrackPoint) -> Result<()> {
        let record = point.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO points (sessionId, seq, ts, lat, lon, acc, alt, altitudeAccuracy, speed, heading, rawJson)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.session_id,
                    to_i64(record.seq)?,
                    record.ts.to_rfc3339(),
                    record.lat,
                    record.lon,
                    record.acc,
                    record.alt,
                    record.altitude_accuracy,
                    record.speed,
                    record.heading,
                    record.raw_json,
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn count_session_points(&self, session_id: &str) -> Result<u64> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM points WHERE sessionId = ?1",
                params![session_id],
                |row| row.get(0),
            )?;
            to_u64(count, "point count")
        })
        .await
    }

    pub async fn get_session_bounds(&self, session_id: &str) -> Result<SessionBounds> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let (first, last): (Option<String>, Option<String>) = conn.query_row(
                "SELECT MIN(ts), MAX(ts) FROM points WHERE sessionId = ?1",
                params![session_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(SessionBounds {
                first_ts: parse_optional_datetime(first, "MIN(ts)")?,
                last_ts: parse_optional_datetime(last, "MAX(ts)")?,
            })
        })
        .await
    }

    /// Most recent point, by sequence within a session or by row id across
    /// all sessions.
    pub async fn get_last_point(&self, session_id: Option<&str>) -> Result<Option<PointSnapshot>> {
        let session_id = session_id.map(str::to_string);
        self.execute(move |conn| {
            let map = |row: &Row<'_>| -> rusqlite::Result<(String, f64, f64, Option<f64>)> {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            };

            let raw = match session_id {
                Some(session_id) => conn
                    .query_row(
                        "SELECT ts, lat, lon, acc FROM points
                         WHERE sessionId = ?1
                         ORDER BY seq DESC
                         LIMIT 1",
                        params![session_id],
                        map,
                    )
                    .optional()?,
                None => conn
                    .query_row(
                        "SELECT ts, lat, lon, acc FROM points ORDER BY id DESC LIMIT 1",
                        [],
                        map,
                    )
                    .optional()?,
            };

            match raw {
                Some((ts, lat, lon, acc)) => Ok(Some(PointSnapshot {
                    ts: parse_datetime(&ts, "ts")?,
                    lat,
                    lon,
                    acc,
                })),
                None => Ok(None),
            }
        })
        .await
    }

    /// One bounded page of a session's points in ascending sequence order;
    /// the export pipeline walks these until an empty page comes back.
    pub async fn get_session_points_page(
        &self,
        session_id: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<TrackPoint>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sessionId, seq, ts, lat, lon, acc, alt, altitudeAccuracy, speed, heading, rawJson
                 FROM points
                 WHERE sessionId = ?1
                 ORDER BY seq ASC
                 LIMIT ?2 OFFSET ?3",
            )?;

            let mut rows = stmt.query(params![session_id, limit, to_i64(offset)?])?;
            let mut points = Vec::new();
            while let Some(row) = rows.next()? {
                points.push(row_to_point(row)?);
            }

            Ok(points)
        })
        .await
    }
}
