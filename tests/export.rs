mod common;

use std::{fs, path::Path};

use chrono::{Duration, TimeZone, Utc};
use common::{init_logging, MockShare};
use tempfile::tempdir;
use tracklog::{export_session, share_file, Database, Session, TrackPoint};

fn open_db(dir: &Path) -> Database {
    Database::new(dir.join("tracklog.sqlite3")).expect("open database")
}

async fn seed_session(db: &Database, session_id: &str, point_count: u64) {
    let started_at = Utc.timestamp_millis_opt(0).single().unwrap();
    db.insert_session(&Session {
        id: session_id.to_string(),
        started_at,
        ended_at: None,
        config_json: "{}".to_string(),
    })
    .await
    .unwrap();

    for seq in 1..=point_count {
        db.insert_point(&TrackPoint {
            id: None,
            session_id: session_id.to_string(),
            seq,
            ts: started_at + Duration::seconds(seq as i64),
            lat: 45.0 + seq as f64 * 0.001,
            lon: 9.0,
            acc: if seq % 2 == 0 { Some(5.0) } else { None },
            alt: None,
            altitude_accuracy: None,
            speed: None,
            heading: None,
            raw_json: "{}".to_string(),
        })
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn export_writes_header_and_one_line_per_point() {
    init_logging();
    let dir = tempdir().unwrap();
    let db = open_db(dir.path());
    seed_session(&db, "s-export", 3).await;

    let paths = export_session(&db, &dir.path().join("exports"), "s-export")
        .await
        .unwrap();

    let csv = fs::read_to_string(&paths.csv_path).unwrap();
    let csv_lines: Vec<&str> = csv.lines().collect();
    assert_eq!(csv_lines.len(), 4);
    assert_eq!(
        csv_lines[0],
        "id,sessionId,seq,ts,lat,lon,acc,alt,altitudeAccuracy,speed,heading"
    );

    let jsonl = fs::read_to_string(&paths.jsonl_path).unwrap();
    let records: Vec<TrackPoint> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 3);

    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.session_id, "s-export");
        assert_eq!(record.seq, index as u64 + 1);
    }
}

#[tokio::test]
async fn export_of_empty_session_produces_header_only_artifacts() {
    init_logging();
    let dir = tempdir().unwrap();
    let db = open_db(dir.path());
    seed_session(&db, "s-empty", 0).await;

    let paths = export_session(&db, &dir.path().join("exports"), "s-empty")
        .await
        .unwrap();

    let csv = fs::read_to_string(&paths.csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1);

    let jsonl = fs::read_to_string(&paths.jsonl_path).unwrap();
    assert!(jsonl.is_empty());
}

#[tokio::test]
async fn export_streams_across_page_boundaries() {
    init_logging();
    let dir = tempdir().unwrap();
    let db = open_db(dir.path());
    // Three pages at the fixed page size of 500.
    seed_session(&db, "s-large", 1250).await;

    let paths = export_session(&db, &dir.path().join("exports"), "s-large")
        .await
        .unwrap();

    let csv = fs::read_to_string(&paths.csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1251);

    let jsonl = fs::read_to_string(&paths.jsonl_path).unwrap();
    let seqs: Vec<u64> = jsonl
        .lines()
        .map(|line| serde_json::from_str::<TrackPoint>(line).unwrap().seq)
        .collect();
    assert_eq!(seqs.len(), 1250);
    assert!(seqs.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(seqs.last().copied(), Some(1250));
}

#[tokio::test]
async fn share_requires_an_available_surface() {
    init_logging();
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("s-export.csv");
    fs::write(&artifact, "id\n").unwrap();

    let unavailable = MockShare {
        available: false,
        shared: Default::default(),
    };
    let err = share_file(&unavailable, &artifact).unwrap_err();
    assert!(err.to_string().contains("sharing is not available"));

    let available = MockShare {
        available: true,
        shared: Default::default(),
    };
    share_file(&available, &artifact).unwrap();
    assert_eq!(available.shared.lock().unwrap().as_slice(), &[artifact]);
}
