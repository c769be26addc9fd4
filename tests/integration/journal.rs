//! Integration tests for the snapshot journal

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use etfsignal::db::{SnapshotJournal, SnapshotStore};
use etfsignal::models::{IndicatorSet, SnapshotRecord};

fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("etfsignal-{}-{}-{}", name, std::process::id(), nanos))
}

fn record(ticker: &str, price: f64) -> SnapshotRecord {
    let indicators = IndicatorSet {
        sma_short: Some(101.5),
        sma_long: None,
        rsi: Some(55.25),
        ..IndicatorSet::default()
    };
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 5).unwrap();
    SnapshotRecord::new(ticker, price, &indicators, at)
}

#[tokio::test]
async fn appends_one_line_per_record() {
    let dir = scratch_dir("append");
    let journal = SnapshotJournal::new(&dir);

    journal.append(&record("SPXL", 100.0)).await.unwrap();
    journal.append(&record("SPXL", 101.0)).await.unwrap();
    journal.append(&record("TQQQ", 50.0)).await.unwrap();

    let contents = tokio::fs::read_to_string(journal.path_for("SPXL")).await.unwrap();
    assert_eq!(contents.lines().count(), 2);

    let first: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(first["ticker"], "SPXL");
    assert_eq!(first["date"], "2024-03-15");
    assert_eq!(first["time"], "14:30:05");
    assert_eq!(first["price"], 100.0);
    assert_eq!(first["sma_short"], 101.5);
    assert!(first["sma_long"].is_null());
    assert_eq!(first["rsi"], 55.25);

    let records = journal.records("SPXL").await.unwrap();
    assert_eq!(records, vec![record("SPXL", 100.0), record("SPXL", 101.0)]);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn missing_journal_reads_as_empty() {
    let journal = SnapshotJournal::new(scratch_dir("missing"));
    assert!(journal.records("SOXL").await.unwrap().is_empty());
}

#[test]
fn journal_file_names_are_sanitized() {
    let journal = SnapshotJournal::new("data");
    assert_eq!(journal.path_for("SPXL"), PathBuf::from("data/SPXL.jsonl"));
    assert_eq!(journal.path_for("BRK/B"), PathBuf::from("data/BRK_B.jsonl"));
}
