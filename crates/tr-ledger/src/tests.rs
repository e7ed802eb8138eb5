//! Unit tests for tr-ledger.

#[cfg(test)]
mod helpers {
    use tr_core::{KeyResolution, NodeKey, Position, Waypoint};

    pub fn key(x: f64, y: f64) -> NodeKey {
        KeyResolution::default().key_at(Position::new(x, y))
    }

    pub fn lane_key(x: f64, y: f64, road: u32, lane: i32) -> NodeKey {
        KeyResolution::default().key_for(&Waypoint::at(x, y).with_lane(road, lane))
    }
}

// ── Recording & averages ──────────────────────────────────────────────────────

#[cfg(test)]
mod record {
    use super::helpers::key;
    use crate::{DEFAULT_DELAY_SECS, DelaySource, DrivingDelayLedger, LedgerError};

    #[test]
    fn two_traversals_average() {
        let ledger = DrivingDelayLedger::new();
        let (b, d) = (key(1.0, 0.0), key(2.0, 0.0));
        ledger.record_traversal(b, d, 10.0).unwrap();
        ledger.record_traversal(b, d, 20.0).unwrap();
        assert_eq!(ledger.average_delay(&b, &d), 15.0);
        let stats = ledger.stats(&b, &d).unwrap();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.cumulative_secs, 30.0);
    }

    #[test]
    fn unseen_segment_returns_default() {
        let ledger = DrivingDelayLedger::new();
        assert_eq!(ledger.average_delay(&key(0.0, 0.0), &key(1.0, 0.0)), DEFAULT_DELAY_SECS);

        let custom = DrivingDelayLedger::with_default_delay(7.0).unwrap();
        assert_eq!(custom.expected_delay(&key(0.0, 0.0), &key(1.0, 0.0)), 7.0);
    }

    #[test]
    fn invalid_default_delay_is_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(DrivingDelayLedger::with_default_delay(bad), Err(LedgerError::InvalidDefaultDelay(_))),
                "accepted: {bad}"
            );
        }
        assert!(DrivingDelayLedger::with_default_delay(0.0).is_ok());
    }

    #[test]
    fn direction_matters() {
        let ledger = DrivingDelayLedger::new();
        let (a, b) = (key(0.0, 0.0), key(1.0, 0.0));
        ledger.record_traversal(a, b, 4.0).unwrap();
        assert_eq!(ledger.average_delay(&a, &b), 4.0);
        assert_eq!(ledger.average_delay(&b, &a), DEFAULT_DELAY_SECS);
    }

    #[test]
    fn zero_elapsed_is_a_sample() {
        let ledger = DrivingDelayLedger::new();
        let (a, b) = (key(0.0, 0.0), key(1.0, 0.0));
        ledger.record_traversal(a, b, 0.0).unwrap();
        assert_eq!(ledger.average_delay(&a, &b), 0.0);
    }

    #[test]
    fn negative_elapsed_is_rejected() {
        let ledger = DrivingDelayLedger::new();
        let (a, b) = (key(0.0, 0.0), key(1.0, 0.0));
        assert!(matches!(
            ledger.record_traversal(a, b, -1.0),
            Err(LedgerError::InvalidElapsed(t)) if t == -1.0
        ));
        assert!(ledger.record_traversal(a, b, f64::NAN).is_err());
        assert!(ledger.is_empty(), "rejected samples must not be recorded");
    }

    #[test]
    fn record_route_validates_before_writing() {
        let ledger = DrivingDelayLedger::new();
        let keys = [key(0.0, 0.0), key(1.0, 0.0), key(2.0, 0.0)];
        assert!(matches!(
            ledger.record_route(&keys, &[1.0]),
            Err(LedgerError::LengthMismatch { nodes: 3, times: 1 })
        ));
        assert!(ledger.record_route(&keys, &[1.0, -2.0]).is_err());
        assert!(ledger.is_empty());

        ledger.record_route(&keys, &[1.0, 2.0]).unwrap();
        assert_eq!(ledger.segment_count(), 2);
        assert_eq!(ledger.average_delay(&keys[1], &keys[2]), 2.0);
    }

    #[test]
    fn snapshot_is_detached() {
        let ledger = DrivingDelayLedger::new();
        let (a, b) = (key(0.0, 0.0), key(1.0, 0.0));
        ledger.record_traversal(a, b, 3.0).unwrap();
        let snap = ledger.snapshot();
        ledger.record_traversal(a, b, 9.0).unwrap();
        assert_eq!(snap.average_delay(&a, &b), 3.0);
        assert_eq!(ledger.average_delay(&a, &b), 6.0);
    }

    #[test]
    fn concurrent_writers_lose_nothing() {
        let ledger = DrivingDelayLedger::new();
        let (a, b) = (key(0.0, 0.0), key(1.0, 0.0));
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..500 {
                        ledger.record_traversal(a, b, 1.0).unwrap();
                    }
                });
            }
        });
        let stats = ledger.stats(&a, &b).unwrap();
        assert_eq!(stats.samples, 4_000);
        assert_eq!(stats.cumulative_secs, 4_000.0);
    }
}

// ── Persistence ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod persist {
    use std::fs;

    use tempfile::TempDir;

    use super::helpers::{key, lane_key};
    use crate::{DrivingDelayLedger, LedgerError};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn save_then_load_is_exact() {
        let dir = tmp();
        let path = dir.path().join("ledger.csv");

        let ledger = DrivingDelayLedger::new();
        let (a, b, c) = (lane_key(0.0, 0.0, 7, -1), lane_key(2.0, 0.0, 7, -1), key(-3.3, 8.1));
        ledger.record_traversal(a, b, 0.1).unwrap();
        ledger.record_traversal(a, b, 0.2).unwrap(); // 0.30000000000000004
        ledger.record_traversal(b, c, 1.0 / 3.0).unwrap();
        ledger.save(&path).unwrap();

        let loaded = DrivingDelayLedger::load(&path, 2.5).unwrap();
        assert_eq!(loaded.segment_count(), 2);
        assert_eq!(loaded.stats(&a, &b), ledger.stats(&a, &b));
        assert_eq!(loaded.stats(&b, &c), ledger.stats(&b, &c));
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn rows_are_sorted_and_lane_fields_optional() {
        let dir = tmp();
        let path = dir.path().join("ledger.csv");
        let ledger = DrivingDelayLedger::new();
        ledger.record_traversal(key(1.0, 0.0), key(2.0, 0.0), 5.0).unwrap();
        ledger.record_traversal(key(0.0, 0.0), key(1.0, 0.0), 4.0).unwrap();
        ledger.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "from_qx,from_qy,from_road,from_lane,to_qx,to_qy,to_road,to_lane,cumulative_time,sample_count"
        );
        assert_eq!(lines[1], "0,0,,,10,0,,,4.0,1");
        assert_eq!(lines[2], "10,0,,,20,0,,,5.0,1");
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let dir = tmp();
        // A directory in the way makes the final rename fail.
        let path = dir.path().join("ledger.csv");
        fs::create_dir(&path).unwrap();

        let ledger = DrivingDelayLedger::new();
        ledger.record_traversal(key(0.0, 0.0), key(1.0, 0.0), 4.0).unwrap();
        assert!(ledger.save(&path).is_err());
        assert!(!path.with_extension("csv.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn load_rejects_invalid_default_delay() {
        let dir = tmp();
        let path = write_rows(&dir, "0,0,,,10,0,,,4.0,1\n");
        assert!(matches!(DrivingDelayLedger::load(&path, -2.5), Err(LedgerError::InvalidDefaultDelay(_))));
        assert!(matches!(
            DrivingDelayLedger::load_or_default(&dir.path().join("absent.csv"), f64::NAN),
            Err(LedgerError::InvalidDefaultDelay(_))
        ));
    }

    #[test]
    fn csv_errors_are_not_labelled_as_writes() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
        let msg = LedgerError::from(csv::Error::from(io)).to_string();
        assert!(msg.starts_with("CSV error: "), "{msg}");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tmp();
        let ledger = DrivingDelayLedger::load_or_default(&dir.path().join("absent.csv"), 2.5).unwrap();
        assert!(ledger.is_empty());
        assert!(DrivingDelayLedger::load(&dir.path().join("absent.csv"), 2.5).is_err());
    }

    fn write_rows(dir: &TempDir, rows: &str) -> std::path::PathBuf {
        let path = dir.path().join("ledger.csv");
        fs::write(
            &path,
            format!(
                "from_qx,from_qy,from_road,from_lane,to_qx,to_qy,to_road,to_lane,cumulative_time,sample_count\n{rows}"
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let dir = tmp();
        for rows in [
            "0,0,,,10,0,,,-4.0,1\n",
            "0,0,,,10,0,,,4.0,0\n",
            "0,0,,,10,0,,,abc,1\n",
            "0,0,,,10,0,,,4.0,1\n0,0,,,10,0,,,6.0,2\n",
        ] {
            let path = write_rows(&dir, rows);
            let err = DrivingDelayLedger::load(&path, 2.5).err();
            assert!(matches!(err, Some(LedgerError::Malformed { .. })), "accepted: {rows:?}");
        }
    }

    #[test]
    fn malformed_reports_line() {
        let dir = tmp();
        let path = write_rows(&dir, "0,0,,,10,0,,,4.0,1\n10,0,,,20,0,,,4.0,0\n");
        match DrivingDelayLedger::load(&path, 2.5) {
            Err(LedgerError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Malformed, got {:?}", other.map(|l| l.segment_count())),
        }
    }
}
