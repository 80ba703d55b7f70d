// tests/refresh_test.rs — Integration test: refresh cycles against a file-backed store

use std::time::Duration;

use callboard::infra::config::Config;
use callboard::infra::errors::ErrorKind;
use callboard::refresh::RefreshOutcome;
use callboard::store::{self, spawn_store_server, StoreTarget};
use callboard::store::store::CallRecord;

fn answered(dnis: &str) -> CallRecord {
    CallRecord {
        call_date: "2025-12-05 10:05:00".into(),
        interval_label: "10:00-10:30".into(),
        direction: "INBOUND".into(),
        hours_flag: "Inside".into(),
        source_campaign: Some("HERDEZ".into()),
        dnis: dnis.into(),
        queue_secs: Some(8),
        talk_secs: Some(90),
        ivr_secs: Some(3),
        last_agent: Some("6873".into()),
        ..Default::default()
    }
}

fn config_for(path: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.store.path = Some(path.to_string_lossy().into_owned());
    config
}

#[tokio::test]
async fn test_second_refresh_sees_new_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calls.db");
    let writer = store::open_writable(&path).unwrap();
    writer.insert_call(&answered("5547372149")).unwrap();

    let config = config_for(&path);
    let target = StoreTarget {
        path: path.clone(),
        busy_timeout: Duration::from_millis(500),
    };
    let (handle, _task) = spawn_store_server(target);
    let access = callboard::access::DataAccess::new(std::sync::Arc::new(handle), &config);
    let refresher = callboard::refresh::Refresher::new(access);

    assert_eq!(refresher.try_refresh().await, RefreshOutcome::Published { cycle: 1 });
    let first = refresher.current();

    writer.insert_call(&answered("5547372149")).unwrap();
    writer.insert_call(&answered("5550059281")).unwrap();

    assert_eq!(refresher.try_refresh().await, RefreshOutcome::Published { cycle: 2 });
    let second = refresher.current();

    assert_eq!(first.totals.received, 1);
    assert_eq!(second.totals.received, 3);
    assert_eq!(second.campaigns.len(), 2);
    // The first snapshot is untouched by the second refresh.
    assert_eq!(first.campaigns.len(), 1);
    assert_eq!(first.cycle, 1);
}

#[tokio::test]
async fn test_missing_database_yields_empty_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    let config = config_for(&path);

    let (handle, _task) = spawn_store_server(StoreTarget {
        path,
        busy_timeout: Duration::from_millis(100),
    });
    let access = callboard::access::DataAccess::new(std::sync::Arc::new(handle), &config);

    let report = access.fetch_all().await;
    assert_eq!(report.failures.len(), 3);
    assert!(report
        .failures
        .iter()
        .all(|f| f.kind == ErrorKind::Connection));

    let refresher = callboard::refresh::Refresher::new(access);
    refresher.try_refresh().await;
    let snap = refresher.current();
    assert_eq!(snap.cycle, 1);
    assert!(snap.is_empty());
    assert_eq!(snap.totals.pct_service_level, 0.0);
}
