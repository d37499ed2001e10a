mod helpers;

use ferrous_zone_application::ports::{RecordStore, ZoneCatalog};
use ferrous_zone_domain::RecordSet;
use ferrous_zone_infrastructure::repositories::ZoneRepository;
use helpers::{loaded_repository, write_zone, BARE_ZONE, EXAMPLE_ZONE};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_fresh_repository_is_stale_and_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repository = ZoneRepository::new(dir.path(), Duration::from_secs(300));

    assert!(repository.is_stale());
    assert!(repository.zone_names().is_empty());
}

#[tokio::test]
async fn test_load_zones_lists_every_origin() {
    let (_dir, repository) = loaded_repository().await;

    let names: Vec<String> = repository
        .zone_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["bare.test.", "example.com."]);
    assert!(!repository.is_stale());
}

#[tokio::test]
async fn test_load_returns_zone_with_locations() {
    let (_dir, repository) = loaded_repository().await;

    let zone = repository.load("example.com.").await.unwrap().unwrap();
    assert!(zone.locations.contains("@"));
    assert!(zone.locations.contains("www"));
    assert!(zone.locations.contains("*.dev"));
    assert!(zone.locations.contains("_sip._tcp"));

    assert!(repository.load("example.org.").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_returns_records_and_empty_for_unknown() {
    let (_dir, repository) = loaded_repository().await;
    let zone = repository.load("example.com.").await.unwrap().unwrap();

    let www = repository.get("www", &zone).await.unwrap();
    assert_eq!(www.a.len(), 1);
    assert_eq!(www.a[0].ip.to_string(), "1.2.3.4");
    assert_eq!(www.txt[0].text, "hello world");

    let missing = repository.get("nope", &zone).await.unwrap();
    assert_eq!(missing, RecordSet::default());
}

#[tokio::test]
async fn test_invalid_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_zone(dir.path(), "example.com.toml", EXAMPLE_ZONE);
    write_zone(dir.path(), "broken.toml", "origin = [not toml");
    write_zone(dir.path(), "notes.txt", BARE_ZONE);

    let repository = ZoneRepository::new(dir.path(), Duration::from_secs(300));
    let count = repository.load_zones().await.unwrap();

    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_missing_directory_fails_and_keeps_previous_snapshot() {
    let (dir, repository) = loaded_repository().await;
    let path = dir.path().to_path_buf();
    drop(dir);

    assert!(!path.exists());
    let result = repository.load_zones().await;

    assert!(result.is_err());
    assert_eq!(repository.zone_names().len(), 2);
}

#[tokio::test]
async fn test_reload_picks_up_new_zone() {
    let (dir, repository) = loaded_repository().await;
    write_zone(
        dir.path(),
        "extra.toml",
        "origin = \"extra.net.\"\n[records.www]\na = [{ ip = \"203.0.113.1\" }]\n",
    );

    let count = repository.load_zones().await.unwrap();

    assert_eq!(count, 3);
    assert!(repository.load("extra.net.").await.unwrap().is_some());
}

#[tokio::test]
async fn test_snapshot_becomes_stale_after_interval() {
    let dir = tempfile::tempdir().unwrap();
    write_zone(dir.path(), "bare.toml", BARE_ZONE);
    let repository = ZoneRepository::new(dir.path(), Duration::from_millis(20));

    repository.load_zones().await.unwrap();
    assert!(!repository.is_stale());

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(repository.is_stale());
}

#[tokio::test]
async fn test_concurrent_reloads_collapse() {
    let dir = tempfile::tempdir().unwrap();
    write_zone(dir.path(), "example.com.toml", EXAMPLE_ZONE);
    let repository = Arc::new(ZoneRepository::new(dir.path(), Duration::from_secs(300)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repository = repository.clone();
            tokio::spawn(async move { repository.load_zones().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }
    assert_eq!(repository.zone_names().len(), 1);
}

#[tokio::test]
async fn test_concurrent_failed_reloads_share_one_outcome() {
    let repository = Arc::new(ZoneRepository::new(
        "/nonexistent/ferrous-zone/zones",
        Duration::from_secs(300),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repository = repository.clone();
            tokio::spawn(async move { repository.load_zones().await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_err());
    }
    assert!(!repository.is_stale());
    assert!(repository.zone_names().is_empty());
}

#[tokio::test]
async fn test_duplicate_origin_keeps_first_file() {
    let dir = tempfile::tempdir().unwrap();
    write_zone(dir.path(), "a.toml", BARE_ZONE);
    write_zone(
        dir.path(),
        "b.toml",
        "origin = \"bare.test.\"\n[records.other]\na = [{ ip = \"198.51.100.8\" }]\n",
    );
    let repository = ZoneRepository::new(dir.path(), Duration::from_secs(300));

    assert_eq!(repository.load_zones().await.unwrap(), 1);
    let zone = repository.load("bare.test.").await.unwrap().unwrap();
    assert!(zone.locations.contains("host"));
    assert!(!zone.locations.contains("other"));
}
