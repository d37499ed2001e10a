use super::zone_file::ZoneFile;
use arc_swap::{ArcSwap, ArcSwapOption};
use async_trait::async_trait;
use chrono::Utc;
use ferrous_zone_application::ports::{RecordStore, ZoneCatalog};
use ferrous_zone_domain::{DomainError, RecordSet, Zone};
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct ZoneEntry {
    zone: Arc<Zone>,
    records: FxHashMap<String, RecordSet>,
}

/// Immutable view of every served zone, replaced wholesale on reload.
struct ZoneSnapshot {
    names: Arc<[Arc<str>]>,
    zones: FxHashMap<Arc<str>, ZoneEntry>,
}

impl ZoneSnapshot {
    fn empty() -> Self {
        Self {
            names: Arc::from(Vec::new()),
            zones: FxHashMap::default(),
        }
    }
}

/// Outcome of the latest reload, handed to callers that queued behind it.
struct ReloadState {
    last_outcome: Result<usize, DomainError>,
}

/// Zones read from a directory of TOML zone files.
///
/// Readers work on an `ArcSwap` snapshot and never block. Reloads rebuild the
/// snapshot off to the side and publish it in one store. Concurrent reload
/// requests collapse into one attempt whether it succeeds or fails, and a
/// failed attempt counts toward the reload interval like a successful one.
pub struct ZoneRepository {
    directory: PathBuf,
    reload_interval: Duration,
    snapshot: ArcSwap<ZoneSnapshot>,
    reload: Mutex<ReloadState>,
    attempts: AtomicU64,
    attempted_at: ArcSwapOption<Instant>,
}

impl ZoneRepository {
    pub fn new(directory: impl Into<PathBuf>, reload_interval: Duration) -> Self {
        Self {
            directory: directory.into(),
            reload_interval,
            snapshot: ArcSwap::from_pointee(ZoneSnapshot::empty()),
            reload: Mutex::new(ReloadState {
                last_outcome: Ok(0),
            }),
            attempts: AtomicU64::new(0),
            attempted_at: ArcSwapOption::empty(),
        }
    }

    async fn read_directory(&self) -> Result<Vec<ZoneFile>, DomainError> {
        let mut entries = tokio::fs::read_dir(&self.directory).await.map_err(|e| {
            DomainError::StoreError(format!(
                "Failed to read zone directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable zone file");
                    continue;
                }
            };
            match ZoneFile::parse(&contents) {
                Ok(file) => files.push(file),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping invalid zone file"),
            }
        }
        Ok(files)
    }

    fn build_snapshot(files: Vec<ZoneFile>) -> ZoneSnapshot {
        let loaded_at = Utc::now();
        let mut zones: FxHashMap<Arc<str>, ZoneEntry> = FxHashMap::default();

        for file in files {
            let zone = Zone::new(&file.origin, file.records.keys().cloned(), loaded_at);
            if zones.contains_key(&zone.name) {
                warn!(zone = %zone.name, "Zone defined more than once, keeping the first");
                continue;
            }
            let records: FxHashMap<String, RecordSet> = file.records.into_iter().collect();
            debug!(zone = %zone.name, locations = records.len(), "Zone parsed");
            zones.insert(
                zone.name.clone(),
                ZoneEntry {
                    zone: Arc::new(zone),
                    records,
                },
            );
        }

        let mut names: Vec<Arc<str>> = zones.keys().cloned().collect();
        names.sort();

        ZoneSnapshot {
            names: Arc::from(names),
            zones,
        }
    }
}

#[async_trait]
impl ZoneCatalog for ZoneRepository {
    fn zone_names(&self) -> Arc<[Arc<str>]> {
        self.snapshot.load().names.clone()
    }

    fn is_stale(&self) -> bool {
        match self.attempted_at.load().as_deref() {
            Some(at) => at.elapsed() >= self.reload_interval,
            None => true,
        }
    }

    async fn load_zones(&self) -> Result<usize, DomainError> {
        let seen = self.attempts.load(Ordering::Acquire);
        let mut state = self.reload.lock().await;

        // Another caller attempted a reload while we waited.
        if self.attempts.load(Ordering::Acquire) != seen {
            return state.last_outcome.clone();
        }

        let outcome = self.read_directory().await.map(|files| {
            let snapshot = Self::build_snapshot(files);
            let count = snapshot.names.len();
            self.snapshot.store(Arc::new(snapshot));
            info!(
                directory = %self.directory.display(),
                zones = count,
                "Zones loaded"
            );
            count
        });

        state.last_outcome = outcome.clone();
        self.attempted_at.store(Some(Arc::new(Instant::now())));
        self.attempts.fetch_add(1, Ordering::AcqRel);
        outcome
    }
}

#[async_trait]
impl RecordStore for ZoneRepository {
    async fn load(&self, zone_name: &str) -> Result<Option<Arc<Zone>>, DomainError> {
        Ok(self
            .snapshot
            .load()
            .zones
            .get(zone_name)
            .map(|entry| entry.zone.clone()))
    }

    async fn get(&self, location: &str, zone: &Zone) -> Result<RecordSet, DomainError> {
        let snapshot = self.snapshot.load();
        let records = snapshot
            .zones
            .get(&zone.name)
            .and_then(|entry| entry.records.get(location))
            .cloned()
            .unwrap_or_default();
        Ok(records)
    }
}
