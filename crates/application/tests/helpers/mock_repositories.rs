#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ferrous_zone_application::ports::{
    InboundRequest, NextHandler, RecordConverter, RecordKind, RecordSections, RecordStore,
    ResponseWriter, ZoneCatalog,
};
use ferrous_zone_domain::{
    fqdn, ARecord, CnameRecord, DomainError, RecordSet, Zone,
};
use hickory_proto::op::Message;
use hickory_proto::rr::rdata::{A, CNAME};
use hickory_proto::rr::{Name, RData, Record};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

// ── zone catalog ───────────────────────────────────────────────────────────

pub struct MockZoneCatalog {
    zones: RwLock<Arc<[Arc<str>]>>,
    stale: AtomicBool,
    fail_reload: AtomicBool,
    reload_calls: AtomicUsize,
}

impl MockZoneCatalog {
    pub fn new(zones: &[&str]) -> Self {
        Self {
            zones: RwLock::new(to_names(zones)),
            stale: AtomicBool::new(false),
            fail_reload: AtomicBool::new(false),
            reload_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_stale(&self, stale: bool) {
        self.stale.store(stale, Ordering::SeqCst);
    }

    pub fn set_fail_reload(&self, fail: bool) {
        self.fail_reload.store(fail, Ordering::SeqCst);
    }

    pub fn set_zones(&self, zones: &[&str]) {
        *self.zones.write().unwrap() = to_names(zones);
    }

    pub fn reload_calls(&self) -> usize {
        self.reload_calls.load(Ordering::SeqCst)
    }
}

fn to_names(zones: &[&str]) -> Arc<[Arc<str>]> {
    zones.iter().map(|z| Arc::from(*z)).collect()
}

#[async_trait]
impl ZoneCatalog for MockZoneCatalog {
    fn zone_names(&self) -> Arc<[Arc<str>]> {
        self.zones.read().unwrap().clone()
    }

    fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    async fn load_zones(&self) -> Result<usize, DomainError> {
        self.reload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(DomainError::StoreError("zone directory unreadable".into()));
        }
        self.stale.store(false, Ordering::SeqCst);
        Ok(self.zones.read().unwrap().len())
    }
}

// ── record store ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRecordStore {
    zones: RwLock<HashMap<String, Arc<Zone>>>,
    records: RwLock<HashMap<(String, String), RecordSet>>,
    fail_load: AtomicBool,
    fail_get: AtomicBool,
    get_calls: AtomicUsize,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `zone_name` with the given records keyed by location.
    pub fn add_zone(&self, zone_name: &str, records: Vec<(&str, RecordSet)>) {
        let loaded_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let locations = records.iter().map(|(loc, _)| loc.to_string());
        let zone = Zone::new(zone_name, locations, loaded_at);

        let mut map = self.records.write().unwrap();
        for (location, set) in records {
            map.insert((zone.name.to_string(), location.to_string()), set);
        }
        self.zones
            .write()
            .unwrap()
            .insert(zone.name.to_string(), Arc::new(zone));
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn load(&self, zone_name: &str) -> Result<Option<Arc<Zone>>, DomainError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(DomainError::StoreError("connection refused".into()));
        }
        Ok(self.zones.read().unwrap().get(zone_name).cloned())
    }

    async fn get(&self, location: &str, zone: &Zone) -> Result<RecordSet, DomainError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(DomainError::StoreError("connection reset".into()));
        }
        Ok(self
            .records
            .read()
            .unwrap()
            .get(&(zone.name.to_string(), location.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

// ── record converter ───────────────────────────────────────────────────────

/// Converts A and CNAME groups; every other kind yields empty sections.
#[derive(Default)]
pub struct MockRecordConverter {
    transfer: Mutex<Vec<Record>>,
    convert_calls: Mutex<Vec<(RecordKind, String)>>,
}

impl MockRecordConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_transfer(&self, records: Vec<Record>) {
        *self.transfer.lock().unwrap() = records;
    }

    pub fn convert_calls(&self) -> Vec<(RecordKind, String)> {
        self.convert_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordConverter for MockRecordConverter {
    async fn convert(
        &self,
        kind: RecordKind,
        query_name: &str,
        _zone: &Zone,
        records: &RecordSet,
    ) -> Result<RecordSections, DomainError> {
        self.convert_calls
            .lock()
            .unwrap()
            .push((kind, query_name.to_string()));

        let owner = Name::from_str(query_name)
            .map_err(|e| DomainError::ConversionError(e.to_string()))?;
        let answers = match kind {
            RecordKind::A => records
                .a
                .iter()
                .map(|a| Record::from_rdata(owner.clone(), a.ttl, RData::A(A(a.ip))))
                .collect(),
            RecordKind::Cname => records
                .cname
                .iter()
                .map(|c| {
                    let target = Name::from_str(&c.fqdn_host()).unwrap();
                    Record::from_rdata(owner.clone(), c.ttl, RData::CNAME(CNAME(target)))
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(RecordSections::new(answers, Vec::new()))
    }

    async fn axfr(&self, _zone: &Zone) -> Result<Vec<Record>, DomainError> {
        Ok(self.transfer.lock().unwrap().clone())
    }
}

// ── response writer ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockResponseWriter {
    pub messages: Vec<Message>,
    fail_after: Option<usize>,
}

impl MockResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `count` messages, then fails every write.
    pub fn failing_after(count: usize) -> Self {
        Self {
            messages: Vec::new(),
            fail_after: Some(count),
        }
    }

    pub fn single(&self) -> &Message {
        assert_eq!(self.messages.len(), 1, "expected exactly one message");
        &self.messages[0]
    }
}

#[async_trait]
impl ResponseWriter for MockResponseWriter {
    async fn write_message(&mut self, message: Message) -> Result<(), DomainError> {
        if self.fail_after.is_some_and(|limit| self.messages.len() >= limit) {
            return Err(DomainError::ResponseWrite("broken pipe".into()));
        }
        self.messages.push(message);
        Ok(())
    }
}

// ── next handler ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNextHandler {
    calls: AtomicUsize,
}

impl MockNextHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NextHandler for MockNextHandler {
    async fn handle(
        &self,
        _request: &InboundRequest,
        _writer: &mut dyn ResponseWriter,
    ) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── record set builders ────────────────────────────────────────────────────

pub fn a_set(ip: &str) -> RecordSet {
    RecordSet {
        a: vec![ARecord {
            ttl: 300,
            ip: ip.parse::<Ipv4Addr>().unwrap(),
        }],
        ..RecordSet::default()
    }
}

pub fn cname_set(target: &str) -> RecordSet {
    RecordSet {
        cname: vec![CnameRecord {
            ttl: 300,
            host: fqdn(target),
        }],
        ..RecordSet::default()
    }
}
