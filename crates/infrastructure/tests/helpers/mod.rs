#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_zone_application::ports::{ResponseWriter, ZoneCatalog};
use ferrous_zone_domain::DomainError;
use ferrous_zone_infrastructure::repositories::ZoneRepository;
use hickory_proto::op::Message;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const EXAMPLE_ZONE: &str = r#"
origin = "example.com."

[records."@"]
soa = { ttl = 3600, ns = "ns1.example.com.", mbox = "hostmaster.example.com.", refresh = 44, retry = 55, expire = 66, minttl = 100, serial = 2024010101 }
ns = [{ ttl = 3600, host = "ns1.example.com." }]
mx = [{ ttl = 300, host = "mail.example.com.", preference = 10 }]
a = [{ ttl = 300, ip = "192.0.2.1" }]
caa = [
    { ttl = 120, flag = 0, tag = "issue", value = "letsencrypt.org" },
    { flag = 128, tag = "iodef", value = "mailto:security@example.com" },
]

[records.ns1]
a = [{ ttl = 300, ip = "192.0.2.53" }]

[records.mail]
a = [{ ttl = 300, ip = "192.0.2.25" }]
aaaa = [{ ttl = 300, ip = "2001:db8::25" }]

[records.www]
a = [{ ttl = 300, ip = "1.2.3.4" }]
txt = [{ text = "hello world" }]

[records.alias]
cname = [{ ttl = 300, host = "target.example.com." }]

[records.target]
a = [{ ip = "5.6.7.8" }]

[records."_sip._tcp"]
srv = [{ ttl = 300, priority = 10, weight = 5, port = 5060, target = "sip.example.com." }]

[records.sip]
a = [{ ttl = 300, ip = "192.0.2.60" }]

[records."*.dev"]
a = [{ ttl = 300, ip = "192.0.2.99" }]
"#;

pub const BARE_ZONE: &str = r#"
origin = "bare.test"

[records.host]
a = [{ ip = "198.51.100.7" }]
"#;

pub fn write_zone(dir: &Path, file_name: &str, contents: &str) {
    std::fs::write(dir.join(file_name), contents).unwrap();
}

/// A temp directory holding the example zones, plus a repository that has
/// already loaded it.
pub async fn loaded_repository() -> (TempDir, Arc<ZoneRepository>) {
    let dir = tempfile::tempdir().unwrap();
    write_zone(dir.path(), "example.com.toml", EXAMPLE_ZONE);
    write_zone(dir.path(), "bare.test.toml", BARE_ZONE);

    let repository = Arc::new(ZoneRepository::new(dir.path(), Duration::from_secs(300)));
    repository.load_zones().await.unwrap();
    (dir, repository)
}

#[derive(Default)]
pub struct CollectingWriter {
    pub messages: Vec<Message>,
}

impl CollectingWriter {
    pub fn single(&self) -> &Message {
        assert_eq!(self.messages.len(), 1, "expected exactly one message");
        &self.messages[0]
    }
}

#[async_trait]
impl ResponseWriter for CollectingWriter {
    async fn write_message(&mut self, message: Message) -> Result<(), DomainError> {
        self.messages.push(message);
        Ok(())
    }
}
