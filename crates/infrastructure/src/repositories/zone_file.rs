use ferrous_zone_domain::{fqdn, DomainError, RecordSet};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One zone as written on disk.
///
/// ```toml
/// origin = "example.com."
///
/// [records."@"]
/// soa = { ns = "ns1.example.com.", mbox = "hostmaster.example.com." }
/// ns = [{ host = "ns1.example.com." }]
///
/// [records.www]
/// a = [{ ttl = 300, ip = "192.0.2.10" }]
/// ```
#[derive(Debug, Deserialize)]
pub struct ZoneFile {
    pub origin: String,
    #[serde(default)]
    pub records: BTreeMap<String, RecordSet>,
}

impl ZoneFile {
    pub fn parse(contents: &str) -> Result<Self, DomainError> {
        let mut file: ZoneFile = toml::from_str(contents)
            .map_err(|e| DomainError::InvalidZone(format!("Failed to parse zone file: {}", e)))?;

        if file.origin.trim().is_empty() {
            return Err(DomainError::InvalidZone("Zone origin is empty".to_string()));
        }
        file.origin = fqdn(&file.origin.trim().to_ascii_lowercase());

        file.records = std::mem::take(&mut file.records)
            .into_iter()
            .map(|(location, records)| (normalize_location(&location, &file.origin), records))
            .collect();

        Ok(file)
    }
}

/// Lower-cases a location key and reduces owner names written in full to
/// their zone-relative form.
fn normalize_location(location: &str, origin: &str) -> String {
    let location = location.trim().to_ascii_lowercase();
    if location == *origin || location == origin.trim_end_matches('.') {
        return ferrous_zone_domain::APEX.to_string();
    }

    let suffix = format!(".{}", origin);
    match location.strip_suffix(suffix.as_str()) {
        Some(relative) => relative.to_string(),
        None => location.trim_end_matches('.').to_string(),
    }
}
