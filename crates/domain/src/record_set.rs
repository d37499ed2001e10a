use crate::zone::APEX;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ARecord {
    #[serde(default)]
    pub ttl: u32,
    pub ip: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AaaaRecord {
    #[serde(default)]
    pub ttl: u32,
    pub ip: Ipv6Addr,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TxtRecord {
    #[serde(default)]
    pub ttl: u32,
    pub text: String,
}

/// Alias at an owner. `host` may be written with or without the trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CnameRecord {
    #[serde(default)]
    pub ttl: u32,
    pub host: String,
}

impl CnameRecord {
    /// Absolute, dot-terminated target used on the wire.
    pub fn fqdn_host(&self) -> String {
        fqdn(&self.host)
    }

    /// Zone-relative location of the target, lower-cased like zone keys.
    ///
    /// A target equal to `zone_name` maps to [`APEX`]. A target outside
    /// `zone_name` comes back absolute, so the lookup that follows simply
    /// misses.
    pub fn location_in(&self, zone_name: &str) -> String {
        let host = fqdn(&self.host.to_ascii_lowercase());
        let zone = fqdn(&zone_name.to_ascii_lowercase());
        if host == zone {
            return APEX.to_string();
        }
        let suffix = format!(".{}", zone);
        match host.strip_suffix(suffix.as_str()) {
            Some(relative) => relative.to_string(),
            None => host,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NsRecord {
    #[serde(default)]
    pub ttl: u32,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MxRecord {
    #[serde(default)]
    pub ttl: u32,
    pub host: String,
    pub preference: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SrvRecord {
    #[serde(default)]
    pub ttl: u32,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SoaRecord {
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub mbox: String,
    #[serde(default)]
    pub ns: String,
    #[serde(default)]
    pub refresh: u32,
    #[serde(default)]
    pub retry: u32,
    #[serde(default)]
    pub expire: u32,
    #[serde(default)]
    pub minttl: u32,
    #[serde(default)]
    pub serial: Option<u32>,
}

impl SoaRecord {
    /// A SOA without a primary nameserver is treated as absent.
    pub fn is_configured(&self) -> bool {
        !self.ns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CaaRecord {
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub flag: u8,
    pub tag: String,
    pub value: String,
}

/// Every record stored at one owner name, grouped by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub a: Vec<ARecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aaaa: Vec<AaaaRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub txt: Vec<TxtRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cname: Vec<CnameRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ns: Vec<NsRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mx: Vec<MxRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub srv: Vec<SrvRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soa: Option<SoaRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caa: Vec<CaaRecord>,
}

impl RecordSet {
    pub fn has_cname(&self) -> bool {
        !self.cname.is_empty()
    }
}

/// Appends the root label if missing.
pub fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}
