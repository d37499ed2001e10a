use serde::{Deserialize, Serialize};

/// Where zones come from and how they are served.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZonesConfig {
    /// Directory holding one `*.toml` document per zone.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Seconds after which the zone list is considered stale and reloaded
    /// by the next query.
    #[serde(default = "default_reload_interval_secs")]
    pub reload_interval_secs: u64,

    /// TTL used for records without one, and upper bound for all others.
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Wire-length budget of one AXFR envelope in bytes.
    #[serde(default = "default_transfer_length")]
    pub transfer_length: usize,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            reload_interval_secs: default_reload_interval_secs(),
            default_ttl: default_ttl(),
            transfer_length: default_transfer_length(),
        }
    }
}

fn default_directory() -> String {
    "zones".to_string()
}

fn default_reload_interval_secs() -> u64 {
    300
}

fn default_ttl() -> u32 {
    360
}

fn default_transfer_length() -> usize {
    1000
}
