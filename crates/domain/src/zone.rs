use crate::record_set::fqdn;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Location key of the zone apex.
pub const APEX: &str = "@";

/// Snapshot of one zone: its name and the owner locations it holds.
///
/// Locations are zone-relative (`www`, `_sip._tcp`, `*.dev`), the apex is
/// [`APEX`]. Record data is fetched separately through the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: Arc<str>,
    pub locations: BTreeSet<String>,
    pub loaded_at: DateTime<Utc>,
}

impl Zone {
    pub fn new(
        name: &str,
        locations: impl IntoIterator<Item = String>,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: Arc::from(fqdn(&name.to_ascii_lowercase()).as_str()),
            locations: locations.into_iter().collect(),
            loaded_at,
        }
    }

    /// Serial used when the zone does not configure one.
    pub fn default_serial(&self) -> u32 {
        self.loaded_at.timestamp().max(0) as u32
    }

    /// Fully-qualified owner name for a location.
    pub fn owner_name(&self, location: &str) -> String {
        if location == APEX {
            self.name.to_string()
        } else {
            format!("{}.{}", location, self.name)
        }
    }

    /// Maps a query name to the location that answers it.
    ///
    /// Order: zone apex, exact owner, then wildcard synthesis at the closest
    /// encloser. When the closest encloser exists but holds no `*` child the
    /// name does not exist.
    pub fn find_location(&self, query_name: &str) -> Option<String> {
        let query = fqdn(&query_name.to_ascii_lowercase());
        if query == *self.name {
            return Some(APEX.to_string());
        }

        let suffix = format!(".{}", self.name);
        let relative = query.strip_suffix(suffix.as_str())?;
        if self.locations.contains(relative) {
            return Some(relative.to_string());
        }

        let mut current = relative;
        loop {
            let (encloser, synthesis) = match current.split_once('.') {
                Some((_, rest)) => (rest, format!("*.{}", rest)),
                None => ("", "*".to_string()),
            };

            if self.encloser_exists(encloser) {
                return self.locations.contains(&synthesis).then_some(synthesis);
            }
            if encloser.is_empty() {
                return None;
            }
            current = encloser;
        }
    }

    fn encloser_exists(&self, encloser: &str) -> bool {
        if encloser.is_empty() {
            return !self.locations.is_empty();
        }
        let dotted = format!(".{}", encloser);
        self.locations
            .iter()
            .any(|location| location == encloser || location.ends_with(dotted.as_str()))
    }
}
