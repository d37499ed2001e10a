use std::sync::Arc;

/// Longest-suffix match of a query name against the served zones.
pub struct ZoneMatcher;

impl ZoneMatcher {
    /// Returns the most specific zone containing `query_name`, if any.
    ///
    /// Matching is label-aware (`badexample.com.` is not inside
    /// `example.com.`) and ignores ASCII case.
    pub fn longest_match(query_name: &str, zones: &[Arc<str>]) -> Option<Arc<str>> {
        let name = normalize(query_name);
        zones
            .iter()
            .filter(|zone| is_subdomain(&name, &normalize(zone)))
            .max_by_key(|zone| zone.len())
            .cloned()
    }
}

fn normalize(name: &str) -> String {
    let mut name = name.to_ascii_lowercase();
    if !name.ends_with('.') {
        name.push('.');
    }
    name
}

fn is_subdomain(name: &str, zone: &str) -> bool {
    if zone == "." || name == zone {
        return true;
    }
    name.strip_suffix(zone)
        .is_some_and(|prefix| prefix.ends_with('.'))
}
