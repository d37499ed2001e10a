use super::RecordType;
use std::sync::Arc;

/// The (name, type) pair a single resolution works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneQuery {
    pub name: Arc<str>,
    pub record_type: RecordType,
}

impl ZoneQuery {
    /// Names are lower-cased and made absolute so zone matching and owner
    /// lookup never see mixed case.
    pub fn new(name: &str, record_type: RecordType) -> Self {
        let mut name = name.to_ascii_lowercase();
        if !name.ends_with('.') {
            name.push('.');
        }
        Self {
            name: Arc::from(name.as_str()),
            record_type,
        }
    }
}
