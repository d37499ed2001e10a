use async_trait::async_trait;
use ferrous_zone_domain::{DomainError, RecordSet, Zone};
use std::sync::Arc;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads a zone by its fully-qualified name.
    ///
    /// `Ok(None)` means the catalog and the store disagree about the zone.
    async fn load(&self, zone_name: &str) -> Result<Option<Arc<Zone>>, DomainError>;

    /// Records at a zone-relative location. Unknown locations yield an empty set.
    async fn get(&self, location: &str, zone: &Zone) -> Result<RecordSet, DomainError>;
}
