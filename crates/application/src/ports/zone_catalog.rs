use async_trait::async_trait;
use ferrous_zone_domain::DomainError;
use std::sync::Arc;

/// Read-mostly list of served zone names with time-based refresh.
#[async_trait]
pub trait ZoneCatalog: Send + Sync {
    /// Current zone names, fully-qualified and lower-case.
    fn zone_names(&self) -> Arc<[Arc<str>]>;

    /// True once the reload interval has elapsed since the last reload.
    fn is_stale(&self) -> bool;

    /// Rebuilds the zone list. Returns the number of zones now served.
    async fn load_zones(&self) -> Result<usize, DomainError>;
}
