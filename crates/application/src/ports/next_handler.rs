use super::{InboundRequest, ResponseWriter};
use async_trait::async_trait;
use ferrous_zone_domain::DomainError;

/// Handler that takes over queries for names outside every served zone.
///
/// It owns the response completely: the zone engine writes nothing once it
/// has delegated.
#[async_trait]
pub trait NextHandler: Send + Sync {
    async fn handle(
        &self,
        request: &InboundRequest,
        writer: &mut dyn ResponseWriter,
    ) -> Result<(), DomainError>;
}
