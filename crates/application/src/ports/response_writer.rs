use async_trait::async_trait;
use ferrous_zone_domain::DomainError;
use hickory_proto::op::Message;

/// Sink for response messages on one client connection.
///
/// Ordinary queries write exactly one message. A zone transfer holds the
/// writer exclusively and writes one message per envelope.
#[async_trait]
pub trait ResponseWriter: Send {
    async fn write_message(&mut self, message: Message) -> Result<(), DomainError>;
}
