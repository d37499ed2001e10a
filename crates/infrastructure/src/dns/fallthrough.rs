use async_trait::async_trait;
use ferrous_zone_application::ports::{InboundRequest, NextHandler, ResponseWriter};
use ferrous_zone_application::use_cases::ResponseAssembler;
use ferrous_zone_domain::DomainError;
use hickory_proto::op::ResponseCode;
use tracing::debug;

/// Last handler in the chain: answers REFUSED for names this server is not
/// authoritative for.
pub struct RefusedHandler;

#[async_trait]
impl NextHandler for RefusedHandler {
    async fn handle(
        &self,
        request: &InboundRequest,
        writer: &mut dyn ResponseWriter,
    ) -> Result<(), DomainError> {
        debug!(name = %request.query.name, "Refusing query outside served zones");
        let mut message = ResponseAssembler::assemble_error(request, ResponseCode::Refused);
        message.set_authoritative(false);
        writer.write_message(message).await
    }
}
