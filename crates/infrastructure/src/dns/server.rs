use crate::dns::record_type_map::RecordTypeMapper;
use async_trait::async_trait;
use ferrous_zone_application::ports::{InboundRequest, ResponseWriter, Transport};
use ferrous_zone_application::use_cases::HandleZoneQueryUseCase;
use ferrous_zone_domain::DomainError;
use hickory_proto::op::{Header, Message, MessageType, OpCode, ResponseCode};
use hickory_proto::xfer::Protocol;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct ZoneServerHandler {
    use_case: Arc<HandleZoneQueryUseCase>,
}

impl ZoneServerHandler {
    pub fn new(use_case: Arc<HandleZoneQueryUseCase>) -> Self {
        Self { use_case }
    }

    fn inbound(request: &Request) -> Result<InboundRequest, DomainError> {
        let request_info = request
            .request_info()
            .map_err(|e| DomainError::InvalidDomainName(format!("Malformed request: {}", e)))?;

        let question = request_info.query.original().clone();
        let record_type = RecordTypeMapper::from_hickory(question.query_type());
        let transport = match request.protocol() {
            Protocol::Udp => Transport::Udp,
            _ => Transport::Tcp,
        };

        let header = request.header();
        let mut inbound = InboundRequest::from_question(header.id(), question, record_type, transport)
            .with_flags(header.recursion_desired(), header.checking_disabled())
            .with_op_code(header.op_code());

        if let Some(edns) = request.edns() {
            inbound = inbound.with_edns(edns.max_payload(), edns.flags().dnssec_ok);
        }
        Ok(inbound)
    }
}

#[async_trait]
impl RequestHandler for ZoneServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let header = request.header();
        if header.message_type() != MessageType::Query || header.op_code() != OpCode::Query {
            warn!(op_code = ?header.op_code(), "Unsupported operation");
            return send_error_response(request, &mut response_handle, ResponseCode::NotImp).await;
        }

        let inbound = match Self::inbound(request) {
            Ok(inbound) => inbound,
            Err(e) => {
                error!(error = %e, "Failed to parse request info");
                return send_error_response(request, &mut response_handle, ResponseCode::FormErr)
                    .await;
            }
        };

        debug!(
            name = %inbound.query.name,
            record_type = %inbound.query.record_type,
            client = %request.src(),
            transport = ?inbound.transport,
            "DNS query received"
        );

        let mut writer = HickoryResponseWriter::new(request, response_handle);
        match self.use_case.execute(&inbound, &mut writer).await {
            Ok(outcome) => {
                debug!(outcome = ?outcome, "Query finished");
                writer.into_response_info()
            }
            Err(e) => {
                error!(error = %e, "Query resolution failed");
                let HickoryResponseWriter {
                    mut handle, last, ..
                } = writer;
                match last {
                    Some(info) => info,
                    None => send_error_response(request, &mut handle, ResponseCode::ServFail).await,
                }
            }
        }
    }
}

/// Sends assembled messages through a hickory response handle.
pub struct HickoryResponseWriter<'a, R: ResponseHandler> {
    request: &'a Request,
    handle: R,
    last: Option<ResponseInfo>,
}

impl<'a, R: ResponseHandler> HickoryResponseWriter<'a, R> {
    pub fn new(request: &'a Request, handle: R) -> Self {
        Self {
            request,
            handle,
            last: None,
        }
    }

    /// Info of the last message sent, or the request header when the engine
    /// wrote nothing itself.
    pub fn into_response_info(self) -> ResponseInfo {
        self.last
            .unwrap_or_else(|| ResponseInfo::from(*self.request.header()))
    }
}

#[async_trait]
impl<'a, R: ResponseHandler> ResponseWriter for HickoryResponseWriter<'a, R> {
    async fn write_message(&mut self, message: Message) -> Result<(), DomainError> {
        let mut builder = MessageResponseBuilder::from_message_request(self.request);
        if let Some(edns) = message.extensions().clone() {
            builder.edns(edns);
        }

        let response = builder.build(
            *message.header(),
            message.answers().iter(),
            &[],
            &[],
            message.additionals().iter(),
        );

        let info = self
            .handle
            .send_response(response)
            .await
            .map_err(|e| DomainError::ResponseWrite(e.to_string()))?;

        self.last = Some(info);
        Ok(())
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending error response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = Header::response_from_request(request.header());
    header.set_response_code(code);
    let response = builder.build_no_records(header);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(*request.header())
        }
    }
}
