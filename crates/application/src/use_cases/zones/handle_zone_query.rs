use super::dispatch::RecordDispatcher;
use super::response::ResponseAssembler;
use super::transfer::{ZoneTransfer, DEFAULT_TRANSFER_LENGTH};
use crate::ports::{
    InboundRequest, NextHandler, RecordConverter, RecordStore, ResponseWriter, Transport,
    ZoneCatalog,
};
use crate::services::ZoneMatcher;
use ferrous_zone_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

/// What the engine did with one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The name is outside every served zone; the next handler responded.
    Deferred,
    /// One reply carrying this response code was written.
    Answered(ResponseCode),
    /// A zone transfer was streamed as `envelopes` messages.
    Transferred { envelopes: usize },
}

impl QueryOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, QueryOutcome::Deferred)
    }

    pub fn response_code(&self) -> Option<ResponseCode> {
        match self {
            QueryOutcome::Deferred => None,
            QueryOutcome::Answered(rcode) => Some(*rcode),
            QueryOutcome::Transferred { .. } => Some(ResponseCode::NoError),
        }
    }
}

pub struct HandleZoneQueryUseCase {
    catalog: Arc<dyn ZoneCatalog>,
    store: Arc<dyn RecordStore>,
    dispatcher: RecordDispatcher,
    transfer: ZoneTransfer,
    next: Arc<dyn NextHandler>,
}

impl HandleZoneQueryUseCase {
    pub fn new(
        catalog: Arc<dyn ZoneCatalog>,
        store: Arc<dyn RecordStore>,
        converter: Arc<dyn RecordConverter>,
        next: Arc<dyn NextHandler>,
    ) -> Self {
        Self {
            catalog,
            dispatcher: RecordDispatcher::new(converter.clone(), store.clone()),
            transfer: ZoneTransfer::new(
                converter,
                DEFAULT_TRANSFER_LENGTH,
                CancellationToken::new(),
            ),
            store,
            next,
        }
    }

    pub fn with_transfer_length(mut self, transfer_length: usize) -> Self {
        self.transfer.transfer_length = transfer_length;
        self
    }

    /// Ties running transfers to `shutdown`; cancelling it stops them.
    pub fn with_cancellation(mut self, shutdown: CancellationToken) -> Self {
        self.transfer.shutdown = shutdown;
        self
    }

    #[instrument(
        skip(self, request, writer),
        fields(name = %request.query.name, qtype = %request.query.record_type)
    )]
    pub async fn execute(
        &self,
        request: &InboundRequest,
        writer: &mut dyn ResponseWriter,
    ) -> Result<QueryOutcome, DomainError> {
        self.refresh_if_stale().await;

        let zones = self.catalog.zone_names();
        let Some(zone_name) = ZoneMatcher::longest_match(&request.query.name, &zones) else {
            debug!("No served zone matches, deferring");
            if let Err(e) = self.next.handle(request, writer).await {
                warn!(error = %e, "Next handler failed");
            }
            return Ok(QueryOutcome::Deferred);
        };

        let zone = match self.store.load(&zone_name).await {
            Ok(Some(zone)) => zone,
            Ok(None) => {
                warn!(zone = %zone_name, "Zone listed but not loadable");
                return Ok(self.reply_error(request, writer, ResponseCode::ServFail).await);
            }
            Err(e) => {
                warn!(zone = %zone_name, error = %e, "Zone load failed");
                return Ok(self.reply_error(request, writer, ResponseCode::ServFail).await);
            }
        };

        if request.query.record_type == RecordType::AXFR {
            if request.transport != Transport::Tcp {
                debug!(zone = %zone.name, "Zone transfer over datagram transport refused");
                return Ok(self.reply_error(request, writer, ResponseCode::Refused).await);
            }
            return match self.transfer.stream(request, &zone, writer).await {
                Ok(envelopes) => Ok(QueryOutcome::Transferred { envelopes }),
                Err(e) => {
                    warn!(zone = %zone.name, error = %e, "Zone transfer could not start");
                    Ok(self.reply_error(request, writer, ResponseCode::ServFail).await)
                }
            };
        }

        let Some(location) = zone.find_location(&request.query.name) else {
            debug!(zone = %zone.name, "Owner not found");
            return Ok(self.reply_error(request, writer, ResponseCode::NXDomain).await);
        };

        let records = match self.store.get(&location, &zone).await {
            Ok(records) => records,
            Err(e) => {
                warn!(zone = %zone.name, location = %location, error = %e, "Record fetch failed");
                return Ok(self.reply_error(request, writer, ResponseCode::ServFail).await);
            }
        };

        let resolved = match self.dispatcher.resolve(&request.query, &zone, &records).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(zone = %zone.name, error = %e, "Record conversion failed");
                return Ok(self.reply_error(request, writer, ResponseCode::ServFail).await);
            }
        };

        let Some(mut sections) = resolved else {
            debug!("Query type not implemented");
            return Ok(self.reply_error(request, writer, ResponseCode::NotImp).await);
        };

        if records.has_cname() {
            match self.dispatcher.chase_aliases(&zone, &records).await {
                Ok(chased) => sections.extend(chased),
                Err(e) => {
                    warn!(zone = %zone.name, error = %e, "CNAME chase failed");
                    return Ok(self.reply_error(request, writer, ResponseCode::ServFail).await);
                }
            }
        }

        debug!(
            location = %location,
            answers = sections.answers.len(),
            extras = sections.extras.len(),
            "Answering"
        );

        let message = ResponseAssembler::assemble(request, sections);
        Ok(self.reply(writer, message).await)
    }

    async fn refresh_if_stale(&self) {
        if !self.catalog.is_stale() {
            return;
        }
        match self.catalog.load_zones().await {
            Ok(count) => debug!(zones = count, "Zone list reloaded"),
            Err(e) => warn!(error = %e, "Zone list reload failed, serving previous list"),
        }
    }

    async fn reply_error(
        &self,
        request: &InboundRequest,
        writer: &mut dyn ResponseWriter,
        rcode: ResponseCode,
    ) -> QueryOutcome {
        let message = ResponseAssembler::assemble_error(request, rcode);
        self.reply(writer, message).await
    }

    async fn reply(&self, writer: &mut dyn ResponseWriter, message: Message) -> QueryOutcome {
        let rcode = message.response_code();
        if let Err(e) = writer.write_message(message).await {
            error!(rcode = ?rcode, error = %e, "Failed to write response");
        }
        QueryOutcome::Answered(rcode)
    }
}
