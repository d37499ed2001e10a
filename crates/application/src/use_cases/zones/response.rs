use crate::ports::{InboundRequest, RecordSections};
use hickory_proto::op::{Edns, Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use hickory_proto::serialize::binary::BinEncodable;
use tracing::debug;

/// Builds authoritative replies for one request.
pub struct ResponseAssembler;

impl ResponseAssembler {
    /// NOERROR reply carrying `sections`, cut down to the transport limit.
    pub fn assemble(request: &InboundRequest, sections: RecordSections) -> Message {
        let mut message = Self::skeleton(request, ResponseCode::NoError);
        message.add_answers(sections.answers);
        message.add_additionals(sections.extras);
        Self::fit_to_transport(&mut message, request.max_response_size());
        message
    }

    pub fn assemble_error(request: &InboundRequest, rcode: ResponseCode) -> Message {
        Self::skeleton(request, rcode)
    }

    /// One AXFR envelope. Transfers run over the stream transport, no
    /// truncation applies.
    pub fn envelope(request: &InboundRequest, records: Vec<Record>) -> Message {
        let mut message = Self::skeleton(request, ResponseCode::NoError);
        message.add_answers(records);
        message
    }

    fn skeleton(request: &InboundRequest, rcode: ResponseCode) -> Message {
        let mut message = Message::new(request.id, MessageType::Response, request.op_code);
        message.set_authoritative(true);
        message.set_recursion_desired(request.recursion_desired);
        message.set_recursion_available(false);
        message.set_checking_disabled(request.checking_disabled);
        message.set_response_code(rcode);
        message.add_query(request.question.clone());

        if let (Some(edns), Some(payload)) = (request.edns, request.response_payload()) {
            let mut reply_edns = Edns::new();
            reply_edns.set_max_payload(payload);
            reply_edns.set_dnssec_ok(edns.dnssec_ok);
            message.set_edns(reply_edns);
        }

        message
    }

    /// Drops additional records, then answers, until the encoded message fits
    /// in `max_size`. TC is set once an answer has been dropped.
    ///
    /// Each dropped record lowers an estimate by its uncompressed length, an
    /// upper bound on what removing it saves, so the estimate never falls
    /// below the real size. The message is re-encoded once per batch.
    fn fit_to_transport(message: &mut Message, max_size: usize) {
        let mut size = Self::wire_len(message);
        let mut dropped_extras = 0usize;
        let mut dropped_answers = 0usize;

        while size > max_size {
            let mut estimate = size;
            while estimate > max_size {
                let record = if let Some(record) = message.additionals_mut().pop() {
                    dropped_extras += 1;
                    record
                } else if let Some(record) = message.answers_mut().pop() {
                    dropped_answers += 1;
                    message.set_truncated(true);
                    record
                } else {
                    break;
                };
                estimate = estimate.saturating_sub(record_len(&record));
            }

            let encoded = Self::wire_len(message);
            if encoded >= size {
                break;
            }
            size = encoded;
        }

        if dropped_extras > 0 || dropped_answers > 0 {
            debug!(
                max_size,
                size, dropped_extras, dropped_answers, "Response trimmed to transport size"
            );
        }
    }

    fn wire_len(message: &Message) -> usize {
        // An unencodable message is left for the writer to reject.
        message.to_vec().map(|bytes| bytes.len()).unwrap_or(0)
    }
}

fn record_len(record: &Record) -> usize {
    record.to_bytes().map(|bytes| bytes.len()).unwrap_or(0)
}
