use ferrous_zone_domain::{DomainError, RecordType, ZoneQuery};
use hickory_proto::op::{OpCode, Query};
use hickory_proto::rr::{Name, RecordType as HickoryRecordType};

const UDP_MIN_PAYLOAD: u16 = 512;
const UDP_MAX_PAYLOAD: u16 = 4096;
const TCP_MAX_MESSAGE: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Udp,
    Tcp,
}

/// EDNS(0) parameters advertised by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestEdns {
    pub max_payload: u16,
    pub dnssec_ok: bool,
}

/// Everything the zone engine needs from an incoming message.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub id: u16,
    pub op_code: OpCode,
    pub recursion_desired: bool,
    pub checking_disabled: bool,
    /// Question exactly as received, echoed back in every reply.
    pub question: Query,
    pub query: ZoneQuery,
    pub transport: Transport,
    pub edns: Option<RequestEdns>,
}

impl InboundRequest {
    /// Builds a request from a received question. `record_type` is the
    /// question's type already mapped into the domain.
    pub fn from_question(
        id: u16,
        question: Query,
        record_type: RecordType,
        transport: Transport,
    ) -> Self {
        let query = ZoneQuery::new(&question.name().to_utf8(), record_type);
        Self {
            id,
            op_code: OpCode::Query,
            recursion_desired: false,
            checking_disabled: false,
            question,
            query,
            transport,
            edns: None,
        }
    }

    pub fn new(
        id: u16,
        name: &str,
        record_type: RecordType,
        transport: Transport,
    ) -> Result<Self, DomainError> {
        let name = Name::from_ascii(name).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid query name '{}': {}", name, e))
        })?;
        let question = Query::query(name, HickoryRecordType::from(record_type.to_u16()));
        Ok(Self::from_question(id, question, record_type, transport))
    }

    pub fn with_edns(mut self, max_payload: u16, dnssec_ok: bool) -> Self {
        self.edns = Some(RequestEdns {
            max_payload,
            dnssec_ok,
        });
        self
    }

    pub fn with_flags(mut self, recursion_desired: bool, checking_disabled: bool) -> Self {
        self.recursion_desired = recursion_desired;
        self.checking_disabled = checking_disabled;
        self
    }

    pub fn with_op_code(mut self, op_code: OpCode) -> Self {
        self.op_code = op_code;
        self
    }

    /// Largest response the transport accepts for this request.
    pub fn max_response_size(&self) -> usize {
        match self.transport {
            Transport::Tcp => TCP_MAX_MESSAGE,
            Transport::Udp => self
                .edns
                .map(|edns| edns.max_payload.clamp(UDP_MIN_PAYLOAD, UDP_MAX_PAYLOAD))
                .unwrap_or(UDP_MIN_PAYLOAD) as usize,
        }
    }

    /// Payload size to advertise back when the client used EDNS(0).
    pub fn response_payload(&self) -> Option<u16> {
        self.edns
            .map(|edns| edns.max_payload.clamp(UDP_MIN_PAYLOAD, UDP_MAX_PAYLOAD))
    }
}
