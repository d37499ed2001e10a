use super::response::ResponseAssembler;
use crate::ports::{InboundRequest, RecordConverter, ResponseWriter};
use ferrous_zone_domain::{DomainError, Zone};
use hickory_proto::rr::Record;
use hickory_proto::serialize::binary::BinEncodable;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Envelope size threshold in wire bytes.
pub const DEFAULT_TRANSFER_LENGTH: usize = 1000;

/// Splits a record sequence into envelopes of at most `limit` wire bytes.
///
/// A record that would push the running total over the limit starts the next
/// envelope. A record larger than the limit travels alone.
pub struct Envelopes<I> {
    records: I,
    limit: usize,
    pending: Option<(Record, usize)>,
}

impl<I: Iterator<Item = Record>> Envelopes<I> {
    pub fn new(records: impl IntoIterator<IntoIter = I>, limit: usize) -> Self {
        Self {
            records: records.into_iter(),
            limit,
            pending: None,
        }
    }

    fn next_sized(&mut self) -> Option<(Record, usize)> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }
        self.records.next().map(|record| {
            let len = wire_len(&record);
            (record, len)
        })
    }
}

impl<I: Iterator<Item = Record>> Iterator for Envelopes<I> {
    type Item = Vec<Record>;

    fn next(&mut self) -> Option<Vec<Record>> {
        let mut envelope = Vec::new();
        let mut size = 0usize;

        while let Some((record, len)) = self.next_sized() {
            if !envelope.is_empty() && size + len > self.limit {
                self.pending = Some((record, len));
                break;
            }
            size += len;
            envelope.push(record);
        }

        (!envelope.is_empty()).then_some(envelope)
    }
}

fn wire_len(record: &Record) -> usize {
    record.to_bytes().map(|bytes| bytes.len()).unwrap_or(0)
}

/// Streams a whole zone to one client as a series of envelopes.
pub struct ZoneTransfer {
    converter: Arc<dyn RecordConverter>,
    pub(super) transfer_length: usize,
    pub(super) shutdown: CancellationToken,
}

impl ZoneTransfer {
    pub fn new(
        converter: Arc<dyn RecordConverter>,
        transfer_length: usize,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            converter,
            transfer_length,
            shutdown,
        }
    }

    /// Sends the zone's transfer sequence through `writer`.
    ///
    /// Returns the number of envelopes written. A write failure ends the
    /// transfer early; it is logged and not returned as an error.
    pub async fn stream(
        &self,
        request: &InboundRequest,
        zone: &Zone,
        writer: &mut dyn ResponseWriter,
    ) -> Result<usize, DomainError> {
        let records = self.converter.axfr(zone).await?;
        let total_records = records.len();

        let token = self.shutdown.child_token();
        let (tx, mut rx) = mpsc::channel::<Vec<Record>>(1);

        let producer_token = token.clone();
        let limit = self.transfer_length;
        let producer = tokio::spawn(async move {
            for envelope in Envelopes::new(records, limit) {
                tokio::select! {
                    biased;
                    _ = producer_token.cancelled() => break,
                    sent = tx.send(envelope) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let mut written = 0usize;
        loop {
            let envelope = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                next = rx.recv() => match next {
                    Some(envelope) => envelope,
                    None => break,
                },
            };

            let message = ResponseAssembler::envelope(request, envelope);
            if let Err(e) = writer.write_message(message).await {
                warn!(zone = %zone.name, error = %e, written, "Zone transfer write failed");
                token.cancel();
                break;
            }
            written += 1;
        }

        drop(rx);
        if let Err(e) = producer.await {
            debug!(zone = %zone.name, error = %e, "Transfer producer ended abnormally");
        }

        info!(
            zone = %zone.name,
            records = total_records,
            envelopes = written,
            "Zone transfer finished"
        );
        Ok(written)
    }
}
