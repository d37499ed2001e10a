use async_trait::async_trait;
use ferrous_zone_domain::{DomainError, RecordSet, Zone};
use hickory_proto::rr::Record;

/// Record groups that have a wire conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Txt,
    Ns,
    Mx,
    Srv,
    Soa,
    Caa,
}

/// Answer and additional records produced for one owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSections {
    pub answers: Vec<Record>,
    pub extras: Vec<Record>,
}

impl RecordSections {
    pub fn new(answers: Vec<Record>, extras: Vec<Record>) -> Self {
        Self { answers, extras }
    }

    pub fn extend(&mut self, other: RecordSections) {
        self.answers.extend(other.answers);
        self.extras.extend(other.extras);
    }
}

/// Turns stored record sets into wire records.
#[async_trait]
pub trait RecordConverter: Send + Sync {
    /// Converts one record group of `records`, owned by `query_name`.
    async fn convert(
        &self,
        kind: RecordKind,
        query_name: &str,
        zone: &Zone,
        records: &RecordSet,
    ) -> Result<RecordSections, DomainError>;

    /// Full transfer sequence of the zone, opening and closing with its SOA.
    async fn axfr(&self, zone: &Zone) -> Result<Vec<Record>, DomainError>;
}
