use crate::ports::{RecordConverter, RecordKind, RecordSections, RecordStore};
use ferrous_zone_domain::{DomainError, RecordSet, RecordType, Zone, ZoneQuery};
use std::sync::Arc;
use tracing::debug;

/// Picks the conversion for a query type.
///
/// An owner holding a CNAME never answers A directly: the alias is returned
/// instead and chased by [`RecordDispatcher::chase_aliases`]. `None` means the
/// type is not implemented.
pub fn select_kind(record_type: RecordType, records: &RecordSet) -> Option<RecordKind> {
    let kind = match record_type {
        RecordType::A => RecordKind::A,
        RecordType::AAAA => RecordKind::Aaaa,
        RecordType::CNAME => RecordKind::Cname,
        RecordType::TXT => RecordKind::Txt,
        RecordType::NS => RecordKind::Ns,
        RecordType::MX => RecordKind::Mx,
        RecordType::SRV => RecordKind::Srv,
        RecordType::SOA => RecordKind::Soa,
        RecordType::CAA => RecordKind::Caa,
        RecordType::PTR
        | RecordType::HINFO
        | RecordType::IXFR
        | RecordType::AXFR
        | RecordType::ANY
        | RecordType::Unknown(_) => return None,
    };

    if kind == RecordKind::A && records.has_cname() {
        return Some(RecordKind::Cname);
    }
    Some(kind)
}

pub struct RecordDispatcher {
    converter: Arc<dyn RecordConverter>,
    store: Arc<dyn RecordStore>,
}

impl RecordDispatcher {
    pub fn new(converter: Arc<dyn RecordConverter>, store: Arc<dyn RecordStore>) -> Self {
        Self { converter, store }
    }

    /// Answer and additional records for `query` at one owner.
    ///
    /// Returns `Ok(None)` for query types without a conversion.
    pub async fn resolve(
        &self,
        query: &ZoneQuery,
        zone: &Zone,
        records: &RecordSet,
    ) -> Result<Option<RecordSections>, DomainError> {
        let Some(kind) = select_kind(query.record_type, records) else {
            return Ok(None);
        };

        let sections = self
            .converter
            .convert(kind, &query.name, zone, records)
            .await?;
        Ok(Some(sections))
    }

    /// Resolves every CNAME of `records` one level deep as an A lookup.
    ///
    /// Targets are looked up inside `zone` only; a target in another zone
    /// misses and contributes nothing. A target that is itself an alias is
    /// not followed further.
    pub async fn chase_aliases(
        &self,
        zone: &Zone,
        records: &RecordSet,
    ) -> Result<RecordSections, DomainError> {
        let mut chased = RecordSections::default();

        for cname in &records.cname {
            let target = cname.fqdn_host();
            let location = cname.location_in(&zone.name);
            let target_records = self.store.get(&location, zone).await?;

            let sections = self
                .converter
                .convert(RecordKind::A, &target, zone, &target_records)
                .await?;

            debug!(
                target = %target,
                answers = sections.answers.len(),
                "CNAME target resolved"
            );
            chased.extend(sections);
        }

        Ok(chased)
    }
}
