use async_trait::async_trait;
use ferrous_zone_application::ports::{RecordConverter, RecordKind, RecordSections, RecordStore};
use ferrous_zone_domain::{fqdn, DomainError, RecordSet, Zone, APEX};
use hickory_proto::rr::rdata::caa::{read_iodef, read_issuer};
use hickory_proto::rr::rdata::{A, AAAA, CAA, CNAME, MX, NS, NULL, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType as HickoryRecordType};
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

const SOA_REFRESH: u32 = 86400;
const SOA_RETRY: u32 = 7200;
const SOA_EXPIRE: u32 = 3600;
const TXT_CHUNK: usize = 255;
const CAA_CRITICAL: u8 = 0x80;

/// Record kinds emitted per owner during a transfer, after the apex SOA/NS.
const TRANSFER_KINDS: [RecordKind; 8] = [
    RecordKind::A,
    RecordKind::Aaaa,
    RecordKind::Cname,
    RecordKind::Txt,
    RecordKind::Ns,
    RecordKind::Mx,
    RecordKind::Srv,
    RecordKind::Caa,
];

/// Builds hickory wire records from stored record sets.
///
/// TTLs are capped by `default_ttl`; a stored TTL of 0 means "use the
/// default". NS, MX and SRV answers carry the in-zone addresses of their
/// targets as additional records.
pub struct WireRecordConverter {
    store: Arc<dyn RecordStore>,
    default_ttl: u32,
}

impl WireRecordConverter {
    pub fn new(store: Arc<dyn RecordStore>, default_ttl: u32) -> Self {
        Self { store, default_ttl }
    }

    fn ttl(&self, ttl: u32) -> u32 {
        if ttl == 0 {
            self.default_ttl
        } else {
            ttl.min(self.default_ttl)
        }
    }

    fn a(&self, owner: &Name, records: &RecordSet) -> Vec<Record> {
        records
            .a
            .iter()
            .map(|a| Record::from_rdata(owner.clone(), self.ttl(a.ttl), RData::A(A(a.ip))))
            .collect()
    }

    fn aaaa(&self, owner: &Name, records: &RecordSet) -> Vec<Record> {
        records
            .aaaa
            .iter()
            .map(|a| {
                Record::from_rdata(owner.clone(), self.ttl(a.ttl), RData::AAAA(AAAA(a.ip)))
            })
            .collect()
    }

    fn cname(&self, owner: &Name, records: &RecordSet) -> Result<Vec<Record>, DomainError> {
        records
            .cname
            .iter()
            .map(|c| {
                let target = parse_name(&c.host)?;
                Ok(Record::from_rdata(
                    owner.clone(),
                    self.ttl(c.ttl),
                    RData::CNAME(CNAME(target)),
                ))
            })
            .collect()
    }

    fn txt(&self, owner: &Name, records: &RecordSet) -> Vec<Record> {
        records
            .txt
            .iter()
            .map(|t| {
                Record::from_rdata(
                    owner.clone(),
                    self.ttl(t.ttl),
                    RData::TXT(TXT::new(split_text(&t.text))),
                )
            })
            .collect()
    }

    fn caa(&self, owner: &Name, records: &RecordSet) -> Vec<Record> {
        records
            .caa
            .iter()
            .filter_map(|caa| {
                let Some(rdata) = caa_rdata(caa.flag, &caa.tag, &caa.value) else {
                    warn!(owner = %owner, tag = %caa.tag, "Skipping CAA record with invalid tag");
                    return None;
                };
                Some(Record::from_rdata(owner.clone(), self.ttl(caa.ttl), rdata))
            })
            .collect()
    }

    /// Zone SOA, synthesized when the owner holds none.
    fn soa(&self, zone: &Zone, records: &RecordSet) -> Result<Record, DomainError> {
        let origin = parse_name(&zone.name)?;
        let serial_default = zone.default_serial();

        let (ttl, soa) = match records.soa.as_ref().filter(|soa| soa.is_configured()) {
            Some(soa) => (
                self.ttl(soa.ttl),
                SOA::new(
                    parse_name(&soa.ns)?,
                    parse_name(&soa.mbox)?,
                    soa.serial.unwrap_or(serial_default),
                    soa_interval(soa.refresh, SOA_REFRESH),
                    soa_interval(soa.retry, SOA_RETRY),
                    soa_interval(soa.expire, SOA_EXPIRE),
                    or_default(soa.minttl, self.default_ttl),
                ),
            ),
            None => (
                self.default_ttl,
                SOA::new(
                    parse_name(&format!("ns1.{}", zone.name))?,
                    parse_name(&format!("hostmaster.{}", zone.name))?,
                    serial_default,
                    soa_interval(0, SOA_REFRESH),
                    soa_interval(0, SOA_RETRY),
                    soa_interval(0, SOA_EXPIRE),
                    self.default_ttl,
                ),
            ),
        };

        Ok(Record::from_rdata(origin, ttl, RData::SOA(soa)))
    }

    /// A, AAAA and CNAME records of `target` when it lives in `zone`.
    async fn glue(&self, target: &str, zone: &Zone) -> Result<Vec<Record>, DomainError> {
        let target = fqdn(&target.to_ascii_lowercase());
        let Some(location) = zone.find_location(&target) else {
            return Ok(Vec::new());
        };

        let records = self.store.get(&location, zone).await?;
        let owner = parse_name(&target)?;

        let mut glue = self.a(&owner, &records);
        glue.extend(self.aaaa(&owner, &records));
        glue.extend(self.cname(&owner, &records)?);
        Ok(glue)
    }
}

#[async_trait]
impl RecordConverter for WireRecordConverter {
    async fn convert(
        &self,
        kind: RecordKind,
        query_name: &str,
        zone: &Zone,
        records: &RecordSet,
    ) -> Result<RecordSections, DomainError> {
        let owner = parse_name(query_name)?;
        let mut sections = RecordSections::default();

        match kind {
            RecordKind::A => sections.answers = self.a(&owner, records),
            RecordKind::Aaaa => sections.answers = self.aaaa(&owner, records),
            RecordKind::Cname => sections.answers = self.cname(&owner, records)?,
            RecordKind::Txt => sections.answers = self.txt(&owner, records),
            RecordKind::Caa => sections.answers = self.caa(&owner, records),
            RecordKind::Soa => sections.answers.push(self.soa(zone, records)?),
            RecordKind::Ns => {
                for ns in &records.ns {
                    let host = parse_name(&ns.host)?;
                    sections.answers.push(Record::from_rdata(
                        owner.clone(),
                        self.ttl(ns.ttl),
                        RData::NS(NS(host)),
                    ));
                    sections.extras.extend(self.glue(&ns.host, zone).await?);
                }
            }
            RecordKind::Mx => {
                for mx in &records.mx {
                    let host = parse_name(&mx.host)?;
                    sections.answers.push(Record::from_rdata(
                        owner.clone(),
                        self.ttl(mx.ttl),
                        RData::MX(MX::new(mx.preference, host)),
                    ));
                    sections.extras.extend(self.glue(&mx.host, zone).await?);
                }
            }
            RecordKind::Srv => {
                for srv in &records.srv {
                    let target = parse_name(&srv.target)?;
                    sections.answers.push(Record::from_rdata(
                        owner.clone(),
                        self.ttl(srv.ttl),
                        RData::SRV(SRV::new(srv.priority, srv.weight, srv.port, target)),
                    ));
                    sections.extras.extend(self.glue(&srv.target, zone).await?);
                }
            }
        }

        Ok(sections)
    }

    async fn axfr(&self, zone: &Zone) -> Result<Vec<Record>, DomainError> {
        let apex = self.store.get(APEX, zone).await?;
        let soa = self.soa(zone, &apex)?;

        let mut body = RecordSections::default();
        body.extend(self.convert(RecordKind::Ns, &zone.name, zone, &apex).await?);

        for location in &zone.locations {
            let owner = zone.owner_name(location);
            let is_apex = location == APEX;
            let records = if is_apex {
                apex.clone()
            } else {
                self.store.get(location, zone).await?
            };

            for kind in TRANSFER_KINDS {
                if is_apex && kind == RecordKind::Ns {
                    continue;
                }
                body.extend(self.convert(kind, &owner, zone, &records).await?);
            }
        }

        // Glue is either an owner record already in the body or a wildcard
        // synthesis that does not belong in the zone.
        let mut sequence = Vec::with_capacity(body.answers.len() + 2);
        sequence.push(soa.clone());
        sequence.extend(body.answers);
        sequence.push(soa);
        Ok(sequence)
    }
}

fn parse_name(name: &str) -> Result<Name, DomainError> {
    Name::from_str(&fqdn(name))
        .map_err(|e| DomainError::ConversionError(format!("Invalid name '{}': {}", name, e)))
}

fn or_default(value: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value
    }
}

/// SOA timers are signed 32-bit on the wire; larger values saturate.
fn soa_interval(value: u32, default: u32) -> i32 {
    i32::try_from(or_default(value, default)).unwrap_or(i32::MAX)
}

/// Splits text into character-strings of at most 255 bytes without breaking
/// a UTF-8 sequence.
fn split_text(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if current.len() + ch.len_utf8() > TXT_CHUNK {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// CAA RDATA for one stored property. `issue`, `issuewild` and `iodef`
/// values that parse become typed records; anything else is sent as the
/// raw RFC 8659 layout.
fn caa_rdata(flag: u8, tag: &str, value: &str) -> Option<RData> {
    if tag.is_empty() || tag.len() > 15 || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    let critical = flag & CAA_CRITICAL != 0;
    let typed = if flag & !CAA_CRITICAL != 0 {
        None
    } else {
        match tag {
            "issue" => read_issuer(value.as_bytes())
                .ok()
                .map(|(name, options)| CAA::new_issue(critical, name, options)),
            "issuewild" => read_issuer(value.as_bytes())
                .ok()
                .map(|(name, options)| CAA::new_issuewild(critical, name, options)),
            "iodef" => read_iodef(value.as_bytes())
                .ok()
                .map(|url| CAA::new_iodef(critical, url)),
            _ => None,
        }
    };

    Some(match typed {
        Some(caa) => RData::CAA(caa),
        None => RData::Unknown {
            code: HickoryRecordType::CAA,
            rdata: NULL::with(raw_caa(flag, tag, value)),
        },
    })
}

/// RFC 8659 CAA RDATA: flags, tag length, tag, value.
fn raw_caa(flag: u8, tag: &str, value: &str) -> Vec<u8> {
    let mut rdata = Vec::with_capacity(2 + tag.len() + value.len());
    rdata.push(flag);
    rdata.push(tag.len() as u8);
    rdata.extend_from_slice(tag.as_bytes());
    rdata.extend_from_slice(value.as_bytes());
    rdata
}
