//! Mapping from `hickory_proto::rr::RecordType` to `ferrous_zone_domain::RecordType`.

use ferrous_zone_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

/// Maps wire record types onto the domain enum
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert hickory RecordType → domain RecordType (for incoming queries)
    ///
    /// Total: types the engine has no variant for keep their numeric code.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        match hickory_type {
            HickoryRecordType::A => RecordType::A,
            HickoryRecordType::NS => RecordType::NS,
            HickoryRecordType::CNAME => RecordType::CNAME,
            HickoryRecordType::SOA => RecordType::SOA,
            HickoryRecordType::PTR => RecordType::PTR,
            HickoryRecordType::HINFO => RecordType::HINFO,
            HickoryRecordType::MX => RecordType::MX,
            HickoryRecordType::TXT => RecordType::TXT,
            HickoryRecordType::AAAA => RecordType::AAAA,
            HickoryRecordType::SRV => RecordType::SRV,
            HickoryRecordType::CAA => RecordType::CAA,

            HickoryRecordType::IXFR => RecordType::IXFR,
            HickoryRecordType::AXFR => RecordType::AXFR,
            HickoryRecordType::ANY => RecordType::ANY,

            other => RecordType::from_u16(u16::from(other)),
        }
    }
}
