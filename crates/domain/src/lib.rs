//! Ferrous Zone Domain Layer
pub mod config;
pub mod errors;
pub mod record_set;
pub mod record_type;
pub mod zone;
pub mod zone_query;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use record_set::{
    fqdn, ARecord, AaaaRecord, CaaRecord, CnameRecord, MxRecord, NsRecord, RecordSet, SoaRecord,
    SrvRecord, TxtRecord,
};
pub use record_type::RecordType;
pub use zone::{Zone, APEX};
pub use zone_query::ZoneQuery;
