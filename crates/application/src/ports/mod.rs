mod inbound_request;
mod next_handler;
mod record_converter;
mod record_store;
mod response_writer;
mod zone_catalog;

pub use inbound_request::{InboundRequest, RequestEdns, Transport};
pub use next_handler::NextHandler;
pub use record_converter::{RecordConverter, RecordKind, RecordSections};
pub use record_store::RecordStore;
pub use response_writer::ResponseWriter;
pub use zone_catalog::ZoneCatalog;

// Re-export for convenience
pub use ferrous_zone_domain::ZoneQuery;
