pub mod fallthrough;
pub mod record_converter;
pub mod record_type_map;
pub mod server;

pub use fallthrough::RefusedHandler;
pub use record_converter::WireRecordConverter;
pub use record_type_map::RecordTypeMapper;
pub use server::{HickoryResponseWriter, ZoneServerHandler};
