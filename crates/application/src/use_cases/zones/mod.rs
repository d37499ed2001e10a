mod dispatch;
mod handle_zone_query;
mod response;
mod transfer;

pub use dispatch::{select_kind, RecordDispatcher};
pub use handle_zone_query::{HandleZoneQueryUseCase, QueryOutcome};
pub use response::ResponseAssembler;
pub use transfer::{Envelopes, ZoneTransfer, DEFAULT_TRANSFER_LENGTH};
