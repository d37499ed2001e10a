pub mod zones;

// Re-export use cases
pub use zones::{
    HandleZoneQueryUseCase, QueryOutcome, RecordDispatcher, ResponseAssembler, ZoneTransfer,
};
