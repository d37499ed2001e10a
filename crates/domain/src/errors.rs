use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid zone definition: {0}")]
    InvalidZone(String),

    #[error("Record store error: {0}")]
    StoreError(String),

    #[error("Record conversion failed: {0}")]
    ConversionError(String),

    #[error("Failed to write response: {0}")]
    ResponseWrite(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
