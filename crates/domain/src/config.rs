mod errors;
mod logging;
mod root;
mod server;
mod zones;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use zones::ZonesConfig;
