mod zone_file;
pub mod zone_repository;

pub use zone_file::ZoneFile;
pub use zone_repository::ZoneRepository;
