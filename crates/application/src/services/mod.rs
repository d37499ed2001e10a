mod zone_matcher;

pub use zone_matcher::ZoneMatcher;
