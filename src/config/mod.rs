//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::HttpConfig;
pub use site::RemoteSourceConfig;
pub use site::SiteConfig;
pub use site::{DEFAULT_ASCII_URL, DEFAULT_SITE_DATA_URL};
