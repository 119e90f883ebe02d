pub mod config;
pub mod error;
pub mod rich_text;
pub mod types;

pub use config::{ContentfulConfig, SiteConfig, load_config, parse_config_str};
pub use error::{Error, Result};
pub use rich_text::RichText;
pub use types::*;
