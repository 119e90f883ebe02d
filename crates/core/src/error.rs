use crate::types::BlockKind;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Renderer already registered for block kind '{0}'")]
    DuplicateRenderer(BlockKind),

    #[error("Invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },
}

impl Error {
    /// Whether this error aborts a page request as a whole.
    ///
    /// Fetch failures are terminal: nothing from the page is rendered.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::GraphQl(_) | Error::PageNotFound(_) | Error::Decode(_)
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
