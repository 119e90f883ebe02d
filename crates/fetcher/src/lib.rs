//! Content fetching: one request per page, no retry, no partial results.

pub mod file;
pub mod graphql;
pub mod query;
pub mod response;

pub use file::FileSource;
pub use graphql::GraphQlClient;

use async_trait::async_trait;
use blockpress_core::{Page, Result};

/// Source of page records
///
/// A failed fetch (transport error, GraphQL error array, undecodable
/// payload or unknown slug) is returned as a single error; implementations
/// never hand back a partially decoded page.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one page with its ordered blocks
    async fn fetch_page(&self, slug: &str, preview: bool) -> Result<Page>;

    /// Slugs of every page the source knows about
    async fn list_slugs(&self, preview: bool) -> Result<Vec<String>>;
}
