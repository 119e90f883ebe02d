use blockpress_core::{Collection, Error, Page, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl GraphQlResponse {
    /// Parse a response body
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| Error::Decode(format!("Invalid GraphQL response: {}", e)))
    }

    /// Error messages, if the server reported any
    pub fn error_messages(&self) -> Option<Vec<String>> {
        self.errors
            .as_ref()
            .filter(|errors| !errors.is_empty())
            .map(|errors| errors.iter().map(|e| e.message.clone()).collect())
    }

    /// Extract `data`, failing on a non-empty error array
    ///
    /// A response carrying both data and errors is still a failure; no
    /// partial page is ever built from it.
    pub fn into_data(self) -> Result<Value> {
        if let Some(messages) = self.error_messages() {
            return Err(Error::GraphQl(messages));
        }
        self.data
            .filter(|data| !data.is_null())
            .ok_or_else(|| Error::Decode("GraphQL response has no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(rename = "pageCollection")]
    page_collection: Option<Collection<Option<Page>>>,
}

#[derive(Debug, Deserialize)]
struct SlugItem {
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlugCollection {
    total: Option<usize>,
    #[serde(default)]
    items: Vec<Option<SlugItem>>,
}

#[derive(Debug, Deserialize)]
struct SlugData {
    #[serde(rename = "pageCollection")]
    page_collection: Option<SlugCollection>,
}

/// One page of a slug listing
#[derive(Debug, Default, PartialEq)]
pub struct SlugPage {
    pub slugs: Vec<String>,
    /// Items returned, including ones without a slug
    pub fetched: usize,
    /// Pages matching the query across all pages of results
    pub total: Option<usize>,
}

/// Block counts `(total, fetched)` when the page has more blocks than the
/// query returned
pub fn truncated_blocks(data: &Value) -> Option<(u64, usize)> {
    let blocks = data.pointer("/pageCollection/items/0/blocksCollection")?;
    let total = blocks.get("total").and_then(Value::as_u64)?;
    let fetched = blocks
        .get("items")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    (total > fetched as u64).then_some((total, fetched))
}

/// Decode `data` of a page query; no item means the slug does not exist
pub fn decode_page(data: Value, slug: &str) -> Result<Page> {
    if let Some((total, fetched)) = truncated_blocks(&data) {
        warn!(
            slug,
            total,
            fetched,
            "Page has more blocks than one query returns; the rest are not rendered"
        );
    }

    let data: PageData = serde_json::from_value(data)?;
    data.page_collection
        .and_then(|c| c.items.into_iter().flatten().next())
        .ok_or_else(|| Error::PageNotFound(slug.to_string()))
}

/// Decode `data` of a slug listing query, skipping entries without a slug
pub fn decode_slugs(data: Value) -> Result<SlugPage> {
    let data: SlugData = serde_json::from_value(data)?;
    let Some(collection) = data.page_collection else {
        return Ok(SlugPage::default());
    };

    let fetched = collection.items.len();
    let slugs = collection
        .items
        .into_iter()
        .flatten()
        .filter_map(|item| item.slug)
        .collect();

    Ok(SlugPage {
        slugs,
        fetched,
        total: collection.total,
    })
}

/// Decode a complete page query response body
pub fn decode_page_response(body: &str, slug: &str) -> Result<Page> {
    let data = GraphQlResponse::parse(body)?.into_data()?;
    decode_page(data, slug)
}
