use crate::ContentSource;
use crate::query::{PAGE_QUERY, SLUGS_PAGE_SIZE, SLUGS_QUERY};
use crate::response::{GraphQlResponse, decode_page, decode_slugs};
use async_trait::async_trait;
use blockpress_core::{ContentfulConfig, Error, Page, Result, validate_slug};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

/// GraphQL content API client
pub struct GraphQlClient {
    client: reqwest::Client,
    config: ContentfulConfig,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

impl GraphQlClient {
    /// Create new GraphQL client
    pub fn new(config: ContentfulConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("blockpress/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(http_error)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ContentfulConfig {
        &self.config
    }

    /// Run one query and return its `data`
    async fn execute(&self, query: &str, variables: Value, preview: bool) -> Result<Value> {
        let token = self.config.token(preview)?;
        let url = self.config.graphql_url();
        debug!(url = %url, preview, "Sending GraphQL request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        let body = response.text().await.map_err(http_error)?;

        // Query errors can come back with a 4xx status and an error array;
        // report the array, it says more than the status
        match GraphQlResponse::parse(&body) {
            Ok(envelope) if envelope.error_messages().is_some() => envelope.into_data(),
            _ if !status.is_success() => Err(Error::Http(format!("{} from {}", status, url))),
            Ok(envelope) => envelope.into_data(),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ContentSource for GraphQlClient {
    #[instrument(skip(self))]
    async fn fetch_page(&self, slug: &str, preview: bool) -> Result<Page> {
        validate_slug(slug)?;

        let data = self
            .execute(PAGE_QUERY, json!({ "slug": slug, "preview": preview }), preview)
            .await?;
        let page = decode_page(data, slug)?;

        info!(slug, blocks = page.blocks.len(), "Fetched page");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn list_slugs(&self, preview: bool) -> Result<Vec<String>> {
        let mut slugs = Vec::new();
        let mut skip = 0;
        loop {
            let variables = json!({ "preview": preview, "skip": skip, "limit": SLUGS_PAGE_SIZE });
            let data = self.execute(SLUGS_QUERY, variables, preview).await?;
            let page = decode_slugs(data)?;

            skip += page.fetched;
            slugs.extend(page.slugs);
            if page.fetched == 0 || page.total.is_none_or(|total| skip >= total) {
                break;
            }
            debug!(skip, total = ?page.total, "Fetching next page of slugs");
        }

        info!(count = slugs.len(), "Listed pages");
        Ok(slugs)
    }
}

fn http_error(err: reqwest::Error) -> Error {
    Error::Http(err.to_string())
}
