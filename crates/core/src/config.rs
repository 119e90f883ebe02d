use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://graphql.contentful.com";
pub const DEFAULT_ENVIRONMENT: &str = "master";
pub const DEFAULT_HOME_SLUG: &str = "home";

/// Environment variables that override `[contentful]` settings
pub const ENV_SPACE_ID: &str = "CONTENTFUL_SPACE_ID";
pub const ENV_ENVIRONMENT: &str = "CONTENTFUL_ENVIRONMENT";
pub const ENV_ACCESS_TOKEN: &str = "CONTENTFUL_ACCESS_TOKEN";
pub const ENV_PREVIEW_ACCESS_TOKEN: &str = "CONTENTFUL_PREVIEW_ACCESS_TOKEN";

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    contentful: RawContentful,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    name: String,
    home_slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawContentful {
    space_id: Option<String>,
    environment: Option<String>,
    access_token: Option<String>,
    preview_access_token: Option<String>,
    endpoint: Option<String>,
}

/// Validated site configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub home_slug: String,
    /// `None` when no CMS credentials are configured (file-backed content only)
    pub contentful: Option<ContentfulConfig>,
}

/// GraphQL content API connection settings
#[derive(Debug, Clone)]
pub struct ContentfulConfig {
    pub space_id: String,
    pub environment: String,
    pub access_token: String,
    pub preview_access_token: Option<String>,
    pub endpoint: String,
}

impl ContentfulConfig {
    /// Full GraphQL URL for the configured space and environment
    pub fn graphql_url(&self) -> String {
        format!(
            "{}/content/v1/spaces/{}/environments/{}",
            self.endpoint.trim_end_matches('/'),
            self.space_id,
            self.environment
        )
    }

    /// Token for delivery or preview requests
    pub fn token(&self, preview: bool) -> Result<&str> {
        if !preview {
            return Ok(&self.access_token);
        }
        self.preview_access_token.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "Preview requested but no preview_access_token configured (set {})",
                ENV_PREVIEW_ACCESS_TOKEN
            ))
        })
    }
}

/// Parse site.toml from a file path, applying environment overrides
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_config_with_env(&content, |key| std::env::var(key).ok())
}

/// Parse site.toml from a string, ignoring the environment (useful for testing)
pub fn parse_config_str(content: &str) -> Result<SiteConfig> {
    parse_config_with_env(content, |_| None)
}

/// Parse site.toml from a string with an injected environment lookup
pub fn parse_config_with_env<F>(content: &str, env: F) -> Result<SiteConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let raw: RawConfig = toml::from_str(content)?;

    let name = required(Some(raw.site.name), "site.name")?;
    let home_slug = raw
        .site
        .home_slug
        .unwrap_or_else(|| DEFAULT_HOME_SLUG.to_string());
    crate::types::validate_slug(&home_slug)
        .map_err(|e| Error::Config(format!("Invalid site.home_slug: {}", e)))?;

    let contentful = resolve_contentful(raw.contentful, env)?;

    Ok(SiteConfig {
        name,
        home_slug,
        contentful,
    })
}

fn resolve_contentful<F>(raw: RawContentful, env: F) -> Result<Option<ContentfulConfig>>
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |key: &str, file_value: Option<String>| {
        env(key)
            .or(file_value)
            .filter(|v| !v.trim().is_empty())
    };

    let space_id = pick(ENV_SPACE_ID, raw.space_id);
    let access_token = pick(ENV_ACCESS_TOKEN, raw.access_token);
    let environment = pick(ENV_ENVIRONMENT, raw.environment);
    let preview_access_token = pick(ENV_PREVIEW_ACCESS_TOKEN, raw.preview_access_token);

    if space_id.is_none() && access_token.is_none() {
        return Ok(None);
    }

    let space_id = required(space_id, "contentful.space_id")?;
    validate_space_id(&space_id)?;
    let access_token = required(access_token, "contentful.access_token")?;

    let environment = environment.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
    validate_space_id(&environment)
        .map_err(|_| Error::Config(format!("Invalid contentful.environment '{}'", environment)))?;

    let endpoint = raw
        .endpoint
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
        return Err(Error::Config(format!(
            "contentful.endpoint must be an http(s) URL: '{}'",
            endpoint
        )));
    }

    Ok(Some(ContentfulConfig {
        space_id,
        environment,
        access_token,
        preview_access_token,
        endpoint,
    }))
}

fn required(value: Option<String>, field_name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Config(format!(
            "Missing or empty '{}' field",
            field_name
        ))),
    }
}

/// Space and environment ids end up in the request URL path
fn validate_space_id(id: &str) -> Result<()> {
    if id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid contentful.space_id '{}': only letters, digits, '-' and '_' allowed",
            id
        )))
    }
}
