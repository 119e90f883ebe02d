use crate::SourceArgs;
use anyhow::{Context, Result};
use blockpress_core::{SiteConfig, load_config};
use blockpress_fetcher::{ContentSource, FileSource, GraphQlClient};
use blockpress_generator::{PageOptions, Registry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs to render pages
pub struct Site {
    pub config: SiteConfig,
    pub source: Arc<dyn ContentSource>,
    pub registry: Arc<Registry>,
}

impl Site {
    /// Load config, pick a content source and build the block registry
    pub fn load(args: &SourceArgs) -> Result<Self> {
        // A broken registry must stop us before any page is fetched
        let registry = Registry::builtin().context("Failed to initialize block registry")?;

        if !args.config.exists() {
            anyhow::bail!(
                "{} not found\nRun 'blockpress init <path>' first",
                args.config.display()
            );
        }
        let config = load_config(&args.config)
            .with_context(|| format!("Failed to parse {}", args.config.display()))?;

        let source: Arc<dyn ContentSource> = match &args.content {
            Some(dir) => Arc::new(FileSource::new(dir)),
            None => {
                let cms = config.contentful.clone().context(
                    "No [contentful] settings found; configure them or pass --content <dir>",
                )?;
                Arc::new(GraphQlClient::new(cms).context("Failed to create GraphQL client")?)
            }
        };

        Ok(Self {
            config,
            source,
            registry: Arc::new(registry),
        })
    }

    pub fn page_options(&self, preview: bool) -> PageOptions {
        PageOptions::new(self.config.name.clone()).preview(preview)
    }

    /// Paths worth watching for live reload
    pub fn watch_paths(args: &SourceArgs) -> Vec<PathBuf> {
        let mut paths = vec![args.config.clone()];
        if let Some(dir) = &args.content {
            paths.push(dir.clone());
        }
        paths
    }
}

/// Output file for a page: the home page becomes the site's index
pub fn page_output_path(output: &Path, slug: &str, home_slug: &str) -> PathBuf {
    if slug == home_slug {
        output.join("index.html")
    } else {
        output.join(slug).join("index.html")
    }
}
