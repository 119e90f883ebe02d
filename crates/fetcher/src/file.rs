use crate::ContentSource;
use crate::response::decode_page_response;
use async_trait::async_trait;
use blockpress_core::{Error, Page, Result, validate_slug};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

/// Content source backed by saved GraphQL responses
///
/// Each page lives in `<root>/<slug>.json` and holds a complete page query
/// response (`{ "data": ..., "errors": ... }`), so it decodes exactly like
/// a live response. Nested slugs map to nested directories.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}.json", slug))
    }
}

#[async_trait]
impl ContentSource for FileSource {
    #[instrument(skip(self))]
    async fn fetch_page(&self, slug: &str, _preview: bool) -> Result<Page> {
        validate_slug(slug)?;

        let path = self.page_path(slug);
        if !path.is_file() {
            return Err(Error::PageNotFound(slug.to_string()));
        }

        debug!(path = %path.display(), "Reading saved response");
        let body = fs::read_to_string(&path)?;
        let page = decode_page_response(&body, slug)?;

        info!(slug, blocks = page.blocks.len(), "Loaded page");
        Ok(page)
    }

    async fn list_slugs(&self, _preview: bool) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(Error::Config(format!(
                "Content directory does not exist: {}",
                self.root.display()
            )));
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }

            let Ok(relative) = path.with_extension("").strip_prefix(&self.root).map(slug_of)
            else {
                continue;
            };

            match validate_slug(&relative) {
                Ok(()) => slugs.push(relative),
                Err(e) => debug!(error = %e, "Skipping content file"),
            }
        }

        slugs.sort();
        Ok(slugs)
    }
}

/// Slug from a path relative to the content root, always `/`-separated
fn slug_of(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
