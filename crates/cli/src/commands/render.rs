use super::site::Site;
use crate::SourceArgs;
use anyhow::{Context, Result};
use blockpress_generator::{SkippedBlock, render_page};
use std::fs;
use std::path::PathBuf;

/// Render one page to a file or stdout
///
/// A failed fetch writes nothing: the page is either rendered whole or not
/// at all.
pub async fn run(
    slug: String,
    source: SourceArgs,
    preview: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let site = Site::load(&source)?;

    let page = site
        .source
        .fetch_page(&slug, preview)
        .await
        .with_context(|| format!("Failed to fetch page '{}'", slug))?;

    let rendered = render_page(&site.registry, &page, &site.page_options(preview));
    report_skipped(&slug, &rendered.skipped);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }
            fs::write(&path, &rendered.html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Rendered '{}' to {}", slug, path.display());
        }
        None => print!("{}", rendered.html),
    }

    Ok(())
}

/// Tell the user about blocks left out of a page
pub fn report_skipped(slug: &str, skipped: &[SkippedBlock]) {
    for block in skipped {
        eprintln!(
            "   ⚠ Warning: '{}' block {} ({}) skipped: {}",
            slug, block.position, block.kind, block.reason
        );
    }
}
