use super::render::report_skipped;
use super::site::{Site, page_output_path};
use crate::SourceArgs;
use anyhow::{Context, Result};
use blockpress_generator::render_page;
use std::fs;
use std::path::PathBuf;

/// Build static site for deployment
pub async fn run(source: SourceArgs, preview: bool, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Config: {}", source.config.display());
    println!("   Output: {}", output.display());
    if preview {
        println!("   Content: drafts (preview API)");
    }
    println!();

    let site = Site::load(&source)?;
    println!("✓ Loaded: {}", site.config.name);

    // Fetch every page before writing anything so a failed fetch never
    // leaves a half-built site behind
    println!("📥 Fetching pages...");
    let slugs = site
        .source
        .list_slugs(preview)
        .await
        .context("Failed to list pages")?;

    let mut pages = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        let page = site
            .source
            .fetch_page(slug, preview)
            .await
            .with_context(|| format!("Failed to fetch page '{}'", slug))?;
        pages.push((slug, page));
    }
    println!("   ✓ Fetched {} pages", pages.len());

    println!("📄 Rendering pages...");
    fs::create_dir_all(&output).context("Failed to create output directory")?;

    let options = site.page_options(preview);
    let mut skipped_blocks = 0;
    for (slug, page) in &pages {
        let rendered = render_page(&site.registry, page, &options);
        report_skipped(slug, &rendered.skipped);
        skipped_blocks += rendered.skipped.len();

        let path = page_output_path(&output, slug, &site.config.home_slug);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, rendered.html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("   ✓ {} → {}", slug, path.display());
    }

    println!();
    println!("✅ Build complete!");
    println!("   Pages: {}", pages.len());
    if skipped_blocks > 0 {
        println!("   Skipped blocks: {} (run 'blockpress validate' for details)", skipped_blocks);
    }
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}
