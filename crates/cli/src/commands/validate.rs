use super::site::Site;
use crate::SourceArgs;
use anyhow::{Context, Result};
use blockpress_validator::{ValidationReport, validate_page};

pub async fn run(source: SourceArgs, preview: bool) -> Result<()> {
    println!("Validating site at: {}", source.config.display());

    let site = Site::load(&source)?;
    println!("✓ {} valid", source.config.display());
    println!("  Site: {}", site.config.name);
    println!("  Block kinds: {:?}", site.registry);

    let slugs = site
        .source
        .list_slugs(preview)
        .await
        .context("Failed to list pages")?;
    println!("  Pages: {}", slugs.len());

    let mut report = ValidationReport::default();
    for slug in &slugs {
        match site.source.fetch_page(slug, preview).await {
            Ok(page) => report.merge(validate_page(&site.registry, &page)),
            Err(e) => report
                .errors
                .push(format!("Page '{}' failed to fetch: {}", slug, e)),
        }
    }

    println!();
    for line in &report.info {
        println!("  ℹ {}", line);
    }
    for line in &report.warnings {
        println!("  ⚠ {}", line);
    }
    for line in &report.errors {
        println!("  ✗ {}", line);
    }
    println!();

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} errors", report.errors.len());
    }

    println!(
        "✅ Validation passed ({} warnings)",
        report.warnings.len()
    );
    Ok(())
}
