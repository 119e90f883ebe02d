use crate::registry::Registry;
use crate::render::{SkippedBlock, render_blocks};
use blockpress_core::Page;

/// Page-level rendering options
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub site_name: String,
    /// Adds the preview badge and live-reload script
    pub preview: bool,
}

impl PageOptions {
    pub fn new<S: Into<String>>(site_name: S) -> Self {
        Self {
            site_name: site_name.into(),
            preview: false,
        }
    }

    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

/// A complete HTML document plus the blocks left out of it
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub skipped: Vec<SkippedBlock>,
}

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Render a page into a complete HTML document
///
/// Preview and build share this template so what you see in preview is
/// exactly what gets built.
pub fn render_page(registry: &Registry, page: &Page, options: &PageOptions) -> RenderedPage {
    let rendered = render_blocks(registry, &page.blocks);
    let body = rendered.html();

    let title = if page.title.trim().is_empty() {
        html_escape(&options.site_name)
    } else {
        format!(
            "{} | {}",
            html_escape(&page.title),
            html_escape(&options.site_name)
        )
    };

    // Preview badge only shown in preview mode
    let preview_badge = if options.preview {
        r#"<div class="preview-badge">PREVIEW - draft content, live reload active</div>"#
    } else {
        ""
    };

    // Hot reload script only in preview mode
    let reload_script = if options.preview {
        r#"<script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => {
            console.log('Reloading...');
            location.reload();
        };
        eventSource.onerror = () => {
            console.log('Preview server disconnected');
            eventSource.close();
        };
    </script>"#
    } else {
        ""
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLESHEET}</style>
</head>
<body data-slug="{slug}">
    {preview_badge}
    <main>
{body}
    </main>
    <footer class="footer">{site_name}</footer>
    {reload_script}
</body>
</html>
"#,
        slug = html_escape(&page.slug),
        site_name = html_escape(&options.site_name),
    );

    RenderedPage {
        html,
        skipped: rendered.skipped,
    }
}

/// Error page for preview requests that could not be rendered
pub fn render_error_page(heading: &str, detail: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>{heading}</title><style>{STYLESHEET}</style></head><body>
<main class="error-page">
<h1>{heading}</h1>
<pre>{detail}</pre>
</main>
</body></html>"#,
        heading = html_escape(heading),
        detail = html_escape(detail),
    )
}

const STYLESHEET: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; line-height: 1.6; color: #222; }
main { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
.block { margin-bottom: 3rem; }
.block img { max-width: 100%; height: auto; }
.block-hero { position: relative; padding: 4rem 2rem; border-radius: 8px; overflow: hidden; background: #1a1a1f; color: #fff; }
.hero-background { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; opacity: 0.4; }
.hero-content { position: relative; }
.subheading { font-size: 1.25rem; opacity: 0.85; }
.button { display: inline-block; margin-top: 1rem; padding: 0.6rem 1.2rem; border-radius: 4px; background: #ff6b35; color: #fff; text-decoration: none; font-weight: 600; }
.features { list-style: none; display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1.5rem; }
.block-testimonial blockquote { font-size: 1.3rem; font-style: italic; border-left: 3px solid #ff6b35; padding-left: 1rem; }
.avatar { width: 48px; height: 48px; border-radius: 50%; vertical-align: middle; }
.rich-text p, .rich-text ul, .rich-text ol { margin-bottom: 1rem; }
.embedded-entry { padding: 1rem; background: #f5f5f5; border-radius: 4px; }
.preview-badge { background: #ff6b35; color: #fff; padding: 0.5rem 1rem; text-align: center; font-weight: bold; }
.footer { text-align: center; color: #999; font-size: 0.9rem; padding: 2rem; }
.error-page pre { white-space: pre-wrap; background: #f9f9f9; padding: 1rem; }
"#;
