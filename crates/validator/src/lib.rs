// Content validation: reports what a page would lose when rendered

use blockpress_core::rich_text::Node;
use blockpress_core::{Block, Page, RichText, validate_slug};
use blockpress_generator::{Registry, render_blocks};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
    }
}

/// Reference node types that must resolve through the document's links
const LINKED_NODE_TYPES: &[&str] = &[
    "embedded-asset-block",
    "embedded-entry-block",
    "embedded-entry-inline",
    "entry-hyperlink",
    "asset-hyperlink",
];

/// Validate one page against the registry it will be rendered with
pub fn validate_page(registry: &Registry, page: &Page) -> ValidationReport {
    let mut report = ValidationReport::default();
    let slug = &page.slug;

    if let Err(e) = validate_slug(slug) {
        report.errors.push(e.to_string());
    }

    if page.title.trim().is_empty() {
        report.errors.push(format!("Page '{}' has no title", slug));
    }

    let rendered = render_blocks(registry, &page.blocks);
    for skipped in &rendered.skipped {
        report.warnings.push(format!(
            "Page '{}': block {} ({}) will not render: {}",
            slug, skipped.position, skipped.kind, skipped.reason
        ));
    }

    for (position, block) in page.blocks.iter().enumerate() {
        if let Block::Text(text) = block
            && let Some(body) = &text.body
        {
            for node_type in unresolved_links(body) {
                report.warnings.push(format!(
                    "Page '{}': block {} ({}) has an unresolved {} reference",
                    slug,
                    position,
                    block.discriminator(),
                    node_type
                ));
            }
        }
    }

    if page.blocks.is_empty() {
        report
            .warnings
            .push(format!("Page '{}' has no blocks", slug));
    }

    report.info.push(format!(
        "Page '{}': {} blocks, {} rendered",
        slug,
        page.blocks.len(),
        rendered.fragments.len()
    ));

    report
}

/// Node types of references that do not resolve, in document order
fn unresolved_links(rich: &RichText) -> Vec<String> {
    fn walk(node: &Node, rich: &RichText, found: &mut Vec<String>) {
        if LINKED_NODE_TYPES.contains(&node.node_type.as_str()) && !rich.links.resolves(node) {
            found.push(node.node_type.clone());
        }
        for child in &node.content {
            walk(child, rich, found);
        }
    }

    let mut found = Vec::new();
    if let Some(doc) = &rich.json {
        walk(doc, rich, &mut found);
    }
    found
}
