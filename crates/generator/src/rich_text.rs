//! Rich-text document rendering.
//!
//! Walks the node tree and resolves embedded references through the
//! document's own `links` table. Unknown node types and references that do
//! not resolve are dropped; their siblings still render.

use crate::components::{image, safe_href};
use crate::fragment::Fragment;
use blockpress_core::{RichText, validate_slug};
use blockpress_core::rich_text::{Links, Node};
use leptos::prelude::*;
use tracing::debug;

/// Render a rich-text document to HTML; an absent or empty document renders nothing
pub fn render_rich_text(rich: &RichText) -> Fragment {
    if rich.is_empty() {
        return Fragment::empty();
    }
    Fragment::new(rich_text_view(rich).to_html())
}

/// View for a whole document
pub(crate) fn rich_text_view(rich: &RichText) -> AnyView {
    match &rich.json {
        Some(doc) if !doc.content.is_empty() => children(doc, &rich.links).into_any(),
        _ => ().into_any(),
    }
}

fn children(node: &Node, links: &Links) -> Vec<AnyView> {
    node.content
        .iter()
        .filter_map(|child| node_view(child, links))
        .collect()
}

fn node_view(node: &Node, links: &Links) -> Option<AnyView> {
    let inner = || children(node, links);

    let rendered = match node.node_type.as_str() {
        "text" => text_view(node),
        "paragraph" => view! { <p>{inner()}</p> }.into_any(),
        "heading-1" => view! { <h1>{inner()}</h1> }.into_any(),
        "heading-2" => view! { <h2>{inner()}</h2> }.into_any(),
        "heading-3" => view! { <h3>{inner()}</h3> }.into_any(),
        "heading-4" => view! { <h4>{inner()}</h4> }.into_any(),
        "heading-5" => view! { <h5>{inner()}</h5> }.into_any(),
        "heading-6" => view! { <h6>{inner()}</h6> }.into_any(),
        "unordered-list" => view! { <ul>{inner()}</ul> }.into_any(),
        "ordered-list" => view! { <ol>{inner()}</ol> }.into_any(),
        "list-item" => view! { <li>{inner()}</li> }.into_any(),
        "blockquote" => view! { <blockquote>{inner()}</blockquote> }.into_any(),
        "hr" => view! { <hr /> }.into_any(),
        "table" => view! { <table><tbody>{inner()}</tbody></table> }.into_any(),
        "table-row" => view! { <tr>{inner()}</tr> }.into_any(),
        "table-cell" => view! { <td>{inner()}</td> }.into_any(),
        "table-header-cell" => view! { <th>{inner()}</th> }.into_any(),
        "hyperlink" => {
            let href = node.data.uri.as_deref().and_then(safe_href);
            link_view(href, inner())
        }
        "entry-hyperlink" => {
            let href = target_id(node)
                .and_then(|id| links.entry(id))
                .and_then(|entry| entry.slug.as_deref())
                .filter(|slug| validate_slug(slug).is_ok())
                .map(|slug| format!("/{}", slug));
            link_view(href, inner())
        }
        "asset-hyperlink" => {
            let href = target_id(node)
                .and_then(|id| links.asset(id))
                .and_then(|linked| safe_href(&linked.asset.url));
            link_view(href, inner())
        }
        "embedded-asset-block" => embedded_asset_view(node, links)?,
        "embedded-entry-block" | "embedded-entry-inline" => embedded_entry_view(node, links)?,
        other => {
            debug!(node_type = other, "Skipping unknown rich-text node");
            return None;
        }
    };

    Some(rendered)
}

/// Text with its marks applied innermost-first
fn text_view(node: &Node) -> AnyView {
    let mut rendered = node.value.clone().unwrap_or_default().into_any();

    for mark in &node.marks {
        rendered = match mark.mark_type.as_str() {
            "bold" => view! { <strong>{rendered}</strong> }.into_any(),
            "italic" => view! { <em>{rendered}</em> }.into_any(),
            "underline" => view! { <u>{rendered}</u> }.into_any(),
            "code" => view! { <code>{rendered}</code> }.into_any(),
            "superscript" => view! { <sup>{rendered}</sup> }.into_any(),
            "subscript" => view! { <sub>{rendered}</sub> }.into_any(),
            _ => rendered,
        };
    }

    rendered
}

/// Link when the target resolved, plain content otherwise
fn link_view(href: Option<String>, content: Vec<AnyView>) -> AnyView {
    match href {
        Some(href) => view! { <a href=href>{content}</a> }.into_any(),
        None => content.into_any(),
    }
}

fn target_id(node: &Node) -> Option<&str> {
    node.data.target.as_ref().map(|link| link.sys.id.as_str())
}

fn embedded_asset_view(node: &Node, links: &Links) -> Option<AnyView> {
    let id = target_id(node)?;
    let Some(linked) = links.asset(id) else {
        debug!(id, "Unresolved embedded asset");
        return None;
    };
    let asset = &linked.asset;

    let is_image = asset
        .content_type
        .as_deref()
        .is_none_or(|ct| ct.starts_with("image/"));

    let rendered = if is_image {
        let caption = asset.title.clone();
        view! {
            <figure class="embedded-asset">
                {image(asset, "embedded-image")}
                {caption.map(|text| view! { <figcaption>{text}</figcaption> })}
            </figure>
        }
        .into_any()
    } else {
        let href = safe_href(&asset.url)?;
        let label = asset.title.clone().unwrap_or_else(|| asset.url.clone());
        view! { <a class="embedded-file" href=href>{label}</a> }.into_any()
    };

    Some(rendered)
}

fn embedded_entry_view(node: &Node, links: &Links) -> Option<AnyView> {
    let id = target_id(node)?;
    let Some(entry) = links.entry(id) else {
        debug!(id, "Unresolved embedded entry");
        return None;
    };

    let typename = entry.typename.clone();
    let title = entry.title.clone().unwrap_or_default();

    let rendered = if node.node_type == "embedded-entry-inline" {
        view! { <span class="embedded-entry" data-entry-type=typename>{title}</span> }.into_any()
    } else {
        view! { <div class="embedded-entry" data-entry-type=typename>{title}</div> }.into_any()
    };

    Some(rendered)
}
