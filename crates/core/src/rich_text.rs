//! Rich-text document model.
//!
//! A rich-text field arrives as two parts: `json`, the node tree, and
//! `links`, a side table holding every asset and entry the tree references
//! by `sys.id`. Resolving a reference never needs a second request.

use crate::types::Asset;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RichText {
    pub json: Option<Node>,
    #[serde(default)]
    pub links: Links,
}

impl RichText {
    /// True when there is no document or the document has no content
    pub fn is_empty(&self) -> bool {
        self.json.as_ref().is_none_or(|doc| doc.content.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_type: String,
    #[serde(default)]
    pub content: Vec<Node>,
    pub value: Option<String>,
    #[serde(default)]
    pub marks: Vec<Mark>,
    #[serde(default)]
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NodeData {
    pub uri: Option<String>,
    pub target: Option<Link>,
}

/// Reference to a linked asset or entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub sys: Sys,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sys {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub assets: AssetLinks,
    #[serde(default)]
    pub entries: EntryLinks,
}

impl Links {
    pub fn asset(&self, id: &str) -> Option<&LinkedAsset> {
        self.assets.block.iter().find(|a| a.sys.id == id)
    }

    /// Look up an entry in any of the entry link tables
    pub fn entry(&self, id: &str) -> Option<&LinkedEntry> {
        self.entries
            .block
            .iter()
            .chain(self.entries.inline.iter())
            .chain(self.entries.hyperlink.iter())
            .find(|e| e.sys.id == id)
    }

    /// Whether the target of `node` can be resolved from this table
    pub fn resolves(&self, node: &Node) -> bool {
        let Some(target) = &node.data.target else {
            return false;
        };
        match node.node_type.as_str() {
            "embedded-asset-block" | "asset-hyperlink" => self.asset(&target.sys.id).is_some(),
            _ => self.entry(&target.sys.id).is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AssetLinks {
    #[serde(default, deserialize_with = "non_null_items")]
    pub block: Vec<LinkedAsset>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EntryLinks {
    #[serde(default, deserialize_with = "non_null_items")]
    pub block: Vec<LinkedEntry>,
    #[serde(default, deserialize_with = "non_null_items")]
    pub inline: Vec<LinkedEntry>,
    #[serde(default, deserialize_with = "non_null_items")]
    pub hyperlink: Vec<LinkedEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkedAsset {
    pub sys: Sys,
    #[serde(flatten)]
    pub asset: Asset,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkedEntry {
    pub sys: Sys,
    #[serde(rename = "__typename")]
    pub typename: String,
    pub title: Option<String>,
    pub slug: Option<String>,
}

fn non_null_items<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items
        .map(|items| items.into_iter().flatten().collect())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_rich_text_with_links() {
        let rich: RichText = serde_json::from_value(json!({
            "json": {
                "nodeType": "document",
                "content": [
                    {
                        "nodeType": "paragraph",
                        "content": [
                            { "nodeType": "text", "value": "Hi", "marks": [{ "type": "bold" }] }
                        ]
                    },
                    {
                        "nodeType": "embedded-asset-block",
                        "data": { "target": { "sys": { "id": "asset-1" } } }
                    }
                ]
            },
            "links": {
                "assets": {
                    "block": [
                        { "sys": { "id": "asset-1" }, "url": "https://images.example.com/1.png", "title": "One" },
                        null
                    ]
                },
                "entries": {
                    "block": [],
                    "inline": [
                        { "sys": { "id": "entry-1" }, "__typename": "Page", "title": "About", "slug": "about" }
                    ]
                }
            }
        }))
        .unwrap();

        assert!(!rich.is_empty());
        let doc = rich.json.as_ref().unwrap();
        assert_eq!(doc.content.len(), 2);
        assert_eq!(doc.content[0].content[0].marks[0].mark_type, "bold");
        assert_eq!(
            rich.links.asset("asset-1").unwrap().asset.url,
            "https://images.example.com/1.png"
        );
        assert_eq!(rich.links.entry("entry-1").unwrap().slug.as_deref(), Some("about"));
        assert!(rich.links.entry("missing").is_none());
        assert!(rich.links.resolves(&doc.content[1]));
    }

    #[test]
    fn test_empty_rich_text() {
        assert!(RichText::default().is_empty());

        let rich: RichText = serde_json::from_value(json!({
            "json": { "nodeType": "document", "content": [] }
        }))
        .unwrap();
        assert!(rich.is_empty());
    }
}
