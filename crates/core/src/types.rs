use crate::error::{Error, Result};
use crate::rich_text::RichText;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A routable page: title, slug and the editor-ordered block list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: String,
    pub slug: String,
    /// Editor-assigned order; never reordered
    #[serde(
        rename = "blocksCollection",
        default,
        deserialize_with = "collection_items"
    )]
    pub blocks: Vec<Block>,
}

/// Known block kinds, keyed by their GraphQL `__typename`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Hero,
    CallToAction,
    Text,
    FeatureGrid,
    Testimonial,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Hero,
        BlockKind::CallToAction,
        BlockKind::Text,
        BlockKind::FeatureGrid,
        BlockKind::Testimonial,
    ];

    /// The discriminator string the CMS uses for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Hero => "HeroSection",
            BlockKind::CallToAction => "CallToActionSection",
            BlockKind::Text => "TextSection",
            BlockKind::FeatureGrid => "FeatureGridSection",
            BlockKind::Testimonial => "TestimonialSection",
        }
    }

    /// Kebab-case name used in CSS classes
    pub fn css_name(&self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::CallToAction => "call-to-action",
            BlockKind::Text => "text",
            BlockKind::FeatureGrid => "feature-grid",
            BlockKind::Testimonial => "testimonial",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::Decode(format!("Unknown block kind '{}'", s)))
    }
}

/// A single content block
///
/// Every discriminator the CMS may send decodes into exactly one variant.
/// Discriminators with no variant are kept as `Unrecognized` so a page
/// referencing blocks that have not been built yet still renders.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Hero(HeroSection),
    CallToAction(CallToActionSection),
    Text(TextSection),
    FeatureGrid(FeatureGridSection),
    Testimonial(TestimonialSection),
    Unrecognized { kind: String },
}

impl Block {
    /// Decode a block from its GraphQL JSON object
    pub fn from_json(value: Value) -> Result<Block> {
        let kind = value
            .get("__typename")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Decode("Block is missing '__typename'".to_string()))?
            .to_string();

        let block = match kind.parse::<BlockKind>() {
            Ok(BlockKind::Hero) => Block::Hero(decode_fields(&kind, value)?),
            Ok(BlockKind::CallToAction) => Block::CallToAction(decode_fields(&kind, value)?),
            Ok(BlockKind::Text) => Block::Text(decode_fields(&kind, value)?),
            Ok(BlockKind::FeatureGrid) => Block::FeatureGrid(decode_fields(&kind, value)?),
            Ok(BlockKind::Testimonial) => Block::Testimonial(decode_fields(&kind, value)?),
            Err(_) => Block::Unrecognized { kind },
        };

        Ok(block)
    }

    /// Known kind of this block, `None` when unrecognized
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Block::Hero(_) => Some(BlockKind::Hero),
            Block::CallToAction(_) => Some(BlockKind::CallToAction),
            Block::Text(_) => Some(BlockKind::Text),
            Block::FeatureGrid(_) => Some(BlockKind::FeatureGrid),
            Block::Testimonial(_) => Some(BlockKind::Testimonial),
            Block::Unrecognized { .. } => None,
        }
    }

    /// Raw discriminator string, for every variant
    pub fn discriminator(&self) -> &str {
        match self {
            Block::Unrecognized { kind } => kind,
            known => known.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Block::from_json(value).map_err(serde::de::Error::custom)
    }
}

fn decode_fields<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::Decode(format!("Invalid fields for {}: {}", kind, e)))
}

/// Typed access to one block kind's fields
pub trait BlockFields: Sized + 'static {
    const KIND: BlockKind;

    fn from_block(block: &Block) -> Option<&Self>;
}

macro_rules! block_fields {
    ($ty:ty, $variant:ident) => {
        impl BlockFields for $ty {
            const KIND: BlockKind = BlockKind::$variant;

            fn from_block(block: &Block) -> Option<&Self> {
                match block {
                    Block::$variant(fields) => Some(fields),
                    _ => None,
                }
            }
        }
    };
}

block_fields!(HeroSection, Hero);
block_fields!(CallToActionSection, CallToAction);
block_fields!(TextSection, Text);
block_fields!(FeatureGridSection, FeatureGrid);
block_fields!(TestimonialSection, Testimonial);

/// Full-width banner
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub heading: String,
    pub subheading: Option<String>,
    pub background_image: Option<Asset>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToActionSection {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<Asset>,
    pub button_label: Option<String>,
    pub button_url: Option<String>,
}

/// Free-form rich text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSection {
    pub title: Option<String>,
    pub body: Option<RichText>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGridSection {
    pub title: Option<String>,
    #[serde(
        rename = "featuresCollection",
        default,
        deserialize_with = "collection_items"
    )]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<Asset>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialSection {
    pub quote: String,
    pub author: String,
    pub role: Option<String>,
    pub avatar: Option<Asset>,
}

/// Media asset as delivered by the CMS
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub content_type: Option<String>,
}

impl Asset {
    /// Alt text: description, then title, then empty
    pub fn alt_text(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(self.title.as_deref())
            .unwrap_or("")
    }
}

/// GraphQL `*Collection { items }` wrapper
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Unwrap a nullable collection into its non-null items.
///
/// The CMS delivers unpublished linked entries as `null` items; they are
/// dropped here, preserving the order of the rest.
pub fn collection_items<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let collection: Option<Collection<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(collection
        .map(|c| c.items.into_iter().flatten().collect())
        .unwrap_or_default())
}

/// Validate a page slug before it is used in a query or an output path.
///
/// Accepts `[A-Za-z0-9_-]` segments separated by `/`. Rejects empty slugs,
/// leading or trailing `/`, empty segments and `..`.
///
/// ```text
/// validate_slug("home")           → Ok
/// validate_slug("blog/first-post") → Ok
/// validate_slug("../etc/passwd")  → Err
/// validate_slug("/home")          → Err
/// ```
pub fn validate_slug(slug: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidSlug {
        slug: slug.to_string(),
        reason: reason.to_string(),
    };

    if slug.trim().is_empty() {
        return Err(invalid("slug is empty"));
    }

    if slug.starts_with('/') || slug.ends_with('/') {
        return Err(invalid("leading or trailing '/' not allowed"));
    }

    for segment in slug.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty path segment"));
        }
        if segment == ".." || segment == "." {
            return Err(invalid("relative path segments not allowed"));
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid("only letters, digits, '-', '_' and '/' allowed"));
        }
    }

    Ok(())
}
