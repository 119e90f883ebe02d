use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Escape a string for safe inclusion in a TOML basic string
///
/// The template carries comments, so it is written by hand instead of
/// through toml serialization.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Turn a directory name into a readable site name
fn site_name_from_path(path: &Path) -> String {
    let raw = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = raw
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        "My Site".to_string()
    } else {
        name
    }
}

/// Create a site directory with a starter config and one saved page
pub async fn run(path: PathBuf) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    let config_path = path.join("site.toml");
    if config_path.exists() {
        anyhow::bail!(
            "site.toml already exists at {}\nHint: Delete it first or use a different directory",
            config_path.display()
        );
    }

    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let name = site_name_from_path(&path);
    fs::write(&config_path, config_template(&name)).context("Failed to write site.toml")?;
    println!("✓ Created site.toml");

    let content_dir = path.join("content");
    fs::create_dir_all(&content_dir).context("Failed to create content/")?;
    let home_path = content_dir.join("home.json");
    if home_path.exists() {
        println!("⚠ Keeping existing content/home.json");
    } else {
        fs::write(&home_path, SAMPLE_HOME_PAGE).context("Failed to write content/home.json")?;
        println!("✓ Created content/home.json");
    }

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml            ← Edit this to connect your Contentful space");
    println!("  └── content/");
    println!("      └── home.json        ← Saved page for offline rendering");
    println!("\nNext steps:");
    println!(
        "  1. Preview offline: blockpress preview --config {} --content {}",
        config_path.display(),
        content_dir.display()
    );
    println!("  2. Fill in [contentful] in site.toml (or set CONTENTFUL_* variables)");
    println!(
        "  3. Build: blockpress build --config {} --output dist",
        config_path.display()
    );

    Ok(())
}

fn config_template(name: &str) -> String {
    format!(
        r#"# Site configuration

[site]
name = "{name}"
# Slug rendered as index.html by `build` and served at / by `preview`
home_slug = "home"

# Uncomment to fetch pages from Contentful. The CONTENTFUL_SPACE_ID,
# CONTENTFUL_ENVIRONMENT, CONTENTFUL_ACCESS_TOKEN and
# CONTENTFUL_PREVIEW_ACCESS_TOKEN environment variables override these.
#
# [contentful]
# space_id = "your-space-id"
# environment = "master"
# access_token = "your-delivery-token"
# preview_access_token = "your-preview-token"
"#,
        name = toml_escape_string(name)
    )
}

const SAMPLE_HOME_PAGE: &str = r##"{
  "data": {
    "pageCollection": {
      "items": [
        {
          "title": "Home",
          "slug": "home",
          "blocksCollection": {
            "items": [
              {
                "__typename": "HeroSection",
                "heading": "Build pages from blocks",
                "subheading": "Every section of this page is an entry in your CMS.",
                "ctaLabel": "Get started",
                "ctaUrl": "https://www.contentful.com/developers/docs/tutorials/general/get-started/"
              },
              {
                "__typename": "FeatureGridSection",
                "title": "Features",
                "featuresCollection": {
                  "items": [
                    { "title": "Ordered", "description": "Blocks render in the order editors arrange them." },
                    { "title": "Forgiving", "description": "Unknown block types are skipped, not fatal." },
                    { "title": "Static", "description": "Pages build to plain HTML files." }
                  ]
                }
              },
              {
                "__typename": "TextSection",
                "title": "About",
                "body": {
                  "json": {
                    "nodeType": "document",
                    "content": [
                      {
                        "nodeType": "paragraph",
                        "content": [
                          { "nodeType": "text", "value": "Edit ", "marks": [] },
                          { "nodeType": "text", "value": "content/home.json", "marks": [{ "type": "code" }] },
                          { "nodeType": "text", "value": " to change this page.", "marks": [] }
                        ]
                      }
                    ]
                  },
                  "links": { "assets": { "block": [] }, "entries": { "block": [], "inline": [], "hyperlink": [] } }
                }
              },
              {
                "__typename": "TestimonialSection",
                "quote": "It just renders.",
                "author": "A. Editor",
                "role": "Content lead"
              },
              {
                "__typename": "CallToActionSection",
                "title": "Ready to publish?",
                "description": "Connect your Contentful space in site.toml.",
                "buttonLabel": "Read the docs",
                "buttonUrl": "https://www.contentful.com/developers/docs/references/graphql/"
              }
            ]
          }
        }
      ]
    }
  }
}
"##;
