// GraphQL documents sent to the content API.
// Every block kind with a renderer needs an inline fragment here, otherwise
// its fields never arrive and only `__typename` is decoded.

/// Most blocks one page query returns; `total` reports any beyond it
pub const BLOCKS_LIMIT: usize = 50;

/// Page size for slug listing, the content API's maximum
pub const SLUGS_PAGE_SIZE: usize = 1000;

pub const PAGE_QUERY: &str = r#"
query PageBySlug($slug: String!, $preview: Boolean!) {
  pageCollection(where: { slug: $slug }, limit: 1, preview: $preview) {
    items {
      title
      slug
      blocksCollection(limit: 50) {
        total
        items {
          __typename
          ... on HeroSection {
            heading
            subheading
            ctaLabel
            ctaUrl
            backgroundImage { ...AssetFields }
          }
          ... on CallToActionSection {
            title
            description
            buttonLabel
            buttonUrl
            image { ...AssetFields }
          }
          ... on TextSection {
            title
            body {
              json
              links {
                assets { block { sys { id } ...AssetFields } }
                entries {
                  block { ...EntryFields }
                  inline { ...EntryFields }
                  hyperlink { ...EntryFields }
                }
              }
            }
          }
          ... on FeatureGridSection {
            title
            featuresCollection(limit: 24) {
              items {
                title
                description
                icon { ...AssetFields }
              }
            }
          }
          ... on TestimonialSection {
            quote
            author
            role
            avatar { ...AssetFields }
          }
        }
      }
    }
  }
}

fragment AssetFields on Asset {
  url
  title
  description
  width
  height
  contentType
}

fragment EntryFields on Entry {
  __typename
  sys { id }
  ... on Page {
    title
    slug
  }
}
"#;

pub const SLUGS_QUERY: &str = r#"
query PageSlugs($preview: Boolean!, $skip: Int!, $limit: Int!) {
  pageCollection(skip: $skip, limit: $limit, preview: $preview) {
    total
    items {
      slug
    }
  }
}
"#;
