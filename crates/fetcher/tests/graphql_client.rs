use blockpress_core::{Block, ContentfulConfig, Error};
use blockpress_fetcher::{ContentSource, GraphQlClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/content/v1/spaces/space1/environments/master";

fn client_for(server: &MockServer) -> GraphQlClient {
    GraphQlClient::new(ContentfulConfig {
        space_id: "space1".to_string(),
        environment: "master".to_string(),
        access_token: "delivery-token".to_string(),
        preview_access_token: Some("preview-token".to_string()),
        endpoint: server.uri(),
    })
    .unwrap()
}

fn home_page_body() -> serde_json::Value {
    json!({
        "data": {
            "pageCollection": {
                "items": [{
                    "title": "Home",
                    "slug": "home",
                    "blocksCollection": {
                        "items": [
                            { "__typename": "HeroSection", "heading": "Welcome" },
                            { "__typename": "UnknownKind" },
                            { "__typename": "CallToActionSection", "title": "Join us" }
                        ]
                    }
                }]
            }
        }
    })
}

#[tokio::test]
async fn test_fetch_page_decodes_blocks_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("authorization", "Bearer delivery-token"))
        .and(body_partial_json(json!({
            "variables": { "slug": "home", "preview": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(home_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server).fetch_page("home", false).await.unwrap();

    assert_eq!(page.title, "Home");
    assert_eq!(page.slug, "home");
    let kinds: Vec<&str> = page.blocks.iter().map(Block::discriminator).collect();
    assert_eq!(
        kinds,
        vec!["HeroSection", "UnknownKind", "CallToActionSection"]
    );
}

#[tokio::test]
async fn test_preview_uses_preview_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("authorization", "Bearer preview-token"))
        .and(body_partial_json(json!({ "variables": { "preview": true } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(home_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server).fetch_page("home", true).await.unwrap();
    assert_eq!(page.blocks.len(), 3);
}

#[tokio::test]
async fn test_graphql_error_array_fails_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [
                { "message": "Unknown field 'headline' on type 'HeroSection'" }
            ]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_page("home", false)
        .await
        .unwrap_err();

    assert!(err.is_fetch_failure());
    assert!(matches!(err, Error::GraphQl(_)));
    assert!(err.to_string().contains("headline"));
}

#[tokio::test]
async fn test_error_array_with_bad_request_status_reports_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{ "message": "Query too complex" }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_page("home", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::GraphQl(ref m) if m[0] == "Query too complex"));
}

#[tokio::test]
async fn test_server_error_fails_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_page("home", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_missing_page_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "pageCollection": { "items": [] } }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_page("missing", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PageNotFound(ref slug) if slug == "missing"));
}

#[tokio::test]
async fn test_invalid_slug_never_reaches_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(home_page_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_page("../admin", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSlug { .. }));
}

#[tokio::test]
async fn test_list_slugs() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "pageCollection": {
                    "items": [{ "slug": "home" }, { "slug": "about" }, null]
                }
            }
        })))
        .mount(&server)
        .await;

    let slugs = client_for(&server).list_slugs(false).await.unwrap();
    assert_eq!(slugs, vec!["home", "about"]);
}

#[tokio::test]
async fn test_list_slugs_follows_total_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "skip": 0 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "pageCollection": {
                    "total": 3,
                    "items": [{ "slug": "home" }, { "slug": "about" }]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "skip": 2 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "pageCollection": {
                    "total": 3,
                    "items": [{ "slug": "blog/launch" }]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let slugs = client_for(&server).list_slugs(false).await.unwrap();
    assert_eq!(slugs, vec!["home", "about", "blog/launch"]);
}
