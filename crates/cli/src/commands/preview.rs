use super::render::report_skipped;
use super::site::Site;
use crate::SourceArgs;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use blockpress_core::{Error as ContentError, SiteConfig, validate_slug};
use blockpress_generator::page::render_error_page;
use blockpress_generator::render_page;
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
struct AppState {
    site: Arc<Site>,
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with live reload for local development.
///
/// This command:
/// - Validates and loads the site config
/// - Renders draft content on every request (one fetch per page view)
/// - Watches the config and content directory and triggers reload
///
/// # Arguments
///
/// * `source` - Config path and optional saved-content directory
/// * `port` - Port to serve on (default: 8080)
pub async fn run(source: SourceArgs, port: u16) -> Result<()> {
    println!("🧱 Starting preview server...");
    println!("   Config: {}", source.config.display());

    let site = Site::load(&source)?;
    require_preview_access(&site.config, source.content.as_deref())?;
    println!("   ✓ Loaded: {}", site.config.name);
    println!("   ✓ Home page: /{}", site.config.home_slug);

    // Create broadcast channel for reload events
    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        site: Arc::new(site),
        reload_tx: reload_tx.clone(),
    };

    let app = router(state);

    // Start file watcher
    let watch_paths = Site::watch_paths(&source);
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watch_paths, watcher_tx).await {
            eprintln!("File watcher error: {}", e);
        }
    });

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Config changes need a restart; content changes show on reload");
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Every preview request fetches drafts, so a CMS-backed preview needs the
/// preview token before the server starts
fn require_preview_access(config: &SiteConfig, content: Option<&std::path::Path>) -> Result<()> {
    if content.is_some() {
        return Ok(());
    }
    if let Some(cms) = &config.contentful {
        cms.token(true)
            .context("Preview serves draft content and needs a preview token")?;
    }
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/_reload", get(sse_handler))
        .route("/{*slug}", get(page_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch for file changes and trigger reload
async fn watch_files(paths: Vec<PathBuf>, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    for path in &paths {
        if path.exists() {
            watcher.watch(path, RecursiveMode::Recursive)?;
        }
    }

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for live reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn index_handler(State(state): State<AppState>) -> Response {
    let slug = state.site.config.home_slug.clone();
    render_slug(&state, &slug).await
}

async fn page_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    render_slug(&state, slug.trim_end_matches('/')).await
}

/// Fetch and render one page; a failed fetch yields an error page, never a partial one
async fn render_slug(state: &AppState, slug: &str) -> Response {
    if let Err(e) = validate_slug(slug) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid page address", &e.to_string());
    }

    let site = &state.site;
    match site.source.fetch_page(slug, true).await {
        Ok(page) => {
            let rendered = render_page(&site.registry, &page, &site.page_options(true));
            report_skipped(slug, &rendered.skipped);
            Html(rendered.html).into_response()
        }
        Err(ContentError::PageNotFound(_)) => error_response(
            StatusCode::NOT_FOUND,
            "Page not found",
            &format!("No page with slug '{}'", slug),
        ),
        Err(e) => {
            warn!(slug, error = %e, "Page fetch failed");
            error_response(StatusCode::BAD_GATEWAY, "Content fetch failed", &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, heading: &str, detail: &str) -> Response {
    (status, Html(render_error_page(heading, detail))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use blockpress_core::parse_config_str;
    use blockpress_fetcher::FileSource;
    use blockpress_generator::Registry;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(content: &TempDir) -> AppState {
        let (reload_tx, _) = broadcast::channel(4);
        let site = Site {
            config: parse_config_str("[site]\nname = \"Preview Test\"\n").unwrap(),
            source: Arc::new(FileSource::new(content.path())),
            registry: Arc::new(Registry::builtin().unwrap()),
        };
        AppState {
            site: Arc::new(site),
            reload_tx,
        }
    }

    fn write_response(content: &TempDir, slug: &str, body: serde_json::Value) {
        let path = content.path().join(format!("{}.json", slug));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body.to_string()).unwrap();
    }

    fn page_body(title: &str, slug: &str) -> serde_json::Value {
        serde_json::json!({
            "data": {
                "pageCollection": {
                    "items": [{
                        "title": title,
                        "slug": slug,
                        "blocksCollection": {
                            "items": [
                                { "__typename": "HeroSection", "heading": format!("{} hero", title) },
                                { "__typename": "NotYetBuilt" },
                                { "__typename": "CallToActionSection", "title": "Sign up" }
                            ]
                        }
                    }]
                }
            }
        })
    }

    async fn get_page(state: AppState, uri: &str) -> (StatusCode, String) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_preview_requires_preview_token_for_cms() {
        let delivery_only = parse_config_str(
            "[site]\nname = \"Docs\"\n\n[contentful]\nspace_id = \"space\"\naccess_token = \"token\"\n",
        )
        .unwrap();

        let err = require_preview_access(&delivery_only, None).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("preview token"));
        assert!(message.contains("CONTENTFUL_PREVIEW_ACCESS_TOKEN"));

        // Saved content needs no token
        let content = TempDir::new().unwrap();
        assert!(require_preview_access(&delivery_only, Some(content.path())).is_ok());

        let with_preview = parse_config_str(
            "[site]\nname = \"Docs\"\n\n[contentful]\nspace_id = \"space\"\naccess_token = \"token\"\npreview_access_token = \"draft\"\n",
        )
        .unwrap();
        assert!(require_preview_access(&with_preview, None).is_ok());
    }

    #[tokio::test]
    async fn test_index_renders_home_page() {
        let content = TempDir::new().unwrap();
        write_response(&content, "home", page_body("Home", "home"));

        let (status, html) = get_page(test_state(&content), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Home hero"));
        assert!(html.contains("Sign up"));
        assert!(html.contains("preview-badge\">"));
        let hero = html.find("Home hero").unwrap();
        let cta = html.find("Sign up").unwrap();
        assert!(hero < cta);
    }

    #[tokio::test]
    async fn test_nested_slug() {
        let content = TempDir::new().unwrap();
        write_response(&content, "blog/launch", page_body("Launch", "blog/launch"));

        let (status, html) = get_page(test_state(&content), "/blog/launch").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Launch hero"));
    }

    #[tokio::test]
    async fn test_missing_page_is_404() {
        let content = TempDir::new().unwrap();

        let (status, html) = get_page(test_state(&content), "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_graphql_errors_render_no_partial_page() {
        let content = TempDir::new().unwrap();
        write_response(
            &content,
            "broken",
            serde_json::json!({
                "data": { "pageCollection": { "items": [{ "title": "Broken", "slug": "broken" }] } },
                "errors": [{ "message": "Cannot query field 'hero'" }]
            }),
        );

        let (status, html) = get_page(test_state(&content), "/broken").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(html.contains("Cannot query field"));
        assert!(!html.contains("<main>\n"));
        assert!(!html.contains("data-block"));
    }

    #[tokio::test]
    async fn test_invalid_slug_is_400() {
        let content = TempDir::new().unwrap();

        let (status, _) = get_page(test_state(&content), "/bad%20slug").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
