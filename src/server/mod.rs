//! HTTP server: JSON API, feeds and static assets

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, PostMeta, PostPage, PostRepository};
use crate::generator::{rss_feed, sitemap};
use crate::remote::{AsciiClient, SiteDataClient};
use crate::Site;

const FEED_CACHE_CONTROL: &str = "max-age=0, s-maxage=3600";

/// Shared state handed to every handler
pub struct AppState {
    pub config: SiteConfig,
    pub repository: PostRepository,
    pub renderer: MarkdownRenderer,
    pub site_data: Arc<SiteDataClient>,
    pub ascii: Arc<AsciiClient>,
}

impl AppState {
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            config: site.config.clone(),
            repository: site.repository(),
            renderer: site.renderer(),
            site_data: Arc::new(SiteDataClient::from_config(&site.config)?),
            ascii: Arc::new(AsciiClient::from_config(&site.config)?),
        })
    }

    /// All posts newest first, or nothing if the directory cannot be read
    fn posts(&self) -> Vec<PostMeta> {
        self.repository.get_all().unwrap_or_else(|e| {
            tracing::warn!("Failed to list posts: {}", e);
            Vec::new()
        })
    }

    fn post_page(&self, slug: &str) -> Option<PostPage> {
        let post = match self.repository.get_one(slug) {
            Ok(post) => post?,
            Err(e) => {
                tracing::warn!("Failed to read post {}: {}", slug, e);
                return None;
            }
        };

        let adjacent = self.repository.adjacent(&post.meta.slug).unwrap_or_default();
        let rendered = self.renderer.render(&post.body);
        Some(PostPage::new(post.meta, rendered, adjacent))
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, static_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/api/site-data", get(site_data_handler))
        .route("/api/ascii", get(ascii_handler))
        .route("/api/blog-post/:slug", get(blog_post_handler))
        .route("/api/check-site-data", get(check_site_data_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/posts/:slug", get(post_handler))
        .route("/feed.xml", get(feed_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(site)?);
    let app = router(state, &site.static_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run filesystem-bound repository work on the blocking pool
async fn blocking<T, F>(state: &Arc<AppState>, work: F) -> Option<T>
where
    F: FnOnce(&AppState) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| tracing::error!("Repository task failed: {}", e))
        .ok()
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn site_data_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(state.site_data.fetch_site_data().await).into_response()
}

async fn ascii_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.ascii.fetch_ascii().await {
        Ok(ascii) => Json(json!({ "ascii": ascii })).into_response(),
        Err(e) => {
            tracing::error!("Error fetching ASCII art: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch ASCII art")
        }
    }
}

async fn blog_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let data = state.site_data.fetch_site_data().await;
    match data.blog_post(&slug) {
        Some(post) => Json(post).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Blog post not found"),
    }
}

async fn check_site_data_handler(State(state): State<Arc<AppState>>) -> Response {
    let check = state.site_data.check().await;
    let status = if check.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(check)).into_response()
}

async fn posts_handler(State(state): State<Arc<AppState>>) -> Response {
    let posts = blocking(&state, AppState::posts).await.unwrap_or_default();
    Json(posts).into_response()
}

async fn post_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let key = slug.clone();
    let page = blocking(&state, move |s| s.post_page(&key)).await.flatten();
    match page {
        Some(page) => Json(page).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Post not found: {}", slug)),
    }
}

async fn feed_handler(State(state): State<Arc<AppState>>) -> Response {
    let posts = blocking(&state, AppState::posts).await.unwrap_or_default();
    let body = rss_feed(&state.config, &posts);
    (
        [
            (header::CONTENT_TYPE, "application/rss+xml; charset=utf-8"),
            (header::CACHE_CONTROL, FEED_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

async fn sitemap_handler(State(state): State<Arc<AppState>>) -> Response {
    let posts = blocking(&state, AppState::posts).await.unwrap_or_default();
    let body = sitemap(&state.config, &posts);
    (
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (header::CACHE_CONTROL, FEED_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const UNREACHABLE: &str = "http://127.0.0.1:1/doc";

    fn test_site(temp: &TempDir) -> Site {
        let mut config = SiteConfig {
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        config.site_data.url = UNREACHABLE.to_string();
        config.ascii.url = UNREACHABLE.to_string();
        config.http.timeout_secs = 2;

        let site = Site::with_config(temp.path(), config);
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::create_dir_all(&site.static_dir).unwrap();
        fs::write(
            site.posts_dir.join("2024-01-01-first.md"),
            "---\ntitle: First\ndate: 2024-01-01\n---\n## Intro\nHello",
        )
        .unwrap();
        fs::write(
            site.posts_dir.join("second.md"),
            "---\ntitle: Second\ndate: 2024-02-01\n---\nWorld",
        )
        .unwrap();
        fs::write(site.static_dir.join("robots.txt"), "User-agent: *\n").unwrap();
        site
    }

    fn app(site: &Site) -> Router {
        router(Arc::new(AppState::new(site).unwrap()), &site.static_dir)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_posts_listing() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);

        let (status, _, body) = get(app(&site), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        let posts: Vec<PostMeta> = serde_json::from_str(&body).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_post_page() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);

        let (status, _, body) = get(app(&site), "/api/posts/first").await;
        assert_eq!(status, StatusCode::OK);
        let page: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(page["title"], "First");
        assert_eq!(page["toc"][0]["id"], "intro");
        assert!(page["contentHtml"].as_str().unwrap().contains(r#"<h2 id="intro">"#));
        assert!(page["prevPost"].is_null());
        assert_eq!(page["nextPost"]["slug"], "second");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_post_requests() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);
        let app = app(&site);

        let tasks: Vec<_> = ["/api/posts/first", "/api/posts/second", "/api/posts", "/feed.xml"]
            .into_iter()
            .cycle()
            .take(12)
            .map(|uri| {
                let app = app.clone();
                tokio::spawn(async move { get(app, uri).await })
            })
            .collect();
        for task in tasks {
            let (status, _, _) = task.await.unwrap();
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_missing_post_is_404() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);

        let (status, _, body) = get(app(&site), "/api/posts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Post not found: nope");
    }

    #[tokio::test]
    async fn test_missing_posts_dir_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let site = Site::with_config(temp.path(), SiteConfig::default());

        let (status, _, body) = get(app(&site), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_feeds() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);

        let (status, headers, body) = get(app(&site), "/feed.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/rss+xml"));
        assert_eq!(headers[header::CACHE_CONTROL], FEED_CACHE_CONTROL);
        assert!(body.contains("https://example.com/writings/second"));

        let (status, headers, body) = get(app(&site), "/sitemap.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml"));
        assert!(body.contains("https://example.com/writings/first"));
    }

    #[tokio::test]
    async fn test_site_data_falls_back() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);

        let (status, _, body) = get(app(&site), "/api/site-data").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "Nima");
    }

    #[tokio::test]
    async fn test_remote_failures() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);

        let (status, _, body) = get(app(&site), "/api/ascii").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("error"));

        let (status, _, body) = get(app(&site), "/api/check-site-data").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);

        let (status, _, _) = get(app(&site), "/api/blog-post/anything").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let temp = TempDir::new().unwrap();
        let site = test_site(&temp);

        let (status, _, body) = get(app(&site), "/robots.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "User-agent: *\n");
    }
}
