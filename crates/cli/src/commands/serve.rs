use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path as RouteParams, State},
    http::{StatusCode, header},
    response::{
        Html, IntoResponse, Redirect, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use skilllinkup_core::config::MANIFEST_FILE;
use skilllinkup_core::{Locale, LocaleContext, Site, load_site};
use skilllinkup_generator::{
    RenderOptions, render_not_found, render_page, render_post, render_unavailable, robots_txt,
    sitemap_xml,
};
use skilllinkup_store::{
    HttpPostStore, InMemoryPostStore, LoadOptions, PostLoadError, PostStore, load_post_page,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    site: Arc<RwLock<Site>>,
    store: Arc<dyn PostStore>,
    load: LoadOptions,
    render: RenderOptions,
    reload_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(site: Site, store: Arc<dyn PostStore>, load: LoadOptions, render: RenderOptions) -> Self {
        let (reload_tx, _) = broadcast::channel::<()>(100);
        Self {
            site: Arc::new(RwLock::new(site)),
            store,
            load,
            render,
            reload_tx,
        }
    }
}

/// Serve the site, rendering each page on request.
///
/// With `watch`, content changes reload the site in place and open pages
/// are refreshed over SSE. A reload that fails keeps the previous content.
pub async fn run(path: PathBuf, port: u16, watch: bool, posts: Option<PathBuf>) -> Result<()> {
    println!("🌐 Starting server...");
    println!("   Site: {}", path.display());

    if !path.join(MANIFEST_FILE).exists() {
        anyhow::bail!("{} not found in {}", MANIFEST_FILE, path.display());
    }

    let site = load_site(&path).context("Failed to load site")?;

    println!("   ✓ Loaded: {}", site.info.name);
    println!("   ✓ URL: {}", site.info.url);
    println!("   ✓ Pages: {}", site.pages.len());

    let (store, load) = select_store(&site, posts.as_deref())?;
    let render = RenderOptions { live_reload: watch };
    let state = AppState::new(site, store, load, render);

    let app = build_router(state.clone(), path.join("static"), watch);

    if watch {
        let watcher_path = path.clone();
        let watcher_state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_files(watcher_path, watcher_state).await {
                tracing::error!(error = %e, "file watcher stopped");
            }
        });
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Pick the post store: a `--posts` fixture wins over the configured store
fn select_store(site: &Site, posts: Option<&Path>) -> Result<(Arc<dyn PostStore>, LoadOptions)> {
    let load = site
        .store
        .as_ref()
        .map(|config| LoadOptions {
            related_limit: config.related_limit,
            policy: config.failure_policy,
        })
        .unwrap_or_default();

    if let Some(fixture) = posts {
        let store = InMemoryPostStore::from_json_file(fixture)
            .with_context(|| format!("Failed to load posts from {}", fixture.display()))?;
        println!("   ✓ Posts: {}", fixture.display());
        let store: Arc<dyn PostStore> = Arc::new(store);
        return Ok((store, load));
    }

    match &site.store {
        Some(config) => {
            let store = HttpPostStore::new(config).context("Failed to create post store client")?;
            println!("   ✓ Post store: {}", config.base_url);
            let store: Arc<dyn PostStore> = Arc::new(store);
            Ok((store, load))
        }
        None => {
            tracing::warn!("no post store configured, every post will be not found");
            let store: Arc<dyn PostStore> = Arc::new(InMemoryPostStore::default());
            Ok((store, load))
        }
    }
}

pub fn build_router(state: AppState, static_dir: PathBuf, watch: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler));

    if watch {
        app = app.route("/_reload", get(sse_handler));
    }

    // any other single segment is a locale; unknown ones render English
    app.route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
        .route("/{locale}", get(home_handler))
        .route("/{locale}/{*path}", get(path_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch the site directory and swap in freshly loaded content
async fn watch_files(path: PathBuf, state: AppState) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if !event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    continue;
                }

                match load_site(&path) {
                    Ok(site) => {
                        swap_site(&state, site).await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "reload failed, keeping previous content");
                    }
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Replace the served site and notify open pages.
///
/// The post store client is built once at startup, so `[store]` edits only
/// take effect after a restart. Returns whether such an edit was seen.
async fn swap_site(state: &AppState, site: Site) -> bool {
    let mut current = state.site.write().await;
    let store_changed = current.store != site.store;
    if store_changed {
        tracing::warn!("[store] settings changed, restart the server to apply them");
    }
    *current = site;
    drop(current);

    tracing::info!("content changed, site reloaded");
    let _ = state.reload_tx.send(());
    store_changed
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(()) => yield Ok(Event::default().data("reload")),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn root_handler(State(state): State<AppState>) -> Redirect {
    let locale = state.site.read().await.info.default_locale;
    Redirect::temporary(&format!("/{}", locale))
}

async fn sitemap_handler(State(state): State<AppState>) -> Response {
    let site = state.site.read().await;
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap_xml(&site),
    )
        .into_response()
}

async fn robots_handler(State(state): State<AppState>) -> Response {
    let site = state.site.read().await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&site),
    )
        .into_response()
}

async fn home_handler(State(state): State<AppState>, RouteParams(segment): RouteParams<String>) -> Response {
    let ctx = LocaleContext::from_segment(&segment);
    content_response(&state, ctx.locale, "").await
}

async fn path_handler(
    State(state): State<AppState>,
    RouteParams((segment, path)): RouteParams<(String, String)>,
) -> Response {
    let ctx = LocaleContext::from_segment(&segment);
    let path = path.trim_end_matches('/');
    match path.strip_prefix("post/") {
        Some(slug) => post_response(&state, ctx.locale, slug).await,
        None => content_response(&state, ctx.locale, path).await,
    }
}

async fn fallback_handler(State(state): State<AppState>) -> Response {
    let site = state.site.read().await;
    not_found(&site, site.info.default_locale, state.render)
}

async fn content_response(state: &AppState, locale: Locale, path: &str) -> Response {
    let site = state.site.read().await;
    let Some(page) = site.page(path) else {
        return not_found(&site, locale, state.render);
    };

    match render_page(&site, page, locale, state.render) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(path, %locale, error = %e, "failed to render page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn post_response(state: &AppState, locale: Locale, slug: &str) -> Response {
    if slug.is_empty() || slug.contains('/') {
        let site = state.site.read().await;
        return not_found(&site, locale, state.render);
    }

    // no site lock while waiting on the store
    let result = load_post_page(state.store.as_ref(), slug, locale, state.load).await;

    let site = state.site.read().await;
    match result {
        Ok(page) => match render_post(&site, &page, locale, state.render) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(slug, %locale, error = %e, "failed to render post");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Err(PostLoadError::NotFound) => not_found(&site, locale, state.render),
        Err(PostLoadError::Unavailable(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(render_unavailable(&site, locale, state.render)),
        )
            .into_response(),
    }
}

fn not_found(site: &Site, locale: Locale, render: RenderOptions) -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found(site, locale, render))).into_response()
}
