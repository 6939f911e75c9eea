//! HTTP server and graceful shutdown.
//!
//! Serves three routes from one shared [`AppState`]:
//!
//! - `GET /` — the list page, pre-generated at startup and served from
//!   memory.
//! - `GET /dynamic/{id}` — server-rendered: one request-time fetch per
//!   request, rendered once the response resolves. Fetch failures render
//!   the explicit error view with a 502.
//! - `GET /dynamic_2/{id}` — statically generated: served from the page
//!   cache. A miss claims the id, spawns background generation, and answers
//!   with the pending shell; the rendered page is cached for every request
//!   after that.
//!
//! Shutdown follows the usual SIGTERM contract: stop accepting, let every
//! in-flight connection finish, then return so `main` exits cleanly.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::cache::{Lookup, PageCache};
use crate::fetch::ProductSource;
use crate::generate::GeneratedSite;
use crate::product::FetchState;
use crate::render;
use crate::routes;

type Response = http::Response<Full<Bytes>>;

/// Which handler a matched path belongs to.
#[derive(Debug, Clone, Copy)]
enum Route {
    List,
    DynamicDetail,
    StaticDetail,
}

/// Everything a request handler needs, shared across connections.
pub struct AppState {
    index: Arc<str>,
    cache: Arc<PageCache>,
    source: Arc<dyn ProductSource>,
    router: matchit::Router<Route>,
}

impl AppState {
    /// Build serving state from a generated site and the request-time
    /// product source. The page cache starts seeded with the pre-rendered
    /// detail set, so those ids never hit the fallback path.
    pub fn new(site: GeneratedSite, source: Arc<dyn ProductSource>) -> Self {
        Self {
            index: Arc::from(site.index),
            cache: Arc::new(PageCache::seeded(site.details)),
            source,
            router: route_table(),
        }
    }
}

/// The static route table. Patterns come from [`routes`] so the server and
/// the templates cannot drift apart.
fn route_table() -> matchit::Router<Route> {
    let mut router = matchit::Router::new();
    router.insert(routes::home(), Route::List).expect("valid route pattern");
    router
        .insert(routes::DYNAMIC_DETAIL_PATTERN, Route::DynamicDetail)
        .expect("valid route pattern");
    router
        .insert(routes::STATIC_DETAIL_PATTERN, Route::StaticDetail)
        .expect("valid route pattern");
    router
}

/// Starts accepting connections on `addr` and dispatching them through
/// `state`. Returns only after a full graceful shutdown.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let state = Arc::new(state);

    info!(%addr, pages = state.cache.ready_count().await, "vitrine listening");

    // JoinSet tracks every spawned connection task so shutdown can wait for
    // them all to finish.
    let mut tasks = tokio::task::JoinSet::new();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let state = Arc::clone(&state);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    let svc = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                        let state = Arc::clone(&state);
                        async move {
                            let method = req.method().clone();
                            let path = req.uri().path().to_owned();
                            Ok::<_, Infallible>(dispatch(&state, &method, &path).await)
                        }
                    });

                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the set does not grow without
            // bound on long-running servers.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}

    info!("vitrine stopped");
    Ok(())
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces one response. All failures are handled
/// here — hyper never sees an error.
async fn dispatch(state: &AppState, method: &Method, path: &str) -> Response {
    if method != Method::GET {
        return html_page(StatusCode::METHOD_NOT_ALLOWED, render::not_found_page().into_string());
    }

    let (route, id) = match state.router.at(path) {
        Ok(matched) => {
            let id = matched.params.get("id").and_then(|raw| raw.parse::<u64>().ok());
            (*matched.value, id)
        }
        Err(_) => return not_found(),
    };

    match route {
        Route::List => html_page(StatusCode::OK, state.index.to_string()),
        Route::DynamicDetail => match id {
            Some(id) => dynamic_detail(state, id).await,
            None => not_found(),
        },
        Route::StaticDetail => match id {
            Some(id) => static_detail(state, id).await,
            None => not_found(),
        },
    }
}

/// Server-rendered detail: one fetch per request.
async fn dynamic_detail(state: &AppState, id: u64) -> Response {
    match state.source.detail(id).await {
        Ok(record) => {
            let html = render::detail_page(&FetchState::Ready(record)).into_string();
            html_page(StatusCode::OK, html)
        }
        Err(e) => {
            warn!(id, error = %e, "request-time fetch failed");
            let html = render::detail_page(&FetchState::Failed(e.to_string())).into_string();
            html_page(StatusCode::BAD_GATEWAY, html)
        }
    }
}

/// Statically-generated detail with fallback.
async fn static_detail(state: &AppState, id: u64) -> Response {
    match state.cache.lookup_or_claim(id).await {
        Lookup::Ready(html) => html_page(StatusCode::OK, html.to_string()),
        Lookup::InFlight => pending_shell(),
        Lookup::Claimed => {
            let cache = Arc::clone(&state.cache);
            let source = Arc::clone(&state.source);
            tokio::spawn(async move { generate_fallback(cache, source, id).await });
            pending_shell()
        }
    }
}

/// Background generation of a not-yet-cached detail page.
///
/// Success fulfills the claimed cache entry; failure abandons it so a later
/// request retries.
async fn generate_fallback(cache: Arc<PageCache>, source: Arc<dyn ProductSource>, id: u64) {
    match source.detail(id).await {
        Ok(record) => {
            let html = render::detail_page(&FetchState::Ready(record)).into_string();
            cache.fulfill(id, html).await;
            info!(id, "fallback page generated");
        }
        Err(e) => {
            warn!(id, error = %e, "fallback generation failed");
            cache.abandon(id).await;
        }
    }
}

fn pending_shell() -> Response {
    html_page(StatusCode::OK, render::detail_page(&FetchState::Pending).into_string())
}

fn not_found() -> Response {
    html_page(StatusCode::NOT_FOUND, render::not_found_page().into_string())
}

fn html_page(status: StatusCode, body: String) -> Response {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .expect("response parts are statically valid")
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives: SIGTERM or
/// SIGINT on Unix, Ctrl-C elsewhere.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
