use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use {
    anyhow::Context,
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    bilingo_auto_reply::EventDispatcher,
    bilingo_common::normalize_route_path,
    tokio::net::TcpListener,
    tower_http::trace::TraceLayer,
    tracing::info,
};

#[cfg(feature = "metrics")]
use bilingo_metrics::MetricsHandle;

use crate::webhook::webhook_handler;

pub const BANNER: &str = "Gemini-powered LINE Bot is running!";

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<EventDispatcher>,
    pub version: &'static str,
    #[cfg(feature = "metrics")]
    pub metrics_handle: Option<MetricsHandle>,
}

impl AppState {
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            dispatcher,
            version: env!("CARGO_PKG_VERSION"),
            #[cfg(feature = "metrics")]
            metrics_handle: None,
        }
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, handle: Option<MetricsHandle>) -> Self {
        self.metrics_handle = handle;
        self
    }
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the router (shared between production startup and tests).
pub fn build_app(state: AppState, webhook_path: &str) -> Router {
    let router = Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler));

    #[cfg(feature = "prometheus")]
    let router = router.route(
        "/metrics",
        get(crate::metrics_routes::prometheus_metrics_handler),
    );

    router
        .route(&normalize_route_path(webhook_path), post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Socket address for an IPv4 or IPv6 bind address. Hostnames are rejected.
pub fn bind_addr(bind: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = bind
        .trim()
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    Ok(SocketAddr::new(ip, port))
}

/// Bind and serve until the process is stopped.
pub async fn start_server(
    bind: &str,
    port: u16,
    webhook_path: &str,
    state: AppState,
) -> anyhow::Result<()> {
    let addr = bind_addr(bind, port)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    serve(listener, webhook_path, state).await
}

/// Serve on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    webhook_path: &str,
    state: AppState,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_app(state, webhook_path);
    info!(%addr, webhook_path = %normalize_route_path(webhook_path), "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn home_handler() -> &'static str {
    BANNER
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "tracked_messages": state.dispatcher.tracker().len(),
    }))
}
