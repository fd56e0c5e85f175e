//! Process entry points.
//!
//! The same router runs behind two boundaries: [`serve`] binds a long-lived
//! listener, and [`Invoker`] dispatches one request at a time for
//! per-request (serverless-style) hosting.

use crate::config::Config;
use crate::server::router::{AppState, app_router};
use axum::{Router, body::Body, extract::Request, response::Response};
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tower::ServiceExt;
use tracing::{info, warn};

/// Runs the long-lived listener until shutdown.
///
/// In this mode the schema bootstrap runs up front and a failure is fatal;
/// once serving, requests hit an already-initialized pool.
pub async fn serve(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(&cfg);

    if state.db.is_configured() {
        state.db.pool().await?;
    } else {
        warn!("DATABASE_URL not provided; data endpoints will respond 503 until configured");
    }

    let app = app_router(state, &cfg.static_root);

    let addr = SocketAddr::from((cfg.listen_addr, cfg.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

/// Per-request adapter: one router instance driven once per invocation.
///
/// The schema bootstrap runs lazily inside the first data request; if it
/// fails, that request gets the error response and the initialization memo
/// clears so a later invocation retries.
#[derive(Clone)]
pub struct Invoker {
    app: Router,
}

impl Invoker {
    pub fn new(cfg: &Config) -> Self {
        let state = AppState::new(cfg);
        Self {
            app: app_router(state, &cfg.static_root),
        }
    }

    pub async fn invoke(&self, req: Request<Body>) -> Response {
        match self.app.clone().oneshot(req).await {
            Ok(resp) => resp,
            Err(infallible) => match infallible {},
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
