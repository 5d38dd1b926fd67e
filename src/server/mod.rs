// src/server/mod.rs
// =============================================================================
// Axum-based HTTP server exposing `POST /analyze`.
//
// It knows nothing about how a page is analyzed: the analyzer is handed in
// as an `Arc<dyn Analyze>`. Requests are traced with tower-http and the
// server stops gracefully on Ctrl-C.
// =============================================================================

mod handlers;
mod routes;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analyzer::Analyze;

use handlers::AppState;
use routes::create_router;

/// HTTP API server
pub struct HttpServer {
    listen_addr: String,
    analyzer: Arc<dyn Analyze>,
    static_dir: Option<PathBuf>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(listen_addr: impl Into<String>, analyzer: Arc<dyn Analyze>) -> Self {
        Self {
            listen_addr: listen_addr.into(),
            analyzer,
            static_dir: None,
        }
    }

    /// Serve files from `dir` for every path the API does not handle
    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Run the server until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", self.listen_addr))?;

        let app = create_router(
            AppState {
                analyzer: self.analyzer.clone(),
            },
            self.static_dir.clone(),
        )
        .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;

        info!("Page inspector listening on http://{}", addr);
        if let Some(dir) = &self.static_dir {
            info!(dir = %dir.display(), "serving static files");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
