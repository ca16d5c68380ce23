//! # HTTP Server
//!
//! Binds the search routes, the health check and the CORS and trace layers
//! into one axum server.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::service::AppContext;

use super::routes::{health_routes, not_found_handler, search_routes};

/// HTTP server for the search API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over a shared application context
    pub fn new(config: ServerConfig, ctx: Arc<AppContext>) -> Self {
        let router = Self::build_router(&config, ctx);
        Self { config, router }
    }

    fn build_router(config: &ServerConfig, ctx: Arc<AppContext>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(search_routes(ctx))
            .fallback(not_found_handler)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start serving until the process is stopped
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid socket address: {e}")))?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "search API listening");
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
