//! HTTP API server for the droidspeak gateway

pub mod health;
pub mod voice;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::voice::Synthesizer;
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    /// Speech synthesis client, constructed once at startup
    pub synth: Arc<dyn Synthesizer>,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create an API server over a synthesis client
    #[must_use]
    pub fn new(synth: Arc<dyn Synthesizer>, port: u16) -> Self {
        Self {
            state: Arc::new(ApiState { synth }),
            port,
        }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(voice::router(self.state.clone()))
            .merge(health::router())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Bind and serve until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if binding or serving fails.
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(("0.0.0.0", self.port)).await?;
        tracing::info!(port = self.port, "api server listening");

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
