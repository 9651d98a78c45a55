pub mod api;
pub mod config;
pub mod insight;

use std::sync::Arc;

use axum::Router;

pub use config::{AppConfig, ConfigError};
pub use insight::{
    InsightClient, InsightConfig, InsightError, NO_INSIGHT_FALLBACK, SYSTEM_PROMPT,
    UNREACHABLE_FALLBACK,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub insight: InsightClient,
}

impl AppState {
    pub fn new(config: InsightConfig) -> Self {
        Self {
            insight: InsightClient::new(config),
        }
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "insight service listening");
    axum::serve(listener, app).await
}
