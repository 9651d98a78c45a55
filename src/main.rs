use std::sync::Arc;

use anyhow::Context;
use insight_service::{build_app, run_server, AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!(
        endpoint = config.insight.api_url(),
        model = config.insight.model(),
        "using chat-completion service"
    );

    let app = build_app(Arc::new(AppState::new(config.insight)));

    run_server(app, config.port)
        .await
        .with_context(|| format!("server on port {} failed", config.port))
}
