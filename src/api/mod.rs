mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::post,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

pub use handlers::{insight, not_found};
pub use models::{ErrorResponse, InsightRequest, InsightResponse};

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/insight", post(insight))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}
