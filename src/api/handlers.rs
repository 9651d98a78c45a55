use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::AppState;

use super::models::{ErrorResponse, InsightRequest, InsightResponse};

/// The query is forwarded untouched, including the empty string.
pub async fn insight(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InsightRequest>,
) -> Json<InsightResponse> {
    let insight = state.insight.generate_insight(&payload.query).await;
    Json(InsightResponse { insight })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}
