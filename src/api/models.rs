use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
