use axum::{http::StatusCode, http::Uri, response::Json};
use modkit::{Problem, ProblemResponse};
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "mindjournal";

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Service banner; `docs_url` is null when the OpenAPI document is disabled.
pub fn service_info(docs_enabled: bool) -> Value {
    json!({
        "message": "MindJournal API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs_url": docs_enabled.then_some("/openapi.json"),
        "health_check": "/health"
    })
}

pub async fn route_not_found(uri: Uri) -> ProblemResponse {
    tracing::debug!(path = %uri.path(), "no route");
    Problem::from_parts(
        StatusCode::NOT_FOUND,
        "ROUTE_NOT_FOUND",
        "Not Found",
        format!("No route for {}", uri.path()),
        uri.path(),
    )
    .into()
}
