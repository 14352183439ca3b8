use crate::database::connector;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// `GET /api/health` — connectivity probe.
pub async fn health() -> Response {
    let connected = connector::test_connection().await;
    let body = json!({
        "status": if connected { "healthy" } else { "unhealthy" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": connector::provider_name(),
        "database_connection": connected,
    });

    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(body)).into_response()
}
